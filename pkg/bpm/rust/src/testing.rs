// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Test doubles shared by unit and integration tests

use crate::domain::ports::{Clock, Sleep};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::{Notify, oneshot};

/// Manually driven clock.
///
/// Time only moves on [`FakeClock::increment`]. Every [`Clock::sleep`] call
/// registers a watcher that fires once the virtual time passes its deadline,
/// so tests can wait for the code under test to arm its timers before moving
/// time forward.
pub struct FakeClock {
    state: Mutex<ClockState>,
    timers_changed: Notify,
}

struct ClockState {
    now: Instant,
    timers: Vec<Timer>,
}

struct Timer {
    deadline: Instant,
    fire: oneshot::Sender<()>,
}

impl FakeClock {
    pub fn new(now: Instant) -> Self {
        Self {
            state: Mutex::new(ClockState {
                now,
                timers: Vec::new(),
            }),
            timers_changed: Notify::new(),
        }
    }

    fn state(&self) -> MutexGuard<'_, ClockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Advance virtual time and fire every timer that is now due, earliest first.
    pub fn increment(&self, duration: Duration) {
        let due = {
            let mut state = self.state();
            state.now += duration;
            let now = state.now;
            let (mut due, pending): (Vec<_>, Vec<_>) =
                state.timers.drain(..).partition(|t| t.deadline <= now);
            state.timers = pending;
            due.sort_by_key(|t| t.deadline);
            due
        };

        for timer in due {
            // The sleeper may have been dropped already.
            let _ = timer.fire.send(());
        }
    }

    /// Number of pending timers whose sleeper is still alive.
    pub fn watcher_count(&self) -> usize {
        self.state()
            .timers
            .iter()
            .filter(|t| !t.fire.is_closed())
            .count()
    }

    /// Wait until at least `count` timers are armed.
    pub async fn wait_for_watchers(&self, count: usize) {
        loop {
            let changed = self.timers_changed.notified();
            if self.watcher_count() >= count {
                return;
            }
            changed.await;
        }
    }

    pub async fn wait_for_watchers_and_increment(&self, count: usize, duration: Duration) {
        self.wait_for_watchers(count).await;
        self.increment(duration);
    }

    pub async fn wait_for_watcher_and_increment(&self, duration: Duration) {
        self.wait_for_watchers_and_increment(1, duration).await;
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        self.state().now
    }

    fn sleep(&self, duration: Duration) -> Sleep {
        if duration.is_zero() {
            return Box::pin(std::future::ready(()));
        }

        let (fire, fired) = oneshot::channel();
        {
            let mut state = self.state();
            let deadline = state.now + duration;
            state.timers.push(Timer { deadline, fire });
        }
        self.timers_changed.notify_waiters();

        Box::pin(async move {
            // Resolves on fire, or when the clock itself goes away.
            let _ = fired.await;
        })
    }
}
