// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::domain::ports::{Clock, Sleep};
use std::time::{Duration, Instant};

/// Real time, backed by tokio timers
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) -> Sleep {
        // Deadline is taken now, not on first poll.
        let deadline = tokio::time::Instant::now() + duration;
        Box::pin(tokio::time::sleep_until(deadline))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sleep_deadline_fixed_at_call() {
        let clock = TokioClock;
        let sleep = clock.sleep(Duration::from_millis(20));

        std::thread::sleep(Duration::from_millis(40));

        tokio::time::timeout(Duration::from_millis(5), sleep)
            .await
            .expect("sleep should already be due");
    }

    #[test]
    fn test_now_is_monotonic() {
        let clock = TokioClock;
        let first = clock.now();
        assert!(clock.now() >= first);
    }
}
