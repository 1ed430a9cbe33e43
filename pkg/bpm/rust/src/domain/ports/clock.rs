// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Clock port
//! Time source for the stop sequence, so tests can drive time by hand

use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};

/// Timer future returned by [`Clock::sleep`]
pub type Sleep = Pin<Box<dyn Future<Output = ()> + Send>>;

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;

    /// Returns a future that completes once `duration` has elapsed.
    /// The deadline is fixed when this is called, not when the future is first polled.
    fn sleep(&self, duration: Duration) -> Sleep;
}
