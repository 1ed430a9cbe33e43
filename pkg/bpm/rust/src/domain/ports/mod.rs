// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Ports the lifecycle controller is composed from.
//! Implementations live in the infrastructure layer; tests swap in fakes.

pub mod clock;
pub mod runc_adapter;
pub mod runc_client;
pub mod user_finder;

pub use clock::{Clock, Sleep};
pub use runc_adapter::{JobPrerequisites, RuncAdapter};
pub use runc_client::RuncClient;
pub use user_finder::UserFinder;

#[cfg(test)]
pub use user_finder::MockUserFinder;
