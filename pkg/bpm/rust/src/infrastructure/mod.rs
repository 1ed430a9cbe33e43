// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Infrastructure Layer
//!
//! Adapters implementing the domain ports against the host:
//!
//! - `RuncCommandClient`: drives the `runc` binary
//! - `BpmRuncAdapter`: job directories, log files and OCI spec generation
//! - `SystemUserFinder`: passwd lookups
//! - `TokioClock`: wall-clock time and tokio timers

pub mod runc_adapter;
pub mod runc_client;
pub mod system_user_finder;
pub mod tokio_clock;

pub use runc_adapter::BpmRuncAdapter;
pub use runc_client::RuncCommandClient;
pub use system_user_finder::SystemUserFinder;
pub use tokio_clock::TokioClock;
