// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! bpm runc lifecycle
//!
//! Runs the processes of a job as OCI containers through `runc`:
//! - Start: resolve the job user, prepare log/pid paths, build the OCI spec
//!   and bundle, then run the container detached
//! - Stop: graceful signal, state polling on an injectable clock, forced
//!   signal once the exit timeout elapses
//! - Remove, list and inspect containers as domain jobs

pub mod config;
pub mod constants;
pub mod domain;
pub mod infrastructure;
pub mod settings;

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use config::{JobConfig, ProcessConfig};
pub use domain::{DomainError, Job, JobStreams, Result, RuncLifecycle};
