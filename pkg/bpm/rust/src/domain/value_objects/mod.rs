// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

pub mod container_id;
pub mod container_state;
pub mod job_paths;
pub mod runtime_spec;
pub mod signal;
pub mod user;

pub use container_id::ContainerId;
pub use container_state::{ContainerState, ContainerStatus};
pub use job_paths::{JobPaths, pid_file};
pub use runtime_spec::RuntimeSpec;
pub use signal::Signal;
pub use user::User;
