// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

pub mod entities;
pub mod error;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::Job;
pub use error::{DomainError, Result};
pub use services::{JobStreams, RuncLifecycle};
pub use value_objects::{
    ContainerId, ContainerState, ContainerStatus, JobPaths, RuntimeSpec, Signal, User,
};
