// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Container state as reported by `runc state` and `runc list --format json`

use serde::{Deserialize, Serialize};
use std::fmt;

/// runc container status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerStatus {
    /// The container is being created
    Creating,
    /// Created but the user process has not been started
    Created,
    Running,
    Paused,
    /// The container process has exited
    Stopped,
}

impl fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerStatus::Creating => write!(f, "creating"),
            ContainerStatus::Created => write!(f, "created"),
            ContainerStatus::Running => write!(f, "running"),
            ContainerStatus::Paused => write!(f, "paused"),
            ContainerStatus::Stopped => write!(f, "stopped"),
        }
    }
}

/// The subset of runc's state document the lifecycle cares about.
/// Unknown fields (bundle, rootfs, created, owner...) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerState {
    pub id: String,
    #[serde(default)]
    pub pid: u32,
    pub status: ContainerStatus,
}
