// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Job entity
//! The domain view of a runc container, derived on every query and never stored

use crate::domain::{ContainerState, ContainerStatus};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Job {
    /// Full container ID (`<job>-<process>`), not the bare job name
    pub name: String,
    pub pid: u32,
    pub status: ContainerStatus,
}

impl Job {
    pub fn is_running(&self) -> bool {
        self.status == ContainerStatus::Running
    }
}

impl From<ContainerState> for Job {
    fn from(state: ContainerState) -> Self {
        Self {
            name: state.id,
            pid: state.pid,
            status: state.status,
        }
    }
}
