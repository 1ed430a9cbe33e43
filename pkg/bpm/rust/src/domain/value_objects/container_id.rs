// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! ContainerId value object
//! The only key correlating a job process with its runc container

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerId(String);

impl ContainerId {
    /// Derive the container ID as `<job>-<process>`
    pub fn new(job_name: &str, process_name: &str) -> Self {
        Self(format!("{job_name}-{process_name}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ContainerId> for String {
    fn from(id: ContainerId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_from_job_and_process() {
        let id = ContainerId::new("example", "server");
        assert_eq!(id.as_str(), "example-server");
        assert_eq!(id.to_string(), "example-server");
    }

    #[test]
    fn test_same_inputs_same_id() {
        assert_eq!(ContainerId::new("a", "b"), ContainerId::new("a", "b"));
        assert_ne!(ContainerId::new("a", "b"), ContainerId::new("a", "c"));
    }
}
