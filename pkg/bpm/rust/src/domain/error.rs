// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Domain-level errors
//!
//! Collaborators report failures as `DomainError` and the lifecycle
//! controller hands them back untouched, so callers can compare them directly.

use std::fmt::Display;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("user '{0}' not found")]
    UserNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("runc {command} failed: {message}")]
    Runtime { command: String, message: String },

    /// runc has no container with this id.
    #[error("container '{0}' does not exist")]
    ContainerNotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The job did not reach the stopped state before its exit timeout.
    #[error("failed to stop job within timeout")]
    Timeout,
}

impl DomainError {
    /// I/O failure tied to a filesystem path
    pub fn io(path: &Path, err: impl Display) -> Self {
        DomainError::Io(format!("{}: {err}", path.display()))
    }

    pub fn runtime(command: &str, message: impl Display) -> Self {
        DomainError::Runtime {
            command: command.to_string(),
            message: message.to_string(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, DomainError::Timeout)
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;
