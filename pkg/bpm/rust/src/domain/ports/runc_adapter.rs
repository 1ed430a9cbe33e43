// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! RuncAdapter port
//! Prepares the filesystem for a job and translates its configuration into an OCI spec

use crate::config::ProcessConfig;
use crate::domain::{Result, RuntimeSpec, User};
use async_trait::async_trait;
use std::fs::File;
use std::path::{Path, PathBuf};

/// What a job needs on disk before its container can run
#[derive(Debug)]
pub struct JobPrerequisites {
    pub pid_dir: PathBuf,
    pub stdout: File,
    pub stderr: File,
}

#[async_trait]
pub trait RuncAdapter: Send + Sync {
    /// Create the pid and log directories and open the process's stdout/stderr logs.
    async fn create_job_prerequisites(
        &self,
        system_root: &Path,
        job_name: &str,
        config: &ProcessConfig,
        user: &User,
    ) -> Result<JobPrerequisites>;

    /// Build the container spec for one process of a job.
    fn build_spec(
        &self,
        system_root: &Path,
        job_name: &str,
        config: &ProcessConfig,
        user: &User,
    ) -> Result<RuntimeSpec>;
}
