// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! RuncClient port
//! Thin interface over the container runtime

use crate::domain::{ContainerState, Result, RuntimeSpec, Signal, User};
use async_trait::async_trait;
use std::fs::File;
use std::path::Path;

#[async_trait]
pub trait RuncClient: Send + Sync {
    /// Materialise a bundle (rootfs + `config.json`) at `bundle_path`
    async fn create_bundle(
        &self,
        bundle_path: &Path,
        spec: RuntimeSpec,
        user: &User,
    ) -> Result<()>;

    /// Run the container detached. The stdio handles stay owned by the caller.
    async fn run_container(
        &self,
        pid_file: &Path,
        bundle_path: &Path,
        container_id: &str,
        stdout: &File,
        stderr: &File,
    ) -> Result<()>;

    async fn signal_container(&self, container_id: &str, signal: Signal) -> Result<()>;

    async fn container_state(&self, container_id: &str) -> Result<ContainerState>;

    async fn delete_container(&self, container_id: &str) -> Result<()>;

    async fn destroy_bundle(&self, bundle_path: &Path) -> Result<()>;

    async fn list_containers(&self) -> Result<Vec<ContainerState>>;
}
