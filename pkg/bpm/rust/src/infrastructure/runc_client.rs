// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! RuncCommandClient
//!
//! Drives the `runc` binary. Every invocation shares one `--root` state
//! directory so containers started by one `bpm` call are visible to the next.

use crate::domain::ports::RuncClient;
use crate::domain::{ContainerState, DomainError, Result, RuntimeSpec, Signal, User};
use async_trait::async_trait;
use nix::unistd::{Gid, Uid};
use std::fs::{File, Permissions};
use std::io::ErrorKind;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, error};

const BUNDLE_CONFIG: &str = "config.json";
const BUNDLE_ROOTFS: &str = "rootfs";

#[derive(Debug, Clone)]
pub struct RuncCommandClient {
    runc_path: PathBuf,
    runc_root: PathBuf,
}

impl RuncCommandClient {
    pub fn new(runc_path: impl Into<PathBuf>, runc_root: impl Into<PathBuf>) -> Self {
        Self {
            runc_path: runc_path.into(),
            runc_root: runc_root.into(),
        }
    }

    fn command(&self, subcommand: &str) -> Command {
        let mut cmd = Command::new(&self.runc_path);
        cmd.arg("--root").arg(&self.runc_root).arg(subcommand);
        cmd.stdin(Stdio::null());
        cmd
    }

    /// Run to completion and return stdout. A non-zero exit carries runc's stderr.
    async fn output(&self, subcommand: &str, mut cmd: Command) -> Result<Vec<u8>> {
        debug!(subcommand, "Invoking runc");
        let output = cmd.output().await.map_err(|e| {
            error!(
                runc = %self.runc_path.display(),
                subcommand,
                error = %e,
                "Failed to execute runc"
            );
            DomainError::runtime(subcommand, e)
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = match stderr.trim() {
                "" => output.status.to_string(),
                trimmed => trimmed.to_string(),
            };
            return Err(DomainError::runtime(subcommand, message));
        }
        Ok(output.stdout)
    }
}

#[async_trait]
impl RuncClient for RuncCommandClient {
    async fn create_bundle(
        &self,
        bundle_path: &Path,
        spec: RuntimeSpec,
        user: &User,
    ) -> Result<()> {
        let rootfs = bundle_path.join(BUNDLE_ROOTFS);
        tokio::fs::create_dir_all(&rootfs)
            .await
            .map_err(|e| DomainError::io(&rootfs, e))?;
        tokio::fs::set_permissions(&rootfs, Permissions::from_mode(0o700))
            .await
            .map_err(|e| DomainError::io(&rootfs, e))?;
        nix::unistd::chown(
            &rootfs,
            Some(Uid::from_raw(user.uid)),
            Some(Gid::from_raw(user.gid)),
        )
        .map_err(|e| DomainError::io(&rootfs, e))?;

        let config_path = bundle_path.join(BUNDLE_CONFIG);
        let contents = serde_json::to_vec_pretty(&spec)?;
        tokio::fs::write(&config_path, contents)
            .await
            .map_err(|e| DomainError::io(&config_path, e))?;

        debug!(bundle = %bundle_path.display(), "Bundle created");
        Ok(())
    }

    async fn run_container(
        &self,
        pid_file: &Path,
        bundle_path: &Path,
        container_id: &str,
        stdout: &File,
        stderr: &File,
    ) -> Result<()> {
        let stdout = stdout.try_clone().map_err(|e| DomainError::Io(e.to_string()))?;
        let stderr = stderr.try_clone().map_err(|e| DomainError::Io(e.to_string()))?;

        let mut cmd = self.command("run");
        cmd.arg("--bundle")
            .arg(bundle_path)
            .arg("--pid-file")
            .arg(pid_file)
            .arg("--detach")
            .arg(container_id)
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr));

        // runc's own output goes to the job logs, so only the exit status is left.
        let status = cmd
            .status()
            .await
            .map_err(|e| DomainError::runtime("run", e))?;
        if !status.success() {
            return Err(DomainError::runtime(
                "run",
                format!("{container_id}: {status}"),
            ));
        }
        Ok(())
    }

    async fn signal_container(&self, container_id: &str, signal: Signal) -> Result<()> {
        let mut cmd = self.command("kill");
        cmd.arg(container_id).arg(signal.as_str());
        self.output("kill", cmd).await?;
        debug!(container_id, signal = %signal, "Signal sent");
        Ok(())
    }

    async fn container_state(&self, container_id: &str) -> Result<ContainerState> {
        let mut cmd = self.command("state");
        cmd.arg(container_id);
        let stdout = self.output("state", cmd).await.map_err(|e| match e {
            DomainError::Runtime { ref message, .. } if message.contains("does not exist") => {
                DomainError::ContainerNotFound(container_id.to_string())
            }
            other => other,
        })?;
        Ok(serde_json::from_slice(&stdout)?)
    }

    async fn delete_container(&self, container_id: &str) -> Result<()> {
        let mut cmd = self.command("delete");
        cmd.arg("--force").arg(container_id);
        self.output("delete", cmd).await?;
        Ok(())
    }

    async fn destroy_bundle(&self, bundle_path: &Path) -> Result<()> {
        match tokio::fs::remove_dir_all(bundle_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::io(bundle_path, e)),
        }
    }

    async fn list_containers(&self) -> Result<Vec<ContainerState>> {
        let mut cmd = self.command("list");
        cmd.arg("--format").arg("json");
        let stdout = self.output("list", cmd).await?;
        // runc prints `null` when there are no containers.
        let containers: Option<Vec<ContainerState>> = serde_json::from_slice(&stdout)?;
        Ok(containers.unwrap_or_default())
    }
}
