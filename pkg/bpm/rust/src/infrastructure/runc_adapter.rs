// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! BpmRuncAdapter
//!
//! Lays out a job on disk and describes its container:
//! - log and pid directories, append-mode stdout/stderr logs owned by the job user
//! - the OCI spec: isolated namespaces, no capabilities, read-only system
//!   binds and writable binds limited to the job's own directories

use crate::config::ProcessConfig;
use crate::constants::paths::HOST_SYSTEM_DIRS;
use crate::constants::{OCI_VERSION, VCAP_HOME};
use crate::domain::ports::{JobPrerequisites, RuncAdapter};
use crate::domain::value_objects::runtime_spec::{
    Linux, MemoryResources, Mount, Namespace, PidsResources, Process, Resources, Rlimit, Root,
};
use crate::domain::{DomainError, JobPaths, Result, RuntimeSpec, User};
use async_trait::async_trait;
use nix::unistd::{Gid, Uid};
use std::fs::File;
use std::path::Path;
use tracing::debug;

const NAMESPACES: &[&str] = &["ipc", "mount", "pid", "uts"];

const MASKED_PATHS: &[&str] = &[
    "/proc/kcore",
    "/proc/latency_stats",
    "/proc/timer_list",
    "/proc/timer_stats",
    "/proc/sched_debug",
    "/proc/scsi",
    "/sys/firmware",
];

const READONLY_PATHS: &[&str] = &[
    "/proc/asound",
    "/proc/bus",
    "/proc/fs",
    "/proc/irq",
    "/proc/sys",
    "/proc/sysrq-trigger",
];

#[derive(Debug, Default, Clone, Copy)]
pub struct BpmRuncAdapter;

impl BpmRuncAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RuncAdapter for BpmRuncAdapter {
    async fn create_job_prerequisites(
        &self,
        system_root: &Path,
        job_name: &str,
        config: &ProcessConfig,
        user: &User,
    ) -> Result<JobPrerequisites> {
        let paths = JobPaths::new(system_root, job_name);

        let log_dir = paths.log_dir();
        create_dir(&log_dir).await?;
        chown(&log_dir, user)?;

        let pid_dir = paths.pid_dir();
        create_dir(&pid_dir).await?;

        let stdout_path = paths.stdout_log(&config.name);
        let stdout = open_log(&stdout_path).await?;
        chown(&stdout_path, user)?;

        let stderr_path = paths.stderr_log(&config.name);
        let stderr = open_log(&stderr_path).await?;
        chown(&stderr_path, user)?;

        if config.ephemeral_disk {
            let data_dir = paths.data_dir();
            create_dir(&data_dir).await?;
            chown(&data_dir, user)?;
        }

        debug!(
            job = job_name,
            process = %config.name,
            log_dir = %log_dir.display(),
            pid_dir = %pid_dir.display(),
            "Job prerequisites created"
        );

        Ok(JobPrerequisites {
            pid_dir,
            stdout,
            stderr,
        })
    }

    fn build_spec(
        &self,
        system_root: &Path,
        job_name: &str,
        config: &ProcessConfig,
        user: &User,
    ) -> Result<RuntimeSpec> {
        let paths = JobPaths::new(system_root, job_name);

        let mut args = Vec::with_capacity(config.args.len() + 1);
        args.push(config.executable.clone());
        args.extend(config.args.iter().cloned());

        let mut env: Vec<String> = config
            .env
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        if !config.env.contains_key("HOME") {
            env.push(format!("HOME={VCAP_HOME}"));
            env.sort();
        }

        let cwd = match &config.workdir {
            Some(dir) => dir.clone(),
            None => path_string(&paths.job_dir()),
        };

        let limits = config.limits.clone().unwrap_or_default();
        let rlimits = limits
            .open_files
            .map(|n| Rlimit {
                kind: "RLIMIT_NOFILE".to_string(),
                hard: n,
                soft: n,
            })
            .into_iter()
            .collect();

        let memory = limits.memory_bytes()?.map(|bytes| MemoryResources {
            limit: Some(bytes),
            swap: Some(bytes),
        });
        let pids = limits.processes.map(|limit| PidsResources { limit });
        let resources = (memory.is_some() || pids.is_some()).then_some(Resources { memory, pids });

        Ok(RuntimeSpec {
            oci_version: OCI_VERSION.to_string(),
            process: Process {
                terminal: false,
                user: user.clone(),
                args,
                env,
                cwd,
                capabilities: Default::default(),
                rlimits,
                no_new_privileges: true,
            },
            root: Root {
                path: "rootfs".to_string(),
                readonly: true,
            },
            hostname: job_name.to_string(),
            mounts: mounts(&paths, config),
            linux: Linux {
                namespaces: NAMESPACES.iter().map(|kind| Namespace::new(kind)).collect(),
                resources,
                masked_paths: to_strings(MASKED_PATHS),
                readonly_paths: to_strings(READONLY_PATHS),
            },
        })
    }
}

fn mounts(paths: &JobPaths, config: &ProcessConfig) -> Vec<Mount> {
    let mut mounts = vec![
        Mount {
            destination: "/proc".to_string(),
            kind: "proc".to_string(),
            source: "proc".to_string(),
            options: to_strings(&["nosuid", "noexec", "nodev"]),
        },
        Mount {
            destination: "/dev".to_string(),
            kind: "tmpfs".to_string(),
            source: "tmpfs".to_string(),
            options: to_strings(&["nosuid", "strictatime", "mode=755", "size=65536k"]),
        },
        Mount {
            destination: "/sys".to_string(),
            kind: "sysfs".to_string(),
            source: "sysfs".to_string(),
            options: to_strings(&["nosuid", "noexec", "nodev", "ro"]),
        },
    ];

    mounts.extend(
        HOST_SYSTEM_DIRS
            .iter()
            .filter(|dir| Path::new(dir).exists())
            .map(|dir| Mount::identity_bind(dir, false)),
    );

    mounts.push(Mount::identity_bind(&path_string(&paths.packages_dir()), false));
    mounts.push(Mount::identity_bind(&path_string(&paths.job_dir()), false));
    mounts.push(Mount::identity_bind(&path_string(&paths.log_dir()), true));

    if config.ephemeral_disk {
        mounts.push(Mount::identity_bind(&path_string(&paths.data_dir()), true));
    }
    if config.persistent_disk {
        mounts.push(Mount::identity_bind(&path_string(&paths.store_dir()), true));
    }

    mounts.extend(
        config
            .additional_volumes
            .iter()
            .map(|volume| Mount::identity_bind(&volume.path, volume.writable)),
    );

    mounts
}

async fn create_dir(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|e| DomainError::io(path, e))
}

async fn open_log(path: &Path) -> Result<File> {
    let file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|e| DomainError::io(path, e))?;
    Ok(file.into_std().await)
}

fn chown(path: &Path, user: &User) -> Result<()> {
    nix::unistd::chown(
        path,
        Some(Uid::from_raw(user.uid)),
        Some(Gid::from_raw(user.gid)),
    )
    .map_err(|e| DomainError::io(path, e))
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
