// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Filesystem layout of a job under the system root
//!
//! ```text
//! <root>/data/bpm/bundles/<job>/<process>   runc bundle
//! <root>/sys/log/<job>/<process>.std{out,err}.log
//! <root>/sys/run/bpm/<job>/<process>.pid
//! <root>/data/<job>                         ephemeral disk
//! <root>/store/<job>                        persistent disk
//! ```

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPaths {
    system_root: PathBuf,
    job_name: String,
}

impl JobPaths {
    pub fn new(system_root: &Path, job_name: &str) -> Self {
        Self {
            system_root: system_root.to_path_buf(),
            job_name: job_name.to_string(),
        }
    }

    pub fn bundle(&self, process_name: &str) -> PathBuf {
        self.system_root
            .join("data")
            .join("bpm")
            .join("bundles")
            .join(&self.job_name)
            .join(process_name)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.system_root.join("sys").join("log").join(&self.job_name)
    }

    pub fn stdout_log(&self, process_name: &str) -> PathBuf {
        self.log_dir().join(format!("{process_name}.stdout.log"))
    }

    pub fn stderr_log(&self, process_name: &str) -> PathBuf {
        self.log_dir().join(format!("{process_name}.stderr.log"))
    }

    pub fn pid_dir(&self) -> PathBuf {
        self.system_root
            .join("sys")
            .join("run")
            .join("bpm")
            .join(&self.job_name)
    }

    pub fn job_dir(&self) -> PathBuf {
        self.system_root.join("jobs").join(&self.job_name)
    }

    pub fn packages_dir(&self) -> PathBuf {
        self.system_root.join("packages")
    }

    pub fn data_dir(&self) -> PathBuf {
        self.system_root.join("data").join(&self.job_name)
    }

    pub fn store_dir(&self) -> PathBuf {
        self.system_root.join("store").join(&self.job_name)
    }
}

/// Pid file runc writes for a process.
pub fn pid_file(pid_dir: &Path, process_name: &str) -> PathBuf {
    pid_dir.join(format!("{process_name}.pid"))
}
