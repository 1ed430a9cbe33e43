// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Job configuration loaded from `jobs/<job>/config/bpm.yml`

use crate::constants::paths::JOB_CONFIG_FILE;
use crate::domain::{DomainError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

/// All processes declared by one job
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JobConfig {
    #[serde(default)]
    pub processes: Vec<ProcessConfig>,
}

/// One process of a job; each runs in its own container
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProcessConfig {
    pub name: String,
    pub executable: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    pub workdir: Option<String>,
    pub limits: Option<Limits>,
    #[serde(default)]
    pub ephemeral_disk: bool,
    #[serde(default)]
    pub persistent_disk: bool,
    #[serde(default)]
    pub additional_volumes: Vec<Volume>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Limits {
    /// Memory limit with an optional K/M/G/T suffix, e.g. "1G"
    pub memory: Option<String>,
    pub open_files: Option<u64>,
    pub processes: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    pub path: String,
    #[serde(default)]
    pub writable: bool,
}

impl JobConfig {
    pub fn validate(&self) -> Result<()> {
        if self.processes.is_empty() {
            return Err(DomainError::InvalidConfiguration(
                "no processes defined".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for process in &self.processes {
            process.validate()?;
            if !seen.insert(process.name.as_str()) {
                return Err(DomainError::InvalidConfiguration(format!(
                    "duplicate process name '{}'",
                    process.name
                )));
            }
        }
        Ok(())
    }

    /// Look up a process by name.
    pub fn process(&self, name: &str) -> Result<&ProcessConfig> {
        self.processes
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| {
                DomainError::InvalidConfiguration(format!("process '{name}' is not defined"))
            })
    }
}

impl ProcessConfig {
    pub fn validate(&self) -> Result<()> {
        check_path_component("process", &self.name)?;
        if self.executable.is_empty() {
            return Err(DomainError::InvalidConfiguration(format!(
                "process '{}' has no executable",
                self.name
            )));
        }
        for volume in &self.additional_volumes {
            if !Path::new(&volume.path).is_absolute() {
                return Err(DomainError::InvalidConfiguration(format!(
                    "volume path '{}' must be absolute",
                    volume.path
                )));
            }
        }
        if let Some(limits) = &self.limits {
            limits.memory_bytes()?;
            if let Some(processes) = limits.processes.filter(|p| *p < 1) {
                return Err(DomainError::InvalidConfiguration(format!(
                    "process limit {processes} must be at least 1"
                )));
            }
        }
        Ok(())
    }
}

/// Job names become directory names under the system root.
pub fn validate_job_name(name: &str) -> Result<()> {
    check_path_component("job", name)
}

fn check_path_component(kind: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(DomainError::InvalidConfiguration(format!(
            "{kind} name must not be empty"
        )));
    }
    if name.contains('/') || name.contains("..") || name == "." {
        return Err(DomainError::InvalidConfiguration(format!(
            "{kind} name '{name}' must not contain '/' or '..'"
        )));
    }
    Ok(())
}

impl Limits {
    /// Memory limit in bytes, if one is configured.
    pub fn memory_bytes(&self) -> Result<Option<i64>> {
        self.memory.as_deref().map(parse_memory).transpose()
    }
}

/// Parse a memory string to bytes.
/// Examples: "256M" -> 268435456, "1G" -> 1073741824, "512" -> 512
pub fn parse_memory(raw: &str) -> Result<i64> {
    let trimmed = raw.trim();
    let invalid = || DomainError::InvalidConfiguration(format!("invalid memory limit '{raw}'"));

    let (digits, multiplier) = match trimmed.chars().last().map(|c| c.to_ascii_uppercase()) {
        Some('K') => (&trimmed[..trimmed.len() - 1], 1i64 << 10),
        Some('M') => (&trimmed[..trimmed.len() - 1], 1i64 << 20),
        Some('G') => (&trimmed[..trimmed.len() - 1], 1i64 << 30),
        Some('T') => (&trimmed[..trimmed.len() - 1], 1i64 << 40),
        Some(_) => (trimmed, 1),
        None => return Err(invalid()),
    };

    let value: i64 = digits.trim().parse().map_err(|_| invalid())?;
    if value <= 0 {
        return Err(invalid());
    }
    value.checked_mul(multiplier).ok_or_else(invalid)
}

/// Location of a job's configuration under the system root.
pub fn job_config_path(system_root: &Path, job_name: &str) -> PathBuf {
    system_root
        .join("jobs")
        .join(job_name)
        .join("config")
        .join(JOB_CONFIG_FILE)
}

/// Read and validate a job configuration file.
pub fn load_job_config(path: &Path) -> anyhow::Result<JobConfig> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config: JobConfig =
        serde_yaml::from_str(&contents).with_context(|| format!("parsing {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("validating {}", path.display()))?;
    Ok(config)
}
