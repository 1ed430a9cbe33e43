// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Tool settings from environment variables
//!
//! Everything has a default matching the standard BOSH layout, so a bare
//! `bpm` invocation on a VM needs no configuration at all.

use crate::constants::{env as vars, paths};
use std::env;
use std::path::PathBuf;

const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Root of the job layout (`jobs/`, `packages/`, `data/`, `sys/`, `store/`)
    pub system_root: PathBuf,

    /// runc binary to drive
    pub runc_path: PathBuf,

    /// runc state directory (`runc --root`)
    pub runc_root: PathBuf,

    pub log_level: String,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            system_root: path_var(vars::SYSTEM_ROOT, paths::DEFAULT_SYSTEM_ROOT),
            runc_path: path_var(vars::RUNC_PATH, paths::DEFAULT_RUNC_PATH),
            runc_root: path_var(vars::RUNC_ROOT, paths::DEFAULT_RUNC_ROOT),
            log_level: Self::parse_log_level(),
        }
    }

    fn parse_log_level() -> String {
        // Priority: BPM_LOG_LEVEL > RUST_LOG > default
        env::var(vars::LOG_LEVEL)
            .or_else(|_| env::var("RUST_LOG"))
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            system_root: PathBuf::from(paths::DEFAULT_SYSTEM_ROOT),
            runc_path: PathBuf::from(paths::DEFAULT_RUNC_PATH),
            runc_root: PathBuf::from(paths::DEFAULT_RUNC_ROOT),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

fn path_var(name: &str, default: &str) -> PathBuf {
    env::var_os(name)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}
