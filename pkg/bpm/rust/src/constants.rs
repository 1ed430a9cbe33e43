// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Application-wide constants and default values

use std::time::Duration;

/// System account every job container runs as
pub const VCAP_USER: &str = "vcap";

/// Interval between container state queries while waiting for a stop
pub const STATE_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Default time a job gets to exit after the graceful signal
pub const DEFAULT_EXIT_TIMEOUT: Duration = Duration::from_secs(20);

/// HOME of every job process
pub const VCAP_HOME: &str = "/home/vcap";

/// OCI runtime-spec version written into bundles
pub const OCI_VERSION: &str = "1.0.2";

/// Filesystem layout defaults
pub mod paths {
    /// Root of the BOSH-style system layout
    pub const DEFAULT_SYSTEM_ROOT: &str = "/var/vcap";

    /// runc binary shipped with the bpm package
    pub const DEFAULT_RUNC_PATH: &str = "/var/vcap/packages/bpm/bin/runc";

    /// Directory where runc keeps container state
    pub const DEFAULT_RUNC_ROOT: &str = "/var/vcap/sys/run/bpm-runc";

    /// Name of the job configuration file under `jobs/<job>/config`
    pub const JOB_CONFIG_FILE: &str = "bpm.yml";

    /// Host directories bind-mounted read-only into every container
    pub const HOST_SYSTEM_DIRS: &[&str] = &["/bin", "/etc", "/lib", "/lib64", "/sbin", "/usr"];
}

/// Environment variables read by the `bpm` binary
pub mod env {
    pub const SYSTEM_ROOT: &str = "BPM_SYSTEM_ROOT";
    pub const RUNC_PATH: &str = "BPM_RUNC_PATH";
    pub const RUNC_ROOT: &str = "BPM_RUNC_ROOT";
    pub const LOG_LEVEL: &str = "BPM_LOG_LEVEL";
}
