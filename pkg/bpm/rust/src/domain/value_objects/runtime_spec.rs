// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! RuntimeSpec value object
//! The subset of the OCI runtime spec bpm writes into a bundle's `config.json`

use crate::domain::User;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeSpec {
    pub oci_version: String,
    pub process: Process,
    pub root: Root,
    pub hostname: String,
    #[serde(default)]
    pub mounts: Vec<Mount>,
    pub linux: Linux,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Process {
    pub terminal: bool,
    pub user: User,
    pub args: Vec<String>,
    #[serde(default)]
    pub env: Vec<String>,
    pub cwd: String,
    pub capabilities: Capabilities,
    #[serde(default)]
    pub rlimits: Vec<Rlimit>,
    pub no_new_privileges: bool,
}

/// Capability sets; bpm grants none
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Capabilities {
    #[serde(default)]
    pub bounding: Vec<String>,
    #[serde(default)]
    pub effective: Vec<String>,
    #[serde(default)]
    pub inheritable: Vec<String>,
    #[serde(default)]
    pub permitted: Vec<String>,
    #[serde(default)]
    pub ambient: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rlimit {
    #[serde(rename = "type")]
    pub kind: String,
    pub hard: u64,
    pub soft: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Root {
    pub path: String,
    #[serde(default)]
    pub readonly: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mount {
    pub destination: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub source: String,
    #[serde(default)]
    pub options: Vec<String>,
}

impl Mount {
    /// Bind a host path to the same location inside the container.
    pub fn identity_bind(path: &str, writable: bool) -> Self {
        Self {
            destination: path.to_string(),
            kind: "bind".to_string(),
            source: path.to_string(),
            options: vec![
                "nodev".to_string(),
                "nosuid".to_string(),
                "rbind".to_string(),
                if writable { "rw" } else { "ro" }.to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Linux {
    #[serde(default)]
    pub namespaces: Vec<Namespace>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Resources>,
    #[serde(default)]
    pub masked_paths: Vec<String>,
    #[serde(default)]
    pub readonly_paths: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    #[serde(rename = "type")]
    pub kind: String,
}

impl Namespace {
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Resources {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<MemoryResources>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pids: Option<PidsResources>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MemoryResources {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swap: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PidsResources {
    pub limit: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialises_with_oci_field_names() {
        let spec = RuntimeSpec {
            oci_version: "1.0.2".to_string(),
            process: Process {
                user: User::new("vcap", 1000, 1000),
                args: vec!["/bin/sleep".to_string(), "10".to_string()],
                cwd: "/".to_string(),
                no_new_privileges: true,
                rlimits: vec![Rlimit {
                    kind: "RLIMIT_NOFILE".to_string(),
                    hard: 1024,
                    soft: 1024,
                }],
                ..Default::default()
            },
            root: Root {
                path: "rootfs".to_string(),
                readonly: true,
            },
            hostname: "web".to_string(),
            mounts: vec![],
            linux: Linux {
                namespaces: vec![Namespace::new("pid")],
                resources: Some(Resources {
                    memory: Some(MemoryResources {
                        limit: Some(1024),
                        swap: None,
                    }),
                    pids: None,
                }),
                ..Default::default()
            },
        };

        let value = serde_json::to_value(&spec).unwrap();
        assert_eq!(value["ociVersion"], "1.0.2");
        assert_eq!(value["process"]["noNewPrivileges"], true);
        assert_eq!(value["process"]["user"], json!({"uid": 1000, "gid": 1000}));
        assert_eq!(value["process"]["rlimits"][0]["type"], "RLIMIT_NOFILE");
        assert_eq!(value["linux"]["namespaces"][0]["type"], "pid");
        assert_eq!(value["linux"]["resources"], json!({"memory": {"limit": 1024}}));
        assert_eq!(value["linux"]["maskedPaths"], json!([]));
    }

    #[test]
    fn test_identity_bind() {
        let mount = Mount::identity_bind("/var/vcap/packages", false);
        assert_eq!(mount.source, mount.destination);
        assert_eq!(mount.kind, "bind");
        assert_eq!(mount.options.last().map(String::as_str), Some("ro"));
        let mount = Mount::identity_bind("/var/vcap/data/web", true);
        assert_eq!(mount.options.last().map(String::as_str), Some("rw"));
    }
}
