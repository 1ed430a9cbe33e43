// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Resolved OS identity a container runs as.
//! Serialises as the OCI `process.user` object.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct User {
    pub uid: u32,
    pub gid: u32,
    #[serde(default, skip_serializing)]
    pub username: String,
}

impl User {
    pub fn new(username: impl Into<String>, uid: u32, gid: u32) -> Self {
        Self {
            uid,
            gid,
            username: username.into(),
        }
    }
}
