// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! UserFinder port
//! Resolves a system account to the identity a container runs as

use crate::domain::{Result, User};

#[cfg_attr(test, mockall::automock)]
pub trait UserFinder: Send + Sync {
    /// Look up a user by name. Resolved on every call, never cached.
    fn lookup(&self, username: &str) -> Result<User>;
}
