// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::domain::ports::UserFinder;
use crate::domain::{DomainError, Result, User};
use tracing::debug;

/// Looks users up in the system passwd database
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemUserFinder;

impl UserFinder for SystemUserFinder {
    fn lookup(&self, username: &str) -> Result<User> {
        let entry = nix::unistd::User::from_name(username)
            .map_err(|e| DomainError::Io(format!("looking up user '{username}': {e}")))?
            .ok_or_else(|| DomainError::UserNotFound(username.to_string()))?;

        debug!(
            username,
            uid = entry.uid.as_raw(),
            gid = entry.gid.as_raw(),
            "Resolved user"
        );
        Ok(User::new(username, entry.uid.as_raw(), entry.gid.as_raw()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_root() {
        let user = SystemUserFinder.lookup("root").unwrap();
        assert_eq!(user, User::new("root", 0, 0));
    }

    #[test]
    fn test_lookup_missing_user() {
        let err = SystemUserFinder
            .lookup("bpm-no-such-user")
            .unwrap_err();
        assert_eq!(err, DomainError::UserNotFound("bpm-no-such-user".to_string()));
    }
}
