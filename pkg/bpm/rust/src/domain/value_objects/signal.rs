// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Signals the lifecycle sends to a container

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Graceful termination request
    Term,
    /// Sent once the exit timeout has elapsed
    Quit,
}

impl Signal {
    /// Name as accepted by `runc kill`
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Term => "TERM",
            Signal::Quit => "QUIT",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SIG{}", self.as_str())
    }
}
