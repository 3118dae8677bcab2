// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt;

/// Errors surfaced by backend API calls.
///
/// Cloneable so a single refresh outcome can fan out to every request queued
/// against the same refresh episode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Connection-level failure: DNS, TCP, TLS, or a dropped body.
    Transport(String),
    /// The refresh exchange failed (refresh token missing, expired, or
    /// revoked). The session has already been cleared when this is returned.
    RefreshFailed(String),
    /// Non-2xx status surfaced by the typed JSON helpers.
    Status { status: u16, body: String },
    /// A response body that did not parse as the expected shape.
    Decode(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(msg) => write!(f, "transport error: {msg}"),
            Self::RefreshFailed(msg) => write!(f, "session refresh failed: {msg}"),
            Self::Status { status, body } => write!(f, "backend returned {status}: {body}"),
            Self::Decode(msg) => write!(f, "malformed response: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
