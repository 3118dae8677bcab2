// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

/// Configuration for the console backend client.
#[derive(Debug, Clone, clap::Args)]
pub struct ClientConfig {
    /// Base URL of the backend.
    #[arg(long, default_value = "http://localhost:8000/", env = "CONSOLE_BACKEND_URL")]
    pub backend_url: String,

    /// Request timeout in milliseconds.
    #[arg(long, default_value_t = 30000, env = "CONSOLE_REQUEST_TIMEOUT_MS")]
    pub request_timeout_ms: u64,

    /// Path to the session state file. If unset, the session lives in memory
    /// only and does not survive the process.
    #[arg(long, env = "CONSOLE_SESSION_FILE")]
    pub session_file: Option<std::path::PathBuf>,
}

impl ClientConfig {
    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.request_timeout_ms)
    }
}
