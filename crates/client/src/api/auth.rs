// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire types for the authentication endpoints.

use serde::{Deserialize, Deserializer, Serialize};

/// `POST authentication/login/` request body.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// `POST authentication/login/` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    pub username: String,
    #[serde(default)]
    pub usertype: String,
    #[serde(default)]
    pub django_user_type: String,
    /// The backend emits this as either a string or a bare number.
    #[serde(rename = "userId", default, deserialize_with = "string_or_number")]
    pub user_id: String,
    #[serde(rename = "isPasswordResetRequired", default)]
    pub is_password_reset_required: bool,
}

/// `POST authentication/token/refresh/` request body.
#[derive(Debug, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh: &'a str,
}

/// `POST authentication/token/refresh/` response body.
#[derive(Debug, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}
