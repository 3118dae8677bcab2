// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP client for the console backend, with transparent token refresh.
//!
//! Every outbound request carries the access token current at dispatch time.
//! A 401 response triggers the refresh protocol in [`refresh`]: the first
//! request to hit the expired token performs the exchange, concurrent 401s
//! queue against it, and every participant replays its own request once with
//! the refreshed token. A request that fails authorization after its replay
//! is surfaced to the caller as-is.

pub mod auth;
pub mod refresh;

use std::sync::Arc;

use bytes::Bytes;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::auth::{LoginRequest, LoginResponse, RefreshRequest, RefreshResponse};
use crate::api::refresh::{RefreshGate, Ticket};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::session::{Identity, SessionStore};

/// A request to the backend: method, path relative to the base URL, and an
/// optional JSON body.
///
/// Requests are reusable values. The access token is attached when the
/// request is dispatched, not when it is constructed, so a request built
/// early still carries the freshest credential when it finally goes out.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self { method: Method::GET, path: path.into(), body: None }
    }

    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self { method: Method::POST, path: path.into(), body: Some(body) }
    }

    pub fn put(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self { method: Method::PUT, path: path.into(), body: Some(body) }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self { method: Method::DELETE, path: path.into(), body: None }
    }
}

/// A response from the backend: status plus raw body bytes.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    body: Bytes,
}

impl ApiResponse {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_slice(&self.body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// HTTP client wrapper for the console backend.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
    gate: Arc<RefreshGate>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: Arc<SessionStore>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .unwrap_or_default();
        Self { http, base_url: config.backend_url.clone(), session, gate: Arc::default() }
    }

    /// The session store this client reads tokens from.
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    /// Send a request, recovering transparently from an expired access token.
    ///
    /// Responses other than 401 pass through unchanged, whatever their
    /// status. A 401 triggers at most one refresh-and-replay for this
    /// request; if the replay is rejected again, that response is returned
    /// directly so the caller can tell "genuinely unauthorized" from
    /// "expired but refreshable".
    pub async fn send(&self, req: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let mut retried = false;
        loop {
            let resp = self.dispatch(req).await?;
            if resp.status() != StatusCode::UNAUTHORIZED || retried {
                return Ok(resp);
            }
            retried = true;
            self.refresh_access_token().await?;
            tracing::debug!(path = %req.path, "replaying request after token refresh");
        }
    }

    /// Issue one HTTP exchange, attaching the token current at send time.
    async fn dispatch(&self, req: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let mut builder = self.http.request(req.method.clone(), self.url(&req.path));
        if let Some(token) = self.session.access_token() {
            builder = builder.bearer_auth(token);
        }
        if let Some(ref body) = req.body {
            builder = builder.json(body);
        }
        let resp = builder.send().await?;
        let status = resp.status();
        let body = resp.bytes().await?;
        Ok(ApiResponse { status, body })
    }

    /// Obtain a fresh access token, coordinating so at most one exchange is
    /// in flight. Returns once the new token is in the session store; on
    /// failure the session has been cleared.
    async fn refresh_access_token(&self) -> Result<String, ApiError> {
        // A missing refresh token is terminal without even joining the gate.
        if self.session.refresh_token().is_none() {
            self.session.clear();
            return Err(ApiError::RefreshFailed("no refresh token available".into()));
        }
        match self.gate.join() {
            Ticket::Follower(rx) => match rx.await {
                Ok(outcome) => outcome,
                Err(_) => Err(ApiError::RefreshFailed("refresh episode abandoned".into())),
            },
            Ticket::Leader => {
                // The exchange runs detached: even if this caller is
                // cancelled mid-refresh, the episode still completes and the
                // gate releases its waiters.
                let http = self.http.clone();
                let url = self.url("authentication/token/refresh/");
                let session = Arc::clone(&self.session);
                let gate = Arc::clone(&self.gate);
                let episode = tokio::spawn(async move {
                    let outcome = Self::exchange_refresh_token(&http, &url, &session).await;
                    gate.complete(outcome.clone());
                    outcome
                });
                match episode.await {
                    Ok(outcome) => outcome,
                    Err(e) => Err(ApiError::RefreshFailed(format!("refresh task failed: {e}"))),
                }
            }
        }
    }

    /// Perform the refresh exchange itself. Only ever run by the gate
    /// leader's episode task. The new token is written to the session store
    /// before this returns, so waiters released afterwards always see it.
    async fn exchange_refresh_token(
        http: &reqwest::Client,
        url: &str,
        session: &SessionStore,
    ) -> Result<String, ApiError> {
        let Some(refresh) = session.refresh_token() else {
            session.clear();
            return Err(ApiError::RefreshFailed("no refresh token available".into()));
        };
        let resp = http.post(url).json(&RefreshRequest { refresh: &refresh }).send().await;
        let resp = match resp {
            Ok(r) => r,
            Err(e) => {
                session.clear();
                return Err(ApiError::RefreshFailed(format!("refresh request failed: {e}")));
            }
        };
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            session.clear();
            tracing::warn!(%status, "token refresh rejected, session cleared");
            return Err(ApiError::RefreshFailed(format!("refresh rejected ({status}): {body}")));
        }
        let token: RefreshResponse = match resp.json().await {
            Ok(t) => t,
            Err(e) => {
                session.clear();
                return Err(ApiError::RefreshFailed(format!("parse refresh response: {e}")));
            }
        };
        session.set_access_token(Some(&token.access));
        tracing::debug!("access token refreshed");
        Ok(token.access)
    }

    /// Authenticate and populate the session store.
    ///
    /// Goes straight to the wire rather than through [`send`](Self::send): a
    /// 401 here means bad credentials, not an expired token.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = serde_json::to_value(LoginRequest { username, password })
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        let resp = self.dispatch(&ApiRequest::post("authentication/login/", body)).await?;
        if !resp.is_success() {
            return Err(ApiError::Status { status: resp.status().as_u16(), body: resp.text() });
        }
        let login: LoginResponse = resp.json()?;
        self.session.set_access_token(Some(&login.access));
        self.session.set_refresh_token(Some(&login.refresh));
        self.session.set_identity(Identity {
            username: login.username.clone(),
            usertype: login.usertype.clone(),
            django_usertype: login.django_user_type.clone(),
            user_id: login.user_id.clone(),
        });
        self.session.set_password_reset_required(login.is_password_reset_required);
        tracing::info!(username = %login.username, "logged in");
        Ok(login)
    }

    /// Invalidate the refresh token server-side and clear the session.
    ///
    /// The backend call is best-effort: the local session is cleared even
    /// when the request fails or no refresh token exists.
    pub async fn logout(&self) {
        if let Some(refresh) = self.session.refresh_token() {
            let body = serde_json::json!({ "refresh": refresh });
            match self.dispatch(&ApiRequest::post("authentication/logout/", body)).await {
                Ok(resp) if resp.is_success() => {}
                Ok(resp) => tracing::warn!(status = %resp.status(), "logout request rejected"),
                Err(e) => tracing::warn!("logout request failed: {e}"),
            }
        }
        self.session.clear();
        tracing::info!("session cleared");
    }

    /// GET a path and decode the 2xx JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.expect_json(&ApiRequest::get(path)).await
    }

    /// POST a JSON body and decode the 2xx JSON response.
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.expect_json(&ApiRequest::post(path, body)).await
    }

    /// PUT a JSON body and decode the 2xx JSON response.
    pub async fn put_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.expect_json(&ApiRequest::put(path, body)).await
    }

    /// DELETE a path, returning an error on any non-2xx status.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let resp = self.send(&ApiRequest::delete(path)).await?;
        if !resp.is_success() {
            return Err(ApiError::Status { status: resp.status().as_u16(), body: resp.text() });
        }
        Ok(())
    }

    async fn expect_json<T: DeserializeOwned>(&self, req: &ApiRequest) -> Result<T, ApiError> {
        let resp = self.send(req).await?;
        if !resp.is_success() {
            return Err(ApiError::Status { status: resp.status().as_u16(), body: resp.text() });
        }
        resp.json()
    }
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
