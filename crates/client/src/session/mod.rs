// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session state: the single source of truth for credential state.
//!
//! Holds the access/refresh token pair and the denormalized identity fields
//! the UI needs for display and menu gating, write-through persisted to a
//! [`Storage`] backend so the session survives a restart.

pub mod storage;

use parking_lot::RwLock;

use crate::session::storage::Storage;

// Persisted field names, kept byte-identical to what the backend and the
// browser console historically used.
const KEY_ACCESS_TOKEN: &str = "token";
const KEY_REFRESH_TOKEN: &str = "refreshToken";
const KEY_USERNAME: &str = "username";
const KEY_USERTYPE: &str = "usertype";
const KEY_DJANGO_USERTYPE: &str = "django_user_type";
const KEY_USER_ID: &str = "userId";

const ALL_KEYS: [&str; 6] = [
    KEY_ACCESS_TOKEN,
    KEY_REFRESH_TOKEN,
    KEY_USERNAME,
    KEY_USERTYPE,
    KEY_DJANGO_USERTYPE,
    KEY_USER_ID,
];

/// Denormalized profile fields cached for display and role-based menu gating.
///
/// Not security-critical: the backend re-checks authorization on every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub usertype: String,
    pub django_usertype: String,
    pub user_id: String,
}

#[derive(Debug, Default)]
struct SessionState {
    access_token: Option<String>,
    refresh_token: Option<String>,
    identity: Option<Identity>,
    password_reset_required: bool,
}

/// Credential state for the current client, with durable persistence.
///
/// Every mutator updates storage and memory inside the same critical section,
/// so a concurrent reader never observes the two disagreeing. Storage write
/// failures are logged and swallowed (best-effort persistence).
pub struct SessionStore {
    state: RwLock<SessionState>,
    storage: Box<dyn Storage>,
}

impl SessionStore {
    /// Create a store backed by `storage`, loading any persisted fields.
    pub fn new(storage: Box<dyn Storage>) -> Self {
        let identity = storage.get(KEY_USERNAME).map(|username| Identity {
            username,
            usertype: storage.get(KEY_USERTYPE).unwrap_or_default(),
            django_usertype: storage.get(KEY_DJANGO_USERTYPE).unwrap_or_default(),
            user_id: storage.get(KEY_USER_ID).unwrap_or_default(),
        });
        let state = SessionState {
            access_token: storage.get(KEY_ACCESS_TOKEN),
            refresh_token: storage.get(KEY_REFRESH_TOKEN),
            identity,
            password_reset_required: false,
        };
        Self { state: RwLock::new(state), storage }
    }

    /// Store or clear the access token. The token is an opaque string; no
    /// validation is performed.
    pub fn set_access_token(&self, token: Option<&str>) {
        let mut state = self.state.write();
        match token {
            Some(t) => self.storage.set(KEY_ACCESS_TOKEN, t),
            None => self.storage.remove(KEY_ACCESS_TOKEN),
        }
        state.access_token = token.map(str::to_owned);
    }

    /// Store or clear the refresh token. Same contract as
    /// [`set_access_token`](Self::set_access_token).
    pub fn set_refresh_token(&self, token: Option<&str>) {
        let mut state = self.state.write();
        match token {
            Some(t) => self.storage.set(KEY_REFRESH_TOKEN, t),
            None => self.storage.remove(KEY_REFRESH_TOKEN),
        }
        state.refresh_token = token.map(str::to_owned);
    }

    /// Store the identity fields. Independent of token validity.
    pub fn set_identity(&self, identity: Identity) {
        let mut state = self.state.write();
        self.storage.set(KEY_USERNAME, &identity.username);
        self.storage.set(KEY_USERTYPE, &identity.usertype);
        self.storage.set(KEY_DJANGO_USERTYPE, &identity.django_usertype);
        self.storage.set(KEY_USER_ID, &identity.user_id);
        state.identity = Some(identity);
    }

    /// Flag that forces the client into the password-reset flow before normal
    /// use. Deliberately not persisted.
    pub fn set_password_reset_required(&self, value: bool) {
        self.state.write().password_reset_required = value;
    }

    /// Clear all session fields, in memory and in durable storage.
    /// Safe to call any number of times.
    pub fn clear(&self) {
        let mut state = self.state.write();
        for key in ALL_KEYS {
            self.storage.remove(key);
        }
        *state = SessionState::default();
    }

    /// True iff an access token is present at call time.
    pub fn is_authenticated(&self) -> bool {
        self.state.read().access_token.is_some()
    }

    pub fn access_token(&self) -> Option<String> {
        self.state.read().access_token.clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.state.read().refresh_token.clone()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.state.read().identity.clone()
    }

    pub fn password_reset_required(&self) -> bool {
        self.state.read().password_reset_required
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
