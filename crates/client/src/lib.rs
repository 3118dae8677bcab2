// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client library for the console admin backend.
//!
//! The interesting part is the session/refresh core: [`session::SessionStore`]
//! holds the credential state, [`api::ApiClient`] attaches it to every
//! request and recovers transparently from access-token expiry with an
//! at-most-one-in-flight refresh exchange.

pub mod api;
pub mod config;
pub mod error;
pub mod session;

pub use api::{ApiClient, ApiRequest, ApiResponse};
pub use config::ClientConfig;
pub use error::ApiError;
pub use session::{Identity, SessionStore};
