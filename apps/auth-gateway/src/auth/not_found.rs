// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Not-found masking.
//!
//! Installed as the router fallback. Only a caller holding a valid token
//! learns that a path does not exist; everyone else gets exactly the
//! rejection a protected route would have produced, so probing for 404s
//! reveals nothing about the API surface.
//!
//! The token is verified again here, independently of the middleware, so the
//! masking holds even when the fallback is reached without passing through
//! the auth layer.

use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
};

use super::middleware::authenticate_headers;
use crate::error::{ApiError, NOT_FOUND_DETAIL};
use crate::state::AppState;

/// Fallback handler for unmatched routes.
pub async fn masked_not_found(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match authenticate_headers(&headers, &state.verifier) {
        Ok(_) => ApiError::not_found(NOT_FOUND_DETAIL).into_response(),
        Err(e) => e.into_response(),
    }
}
