// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Every request except CORS pre-flight (`OPTIONS`) must carry
//! `Authorization: Bearer <token>` with a token the [`TokenVerifier`] accepts.
//! On success the caller's [`VerifiedIdentity`] is inserted into the request
//! extensions; on failure the request never reaches routing.
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/protected", get(protected_handler))
//!     .layer(axum::middleware::from_fn_with_state(
//!         state.clone(),
//!         auth_middleware,
//!     ));
//! ```

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{AuthError, TokenVerifier, VerifiedIdentity};
use crate::state::AppState;

/// Authentication middleware function.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS {
        return next.run(request).await;
    }

    match authenticate_headers(request.headers(), &state.verifier) {
        Ok(identity) => {
            tracing::debug!(
                sub = identity.subject().unwrap_or_default(),
                path = %request.uri().path(),
                "Request authenticated"
            );
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!(
                code = e.kind.code(),
                method = %request.method(),
                path = %request.uri().path(),
                "Request rejected"
            );
            e.into_response()
        }
    }
}

/// Extract the bearer token from `headers` and verify it.
///
/// Shared by the middleware and the not-found handler so both reject a given
/// request the same way.
pub fn authenticate_headers(
    headers: &HeaderMap,
    verifier: &TokenVerifier,
) -> Result<VerifiedIdentity, AuthError> {
    let token = bearer_token(headers)?;
    verifier.verify(token).into_result()
}

/// Get the token out of an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively and the token must be non-empty.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_str = headers
        .get(AUTHORIZATION)
        .ok_or_else(AuthError::missing_header)?
        .to_str()
        .map_err(|_| AuthError::bad_scheme())?;

    let (scheme, token) = auth_str
        .trim()
        .split_once(' ')
        .ok_or_else(AuthError::bad_scheme)?;
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AuthError::bad_scheme());
    }

    Ok(token)
}
