// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for the authenticated caller.
//!
//! Use the `Auth` extractor in handlers to read the caller's identity:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(identity): Auth) -> impl IntoResponse {
//!     // identity is VerifiedIdentity
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::middleware::authenticate_headers;
use super::{AuthError, VerifiedIdentity};
use crate::state::AppState;

/// Extractor for the verified identity.
///
/// Behind the auth middleware the identity is already in the request
/// extensions. A handler mounted outside the middleware verifies the
/// `Authorization` header itself.
pub struct Auth(pub VerifiedIdentity);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(identity) = parts.extensions.get::<VerifiedIdentity>().cloned() {
            return Ok(Auth(identity));
        }

        let identity = authenticate_headers(&parts.headers, &state.verifier)?;
        parts.extensions.insert(identity.clone());
        Ok(Auth(identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::test_support::{base_claims, sign, test_verifier};
    use crate::auth::{AuthFailureKind, ClaimValue};
    use axum::http::Request;
    use std::collections::BTreeMap;

    fn state() -> AppState {
        AppState::new(test_verifier())
    }

    fn parts(authorization: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/test");
        if let Some(value) = authorization {
            builder = builder.header("Authorization", value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn requires_auth_header() {
        let mut parts = parts(None);
        let result = Auth::from_request_parts(&mut parts, &state()).await;
        assert!(matches!(
            result,
            Err(AuthError { kind: AuthFailureKind::MissingHeader, .. })
        ));
    }

    #[tokio::test]
    async fn verifies_header_without_middleware() {
        let token = sign(&base_claims());
        let mut parts = parts(Some(&format!("Bearer {token}")));

        let Auth(identity) = Auth::from_request_parts(&mut parts, &state()).await.unwrap();
        assert_eq!(identity.subject(), Some("12345-67890"));
        assert!(parts.extensions.get::<VerifiedIdentity>().is_some());
    }

    #[tokio::test]
    async fn prefers_extensions() {
        let mut parts = parts(None);
        let identity = VerifiedIdentity::new(BTreeMap::from([(
            "sub".to_string(),
            ClaimValue::String("user_from_middleware".to_string()),
        )]));
        parts.extensions.insert(identity);

        let Auth(identity) = Auth::from_request_parts(&mut parts, &state()).await.unwrap();
        assert_eq!(identity.subject(), Some("user_from_middleware"));
    }
}
