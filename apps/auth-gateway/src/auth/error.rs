// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication failures.

use axum::{
    http::{header::WWW_AUTHENTICATE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::error::ApiError;

/// Detail sent for every failure that is not the caller's fault.
const INTERNAL_DETAIL: &str = "An unexpected error occurred during token validation.";

/// Why a request failed authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthFailureKind {
    /// No authorization header present
    MissingHeader,
    /// Header present but not `Bearer <token>`
    BadScheme,
    /// Token header cannot be parsed
    MalformedToken,
    /// `kid` not present in the cached key set
    UnknownKey,
    /// Signature invalid, disallowed algorithm or undecodable token
    VerificationFailed,
    /// `exp` claim in the past
    Expired,
    /// Issuer, audience or not-before mismatch
    ClaimsInvalid,
    /// Unanticipated server-side condition
    Internal,
}

impl AuthFailureKind {
    /// Get the error code for this failure, used in logs.
    pub fn code(self) -> &'static str {
        match self {
            AuthFailureKind::MissingHeader => "missing_header",
            AuthFailureKind::BadScheme => "bad_scheme",
            AuthFailureKind::MalformedToken => "malformed_token",
            AuthFailureKind::UnknownKey => "unknown_key",
            AuthFailureKind::VerificationFailed => "verification_failed",
            AuthFailureKind::Expired => "expired",
            AuthFailureKind::ClaimsInvalid => "claims_invalid",
            AuthFailureKind::Internal => "internal_error",
        }
    }

    /// Get the HTTP status code for this failure.
    pub fn status_code(self) -> StatusCode {
        match self {
            AuthFailureKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

/// A rejected authentication attempt: the failure kind plus the detail the
/// caller sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{detail}")]
pub struct AuthError {
    pub kind: AuthFailureKind,
    pub detail: String,
}

impl AuthError {
    pub fn new(kind: AuthFailureKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn missing_header() -> Self {
        Self::new(AuthFailureKind::MissingHeader, "Authorization header missing")
    }

    pub fn bad_scheme() -> Self {
        Self::new(AuthFailureKind::BadScheme, "Invalid authentication scheme")
    }

    pub fn malformed_token(cause: impl std::fmt::Display) -> Self {
        Self::new(
            AuthFailureKind::MalformedToken,
            format!("Invalid token header: {cause}"),
        )
    }

    pub fn unknown_key() -> Self {
        Self::new(
            AuthFailureKind::UnknownKey,
            "Could not find a matching public key for token.",
        )
    }

    pub fn verification_failed(cause: impl std::fmt::Display) -> Self {
        Self::new(
            AuthFailureKind::VerificationFailed,
            format!("Token validation failed: {cause}"),
        )
    }

    pub fn expired() -> Self {
        Self::new(AuthFailureKind::Expired, "Token has expired.")
    }

    pub fn claims_invalid(cause: impl std::fmt::Display) -> Self {
        Self::new(
            AuthFailureKind::ClaimsInvalid,
            format!("Invalid claims: {cause}"),
        )
    }

    /// Internal failure. The cause is logged, the caller only sees a generic
    /// message.
    pub fn internal(cause: impl std::fmt::Display) -> Self {
        tracing::error!(error = %cause, "Unexpected error during token validation");
        Self::new(AuthFailureKind::Internal, INTERNAL_DETAIL)
    }

    pub fn status_code(&self) -> StatusCode {
        self.kind.status_code()
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut response = ApiError::new(status, self.detail).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}
