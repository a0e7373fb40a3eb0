// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::{Auth, VerifiedIdentity};

/// Response for GET /v1/users/me
#[derive(Debug, Serialize, ToSchema)]
pub struct UserMeResponse {
    /// Provider user ID (`sub`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Username, when the token carries one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Token expiry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Every claim of the verified token
    #[schema(value_type = Object)]
    pub claims: VerifiedIdentity,
}

impl From<VerifiedIdentity> for UserMeResponse {
    fn from(identity: VerifiedIdentity) -> Self {
        Self {
            sub: identity.subject().map(str::to_string),
            username: identity.username().map(str::to_string),
            expires_at: identity.expires_at(),
            claims: identity,
        }
    }
}

/// Get the current authenticated user's information.
#[utoipa::path(
    get,
    path = "/v1/users/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User information", body = UserMeResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn get_current_user(Auth(identity): Auth) -> Json<UserMeResponse> {
    Json(identity.into())
}
