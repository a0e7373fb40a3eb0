// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::Auth;

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Root",
    security(("bearer" = [])),
    responses(
        (status = 200, body = MessageResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Welcome to the File Converter API".to_string(),
    })
}

/// Confirm the caller's token and echo who it belongs to.
#[utoipa::path(
    post,
    path = "/authorize",
    tag = "Root",
    security(("bearer" = [])),
    responses(
        (status = 200, body = MessageResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn authorize(Auth(identity): Auth) -> Json<MessageResponse> {
    let who = identity
        .username()
        .or_else(|| identity.subject())
        .unwrap_or("unknown");
    Json(MessageResponse {
        message: format!("Authenticated as {who}"),
    })
}
