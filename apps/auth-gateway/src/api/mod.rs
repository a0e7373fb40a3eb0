// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::{
    auth::{auth_middleware, masked_not_found},
    state::AppState,
};

pub mod root;
pub mod users;

/// Routes, authentication and not-found masking.
///
/// Every route and both fallbacks sit behind [`auth_middleware`]; unmatched
/// paths and methods go to [`masked_not_found`].
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root::root))
        .route("/authorize", post(root::authorize))
        .route("/v1/users/me", get(users::get_current_user))
        .route("/api-doc/openapi.json", get(openapi_json))
        .fallback(masked_not_found)
        .method_not_allowed_fallback(masked_not_found)
        .layer(from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

/// Wrap `router` with CORS, request ids and request tracing.
///
/// CORS is outermost so browser pre-flight is answered before authentication.
/// `None` allows any origin.
pub fn with_http_layers(router: Router, cors_origins: Option<&[String]>) -> Router {
    router
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors_layer(cors_origins))
}

fn cors_layer(origins: Option<&[String]>) -> CorsLayer {
    // A wildcard cannot sit in an origin list.
    let Some(origins) = origins.filter(|list| !list.iter().any(|origin| origin == "*")) else {
        return CorsLayer::permissive();
    };

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        root::root,
        root::authorize,
        users::get_current_user
    ),
    components(
        schemas(
            root::MessageResponse,
            users::UserMeResponse
        )
    ),
    modifiers(&BearerSecurity),
    tags(
        (name = "Root", description = "Gateway entry points"),
        (name = "Users", description = "Authenticated caller information")
    )
)]
struct ApiDoc;

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
