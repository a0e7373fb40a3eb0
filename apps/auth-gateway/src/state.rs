// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{KeySetCache, TokenVerifier};
use crate::config::GatewayConfig;

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(verifier: TokenVerifier) -> Self {
        Self {
            verifier: Arc::new(verifier),
        }
    }

    pub fn from_parts(config: GatewayConfig, keys: KeySetCache) -> Self {
        Self::new(TokenVerifier::new(Arc::new(config), Arc::new(keys)))
    }
}
