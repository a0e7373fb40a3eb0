// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Auth Gateway - bearer token authentication in front of a protected API
//!
//! Every inbound request is checked against the identity provider's
//! published RS256 signing keys before it reaches routing. Requests for
//! routes that do not exist are answered with the same authentication failure
//! a protected route would give, unless the caller holds a valid token.
//!
//! ## Modules
//!
//! - `api` - Router assembly and downstream handlers (Axum)
//! - `auth` - Key set cache, token verification, middleware, not-found masking
//! - `config` - Environment configuration
//! - `logging` - Tracing subscriber setup

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod state;
