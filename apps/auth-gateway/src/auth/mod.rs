// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer token authentication for every request the gateway serves.
//!
//! ## Auth Flow
//!
//! 1. Client authenticates with the Cognito user pool
//! 2. Client sends `Authorization: Bearer <JWT>`
//! 3. Gateway:
//!    - Looks up the token's `kid` in the key set fetched at startup
//!    - Verifies the RS256 signature, issuer, audience and expiry
//!    - Attaches the decoded claims to the request
//! 4. Unmatched routes answer 404 only to callers with a valid token
//!
//! ## Security
//!
//! - Only `OPTIONS` pre-flight requests skip authentication
//! - Only RS256 is accepted
//! - The key set is fetched once; an empty key set rejects every token
//! - Every token failure is a 401 with `WWW-Authenticate: Bearer`

pub mod claims;
pub mod error;
pub mod extractor;
pub mod jwks;
pub mod middleware;
pub mod not_found;
pub mod verifier;

#[cfg(test)]
pub(crate) mod test_support;

pub use claims::{ClaimValue, VerifiedIdentity};
pub use error::{AuthError, AuthFailureKind};
pub use extractor::Auth;
pub use jwks::{KeySetCache, SigningKey};
pub use middleware::auth_middleware;
pub use not_found::masked_not_found;
pub use verifier::{AuthOutcome, TokenVerifier};
