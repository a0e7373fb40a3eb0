// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token verification.
//!
//! [`TokenVerifier::verify`] runs the full check in order and stops at the
//! first failure:
//!
//! 1. Parse the unverified header (`kid`, `alg`)
//! 2. Look up `kid` in the [`KeySetCache`]
//! 3. Verify the RS256 signature (any other algorithm is refused)
//! 4. Check `iss` against the configured issuer
//! 5. Check the audience when an app client id is configured
//! 6. Check `exp` (and `nbf` when present) against the current time
//!
//! The verifier knows nothing about HTTP. Callers turn a rejection into a
//! response.

use std::collections::BTreeMap;
use std::sync::Arc;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};

use super::claims::{ClaimValue, VerifiedIdentity};
use super::error::{AuthError, AuthFailureKind};
use super::jwks::KeySetCache;
use crate::config::GatewayConfig;

/// Result of verifying one token.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    Authenticated(VerifiedIdentity),
    Rejected(AuthError),
}

impl AuthOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthOutcome::Authenticated(_))
    }

    /// Failure kind, if rejected.
    pub fn failure_kind(&self) -> Option<AuthFailureKind> {
        match self {
            AuthOutcome::Authenticated(_) => None,
            AuthOutcome::Rejected(e) => Some(e.kind),
        }
    }

    pub fn into_result(self) -> Result<VerifiedIdentity, AuthError> {
        match self {
            AuthOutcome::Authenticated(identity) => Ok(identity),
            AuthOutcome::Rejected(e) => Err(e),
        }
    }
}

impl From<Result<VerifiedIdentity, AuthError>> for AuthOutcome {
    fn from(result: Result<VerifiedIdentity, AuthError>) -> Self {
        match result {
            Ok(identity) => AuthOutcome::Authenticated(identity),
            Err(e) => AuthOutcome::Rejected(e),
        }
    }
}

/// Verifies bearer tokens against a fixed key set and issuer configuration.
///
/// Holds no mutable state; clone the `Arc`s freely across request tasks.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    config: Arc<GatewayConfig>,
    keys: Arc<KeySetCache>,
}

impl TokenVerifier {
    pub fn new(config: Arc<GatewayConfig>, keys: Arc<KeySetCache>) -> Self {
        Self { config, keys }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn keys(&self) -> &KeySetCache {
        &self.keys
    }

    /// Verify a raw bearer token.
    pub fn verify(&self, token: &str) -> AuthOutcome {
        self.verify_token(token).into()
    }

    fn verify_token(&self, token: &str) -> Result<VerifiedIdentity, AuthError> {
        let header = decode_header(token).map_err(AuthError::malformed_token)?;

        let key = header
            .kid
            .as_deref()
            .and_then(|kid| self.keys.lookup(kid))
            .ok_or_else(AuthError::unknown_key)?;

        if header.alg != Algorithm::RS256 {
            return Err(AuthError::verification_failed(format!(
                "unsupported algorithm {:?}",
                header.alg
            )));
        }

        let decoding_key = DecodingKey::from_rsa_components(&key.modulus, &key.exponent)
            .map_err(|e| {
                AuthError::internal(format!("cached key {} is not a usable RSA key: {e}", key.kid))
            })?;

        let token_data = decode::<BTreeMap<String, ClaimValue>>(
            token,
            &decoding_key,
            &self.validation(),
        )
        .map_err(map_decode_error)?;

        let identity = VerifiedIdentity::new(token_data.claims);
        self.check_audience(&identity)?;
        Ok(identity)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["exp", "iss"]);
        validation.validate_nbf = true;
        validation.leeway = self.config.leeway_secs;
        // Audience is checked by `check_audience`, which also accepts the
        // `client_id` claim of access tokens.
        validation.validate_aud = false;
        validation
    }

    /// Skipped entirely when no app client id is configured.
    fn check_audience(&self, identity: &VerifiedIdentity) -> Result<(), AuthError> {
        let Some(expected) = self.config.app_client_id.as_deref() else {
            return Ok(());
        };

        let matches = if identity.get("aud").is_some() {
            identity.has_audience(expected)
        } else {
            identity.get_str("client_id") == Some(expected)
        };

        if matches {
            Ok(())
        } else {
            Err(AuthError::claims_invalid("Invalid audience"))
        }
    }
}

fn map_decode_error(e: jsonwebtoken::errors::Error) -> AuthError {
    match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::expired(),
        ErrorKind::InvalidIssuer
        | ErrorKind::InvalidAudience
        | ErrorKind::InvalidSubject
        | ErrorKind::ImmatureSignature
        | ErrorKind::MissingRequiredClaim(_) => AuthError::claims_invalid(e),
        _ => AuthError::verification_failed(e),
    }
}
