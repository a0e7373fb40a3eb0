// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWKS (JSON Web Key Set) fetching and the signing key cache.
//!
//! ## Behavior
//!
//! - The key set is fetched once, at startup
//! - The cache is immutable afterwards (no refresh, no rotation)
//! - A failed fetch leaves the cache empty: the process starts, and every
//!   token is then rejected with an unknown-key failure
//!
//! ## Usage
//!
//! Fetch the cache in main.rs with the URL derived from the issuer and hand
//! it to the `TokenVerifier`.

use std::time::Duration;

use serde::Deserialize;

use crate::config::DEFAULT_JWKS_TIMEOUT;

/// An RSA public signing key from the provider's key set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningKey {
    /// Key ID, matched against the token header's `kid`
    pub kid: String,
    /// Key type (always `RSA` for cached keys)
    pub key_type: String,
    /// Intended use (`sig`)
    pub key_use: String,
    /// Modulus, base64url
    pub modulus: String,
    /// Public exponent, base64url
    pub exponent: String,
}

impl SigningKey {
    pub fn rsa(kid: impl Into<String>, modulus: impl Into<String>, exponent: impl Into<String>) -> Self {
        Self {
            kid: kid.into(),
            key_type: "RSA".to_string(),
            key_use: "sig".to_string(),
            modulus: modulus.into(),
            exponent: exponent.into(),
        }
    }
}

/// Raw key set document. Entries are loose so that one unsupported key does
/// not poison the whole set.
#[derive(Debug, Deserialize)]
struct JwksDocument {
    keys: Vec<RawJwk>,
}

#[derive(Debug, Deserialize)]
struct RawJwk {
    kid: Option<String>,
    kty: Option<String>,
    #[serde(rename = "use")]
    key_use: Option<String>,
    n: Option<String>,
    e: Option<String>,
}

impl RawJwk {
    fn into_signing_key(self) -> Option<SigningKey> {
        if self.kty.as_deref() != Some("RSA") {
            tracing::warn!(kid = ?self.kid, kty = ?self.kty, "Skipping non-RSA key in JWKS");
            return None;
        }
        match (self.kid, self.n, self.e) {
            (Some(kid), Some(n), Some(e)) => Some(SigningKey {
                kid,
                key_type: "RSA".to_string(),
                key_use: self.key_use.unwrap_or_else(|| "sig".to_string()),
                modulus: n,
                exponent: e,
            }),
            (kid, _, _) => {
                tracing::warn!(kid = ?kid, "Skipping incomplete RSA key in JWKS");
                None
            }
        }
    }
}

/// Why a key set fetch failed. Only logged; callers get an empty cache.
#[derive(Debug, thiserror::Error)]
enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {0} from JWKS endpoint")]
    Status(reqwest::StatusCode),
}

/// The provider's public signing keys, keyed by `kid`.
///
/// Immutable once built; share it behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct KeySetCache {
    keys: Vec<SigningKey>,
}

impl KeySetCache {
    /// Build a cache from known keys. Later duplicates of a `kid` are dropped.
    pub fn from_keys(keys: impl IntoIterator<Item = SigningKey>) -> Self {
        let mut unique: Vec<SigningKey> = Vec::new();
        for key in keys {
            if unique.iter().any(|k| k.kid == key.kid) {
                tracing::warn!(kid = %key.kid, "Duplicate kid in JWKS, keeping the first");
                continue;
            }
            unique.push(key);
        }
        Self { keys: unique }
    }

    /// An empty cache. Every lookup fails.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Fetch the key set from `jwks_url` with the default timeout.
    ///
    /// Never fails: network, status and decode errors are logged and yield an
    /// empty cache.
    pub async fn fetch(jwks_url: &str) -> Self {
        Self::fetch_with_timeout(jwks_url, DEFAULT_JWKS_TIMEOUT).await
    }

    /// Fetch the key set from `jwks_url`. See [`KeySetCache::fetch`].
    pub async fn fetch_with_timeout(jwks_url: &str, timeout: Duration) -> Self {
        match fetch_document(jwks_url, timeout).await {
            Ok(document) => {
                let cache = Self::from_keys(
                    document
                        .keys
                        .into_iter()
                        .filter_map(RawJwk::into_signing_key),
                );
                tracing::info!(jwks_url, keys = cache.len(), "Loaded signing keys");
                cache
            }
            Err(e) => {
                tracing::error!(jwks_url, error = %e, "Failed to fetch JWKS, every token will be rejected");
                Self::empty()
            }
        }
    }

    /// Find the key with the given `kid`.
    pub fn lookup(&self, kid: &str) -> Option<&SigningKey> {
        self.keys.iter().find(|k| k.kid == kid)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn kids(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|k| k.kid.as_str())
    }
}

async fn fetch_document(jwks_url: &str, timeout: Duration) -> Result<JwksDocument, FetchError> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;

    let response = client.get(jwks_url).send().await?;

    if !response.status().is_success() {
        return Err(FetchError::Status(response.status()));
    }

    Ok(response.json::<JwksDocument>().await?)
}
