// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Verified claim set and typed claim access.
//!
//! A verified token's payload is kept as an ordered map from claim name to
//! [`ClaimValue`]. Handlers read it through typed accessors instead of
//! indexing raw JSON.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single claim value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClaimValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    List(Vec<ClaimValue>),
    Object(BTreeMap<String, ClaimValue>),
}

impl ClaimValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ClaimValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ClaimValue::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ClaimValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ClaimValue]> {
        match self {
            ClaimValue::List(items) => Some(items),
            _ => None,
        }
    }
}

/// Identity of an authenticated caller: the decoded claims of a verified
/// bearer token.
///
/// Inserted into request extensions by the auth middleware and read-only from
/// then on. It lives exactly as long as the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerifiedIdentity {
    claims: BTreeMap<String, ClaimValue>,
}

impl VerifiedIdentity {
    pub fn new(claims: BTreeMap<String, ClaimValue>) -> Self {
        Self { claims }
    }

    pub fn get(&self, name: &str) -> Option<&ClaimValue> {
        self.claims.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ClaimValue::as_str)
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(ClaimValue::as_i64)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(ClaimValue::as_bool)
    }

    pub fn get_list(&self, name: &str) -> Option<&[ClaimValue]> {
        self.get(name).and_then(ClaimValue::as_list)
    }

    /// Subject (`sub`), the provider's stable user id.
    pub fn subject(&self) -> Option<&str> {
        self.get_str("sub")
    }

    pub fn issuer(&self) -> Option<&str> {
        self.get_str("iss")
    }

    /// Username. Access tokens carry `username`, ID tokens `cognito:username`.
    pub fn username(&self) -> Option<&str> {
        self.get_str("username")
            .or_else(|| self.get_str("cognito:username"))
    }

    /// Expiry (`exp`) as a timestamp.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.get_i64("exp")
            .and_then(|exp| DateTime::from_timestamp(exp, 0))
    }

    /// Whether the `aud` claim (string or list) contains `audience`.
    pub fn has_audience(&self, audience: &str) -> bool {
        match self.get("aud") {
            Some(ClaimValue::String(aud)) => aud == audience,
            Some(ClaimValue::List(auds)) => auds.iter().any(|a| a.as_str() == Some(audience)),
            _ => false,
        }
    }

    pub fn claims(&self) -> &BTreeMap<String, ClaimValue> {
        &self.claims
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}
