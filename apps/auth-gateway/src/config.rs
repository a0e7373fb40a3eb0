// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, default values and the typed configuration
//! built from them. Configuration is read once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `COGNITO_REGION` | Identity provider region | `eu-west-2` |
//! | `COGNITO_USER_POOL_ID` | User pool identifier | Required |
//! | `COGNITO_APP_CLIENT_ID` | Expected audience / `client_id` claim | Optional |
//! | `COGNITO_ISSUER_URL` | Override for the derived issuer URL | Derived |
//! | `TOKEN_LEEWAY_SECS` | Clock skew tolerance for `exp` / `nbf` | `0` |
//! | `JWKS_FETCH_TIMEOUT_SECS` | Timeout of the startup JWKS fetch | `10` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `TLS_CERT_PATH` | PEM certificate chain (HTTPS when set with key) | Unset |
//! | `TLS_KEY_PATH` | PEM private key | Unset |
//! | `CORS_ALLOWED_ORIGINS` | Comma-separated allowed origins; `*` allows any | Permissive |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const REGION_ENV: &str = "COGNITO_REGION";
pub const USER_POOL_ID_ENV: &str = "COGNITO_USER_POOL_ID";
pub const APP_CLIENT_ID_ENV: &str = "COGNITO_APP_CLIENT_ID";
pub const ISSUER_URL_ENV: &str = "COGNITO_ISSUER_URL";
pub const TOKEN_LEEWAY_ENV: &str = "TOKEN_LEEWAY_SECS";
pub const JWKS_TIMEOUT_ENV: &str = "JWKS_FETCH_TIMEOUT_SECS";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const CORS_ALLOWED_ORIGINS_ENV: &str = "CORS_ALLOWED_ORIGINS";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_REGION: &str = "eu-west-2";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Default timeout for the one-time JWKS fetch (10 seconds).
pub const DEFAULT_JWKS_TIMEOUT: Duration = Duration::from_secs(10);

/// Path of the key set document relative to the issuer.
const JWKS_PATH: &str = "/.well-known/jwks.json";

/// Fatal startup misconfiguration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("COGNITO_USER_POOL_ID environment variable not set")]
    MissingUserPoolId,
    #[error("invalid value {value:?} for {name}")]
    InvalidValue { name: &'static str, value: String },
    #[error("COGNITO_ISSUER_URL must be an absolute http(s) URL, got {0:?}")]
    InvalidIssuerUrl(String),
}

/// Identity provider settings used to verify bearer tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub region: String,
    pub user_pool_id: String,
    /// Expected audience. `None` disables the audience check.
    pub app_client_id: Option<String>,
    /// Exact string every token's `iss` claim must equal.
    pub issuer: String,
    pub jwks_url: String,
    /// Clock skew tolerance in seconds for `exp` and `nbf`.
    pub leeway_secs: u64,
    pub jwks_timeout: Duration,
}

impl GatewayConfig {
    /// Build a configuration with the derived Cognito issuer.
    pub fn new(region: impl Into<String>, user_pool_id: impl Into<String>) -> Self {
        let region = region.into();
        let user_pool_id = user_pool_id.into();
        let issuer = format!("https://cognito-idp.{region}.amazonaws.com/{user_pool_id}");
        Self {
            jwks_url: jwks_url_for(&issuer),
            issuer,
            region,
            user_pool_id,
            app_client_id: None,
            leeway_secs: 0,
            jwks_timeout: DEFAULT_JWKS_TIMEOUT,
        }
    }

    /// Set the expected audience.
    pub fn with_app_client_id(mut self, app_client_id: impl Into<String>) -> Self {
        self.app_client_id = Some(app_client_id.into());
        self
    }

    /// Replace the derived issuer (and the JWKS URL that hangs off it).
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        let issuer = issuer.into().trim_end_matches('/').to_string();
        self.jwks_url = jwks_url_for(&issuer);
        self.issuer = issuer;
        self
    }

    pub fn with_leeway(mut self, leeway_secs: u64) -> Self {
        self.leeway_secs = leeway_secs;
        self
    }

    /// Load from the process environment.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when the user pool id is missing or a value
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable lookup. Empty values count as unset.
    ///
    /// # Errors
    /// See [`GatewayConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let region = get(REGION_ENV).unwrap_or_else(|| DEFAULT_REGION.to_string());
        let user_pool_id = get(USER_POOL_ID_ENV).ok_or(ConfigError::MissingUserPoolId)?;

        let mut config = Self::new(region, user_pool_id);

        if let Some(client_id) = get(APP_CLIENT_ID_ENV) {
            config = config.with_app_client_id(client_id);
        }

        if let Some(issuer) = get(ISSUER_URL_ENV) {
            let parsed =
                Url::parse(&issuer).map_err(|_| ConfigError::InvalidIssuerUrl(issuer.clone()))?;
            if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
                return Err(ConfigError::InvalidIssuerUrl(issuer));
            }
            config = config.with_issuer(issuer);
        }

        if let Some(raw) = get(TOKEN_LEEWAY_ENV) {
            config.leeway_secs = parse_value(TOKEN_LEEWAY_ENV, &raw)?;
        }

        if let Some(raw) = get(JWKS_TIMEOUT_ENV) {
            config.jwks_timeout = Duration::from_secs(parse_value(JWKS_TIMEOUT_ENV, &raw)?);
        }

        Ok(config)
    }
}

fn jwks_url_for(issuer: &str) -> String {
    format!("{issuer}{JWKS_PATH}")
}

fn parse_value<T: std::str::FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name,
        value: raw.to_string(),
    })
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// Certificate and key paths; HTTPS is served only when both are set.
    pub tls: Option<(PathBuf, PathBuf)>,
    /// `None` means permissive CORS. A `*` entry collapses the list to `None`.
    pub cors_origins: Option<Vec<String>>,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] for an unparsable bind address.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// # Errors
    /// See [`ServerConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let host = get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port: u16 = match get(PORT_ENV) {
            Some(raw) => parse_value(PORT_ENV, &raw)?,
            None => DEFAULT_PORT,
        };
        let addr = parse_value(HOST_ENV, &format!("{host}:{port}"))?;

        let tls = match (get(TLS_CERT_PATH_ENV), get(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some((PathBuf::from(cert), PathBuf::from(key))),
            _ => None,
        };

        let cors_origins = get(CORS_ALLOWED_ORIGINS_ENV).and_then(|raw| {
            let origins: Vec<String> = raw
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect();
            (!origins.iter().any(|origin| origin == "*")).then_some(origins)
        });

        let log_format = match get(LOG_FORMAT_ENV).as_deref() {
            Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            addr,
            tls,
            cors_origins,
            log_format,
        })
    }
}
