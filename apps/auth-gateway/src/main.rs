// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::net::SocketAddr;
use std::process::ExitCode;
use std::time::Duration;

use auth_gateway::{
    api,
    auth::KeySetCache,
    config::{GatewayConfig, ServerConfig},
    logging,
    state::AppState,
};
use axum_server::{tls_rustls::RustlsConfig, Handle};

/// Time in-flight requests get to finish after a shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> ExitCode {
    let server_config = ServerConfig::from_env();
    let log_format = server_config
        .as_ref()
        .map(|c| c.log_format)
        .unwrap_or_default();
    if let Err(e) = logging::init(log_format) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let server_config = match server_config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid server configuration");
            return ExitCode::FAILURE;
        }
    };

    let gateway_config = match GatewayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid gateway configuration");
            return ExitCode::FAILURE;
        }
    };

    if gateway_config.app_client_id.is_none() {
        tracing::warn!(
            "COGNITO_APP_CLIENT_ID environment variable not set. Audience validation will be skipped."
        );
    }

    tracing::info!(
        issuer = %gateway_config.issuer,
        jwks_url = %gateway_config.jwks_url,
        "Fetching signing keys"
    );
    let keys =
        KeySetCache::fetch_with_timeout(&gateway_config.jwks_url, gateway_config.jwks_timeout)
            .await;

    let state = AppState::from_parts(gateway_config, keys);
    tracing::info!(
        issuer = %state.verifier.config().issuer,
        keys = state.verifier.keys().len(),
        "Token verifier ready"
    );
    let app = api::with_http_layers(api::router(state), server_config.cors_origins.as_deref());

    let handle = Handle::new();
    tokio::spawn(shutdown_on_signal(handle.clone()));

    let addr = server_config.addr;
    let result = match &server_config.tls {
        Some((cert_path, key_path)) => {
            // Must be installed before any TLS configuration is built.
            if rustls::crypto::ring::default_provider()
                .install_default()
                .is_err()
            {
                tracing::debug!("rustls crypto provider already installed");
            }

            let tls_config = match RustlsConfig::from_pem_file(cert_path, key_path).await {
                Ok(config) => config,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to load TLS certificate or key");
                    return ExitCode::FAILURE;
                }
            };

            tracing::info!("Auth gateway listening on https://{addr}");
            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await
        }
        None => {
            tracing::info!("Auth gateway listening on http://{addr}");
            axum_server::bind(addr)
                .handle(handle)
                .serve(app.into_make_service())
                .await
        }
    };

    match result {
        Ok(()) => {
            tracing::info!("Auth gateway stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Server failed");
            ExitCode::FAILURE
        }
    }
}

async fn shutdown_on_signal(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
    handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
}
