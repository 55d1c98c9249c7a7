// Copyright 2025 Lablup Inc. and Jeongkyu Shin
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::handlers::{metrics_handler, SharedState};
use crate::app_state::AppState;
use crate::cli::Cli;
use crate::common::config::ExporterConfig;
use crate::error::Result;

/// Install the global tracing subscriber. `RUST_LOG` takes precedence.
pub fn init_tracing(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    // A subscriber may already be installed (e.g. when embedded in tests).
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Build the HTTP router serving the exposition endpoint.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route(ExporterConfig::METRICS_PATH, get(metrics_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Register collectors, bind the TCP listener and serve until shutdown.
pub async fn run_api_mode(args: &Cli) -> Result<()> {
    init_tracing(&args.log_level);

    let state = Arc::new(AppState::from_cli(args)?);
    tracing::info!(
        sinfo = %args.sinfo,
        squeue = %args.squeue,
        timeout = ?args.command_timeout(),
        policy = ?state.on_fetch_error,
        gauges = state.registry.descriptors().count(),
        "Registered collectors"
    );

    let address = args.listen_address();
    let listener = TcpListener::bind(&address).await.inspect_err(|e| {
        tracing::error!("Failed to bind TCP listener on {address}: {e}");
    })?;
    tracing::info!(
        "Exporter listening on {}{}",
        listener
            .local_addr()
            .map(|addr| addr.to_string())
            .unwrap_or(address),
        ExporterConfig::METRICS_PATH
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Exporter stopped");
    Ok(())
}

/// Resolve on Ctrl+C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {e}");
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
                tracing::warn!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
