use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::app_state::{AppState, FetchErrorPolicy};

pub type SharedState = Arc<AppState>;

const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

pub async fn metrics_handler(State(state): State<SharedState>) -> Response {
    // sinfo/squeue block until they exit, so keep them off the runtime workers.
    let scrape_state = state.clone();
    let result = tokio::task::spawn_blocking(move || scrape_state.registry.gather()).await;

    match result {
        Ok(Ok(body)) => ([(header::CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)], body).into_response(),
        Ok(Err(e)) => match state.on_fetch_error {
            FetchErrorPolicy::Exit => {
                tracing::error!("Scrape failed, exiting: {e}");
                std::process::exit(1);
            }
            FetchErrorPolicy::Respond => {
                tracing::error!("Scrape failed: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("scrape failed: {e}\n"),
                )
                    .into_response()
            }
        },
        Err(e) => {
            tracing::error!("Scrape task panicked: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "scrape task failed\n").into_response()
        }
    }
}
