//! HTTP surface of the exporter.
//!
//! Two routes: the configurable telemetry path, which runs one scrape
//! cycle per request, and a landing page linking to it.

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::routing::get;

use fluentd_metrics::{EXPOSITION_CONTENT_TYPE, Exporter, render_families};

/// Shared state for the exporter handlers.
#[derive(Clone)]
pub struct AppState {
    pub exporter: Arc<Exporter>,
    pub telemetry_path: String,
}

/// Build the exporter router.
pub fn build_router(exporter: Arc<Exporter>, telemetry_path: &str) -> Router {
    let state = AppState {
        exporter,
        telemetry_path: telemetry_path.to_string(),
    };

    Router::new()
        .route("/", get(landing_page))
        .route(telemetry_path, get(metrics))
        .with_state(state)
}

/// GET `{telemetry_path}`
///
/// Runs one scrape cycle against the monitor agent and returns the
/// exposition body. Upstream failures surface only through the scrape
/// outcome series, never as an HTTP error.
async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let families = state.exporter.collect().await;
    let body = render_families(&families);
    (
        StatusCode::OK,
        [("content-type", EXPOSITION_CONTENT_TYPE)],
        body,
    )
}

/// GET `/`
async fn landing_page(State(state): State<AppState>) -> Html<String> {
    Html(format!(
        "<html>\n\
         <head><title>Fluentd monitor agent exporter</title></head>\n\
         <body>\n\
         <h1>Fluentd monitor agent exporter</h1>\n\
         <p><a href='{}'>Metrics</a></p>\n\
         </body>\n\
         </html>\n",
        state.telemetry_path
    ))
}
