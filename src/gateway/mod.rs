//! HTTP gateway (Axum) in front of the orchestrator.
//!
//! This module is primarily used by the `match-cascade` server binary.

pub mod error;
pub mod handler;
pub mod state;


use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::{analyze_handler, invalidate_handler, metrics_handler};
pub use state::GatewayState;

use crate::cache::DurableStore;

/// Response header carrying `ephemeral`, `durable` or `generated`.
pub const CACHE_SOURCE_HEADER: &str = "X-Match-Cache-Source";

/// Response header carrying a short status label.
pub const STATUS_HEADER: &str = "X-Match-Status";

pub const STATUS_HEALTHY: &str = "healthy";

pub const STATUS_READY: &str = "ready";

pub const STATUS_NOT_READY: &str = "not_ready";

pub const STATUS_INVALIDATED: &str = "invalidated";

pub fn create_router<D>(state: GatewayState<D>) -> Router
where
    D: DurableStore + 'static,
{
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler::<D>))
        .route("/metrics", get(metrics_handler::<D>))
        .route("/v1/analyze", post(analyze_handler::<D>))
        .route(
            "/v1/analyze/{subject_id}/{target_id}",
            delete(invalidate_handler::<D>),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub durable_cache: &'static str,
    pub cascade: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(STATUS_HEADER, HeaderValue::from_static(STATUS_HEALTHY));

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

/// Not ready while the durable tier is down. Analyses still work then, only uncached.
#[tracing::instrument(skip(state))]
pub async fn ready_handler<D>(State(state): State<GatewayState<D>>) -> Response
where
    D: DurableStore + 'static,
{
    let durable_ready = state.orchestrator.is_ready().await;
    let components = ComponentStatus {
        http: STATUS_READY,
        durable_cache: if durable_ready {
            STATUS_READY
        } else {
            STATUS_NOT_READY
        },
        cascade: if state.orchestrator.options().cascade_enabled {
            "enabled"
        } else {
            "premium_only"
        },
    };

    let (status_code, status_msg) = if durable_ready {
        (StatusCode::OK, STATUS_READY)
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, STATUS_NOT_READY)
    };

    let mut headers = HeaderMap::new();
    headers.insert(STATUS_HEADER, HeaderValue::from_static(status_msg));

    (
        status_code,
        headers,
        Json(ReadyResponse {
            status: status_msg,
            components,
        }),
    )
        .into_response()
}
