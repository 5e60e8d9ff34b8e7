use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{debug, instrument};

use super::error::GatewayError;
use super::state::GatewayState;
use super::{CACHE_SOURCE_HEADER, STATUS_HEADER, STATUS_INVALIDATED};
use crate::analysis::AnalysisRequest;
use crate::cache::DurableStore;

#[instrument(skip(state, body), fields(subject_id = tracing::field::Empty, target_id = tracing::field::Empty))]
pub async fn analyze_handler<D>(
    State(state): State<GatewayState<D>>,
    Json(body): Json<serde_json::Value>,
) -> Result<Response, GatewayError>
where
    D: DurableStore + 'static,
{
    let request: AnalysisRequest = serde_json::from_value(body)
        .map_err(|e| GatewayError::InvalidRequest(format!("Invalid request schema: {}", e)))?;

    let span = tracing::Span::current();
    span.record("subject_id", tracing::field::display(request.subject_id()));
    span.record("target_id", tracing::field::display(request.target_id()));

    let outcome = state.orchestrator.analyze(&request).await?;
    debug!(cache_source = %outcome.provenance.cache_source, "Analysis served");

    let mut headers = HeaderMap::new();
    headers.insert(
        CACHE_SOURCE_HEADER,
        HeaderValue::from_static(outcome.provenance.cache_source.as_str()),
    );

    Ok((StatusCode::OK, headers, Json(outcome)).into_response())
}

#[instrument(skip(state))]
pub async fn invalidate_handler<D>(
    State(state): State<GatewayState<D>>,
    Path((subject_id, target_id)): Path<(String, String)>,
) -> Response
where
    D: DurableStore + 'static,
{
    state.orchestrator.invalidate(&subject_id, &target_id).await;

    let mut headers = HeaderMap::new();
    headers.insert(STATUS_HEADER, HeaderValue::from_static(STATUS_INVALIDATED));
    (StatusCode::NO_CONTENT, headers).into_response()
}

#[instrument(skip(state))]
pub async fn metrics_handler<D>(State(state): State<GatewayState<D>>) -> Response
where
    D: DurableStore + 'static,
{
    Json(state.orchestrator.metrics()).into_response()
}
