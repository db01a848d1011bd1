//! HTTP surface over the review service. Handlers stay thin: they decode
//! the request, hop to a blocking worker when a collaborator call is
//! involved, and serialize the resulting snapshot.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use serde_json::json;

use crate::extraction::{EncodedImage, IdCardExtractor, KycExtractor};
use crate::review::domain::KycField;
use crate::review::service::ReviewService;
use crate::review::ticket::TicketDraft;

pub struct AppState<E> {
    pub readiness: Arc<AtomicBool>,
    pub metrics: PrometheusHandle,
    pub review: Arc<ReviewService<E>>,
}

impl<E> Clone for AppState<E> {
    fn clone(&self) -> Self {
        Self {
            readiness: self.readiness.clone(),
            metrics: self.metrics.clone(),
            review: self.review.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub image_base64: String,
    pub mime_type: String,
}

#[derive(Debug, Deserialize)]
pub struct EditRequest {
    pub field: KycField,
    pub value: String,
}

pub fn router<E>(state: AppState<E>) -> Router
where
    E: KycExtractor + IdCardExtractor + 'static,
{
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint::<E>))
        .route("/metrics", get(metrics_endpoint::<E>))
        .route("/api/v1/review/extract", post(review_extract::<E>))
        .route("/api/v1/review/record", get(review_record::<E>))
        .route("/api/v1/review/edit", post(review_edit::<E>))
        .route("/api/v1/review/reset", post(review_reset::<E>))
        .route("/api/v1/review/ticket", get(ticket_seed::<E>))
        .route("/api/v1/ticket/render", post(ticket_render))
        .route("/api/v1/idcard/extract", post(id_card_extract::<E>))
        .route("/api/v1/idcard/record", get(id_card_record::<E>))
        .route("/api/v1/idcard/reverify", post(id_card_reverify::<E>))
        .with_state(state)
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint<E>(State(state): State<AppState<E>>) -> Response
where
    E: KycExtractor + IdCardExtractor + 'static,
{
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(json!({ "ready": ready }))).into_response()
}

async fn metrics_endpoint<E>(State(state): State<AppState<E>>) -> Response
where
    E: KycExtractor + IdCardExtractor + 'static,
{
    let body = state.metrics.render();
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
        .into_response()
}

async fn review_extract<E>(
    State(state): State<AppState<E>>,
    Json(request): Json<ExtractRequest>,
) -> Response
where
    E: KycExtractor + IdCardExtractor + 'static,
{
    let review = state.review.clone();
    let image = EncodedImage::from_base64(request.image_base64, request.mime_type);

    // The extraction client is blocking; keep it off the async workers.
    let result = tokio::task::spawn_blocking(move || review.process_kyc_image(&image)).await;
    match result {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(join_error) => {
            let payload = json!({ "error": format!("extraction task failed: {join_error}") });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

async fn review_record<E>(State(state): State<AppState<E>>) -> Response
where
    E: KycExtractor + IdCardExtractor + 'static,
{
    (StatusCode::OK, Json(state.review.snapshot())).into_response()
}

async fn review_edit<E>(
    State(state): State<AppState<E>>,
    Json(request): Json<EditRequest>,
) -> Response
where
    E: KycExtractor + IdCardExtractor + 'static,
{
    let snapshot = state.review.edit_field(request.field, &request.value);
    (StatusCode::OK, Json(snapshot)).into_response()
}

async fn review_reset<E>(State(state): State<AppState<E>>) -> Response
where
    E: KycExtractor + IdCardExtractor + 'static,
{
    (StatusCode::OK, Json(state.review.reset())).into_response()
}

async fn ticket_seed<E>(State(state): State<AppState<E>>) -> Response
where
    E: KycExtractor + IdCardExtractor + 'static,
{
    (StatusCode::OK, Json(state.review.ticket_seed())).into_response()
}

async fn ticket_render(Json(draft): Json<TicketDraft>) -> Response {
    let payload = json!({ "text": draft.render() });
    (StatusCode::OK, Json(payload)).into_response()
}

async fn id_card_extract<E>(
    State(state): State<AppState<E>>,
    Json(request): Json<ExtractRequest>,
) -> Response
where
    E: KycExtractor + IdCardExtractor + 'static,
{
    let review = state.review.clone();
    let image = EncodedImage::from_base64(request.image_base64, request.mime_type);

    let result = tokio::task::spawn_blocking(move || review.process_id_card(&image)).await;
    match result {
        Ok(Ok(record)) => (StatusCode::OK, Json(record)).into_response(),
        Ok(Err(extraction_error)) => {
            let payload = json!({ "error": extraction_error.to_string() });
            (StatusCode::BAD_GATEWAY, Json(payload)).into_response()
        }
        Err(join_error) => {
            let payload = json!({ "error": format!("extraction task failed: {join_error}") });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

async fn id_card_record<E>(State(state): State<AppState<E>>) -> Response
where
    E: KycExtractor + IdCardExtractor + 'static,
{
    match state.review.id_card() {
        Some(record) => (StatusCode::OK, Json(record)).into_response(),
        None => {
            let payload = json!({ "error": "no id card has been processed" });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
    }
}

async fn id_card_reverify<E>(State(state): State<AppState<E>>) -> Response
where
    E: KycExtractor + IdCardExtractor + 'static,
{
    match state.review.reverify_id_card() {
        Some(record) => (StatusCode::OK, Json(record)).into_response(),
        None => {
            let payload = json!({ "error": "no id card has been processed" });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
    }
}
