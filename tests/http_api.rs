use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::{json, Value};
use tower::ServiceExt;

use kyc_qa::extraction::{
    EncodedImage, ExtractionError, IdCardExtraction, IdCardExtractor, KycExtraction, KycExtractor,
};
use kyc_qa::review::domain::SessionContext;
use kyc_qa::review::service::ReviewService;
use kyc_qa::server::{router, AppState};

/// Always answers with one fixed KYC payload and a transport error for ID
/// cards.
struct FixedExtractor;

impl KycExtractor for FixedExtractor {
    fn extract_kyc(&self, _image: &EncodedImage) -> Result<KycExtraction, ExtractionError> {
        Ok(KycExtraction {
            member_id: Some("882211".to_string()),
            remark_normalized: Some("DIGITAL ID".to_string()),
            ..KycExtraction::default()
        })
    }
}

impl IdCardExtractor for FixedExtractor {
    fn extract_id_card(&self, _image: &EncodedImage) -> Result<IdCardExtraction, ExtractionError> {
        Err(ExtractionError::Transport("model unreachable".to_string()))
    }
}

fn state(ready: bool) -> AppState<FixedExtractor> {
    let review = Arc::new(ReviewService::new(
        Arc::new(FixedExtractor),
        SessionContext::new("RCJOSEPH"),
    ));
    AppState {
        readiness: Arc::new(AtomicBool::new(ready)),
        metrics: PrometheusBuilder::new().build_recorder().handle(),
        review,
    }
}

async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("body collects");
    serde_json::from_slice(&body).expect("body is json")
}

fn json_request(uri: &str, payload: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request builds")
}

#[tokio::test]
async fn healthcheck_reports_ok() {
    let response = router(state(true))
        .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["status"], "ok");
}

#[tokio::test]
async fn readiness_reflects_the_flag() {
    let response = router(state(false))
        .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn extract_endpoint_returns_a_reconciled_snapshot() {
    let response = router(state(true))
        .oneshot(json_request(
            "/api/v1/review/extract",
            json!({ "image_base64": "aW1hZ2U=", "mime_type": "image/png" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let payload = read_json_body(response).await;
    assert_eq!(payload["phase"], "ready");
    assert_eq!(payload["record"]["member_id"], "882211");
    let row = payload["record"]["failed_kyc_row"]
        .as_str()
        .expect("row is a string");
    assert!(row.contains("\t882211\tDIGITAL ID\tFailed"), "row: {row:?}");
}

#[tokio::test]
async fn edit_endpoint_rederives_rows() {
    let app = router(state(true));

    let response = app
        .oneshot(json_request(
            "/api/v1/review/edit",
            json!({ "field": "member_id", "value": "777" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let payload = read_json_body(response).await;
    let row = payload["record"]["account_status_row"]
        .as_str()
        .expect("row is a string");
    assert!(row.contains("\t777\t"), "row: {row:?}");
}

#[tokio::test]
async fn ticket_render_matches_the_channel_layout() {
    let response = router(state(true))
        .oneshot(json_request(
            "/api/v1/ticket/render",
            json!({
                "member_id": "882211",
                "name": "JUAN DELA CRUZ",
                "reason": "NDRP",
                "tags": ["@RC_JayJay"]
            }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let payload = read_json_body(response).await;
    assert_eq!(
        payload["text"],
        "Juan365\n\nMember ID : 882211\nName : JUAN DELA CRUZ\n\nReason : NDRP\n\n@RC_JayJay"
    );
}

#[tokio::test]
async fn id_card_failure_maps_to_bad_gateway() {
    let response = router(state(true))
        .oneshot(json_request(
            "/api/v1/idcard/extract",
            json!({ "image_base64": "aW1hZ2U=", "mime_type": "image/jpeg" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .expect("error string")
        .contains("model unreachable"));
}

#[tokio::test]
async fn id_card_record_is_missing_until_a_scan_succeeds() {
    let response = router(state(true))
        .oneshot(
            Request::get("/api/v1/idcard/record")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
