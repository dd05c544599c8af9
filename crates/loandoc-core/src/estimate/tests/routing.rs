use super::common::*;
use crate::estimate::router::estimate_router;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

fn post_json(body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/server/loan-estimate")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .expect("request")
}

#[tokio::test]
async fn estimate_returns_ranked_banks() {
    let router = estimate_router(builtin_service());
    let body = serde_json::to_string(&request()).expect("serializes");

    let response = router.oneshot(post_json(body)).await.expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = json_body(response).await;
    let banks = payload["banks"].as_array().expect("banks array");
    assert_eq!(banks.len(), 5);
    assert_eq!(banks[0]["bankName"], "KB저축은행");
    assert_eq!(banks[0]["rank"], 1);
    assert_eq!(banks[0]["visaType"], json!({ "valid": true, "error": "" }));
    assert_eq!(banks[0]["healthInsurance"]["valid"], true);
}

#[tokio::test]
async fn missing_fields_return_bad_request() {
    let router = estimate_router(builtin_service());
    let body = json!({
        "loginId": "worker01",
        "nationality": "Nepal",
        "remainMonths": 20,
        "annualIncome": 2500,
        "workingMonths": 10,
        "visaType": "E-9"
    })
    .to_string();

    let response = router.oneshot(post_json(body)).await.expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = json_body(response).await;
    assert_eq!(payload["ok"], false);
    assert_eq!(payload["error"], "모든 필드가 필요합니다");
    assert_eq!(payload["missing"], json!(["age"]));
    assert!(payload.get("banks").is_none());
}

#[tokio::test]
async fn unparseable_body_returns_bad_request() {
    let router = estimate_router(builtin_service());

    let response = router
        .oneshot(post_json("{\"loginId\": ".to_string()))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = json_body(response).await;
    assert_eq!(payload["ok"], false);
    assert_eq!(payload["error"], "잘못된 JSON 본문입니다.");
}

#[tokio::test]
async fn unavailable_catalog_returns_empty_banks() {
    let router = estimate_router(unavailable_service());
    let body = serde_json::to_string(&request()).expect("serializes");

    let response = router.oneshot(post_json(body)).await.expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "banks": [] }));
}

#[tokio::test]
async fn lender_listing_honors_test_mode() {
    let router = estimate_router(builtin_service());

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/v1/lenders?mode=test")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = json_body(response).await;
    let lenders = payload.as_array().expect("lender array");
    assert_eq!(lenders.len(), 1);
    assert_eq!(lenders[0]["bankName"], "테스트은행1");
    assert_eq!(lenders[0]["rank"], 1);
}

async fn get_listing(
    router: axum::Router,
    uri: &str,
) -> (StatusCode, Option<String>, serde_json::Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let source = response
        .headers()
        .get("x-data-source")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    (status, source, json_body(response).await)
}

#[tokio::test]
async fn bank_info_path_serves_the_same_listing() {
    let (status, source, legacy) =
        get_listing(estimate_router(builtin_service()), "/api/bank-info").await;
    let (_, _, current) = get_listing(estimate_router(builtin_service()), "/api/v1/lenders").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(source.as_deref(), Some("catalog"));
    assert_eq!(legacy, current);
}

#[tokio::test]
async fn unavailable_catalog_listing_is_marked_fallback() {
    let (status, source, body) =
        get_listing(estimate_router(unavailable_service()), "/api/bank-info?mode=test").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(source.as_deref(), Some("fallback"));
    assert_eq!(body, json!([]));
}
