use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, warn};

use super::domain::RuleSet;
use super::request::{EstimateRequest, RequestError};
use super::service::{EstimateServiceError, LoanEstimateService};
use super::store::LenderConfigStore;

const DATA_SOURCE_HEADER: &str = "x-data-source";

/// Router builder exposing the loan estimate and lender listing endpoints.
pub fn estimate_router<S>(service: Arc<LoanEstimateService<S>>) -> Router
where
    S: LenderConfigStore + 'static,
{
    Router::new()
        .route("/api/server/loan-estimate", post(estimate_handler::<S>))
        .route("/api/v1/lenders", get(lenders_handler::<S>))
        .route("/api/bank-info", get(lenders_handler::<S>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LendersQuery {
    #[serde(default)]
    pub(crate) mode: Option<String>,
}

pub(crate) async fn estimate_handler<S>(
    State(service): State<Arc<LoanEstimateService<S>>>,
    payload: Result<Json<EstimateRequest>, JsonRejection>,
) -> Response
where
    S: LenderConfigStore + 'static,
{
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "rejected loan estimate body");
            return request_error(&RequestError::MalformedBody(rejection.body_text()));
        }
    };

    match tokio::task::spawn_blocking(move || service.estimate(request)).await {
        Ok(Ok(response)) => (StatusCode::OK, Json(response)).into_response(),
        Ok(Err(EstimateServiceError::Request(err))) => request_error(&err),
        Err(join_error) => {
            error!(error = %join_error, "loan estimate task failed");
            server_error()
        }
    }
}

pub(crate) async fn lenders_handler<S>(
    State(service): State<Arc<LoanEstimateService<S>>>,
    Query(query): Query<LendersQuery>,
) -> Response
where
    S: LenderConfigStore + 'static,
{
    let rule_set = RuleSet::from_mode(query.mode.as_deref());
    match tokio::task::spawn_blocking(move || service.lender_listing(rule_set)).await {
        Ok(listing) => (
            StatusCode::OK,
            [(DATA_SOURCE_HEADER, listing.source.header_value())],
            Json(listing.lenders),
        )
            .into_response(),
        Err(join_error) => {
            error!(error = %join_error, "lender listing task failed");
            server_error()
        }
    }
}

fn request_error(err: &RequestError) -> Response {
    let mut payload = json!({
        "ok": false,
        "error": err.to_string(),
    });
    if let RequestError::MissingFields(fields) = err {
        payload["missing"] = json!(fields);
    }
    (StatusCode::BAD_REQUEST, Json(payload)).into_response()
}

fn server_error() -> Response {
    let payload = json!({
        "ok": false,
        "error": "server error",
    });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
}
