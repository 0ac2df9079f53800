//! HTTP API for faucet service

use crate::issuer::DripOutcome;
use crate::service::{ClaimService, FaucetStatus};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

/// Body sent to the client when issuance fails
pub const GENERIC_FAILURE: &str = "Error.";

/// Claim request; `address` is kept raw so a rejection can echo it verbatim
#[derive(Debug, Deserialize)]
pub struct ClaimRequest {
    #[serde(default)]
    pub address: Value,
}

/// Success response
#[derive(Debug, Serialize)]
pub struct SuccessResponse<T> {
    pub data: T,
    pub timestamp: String,
}

/// What the claim endpoint tells the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimReply {
    /// 200, echoing the address as submitted
    Claimed(String),
    /// 400, echoing the rejected input (null when there was none)
    Rejected(Value),
    /// 500
    Failed,
}

impl IntoResponse for ClaimReply {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ClaimReply::Claimed(address) => (StatusCode::OK, json!({ "claimed": address })),
            ClaimReply::Rejected(input) => (StatusCode::BAD_REQUEST, json!({ "error": input })),
            ClaimReply::Failed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": GENERIC_FAILURE }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Routes served by the faucet
pub fn router(service: Arc<ClaimService>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/api/status", get(status_handler))
        .route("/api/claim/new", post(claim_handler))
        .with_state(service)
}

/// Claim handler
pub async fn claim_handler(
    State(service): State<Arc<ClaimService>>,
    payload: Result<Json<ClaimRequest>, JsonRejection>,
) -> ClaimReply {
    let input = match payload {
        Ok(Json(ClaimRequest { address: Value::String(address) })) => address,
        Ok(Json(ClaimRequest { address })) => return ClaimReply::Rejected(address),
        Err(rejection) => {
            warn!("Unreadable claim body: {}", rejection);
            return ClaimReply::Rejected(Value::Null);
        }
    };

    info!("Claim request: address={}", input);

    match service.claim(&input).await {
        DripOutcome::Claimed(_) => ClaimReply::Claimed(input),
        DripOutcome::RejectedInput(raw) => ClaimReply::Rejected(Value::String(raw)),
        DripOutcome::SubmissionFailed => ClaimReply::Failed,
    }
}

/// Status handler
pub async fn status_handler(
    State(service): State<Arc<ClaimService>>,
) -> Json<SuccessResponse<FaucetStatus>> {
    Json(SuccessResponse {
        data: service.status(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Health check handler
pub async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Root handler with info
pub async fn root_handler() -> impl IntoResponse {
    Json(json!({
        "name": "Drip Faucet",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "POST /api/claim/new": "Request a drip",
            "GET /api/status": "Get faucet status",
            "GET /health": "Health check"
        }
    }))
}
