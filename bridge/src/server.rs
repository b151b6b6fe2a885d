//! Payload server: keeps platform credentials server-side.
//!
//! A thin axum service with two endpoints:
//!
//! | Method | Path               | Description                              |
//! |--------|--------------------|------------------------------------------|
//! | POST   | `/payload/payment` | Sign request for a drops payment         |
//! | POST   | `/payload/offer`   | Sign request accepting a sell offer      |
//!
//! Missing request fields answer 400; platform failures answer 502 with
//! the platform's diagnostic. Callers receive the platform response
//! verbatim, including the sign links.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::client::SignClient;
use crate::error::BridgeError;
use crate::payloads;

/// Shared handler state: just the platform client.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<SignClient>,
}

/// Builds the payload router with CORS and request tracing.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/payload/payment", post(payment_payload_handler))
        .route("/payload/offer", post(offer_payload_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `addr` and serves the router until the process exits.
pub async fn serve(addr: &str, client: SignClient) -> std::io::Result<()> {
    let router = create_router(AppState {
        client: Arc::new(client),
    });
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "payload server listening");
    axum::serve(listener, router).await
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Body for `/payload/payment`. Fields optional so absence can be
/// reported as 400 rather than a deserialization failure.
#[derive(Debug, Deserialize)]
struct PaymentRequest {
    destination: Option<String>,
    drops: Option<String>,
    memo: Option<String>,
}

/// Body for `/payload/offer`.
#[derive(Debug, Deserialize)]
struct OfferRequest {
    offer_index: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn payment_payload_handler(
    State(state): State<AppState>,
    Json(req): Json<PaymentRequest>,
) -> Response {
    let (destination, drops) = match (&req.destination, &req.drops) {
        (Some(d), Some(a)) if !d.is_empty() && !a.is_empty() => (d.clone(), a.clone()),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                "destination and drops are required",
            )
                .into_response()
        }
    };
    let memo = req.memo.as_deref().unwrap_or(payloads::DEFAULT_MEMO);
    let tx = payloads::payment_tx("", &destination, &drops, memo);
    respond(state.client.create_payload(&tx).await)
}

async fn offer_payload_handler(
    State(state): State<AppState>,
    Json(req): Json<OfferRequest>,
) -> Response {
    let offer_index = match &req.offer_index {
        Some(idx) if !idx.is_empty() => idx.clone(),
        _ => return (StatusCode::BAD_REQUEST, "offer_index is required").into_response(),
    };
    let tx = payloads::accept_offer_tx(&offer_index);
    respond(state.client.create_payload(&tx).await)
}

fn respond(result: Result<crate::client::PayloadResponse, BridgeError>) -> Response {
    match result {
        Ok(payload) => Json(payload).into_response(),
        Err(err) => {
            tracing::error!(%err, "payload creation failed");
            (StatusCode::BAD_GATEWAY, err.to_string()).into_response()
        }
    }
}
