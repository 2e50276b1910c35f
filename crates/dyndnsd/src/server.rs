//! HTTP surface: router, update handler, response formatting
//!
//! The handler is deliberately thin: gate on credentials, decode the
//! query, hand off to the reconciler, render its outcome. Response bodies
//! follow the reconciler's taxonomy: plain "Record unchanged" when no
//! write happened, the provider's payload on a write, 404 for an unknown
//! zone, 500 with the upstream message otherwise.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use dyndns_core::{Error, Outcome, RecordStore, reconcile};
use tracing::warn;

use crate::auth::{Credentials, validate_basic_auth};
use crate::query::UpdateParams;

/// Immutable per-process state shared by all requests
#[derive(Clone)]
pub struct AppState {
    pub credentials: Credentials,
    pub store: Arc<dyn RecordStore>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/update", get(handle_update))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "dyndnsd",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn handle_update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<UpdateParams>,
) -> Response {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    if !validate_basic_auth(authorization, &state.credentials) {
        return unauthorized();
    }

    let request = match params.decode() {
        Ok(request) => request,
        Err(e) => {
            warn!("rejected update request: {e}");
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    match reconcile(
        state.store.as_ref(),
        &request.hostname,
        &request.ip,
        &request.overrides,
    )
    .await
    {
        Ok(Outcome::Unchanged) => (StatusCode::OK, "Record unchanged").into_response(),
        Ok(Outcome::Created(payload)) | Ok(Outcome::Updated(payload)) => json_response(&payload),
        Err(e @ Error::ZoneNotFound(_)) => (StatusCode::NOT_FOUND, e.to_string()).into_response(),
        Err(e) => {
            warn!(hostname = %request.hostname, "reconciliation failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {e}")).into_response()
        }
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, r#"Basic realm="dyndns""#)],
        "Unauthorized",
    )
        .into_response()
}

fn json_response(payload: &serde_json::Value) -> Response {
    match serde_json::to_string_pretty(payload) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {e}")).into_response(),
    }
}
