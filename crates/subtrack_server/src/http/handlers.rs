//! Subscription endpoint handlers.
//!
//! Identifiers are validated before any storage access. Bodies are read as
//! raw bytes so that malformed JSON follows the internal-error path instead
//! of the extractor's own rejection.

use super::error::ApiError;
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use subtrack_core::{parse_subscription_id, Subscription, SubscriptionId};

pub async fn healthz_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn list_subscriptions_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Subscription>>, ApiError> {
    let subscriptions = state
        .with_service("list_subscriptions", |service| service.list())
        .await?;
    Ok(Json(subscriptions))
}

pub async fn create_subscription_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Subscription>), ApiError> {
    const OPERATION: &str = "create_subscription";
    let body = parse_json_body(OPERATION, &body)?;
    let created = state
        .with_service(OPERATION, move |service| service.create_from_json(&body))
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_subscription_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Json<Subscription>, ApiError> {
    const OPERATION: &str = "update_subscription";
    let id = parse_path_id(OPERATION, &raw_id)?;
    let body = parse_json_body(OPERATION, &body)?;
    let updated = state
        .with_service(OPERATION, move |service| service.update_from_json(id, &body))
        .await?;
    Ok(Json(updated))
}

pub async fn delete_subscription_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Subscription>, ApiError> {
    const OPERATION: &str = "delete_subscription";
    let id = parse_path_id(OPERATION, &raw_id)?;
    let deleted = state
        .with_service(OPERATION, move |service| service.delete(id))
        .await?;
    Ok(Json(deleted))
}

fn parse_path_id(operation: &'static str, raw_id: &str) -> Result<SubscriptionId, ApiError> {
    parse_subscription_id(raw_id).map_err(|err| ApiError::from_service(operation, err))
}

fn parse_json_body(operation: &'static str, body: &[u8]) -> Result<Value, ApiError> {
    serde_json::from_slice(body).map_err(|err| ApiError::internal(operation, err))
}
