/*
 * Responsibility
 * - GET /data (protected sample resource)
 * - exists so the gate guards something end-to-end; replace with real handlers
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn get_data() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"data": "protected"})))
}
