/*
 * Responsibility
 * - v1 URL structure
 * - every route in here sits behind the gate (applied in app.rs)
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::data::get_data;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/data", get(get_data))
}
