/*
 * Responsibility
 * - Shared context attached to the Router (AppState)
 * - Clone is cheap: the gate lives behind an Arc
 */
use std::sync::Arc;

use crate::services::gate::RequestGate;

#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<RequestGate>,
}

impl AppState {
    pub fn new(gate: Arc<RequestGate>) -> Self {
        Self { gate }
    }
}
