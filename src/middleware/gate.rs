//! Bearer-token gate applied in front of the whole router.
//!
//! Responsibility:
//! - Pull the raw path and Authorization header out of each request.
//! - Ask [`RequestGate::evaluate`] for the decision.
//! - `Proceed`: hand the request to the next service unchanged (no identity
//!   context is injected into extensions).
//! - `Reject`: short-circuit with a bare 401.
//!
//! Bypass routing is NOT handled here. The gate itself decides which paths
//! skip authentication, so this layer wraps every route, health included.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::services::gate::Decision;
use crate::state::AppState;

/// Apply the gate middleware to the given Router.
///
/// Example:
/// ```ignore
/// let router = Router::new().nest("/api/v1", api::v1::routes());
/// let router = middleware::gate::apply(router, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8's from_fn cannot take a State extractor, so state is passed
    // explicitly via from_fn_with_state.
    router.layer(middleware::from_fn_with_state(state, gate_middleware))
}

async fn gate_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match state.gate.evaluate(req.uri().path(), authorization) {
        Decision::Proceed => Ok(next.run(req).await),
        Decision::Reject => {
            // Log the fact, not the reason. The response deliberately does not
            // say why a request was rejected, and neither should the log line.
            tracing::warn!(path = %req.uri().path(), "request rejected by gate");
            Err(AppError::Unauthorized)
        }
    }
}
