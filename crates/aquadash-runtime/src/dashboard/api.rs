use axum::{extract::State, response::Json};
use serde::Serialize;

use super::DashboardState;
use crate::display::DisplaySnapshot;

/// Health response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Banner state and render bookkeeping.
pub async fn status(State(state): State<DashboardState>) -> Json<DisplaySnapshot> {
    Json(state.surface.snapshot())
}

/// Liveness check. Independent of upstream reachability.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
