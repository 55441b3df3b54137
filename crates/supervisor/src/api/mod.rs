use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use ports::DisplaySink;
use shared::{
    error::{ApiError, ErrorCode},
    protocol::TickReport,
};
use tokio::sync::RwLock;

/// Keeps the most recent tick report for the status surface.
#[derive(Clone, Default)]
pub struct StatusBoard {
    latest: Arc<RwLock<Option<TickReport>>>,
}

impl StatusBoard {
    pub async fn latest(&self) -> Option<TickReport> {
        self.latest.read().await.clone()
    }
}

#[async_trait]
impl DisplaySink for StatusBoard {
    async fn show(&self, report: &TickReport) -> anyhow::Result<()> {
        *self.latest.write().await = Some(report.clone());
        Ok(())
    }
}

pub fn build_router(board: StatusBoard) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/status", get(status))
        .route("/frame", get(frame))
        .with_state(board)
}

async fn healthz() -> &'static str {
    "ok"
}

fn not_ready() -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiError::new(ErrorCode::NotReady, "no tick has completed yet")),
    )
}

async fn status(
    State(board): State<StatusBoard>,
) -> Result<Json<TickReport>, (StatusCode, Json<ApiError>)> {
    board.latest().await.map(Json).ok_or_else(not_ready)
}

/// The current display contents as plain text, one row per line.
async fn frame(State(board): State<StatusBoard>) -> impl IntoResponse {
    match board.latest().await {
        Some(report) => Ok(report.frame.to_string()),
        None => Err(not_ready()),
    }
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
