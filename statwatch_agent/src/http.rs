//! HTTP routes. One endpoint: the current stats line as plain text.

use axum::{extract::State, routing::get, Router};

use crate::metrics::collect_stats;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/_stats", get(stats_handler))
        .with_state(state)
}

async fn stats_handler(State(state): State<AppState>) -> String {
    collect_stats(&state).await.to_line()
}
