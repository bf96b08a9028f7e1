use axum::{routing::get, Router};

use crate::features::status::handlers::get_status;
use crate::shared::status::StatusBoard;

/// Create routes for the status notification slot
pub fn routes(board: StatusBoard) -> Router {
    Router::new()
        .route("/api/status", get(get_status))
        .with_state(board)
}
