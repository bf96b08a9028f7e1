use axum::{extract::State, Json};

use crate::shared::status::{StatusBoard, StatusNotice};
use crate::shared::types::ApiResponse;

/// Current status notice
///
/// `data` is null when nothing is showing. Notices clear themselves a few
/// seconds after they appear.
#[utoipa::path(
    get,
    path = "/api/status",
    tag = "status",
    responses(
        (status = 200, description = "Visible notice, if any", body = ApiResponse<StatusNotice>)
    )
)]
pub async fn get_status(State(board): State<StatusBoard>) -> Json<ApiResponse<StatusNotice>> {
    Json(ApiResponse::success(board.current(), None, None))
}
