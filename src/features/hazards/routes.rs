use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::hazards::handlers::{list_hazard_cards, list_hazards, submit_hazard};
use crate::features::hazards::services::HazardService;

/// Create routes for the hazards feature
pub fn routes(hazard_service: Arc<HazardService>) -> Router {
    Router::new()
        .route(
            "/api/hazards",
            // The submit handler bounds the image itself and drains the rest,
            // so the request-wide limit does not apply here
            post(submit_hazard)
                .layer(DefaultBodyLimit::disable())
                .get(list_hazards),
        )
        .route("/api/hazards/cards", get(list_hazard_cards))
        .with_state(hazard_service)
}
