use utoipa::{Modify, OpenApi};

use crate::features::hazards::{dtos as hazards_dtos, handlers as hazards_handlers};
use crate::features::status::handlers as status_handlers;
use crate::shared::status::{StatusKind, StatusNotice};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Hazards
        hazards_handlers::submit_hazard,
        hazards_handlers::list_hazards,
        hazards_handlers::list_hazard_cards,
        // Status
        status_handlers::get_status,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Hazards
            hazards_dtos::SubmitHazardDto,
            hazards_dtos::HazardFormDto,
            hazards_dtos::HazardReportDto,
            hazards_dtos::SubmitHazardResponseDto,
            ApiResponse<hazards_dtos::SubmitHazardResponseDto>,
            ApiResponse<Vec<hazards_dtos::HazardReportDto>>,
            // Status
            StatusKind,
            StatusNotice,
            ApiResponse<StatusNotice>,
        )
    ),
    tags(
        (name = "hazards", description = "Hazard report submission and listing"),
        (name = "status", description = "Transient status notification"),
    ),
    info(
        title = "Hazard Report API",
        version = "0.1.0",
        description = "API documentation for the hazard report service",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
