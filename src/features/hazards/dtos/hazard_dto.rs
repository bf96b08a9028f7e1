use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::hazards::models::HazardReport;

/// Submit request DTO for OpenAPI documentation.
/// The handler reads the multipart stream directly.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct SubmitHazardDto {
    #[schema(example = "pothole")]
    pub hazard_type: String,
    #[schema(example = "Main St & 5th")]
    pub location: String,
    #[schema(example = "high")]
    pub severity: String,
    /// Optional; leave empty for none
    pub description: Option<String>,
    /// Photo of the hazard, at most 5 MiB
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub image: String,
}

/// Text fields of the report form, named as the page names its inputs.
///
/// Returned with every submit response: empty after a successful submit so
/// the page can reset, the submitted values after a failure so it can keep them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HazardFormDto {
    pub hazard_type: String,
    pub location: String,
    pub severity: String,
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HazardReportDto {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub hazard_type: String,
    pub location: String,
    pub severity: String,
    pub description: Option<String>,
    pub image_url: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitHazardResponseDto {
    /// The stored report; absent when the submit failed
    pub report: Option<HazardReportDto>,
    pub form: HazardFormDto,
    /// Whether sending the same form again may succeed
    pub retryable: bool,
}

impl From<HazardReport> for HazardReportDto {
    fn from(r: HazardReport) -> Self {
        Self {
            id: r.id,
            hazard_type: r.hazard_type,
            location: r.location,
            severity: r.severity,
            description: r.description,
            image_url: r.image_url,
            status: r.status,
            created_at: r.created_at,
        }
    }
}
