use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::hazards::dtos::HazardFormDto;

/// Database model for a hazard report (`hazards` table)
#[derive(Debug, Clone, FromRow)]
pub struct HazardReport {
    pub id: Uuid,
    pub hazard_type: String,
    pub location: String,
    pub severity: String,
    pub description: Option<String>,
    /// Public URL of the uploaded image; never empty
    pub image_url: String,
    /// Object key the URL points at
    pub image_key: String,
    pub status: String,
    /// Assigned by the database
    pub created_at: DateTime<Utc>,
}

/// Data for inserting a new report. Status and timestamp are filled in by the store.
#[derive(Debug, Clone)]
pub struct CreateHazardReport {
    pub id: Uuid,
    pub hazard_type: String,
    pub location: String,
    pub severity: String,
    pub description: Option<String>,
    pub image_url: String,
    pub image_key: String,
}

/// Image part of a submission, as received
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    /// Reading stops one byte past the size limit, so an oversized image is
    /// recognisable without being held in full
    pub data: Vec<u8>,
}

/// One form submission
#[derive(Debug, Clone)]
pub struct HazardSubmission {
    pub form: HazardFormDto,
    pub image: Option<ImageUpload>,
}

impl CreateHazardReport {
    pub fn from_form(form: &HazardFormDto, image_url: String, image_key: String) -> Self {
        Self {
            id: Uuid::now_v7(),
            hazard_type: form.hazard_type.clone(),
            location: form.location.clone(),
            severity: form.severity.clone(),
            description: Some(form.description.clone()).filter(|d| !d.is_empty()),
            image_url,
            image_key,
        }
    }
}
