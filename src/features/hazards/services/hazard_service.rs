use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::core::error::{AppError, FailureKind, Result};
use crate::features::hazards::dtos::HazardFormDto;
use crate::features::hazards::models::{
    CreateHazardReport, HazardReport, HazardSubmission, ImageUpload,
};
use crate::features::hazards::services::HazardStore;
use crate::modules::storage::StorageBackend;
use crate::shared::constants::{
    MAX_IMAGE_SIZE, MSG_FORM_UNREADABLE, MSG_IMAGE_REQUIRED, MSG_IMAGE_TOO_LARGE, MSG_LOADING, MSG_LOAD_FAILED,
    MSG_LOAD_RETRY, MSG_SUBMITTED, MSG_SUBMIT_FAILED, MSG_SUBMIT_RETRY, MSG_UPLOADING,
};
use crate::shared::status::{StatusBoard, StatusKind};
use crate::shared::text::key_safe_filename;

/// Which user action a failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Submit,
    Load,
}

/// Message shown to the user for `error`. Causes stay in the logs.
pub fn user_message(error: &AppError, flow: Flow) -> String {
    match error {
        AppError::Validation(msg) => return msg.clone(),
        AppError::BadRequest(_) => return MSG_FORM_UNREADABLE.to_string(),
        _ => {}
    }

    match (flow, error.kind()) {
        (Flow::Submit, FailureKind::Permanent) => MSG_SUBMIT_FAILED,
        (Flow::Submit, _) => MSG_SUBMIT_RETRY,
        (Flow::Load, FailureKind::Permanent) => MSG_LOAD_FAILED,
        (Flow::Load, _) => MSG_LOAD_RETRY,
    }
    .to_string()
}

/// Object key for an uploaded image: `<prefix>/<epoch-millis>_<filename>`
pub fn image_object_key(prefix: &str, epoch_millis: i64, file_name: &str) -> String {
    format!("{}/{}_{}", prefix, epoch_millis, key_safe_filename(file_name))
}

/// Submit and load workflows for hazard reports
pub struct HazardService {
    store: Arc<dyn HazardStore>,
    storage: Arc<dyn StorageBackend>,
    status: StatusBoard,
}

impl HazardService {
    pub fn new(
        store: Arc<dyn HazardStore>,
        storage: Arc<dyn StorageBackend>,
        status: StatusBoard,
    ) -> Self {
        Self {
            store,
            storage,
            status,
        }
    }

    /// Show the uploading notice. Called as soon as a submit arrives,
    /// before its body has been read.
    pub fn begin_submit(&self) {
        self.status.show(MSG_UPLOADING, StatusKind::Loading);
    }

    /// Validate the image, upload it, then record the report.
    ///
    /// The two writes are sequential. If the record cannot be written the
    /// uploaded image is deleted again so no unreferenced object is left.
    pub async fn submit(&self, submission: HazardSubmission) -> Result<HazardReport> {
        let HazardSubmission { form, image } = submission;

        let image = match Self::validate_image(image) {
            Ok(image) => image,
            Err(e) => {
                self.report_failure(&e, Flow::Submit);
                return Err(e);
            }
        };

        match self.store_report(&form, image).await {
            Ok(report) => {
                info!(
                    "Hazard report stored: id={}, type={}, key={}",
                    report.id, report.hazard_type, report.image_key
                );
                self.status.show(MSG_SUBMITTED, StatusKind::Success);
                Ok(report)
            }
            Err(e) => {
                self.report_failure(&e, Flow::Submit);
                Err(e)
            }
        }
    }

    /// All reports, newest first
    pub async fn load_reports(&self) -> Result<Vec<HazardReport>> {
        self.status.show(MSG_LOADING, StatusKind::Loading);

        match self.store.list_recent().await {
            Ok(reports) => {
                debug!("Loaded {} hazard reports", reports.len());
                self.status.clear();
                Ok(reports)
            }
            Err(e) => {
                self.report_failure(&e, Flow::Load);
                Err(e)
            }
        }
    }

    /// Log a failure and put the matching message in the status slot
    pub fn report_failure(&self, error: &AppError, flow: Flow) {
        match error.kind() {
            FailureKind::Validation => debug!("{:?} rejected: {}", flow, error),
            FailureKind::Transient | FailureKind::Permanent => {
                error!("{:?} failed: {}", flow, error)
            }
        }
        self.status.show(user_message(error, flow), StatusKind::Error);
    }

    fn validate_image(image: Option<ImageUpload>) -> Result<ImageUpload> {
        let image = image.ok_or_else(|| AppError::Validation(MSG_IMAGE_REQUIRED.to_string()))?;
        if image.data.len() > MAX_IMAGE_SIZE {
            return Err(AppError::Validation(MSG_IMAGE_TOO_LARGE.to_string()));
        }
        Ok(image)
    }

    async fn store_report(&self, form: &HazardFormDto, image: ImageUpload) -> Result<HazardReport> {
        let (image_key, image_url) = self.upload_image(image).await?;

        let data = CreateHazardReport::from_form(form, image_url, image_key);
        match self.store.insert(&data).await {
            Ok(report) => Ok(report),
            Err(e) => {
                self.discard_image(&data.image_key).await;
                Err(e)
            }
        }
    }

    /// Upload the raw bytes and resolve the public URL
    async fn upload_image(&self, image: ImageUpload) -> Result<(String, String)> {
        let key = image_object_key(
            self.storage.key_prefix(),
            Utc::now().timestamp_millis(),
            &image.file_name,
        );
        let key = self
            .storage
            .upload(&key, image.data, &image.content_type)
            .await?;
        let url = self.storage.public_url(&key);

        debug!("Image uploaded: key={}, url={}", key, url);
        Ok((key, url))
    }

    async fn discard_image(&self, key: &str) {
        match self.storage.delete(key).await {
            Ok(()) => info!("Removed image '{}' after failed report write", key),
            Err(e) => warn!("Orphaned image '{}' could not be removed: {}", key, e),
        }
    }
}
