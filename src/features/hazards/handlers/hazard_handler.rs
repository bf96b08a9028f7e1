use axum::{
    extract::{multipart::Field, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::core::error::{AppError, FailureKind};
use crate::features::hazards::dtos::{
    HazardFormDto, HazardReportDto, SubmitHazardDto, SubmitHazardResponseDto,
};
use crate::features::hazards::models::{HazardSubmission, ImageUpload};
use crate::features::hazards::services::{render_report_list, user_message, Flow, HazardService};
use crate::shared::constants::{MAX_IMAGE_SIZE, MSG_IMAGE_TOO_LARGE, MSG_SUBMITTED};
use crate::shared::types::{ApiResponse, Meta};

/// A failed submit: the error plus whatever form values were received
pub struct SubmitRejection {
    error: AppError,
    form: HazardFormDto,
}

impl IntoResponse for SubmitRejection {
    fn into_response(self) -> Response {
        let message = user_message(&self.error, Flow::Submit);
        let errors = match self.error.kind() {
            FailureKind::Validation => Some(vec![message.clone()]),
            FailureKind::Transient | FailureKind::Permanent => None,
        };

        let body = ApiResponse::failure(
            SubmitHazardResponseDto {
                report: None,
                form: self.form,
                retryable: self.error.is_retryable(),
            },
            message,
            errors,
        );

        (self.error.status_code(), Json(body)).into_response()
    }
}

/// A failed load, answered with the load message instead of the raw cause
pub struct LoadRejection(AppError);

impl IntoResponse for LoadRejection {
    fn into_response(self) -> Response {
        let message = user_message(&self.0, Flow::Load);
        let body = ApiResponse::<()>::error(Some(message), None);
        (self.0.status_code(), Json(body)).into_response()
    }
}

/// Submit a hazard report
///
/// Accepts multipart/form-data with `hazardType`, `location`, `severity`,
/// `description` and the `image` file. The image is stored first and the
/// report record second. The body has no size limit of its own: image bytes
/// past 5 MiB are discarded and the submit is answered with the size message.
#[utoipa::path(
    post,
    path = "/api/hazards",
    tag = "hazards",
    request_body(
        content = SubmitHazardDto,
        content_type = "multipart/form-data",
        description = "Report form with the hazard photo",
    ),
    responses(
        (status = 201, description = "Report stored; form is returned empty", body = ApiResponse<SubmitHazardResponseDto>),
        (status = 400, description = "Missing or oversized image; form is echoed back", body = ApiResponse<SubmitHazardResponseDto>),
        (status = 502, description = "Object store refused the image", body = ApiResponse<SubmitHazardResponseDto>),
        (status = 503, description = "A backend is unreachable; retryable", body = ApiResponse<SubmitHazardResponseDto>)
    )
)]
pub async fn submit_hazard(
    State(service): State<Arc<HazardService>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<SubmitHazardResponseDto>>), SubmitRejection> {
    service.begin_submit();
    let mut form = HazardFormDto::default();

    let image = match read_submission(multipart, &mut form).await {
        Ok(image) => image,
        Err(error) => {
            service.report_failure(&error, Flow::Submit);
            return Err(SubmitRejection { error, form });
        }
    };

    let submission = HazardSubmission {
        form: form.clone(),
        image,
    };

    match service.submit(submission).await {
        Ok(report) => Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success(
                Some(SubmitHazardResponseDto {
                    report: Some(report.into()),
                    form: HazardFormDto::default(),
                    retryable: false,
                }),
                Some(MSG_SUBMITTED.to_string()),
                None,
            )),
        )),
        Err(error) => Err(SubmitRejection { error, form }),
    }
}

/// Fill `form` from the text fields and return the image part, if one was sent
async fn read_submission(
    mut multipart: Multipart,
    form: &mut HazardFormDto,
) -> Result<Option<ImageUpload>, AppError> {
    let mut image = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "image" => image = read_image(field).await?,
            "hazardType" => form.hazard_type = read_text(field).await?,
            "location" => form.location = read_text(field).await?,
            "severity" => form.severity = read_text(field).await?,
            "description" => form.description = read_text(field).await?,
            _ => debug!("Ignoring unknown field: {}", field_name),
        }
    }

    Ok(image)
}

async fn read_text(field: Field<'_>) -> Result<String, AppError> {
    let name = field.name().unwrap_or("").to_string();
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read {} field: {}", name, e)))
}

/// Read the image in chunks. Bytes past one over the size limit are
/// drained and dropped so the fields after the image can still be read.
/// An empty part (no file chosen) counts as no image.
async fn read_image(mut field: Field<'_>) -> Result<Option<ImageUpload>, AppError> {
    let file_name = field.file_name().unwrap_or("").to_string();
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();

    let mut data = Vec::new();
    let mut received = 0usize;
    while let Some(chunk) = field.chunk().await.map_err(|e| {
        debug!("Failed to read image bytes: {}", e);
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::Validation(MSG_IMAGE_TOO_LARGE.to_string())
        } else {
            AppError::BadRequest(format!("Failed to read image data: {}", e))
        }
    })? {
        received += chunk.len();
        let room = (MAX_IMAGE_SIZE + 1).saturating_sub(data.len());
        data.extend_from_slice(&chunk[..chunk.len().min(room)]);
    }

    if received > data.len() {
        debug!(
            "Image '{}' is {} bytes; kept the first {}",
            file_name,
            received,
            data.len()
        );
    }

    if data.is_empty() {
        return Ok(None);
    }

    Ok(Some(ImageUpload {
        file_name,
        content_type,
        data,
    }))
}

/// List all hazard reports, newest first
#[utoipa::path(
    get,
    path = "/api/hazards",
    tag = "hazards",
    responses(
        (status = 200, description = "All reports, newest first", body = ApiResponse<Vec<HazardReportDto>>),
        (status = 500, description = "Reports are unavailable"),
        (status = 503, description = "Database unreachable; retryable")
    )
)]
pub async fn list_hazards(
    State(service): State<Arc<HazardService>>,
) -> Result<Json<ApiResponse<Vec<HazardReportDto>>>, LoadRejection> {
    let reports = service.load_reports().await.map_err(LoadRejection)?;
    let total = reports.len() as i64;
    let items: Vec<HazardReportDto> = reports.into_iter().map(Into::into).collect();

    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

/// Report cards as an HTML fragment
///
/// Returns the empty-state message when there are no reports.
#[utoipa::path(
    get,
    path = "/api/hazards/cards",
    tag = "hazards",
    responses(
        (status = 200, description = "Rendered report cards", body = String, content_type = "text/html"),
        (status = 500, description = "Reports are unavailable"),
        (status = 503, description = "Database unreachable; retryable")
    )
)]
pub async fn list_hazard_cards(
    State(service): State<Arc<HazardService>>,
) -> Result<Html<String>, LoadRejection> {
    let reports = service.load_reports().await.map_err(LoadRejection)?;

    match render_report_list(&reports) {
        Ok(html) => Ok(Html(html)),
        Err(e) => {
            let error = AppError::from(e);
            service.report_failure(&error, Flow::Load);
            Err(LoadRejection(error))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::hazards::routes::routes;
    use crate::shared::constants::{
        EMPTY_STATE_MESSAGE, MSG_FORM_UNREADABLE, MSG_IMAGE_REQUIRED, MSG_LOAD_RETRY,
        MSG_SUBMIT_RETRY,
    };
    use crate::shared::status::StatusKind;
    use crate::shared::test_helpers::{hazard_service, TestBackends};
    use axum::body::Bytes;
    use axum::extract::DefaultBodyLimit;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;

    fn server(backends: &TestBackends) -> TestServer {
        TestServer::new(routes(backends.service.clone())).unwrap()
    }

    fn report_form(image_size: usize) -> MultipartForm {
        MultipartForm::new()
            .add_text("hazardType", "pothole")
            .add_text("location", "Main St & 5th")
            .add_text("severity", "high")
            .add_text("description", "")
            .add_part(
                "image",
                Part::bytes(vec![7u8; image_size])
                    .file_name("pothole.jpg")
                    .mime_type("image/jpeg"),
            )
    }

    #[tokio::test]
    async fn test_submit_returns_created_and_clears_form() {
        let backends = hazard_service();
        let server = server(&backends);

        let response = server
            .post("/api/hazards")
            .multipart(report_form(2 * 1024 * 1024))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<SubmitHazardResponseDto> = response.json();
        assert!(body.success);
        assert_eq!(body.message.as_deref(), Some(MSG_SUBMITTED));

        let data = body.data.unwrap();
        assert_eq!(data.form, HazardFormDto::default());
        assert!(!data.retryable);

        let report = data.report.unwrap();
        assert_eq!(report.hazard_type, "pothole");
        assert_eq!(report.status, "reported");
        assert_eq!(report.description, None);
        assert_eq!(
            backends.storage.object_for_url(&report.image_url),
            Some(vec![7u8; 2 * 1024 * 1024])
        );
    }

    #[tokio::test]
    async fn test_oversized_image_echoes_form() {
        let backends = hazard_service();
        let server = server(&backends);

        let response = server
            .post("/api/hazards")
            .multipart(report_form(MAX_IMAGE_SIZE + 1))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ApiResponse<SubmitHazardResponseDto> = response.json();
        assert!(!body.success);
        assert_eq!(body.message.as_deref(), Some(MSG_IMAGE_TOO_LARGE));

        let data = body.data.unwrap();
        assert!(data.report.is_none());
        assert!(!data.retryable);
        assert_eq!(data.form.location, "Main St & 5th");
        assert_eq!(data.form.severity, "high");

        assert_eq!(backends.storage.upload_count(), 0);
        assert_eq!(backends.store.insert_count(), 0);
    }

    // Larger than the request-wide limit the app applies elsewhere
    #[tokio::test]
    async fn test_image_past_request_limit_still_gets_size_message() {
        let backends = hazard_service();
        let app = routes(backends.service.clone()).layer(DefaultBodyLimit::max(10 * 1024 * 1024));
        let server = TestServer::new(app).unwrap();

        // Text after the image must survive the discarded image bytes
        let form = MultipartForm::new()
            .add_text("hazardType", "pothole")
            .add_part(
                "image",
                Part::bytes(vec![1u8; 12 * 1024 * 1024])
                    .file_name("phone.jpg")
                    .mime_type("image/jpeg"),
            )
            .add_text("location", "Main St & 5th")
            .add_text("severity", "high");

        let response = server.post("/api/hazards").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ApiResponse<SubmitHazardResponseDto> = response.json();
        assert_eq!(body.message.as_deref(), Some(MSG_IMAGE_TOO_LARGE));

        let data = body.data.unwrap();
        assert_eq!(data.form.hazard_type, "pothole");
        assert_eq!(data.form.location, "Main St & 5th");
        assert_eq!(data.form.severity, "high");

        assert_eq!(backends.storage.upload_count(), 0);
        let notice = backends.status.current().unwrap();
        assert_eq!(notice.kind, StatusKind::Error);
        assert_eq!(notice.message, MSG_IMAGE_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_truncated_body_reports_unreadable_form() {
        let backends = hazard_service();
        let server = server(&backends);

        let truncated = "--XBOUNDARY\r\n\
            Content-Disposition: form-data; name=\"location\"\r\n\r\n\
            Main St";

        let response = server
            .post("/api/hazards")
            .content_type("multipart/form-data; boundary=XBOUNDARY")
            .bytes(Bytes::from_static(truncated.as_bytes()))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ApiResponse<SubmitHazardResponseDto> = response.json();
        assert_eq!(body.message.as_deref(), Some(MSG_FORM_UNREADABLE));
        assert_eq!(body.errors, Some(vec![MSG_FORM_UNREADABLE.to_string()]));
        assert!(!body.data.unwrap().retryable);
        assert_eq!(backends.status.current().unwrap().message, MSG_FORM_UNREADABLE);
    }

    #[tokio::test]
    async fn test_report_json_uses_camel_case() {
        let backends = hazard_service();
        let server = server(&backends);

        let body: serde_json::Value = server
            .post("/api/hazards")
            .multipart(report_form(16))
            .await
            .json();

        let report = &body["data"]["report"];
        assert_eq!(report["type"], "pothole");
        assert!(report["imageUrl"].is_string());
        assert!(report["createdAt"].is_string());
        assert!(report.get("image_url").is_none());
        assert!(body["data"]["form"].get("hazardType").is_some());
    }

    #[tokio::test]
    async fn test_empty_file_part_counts_as_missing_image() {
        let backends = hazard_service();
        let server = server(&backends);

        let response = server
            .post("/api/hazards")
            .multipart(report_form(0))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ApiResponse<SubmitHazardResponseDto> = response.json();
        assert_eq!(body.message.as_deref(), Some(MSG_IMAGE_REQUIRED));
    }

    #[tokio::test]
    async fn test_unreachable_storage_is_retryable() {
        let backends = hazard_service();
        backends.storage.fail_uploads();
        let server = server(&backends);

        let response = server
            .post("/api/hazards")
            .multipart(report_form(1024))
            .await;

        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        let body: ApiResponse<SubmitHazardResponseDto> = response.json();
        assert_eq!(body.message.as_deref(), Some(MSG_SUBMIT_RETRY));
        assert!(body.data.unwrap().retryable);
    }

    #[tokio::test]
    async fn test_list_returns_total() {
        let backends = hazard_service();
        let server = server(&backends);

        for _ in 0..2 {
            server
                .post("/api/hazards")
                .multipart(report_form(16))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let response = server.get("/api/hazards").await;
        response.assert_status_ok();
        let body: ApiResponse<Vec<HazardReportDto>> = response.json();
        assert_eq!(body.meta.unwrap().total, 2);
        assert_eq!(body.data.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_cards_empty_state() {
        let backends = hazard_service();
        let server = server(&backends);

        let response = server.get("/api/hazards/cards").await;
        response.assert_status_ok();
        assert_eq!(
            response.text().trim(),
            format!("<p class=\"empty-state\">{}</p>", EMPTY_STATE_MESSAGE)
        );
        assert!(backends.status.current().is_none());
    }

    #[tokio::test]
    async fn test_cards_render_submitted_report() {
        let backends = hazard_service();
        let server = server(&backends);

        server
            .post("/api/hazards")
            .multipart(report_form(16))
            .await
            .assert_status(StatusCode::CREATED);

        let html = server.get("/api/hazards/cards").await.text();
        assert_eq!(html.matches("class=\"report-card\"").count(), 1);
        assert!(html.contains("Main St &amp; 5th"));
    }

    #[tokio::test]
    async fn test_load_failure_uses_load_message() {
        let backends = hazard_service();
        backends.store.fail_lists();
        let server = server(&backends);

        let response = server.get("/api/hazards").await;
        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        let body: ApiResponse<()> = response.json();
        assert_eq!(body.message.as_deref(), Some(MSG_LOAD_RETRY));

        let notice = backends.status.current().unwrap();
        assert_eq!(notice.kind, StatusKind::Error);
    }
}
