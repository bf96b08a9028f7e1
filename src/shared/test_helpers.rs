//! In-memory backends and fixtures for service and handler tests

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use fake::faker::address::en::StreetName;
use fake::faker::lorem::en::Sentence;
use fake::Fake;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::core::error::{AppError, Result};
use crate::features::hazards::dtos::HazardFormDto;
use crate::features::hazards::models::{
    CreateHazardReport, HazardReport, HazardSubmission, ImageUpload,
};
use crate::features::hazards::services::{HazardService, HazardStore};
use crate::modules::storage::{encode_key_path, StorageBackend};
use crate::shared::constants::STATUS_REPORTED;
use crate::shared::status::StatusBoard;

/// Long enough that no notice expires while a test is looking at it
pub const TEST_CLEAR_AFTER: Duration = Duration::from_secs(60);

#[derive(Default)]
pub struct InMemoryHazardStore {
    reports: Mutex<Vec<HazardReport>>,
    inserts: AtomicUsize,
    fail_inserts: AtomicBool,
    fail_lists: AtomicBool,
}

impl InMemoryHazardStore {
    pub fn fail_inserts(&self) {
        self.fail_inserts.store(true, Ordering::SeqCst);
    }

    pub fn fail_lists(&self) {
        self.fail_lists.store(true, Ordering::SeqCst);
    }

    /// Number of insert attempts, failed ones included
    pub fn insert_count(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HazardStore for InMemoryHazardStore {
    async fn insert(&self, data: &CreateHazardReport) -> Result<HazardReport> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }

        let mut reports = self.reports.lock().unwrap();
        // Strictly increasing timestamps, like clock_timestamp() on one connection
        let created_at = reports
            .last()
            .map(|r| r.created_at + ChronoDuration::microseconds(1))
            .unwrap_or_else(Utc::now);

        let report = HazardReport {
            id: data.id,
            hazard_type: data.hazard_type.clone(),
            location: data.location.clone(),
            severity: data.severity.clone(),
            description: data.description.clone(),
            image_url: data.image_url.clone(),
            image_key: data.image_key.clone(),
            status: STATUS_REPORTED.to_string(),
            created_at,
        };
        reports.push(report.clone());
        Ok(report)
    }

    async fn list_recent(&self) -> Result<Vec<HazardReport>> {
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolClosed));
        }

        let mut reports = self.reports.lock().unwrap().clone();
        reports.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(reports)
    }
}

#[derive(Default)]
pub struct InMemoryStorage {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    deleted: Mutex<Vec<String>>,
    uploads: AtomicUsize,
    fail_uploads: AtomicBool,
    reject_uploads: AtomicBool,
}

impl InMemoryStorage {
    /// Uploads fail as if the store were unreachable
    pub fn fail_uploads(&self) {
        self.fail_uploads.store(true, Ordering::SeqCst);
    }

    /// Uploads fail as if the store refused them
    pub fn reject_uploads(&self) {
        self.reject_uploads.store(true, Ordering::SeqCst);
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn deleted_keys(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    /// Bytes served at `url`, if any object maps to it
    pub fn object_for_url(&self, url: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .iter()
            .find(|(key, _)| self.public_url(key) == url)
            .map(|(_, data)| data.clone())
    }
}

#[async_trait]
impl StorageBackend for InMemoryStorage {
    async fn upload(&self, key: &str, data: Vec<u8>, _content_type: &str) -> Result<String> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(AppError::Unavailable("connection refused".to_string()));
        }
        if self.reject_uploads.load(Ordering::SeqCst) {
            return Err(AppError::Storage("403 AccessDenied".to_string()));
        }

        self.objects.lock().unwrap().insert(key.to_string(), data);
        Ok(key.to_string())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.objects.lock().unwrap().remove(key);
        self.deleted.lock().unwrap().push(key.to_string());
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("http://storage.test/hazard-reports/{}", encode_key_path(key))
    }

    fn key_prefix(&self) -> &str {
        "hazards"
    }
}

/// A service wired to in-memory backends, with handles to inspect them
pub struct TestBackends {
    pub service: Arc<HazardService>,
    pub store: Arc<InMemoryHazardStore>,
    pub storage: Arc<InMemoryStorage>,
    pub status: StatusBoard,
}

pub fn hazard_service() -> TestBackends {
    let store = Arc::new(InMemoryHazardStore::default());
    let storage = Arc::new(InMemoryStorage::default());
    let status = StatusBoard::new(TEST_CLEAR_AFTER);
    let service = Arc::new(HazardService::new(
        store.clone(),
        storage.clone(),
        status.clone(),
    ));

    TestBackends {
        service,
        store,
        storage,
        status,
    }
}

pub fn sample_form() -> HazardFormDto {
    HazardFormDto {
        hazard_type: "fallen-tree".to_string(),
        location: StreetName().fake(),
        severity: "medium".to_string(),
        description: Sentence(3..8).fake(),
    }
}

/// A JPEG-named image of `size` bytes
pub fn image(size: usize, file_name: &str) -> ImageUpload {
    ImageUpload {
        file_name: file_name.to_string(),
        content_type: "image/jpeg".to_string(),
        data: (0..size).map(|i| (i % 251) as u8).collect(),
    }
}

pub fn submission(form: HazardFormDto, image: Option<ImageUpload>) -> HazardSubmission {
    HazardSubmission { form, image }
}

