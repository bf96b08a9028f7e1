mod hazard_report;

pub use hazard_report::{CreateHazardReport, HazardReport, HazardSubmission, ImageUpload};
