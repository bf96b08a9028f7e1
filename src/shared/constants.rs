// =============================================================================
// HAZARD RECORDS
// =============================================================================

/// Lifecycle tag every new report starts with
pub const STATUS_REPORTED: &str = "reported";

/// Largest accepted image, in bytes (5 MiB)
pub const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024;

/// Shown in a card when the reporter left the description empty
pub const DESCRIPTION_PLACEHOLDER: &str = "No additional description provided.";

/// Shown instead of the card list when nothing has been reported
pub const EMPTY_STATE_MESSAGE: &str = "No reports yet. Be the first to report a hazard!";

// =============================================================================
// STATUS MESSAGES
// =============================================================================

pub const MSG_UPLOADING: &str = "Uploading report...";
pub const MSG_SUBMITTED: &str = "✓ Hazard reported successfully!";
pub const MSG_IMAGE_TOO_LARGE: &str = "Image is too large. Maximum size is 5MB.";
pub const MSG_IMAGE_REQUIRED: &str = "Please choose an image of the hazard.";
pub const MSG_FORM_UNREADABLE: &str = "The report form could not be read.";
pub const MSG_SUBMIT_RETRY: &str = "Error submitting report. Please try again.";
pub const MSG_SUBMIT_FAILED: &str =
    "Report could not be saved. Please contact support if this continues.";

pub const MSG_LOADING: &str = "Loading reports...";
pub const MSG_LOAD_RETRY: &str = "Error loading reports. Please try again.";
pub const MSG_LOAD_FAILED: &str = "Reports are unavailable right now.";
