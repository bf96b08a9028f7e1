//! Process-wide status notification slot.
//!
//! One notice is visible at a time; showing a new one replaces the old one.
//! Every notice is cleared automatically after a fixed delay, but only if it
//! is still the notice that scheduled the clear. Each `show` bumps a
//! generation counter and the timer compares generations before clearing.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Style category of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusNotice {
    pub message: String,
    pub kind: StatusKind,
    /// Increases with every notice; lets pollers tell two equal messages apart
    pub generation: u64,
    pub shown_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    notice: Option<StatusNotice>,
}

#[derive(Debug, Clone)]
pub struct StatusBoard {
    slot: Arc<Mutex<Slot>>,
    clear_after: Duration,
}

impl StatusBoard {
    pub fn new(clear_after: Duration) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot::default())),
            clear_after,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        // The slot holds plain data, so a poisoned lock is still usable
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replace the visible notice and schedule its removal.
    ///
    /// Must be called from within a Tokio runtime. Returns the notice's generation.
    pub fn show(&self, message: impl Into<String>, kind: StatusKind) -> u64 {
        let generation = {
            let mut slot = self.lock();
            slot.generation += 1;
            slot.notice = Some(StatusNotice {
                message: message.into(),
                kind,
                generation: slot.generation,
                shown_at: Utc::now(),
            });
            slot.generation
        };

        let board = self.clone();
        let delay = self.clear_after;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if board.clear_if_current(generation) {
                tracing::debug!("Status notice {} expired", generation);
            }
        });

        generation
    }

    /// Remove whatever is visible right now
    pub fn clear(&self) {
        let mut slot = self.lock();
        slot.generation += 1;
        slot.notice = None;
    }

    /// Clear only if `generation` is still the latest notice
    pub fn clear_if_current(&self, generation: u64) -> bool {
        let mut slot = self.lock();
        if slot.generation == generation {
            slot.notice = None;
            true
        } else {
            false
        }
    }

    pub fn current(&self) -> Option<StatusNotice> {
        self.lock().notice.clone()
    }
}
