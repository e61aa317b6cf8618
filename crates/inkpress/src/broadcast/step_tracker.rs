//! Per-step progress writer.

use std::sync::Arc;

use super::progress_hub::{ProgressHub, ProgressStatus};

/// Writes the status of a single step to a hub.
#[derive(Debug, Clone)]
pub struct StepTracker {
    step_id: String,
    hub: Arc<ProgressHub>,
}

impl StepTracker {
    pub fn new(step_id: &str, hub: Arc<ProgressHub>) -> Self {
        Self {
            step_id: step_id.to_string(),
            hub,
        }
    }

    pub fn step_id(&self) -> &str {
        &self.step_id
    }

    pub fn pending(&self, message: &str) {
        self.set(ProgressStatus::Pending, message);
    }

    pub fn in_progress(&self, message: &str) {
        self.set(ProgressStatus::InProgress, message);
    }

    pub fn completed(&self, message: &str) {
        self.set(ProgressStatus::Completed, message);
    }

    pub fn error(&self, message: &str) {
        self.set(ProgressStatus::Error, message);
    }

    pub fn set(&self, status: ProgressStatus, message: &str) {
        self.hub.update(&self.step_id, status, message);
    }
}
