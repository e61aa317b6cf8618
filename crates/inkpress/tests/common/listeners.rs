//! Listener doubles for hub tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use inkpress::broadcast::{DeliveryError, HubEvent, ProgressListener, ProgressStatus};

/// Records every event it receives.
#[derive(Default)]
pub struct RecordingListener {
    events: Mutex<Vec<HubEvent>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<HubEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        self.events().iter().map(|e| e.kind()).collect()
    }

    pub fn last(&self) -> Option<HubEvent> {
        self.events.lock().unwrap().last().cloned()
    }

    /// `(stepId, status, message)` triples of the last snapshot received.
    pub fn last_snapshot(&self) -> Vec<(String, ProgressStatus, String)> {
        self.last()
            .map(|event| {
                event
                    .snapshot()
                    .iter()
                    .map(|e| (e.step_id.clone(), e.status, e.message.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl ProgressListener for RecordingListener {
    fn deliver(&self, event: &HubEvent) -> Result<(), DeliveryError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// Accepts events until `fail_next` is called, then rejects them.
#[derive(Default)]
pub struct FlakyListener {
    failing: AtomicBool,
    attempts: AtomicUsize,
}

impl FlakyListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl ProgressListener for FlakyListener {
    fn deliver(&self, _event: &HubEvent) -> Result<(), DeliveryError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            Err(DeliveryError::Transport("connection reset".to_string()))
        } else {
            Ok(())
        }
    }
}
