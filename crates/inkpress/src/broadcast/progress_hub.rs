//! Live progress hub for long-running background work.
//!
//! The hub keeps one snapshot of named steps and pushes every change, in
//! order, to the listeners registered at that moment. A listener that joins
//! late receives an `init` event carrying the current snapshot before it sees
//! anything else, so it never has to replay history.
//!
//! Mutation and fan-out for a single call happen under one lock. Listeners
//! must not call back into the hub from `deliver`.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::step_tracker::StepTracker;

/// Status of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    Pending,
    InProgress,
    Completed,
    Error,
}

impl ProgressStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressStatus::Pending => "pending",
            ProgressStatus::InProgress => "in_progress",
            ProgressStatus::Completed => "completed",
            ProgressStatus::Error => "error",
        }
    }
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown progress status '{0}' (expected pending, in_progress, completed or error)")]
pub struct ParseStatusError(pub String);

impl FromStr for ProgressStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ProgressStatus::Pending),
            "in_progress" => Ok(ProgressStatus::InProgress),
            "completed" => Ok(ProgressStatus::Completed),
            "error" => Ok(ProgressStatus::Error),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// Latest known state of one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    /// Step identifier, unique within a snapshot.
    pub step_id: String,
    /// Current status.
    pub status: ProgressStatus,
    /// Human-readable description of the current status.
    pub message: String,
    /// When the entry was last written.
    pub timestamp: DateTime<Utc>,
}

impl ProgressEntry {
    pub fn new(step_id: &str, status: ProgressStatus, message: &str) -> Self {
        Self {
            step_id: step_id.to_string(),
            status,
            message: message.to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Ordered set of entries keyed by step id.
///
/// New steps are appended; writing an existing step replaces it in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressSnapshot {
    entries: Vec<ProgressEntry>,
}

impl ProgressSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the entry for `entry.step_id`.
    ///
    /// Returns the position of the entry in the snapshot.
    pub fn upsert(&mut self, entry: ProgressEntry) -> usize {
        match self
            .entries
            .iter()
            .position(|existing| existing.step_id == entry.step_id)
        {
            Some(index) => {
                self.entries[index] = entry;
                index
            }
            None => {
                self.entries.push(entry);
                self.entries.len() - 1
            }
        }
    }

    pub fn get(&self, step_id: &str) -> Option<&ProgressEntry> {
        self.entries.iter().find(|entry| entry.step_id == step_id)
    }

    pub fn entries(&self) -> &[ProgressEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProgressEntry> {
        self.entries.iter()
    }

    pub fn step_ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.step_id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<'a> IntoIterator for &'a ProgressSnapshot {
    type Item = &'a ProgressEntry;
    type IntoIter = std::slice::Iter<'a, ProgressEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Event pushed to listeners.
///
/// Serializes as `{"type": "...", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum HubEvent {
    /// Sent once to a new listener with the snapshot at subscription time.
    Init { snapshot: ProgressSnapshot },
    /// A step was written.
    Progress {
        entry: ProgressEntry,
        snapshot: ProgressSnapshot,
    },
    /// The snapshot was cleared.
    Reset { snapshot: ProgressSnapshot },
}

impl HubEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            HubEvent::Init { .. } => "init",
            HubEvent::Progress { .. } => "progress",
            HubEvent::Reset { .. } => "reset",
        }
    }

    pub fn snapshot(&self) -> &ProgressSnapshot {
        match self {
            HubEvent::Init { snapshot }
            | HubEvent::Progress { snapshot, .. }
            | HubEvent::Reset { snapshot } => snapshot,
        }
    }

    /// Serializes the event envelope to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Reasons a listener could not take an event.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Listener is closed")]
    Closed,

    #[error("Listener buffer is full")]
    Full,

    #[error("Failed to serialize event: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Listener panicked: {0}")]
    Panicked(String),
}

/// Recipient of hub events.
///
/// Implemented by streaming connections, in-memory channels and test doubles.
pub trait ProgressListener: Send + Sync {
    /// Takes one event. An error drops the listener from the hub.
    fn deliver(&self, event: &HubEvent) -> Result<(), DeliveryError>;

    /// Reports that the other side has gone away.
    fn is_closed(&self) -> bool {
        false
    }
}

static NEXT_SUBSCRIPTION_ID: AtomicU64 = AtomicU64::new(1);

/// Handle returned by [`ProgressHub::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription {
    id: u64,
}

impl Subscription {
    fn next() -> Self {
        Self {
            id: NEXT_SUBSCRIPTION_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

impl fmt::Display for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.id)
    }
}

struct Registered {
    subscription: Subscription,
    listener: Arc<dyn ProgressListener>,
}

#[derive(Default)]
struct HubState {
    snapshot: ProgressSnapshot,
    listeners: Vec<Registered>,
}

/// Single-writer progress state with synchronous fan-out.
#[derive(Default)]
pub struct ProgressHub {
    state: Mutex<HubState>,
}

impl ProgressHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upserts the entry for `step_id` and broadcasts a `progress` event.
    ///
    /// An empty `step_id` is a caller bug: it panics in debug builds and is
    /// ignored with a warning otherwise.
    pub fn update(&self, step_id: &str, status: ProgressStatus, message: &str) {
        debug_assert!(!step_id.is_empty(), "progress step id must not be empty");
        if step_id.is_empty() {
            warn!(%status, "Ignoring progress update with empty step id");
            return;
        }

        let mut state = self.lock();
        let entry = ProgressEntry::new(step_id, status, message);
        state.snapshot.upsert(entry.clone());
        let event = HubEvent::Progress {
            entry,
            snapshot: state.snapshot.clone(),
        };
        broadcast(&mut state, &event);
    }

    /// Clears the snapshot and broadcasts a `reset` event.
    pub fn reset(&self) {
        let mut state = self.lock();
        state.snapshot.clear();
        let event = HubEvent::Reset {
            snapshot: ProgressSnapshot::new(),
        };
        broadcast(&mut state, &event);
    }

    /// Registers `listener` and hands it an `init` event before returning.
    ///
    /// If the `init` delivery fails the listener is not registered; the
    /// returned subscription is then already inactive.
    pub fn subscribe(&self, listener: Arc<dyn ProgressListener>) -> Subscription {
        let subscription = Subscription::next();
        let mut state = self.lock();
        let init = HubEvent::Init {
            snapshot: state.snapshot.clone(),
        };

        match deliver_isolated(listener.as_ref(), &init) {
            Ok(()) => {
                state.listeners.push(Registered {
                    subscription,
                    listener,
                });
                debug!(
                    %subscription,
                    listeners = state.listeners.len(),
                    "Progress listener subscribed"
                );
            }
            Err(e) => {
                warn!(%subscription, error = %e, "Initial progress delivery failed, listener not registered");
            }
        }

        subscription
    }

    /// Removes a listener. Unknown or already-removed subscriptions are ignored.
    pub fn unsubscribe(&self, subscription: &Subscription) {
        let mut state = self.lock();
        let before = state.listeners.len();
        state
            .listeners
            .retain(|registered| registered.subscription != *subscription);
        if state.listeners.len() < before {
            debug!(
                %subscription,
                listeners = state.listeners.len(),
                "Progress listener unsubscribed"
            );
        }
    }

    pub fn is_subscribed(&self, subscription: &Subscription) -> bool {
        self.lock()
            .listeners
            .iter()
            .any(|registered| registered.subscription == *subscription)
    }

    /// Copy of the current snapshot.
    pub fn snapshot(&self) -> ProgressSnapshot {
        self.lock().snapshot.clone()
    }

    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    /// Creates a tracker that writes to a single step.
    pub fn step(self: &Arc<Self>, step_id: &str) -> StepTracker {
        StepTracker::new(step_id, Arc::clone(self))
    }

    fn lock(&self) -> MutexGuard<'_, HubState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("Progress hub lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }
}

impl fmt::Debug for ProgressHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("ProgressHub")
            .field("steps", &state.snapshot.step_ids())
            .field("listeners", &state.listeners.len())
            .finish()
    }
}

/// Delivers `event` to every listener, dropping the ones that fail.
fn broadcast(state: &mut HubState, event: &HubEvent) {
    let kind = event.kind();
    state.listeners.retain(|registered| {
        if registered.listener.is_closed() {
            debug!(subscription = %registered.subscription, "Dropping closed progress listener");
            return false;
        }

        match deliver_isolated(registered.listener.as_ref(), event) {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    subscription = %registered.subscription,
                    kind,
                    error = %e,
                    "Progress delivery failed, dropping listener"
                );
                false
            }
        }
    });
}

fn deliver_isolated(listener: &dyn ProgressListener, event: &HubEvent) -> Result<(), DeliveryError> {
    match panic::catch_unwind(AssertUnwindSafe(|| listener.deliver(event))) {
        Ok(result) => result,
        Err(payload) => Err(DeliveryError::Panicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
