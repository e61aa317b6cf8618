use std::sync::Arc;

use crate::broadcast::{ProgressHub, ProgressStatus};

use super::stage::GenerationStage;

/// Events emitted by the pipeline as a run moves through its stages.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    Queued {
        stage: GenerationStage,
    },
    Started {
        stage: GenerationStage,
    },
    Completed {
        stage: GenerationStage,
        message: String,
    },
    Failed {
        stage: GenerationStage,
        error: String,
    },
}

impl ProgressEvent {
    pub fn stage(&self) -> GenerationStage {
        match self {
            ProgressEvent::Queued { stage }
            | ProgressEvent::Started { stage }
            | ProgressEvent::Completed { stage, .. }
            | ProgressEvent::Failed { stage, .. } => *stage,
        }
    }
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// No-op reporter for unit tests.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: ProgressEvent) {}
}

/// Bridges pipeline events into a progress hub, one step per stage.
pub struct HubProgress {
    hub: Arc<ProgressHub>,
}

impl HubProgress {
    pub fn new(hub: Arc<ProgressHub>) -> Self {
        Self { hub }
    }
}

impl ProgressReporter for HubProgress {
    fn report(&self, event: ProgressEvent) {
        let step_id = event.stage().step_id();
        match event {
            ProgressEvent::Queued { .. } => {
                self.hub.update(step_id, ProgressStatus::Pending, "Queued");
            }
            ProgressEvent::Started { stage } => {
                self.hub
                    .update(step_id, ProgressStatus::InProgress, stage.running_message());
            }
            ProgressEvent::Completed { message, .. } => {
                self.hub.update(step_id, ProgressStatus::Completed, &message);
            }
            ProgressEvent::Failed { error, .. } => {
                self.hub.update(step_id, ProgressStatus::Error, &error);
            }
        }
    }
}
