//! Shared application state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use inkpress::broadcast::ProgressHub;
use inkpress::config::{Config, ProgressConfig};
use inkpress::pipeline::GenerationPipeline;
use inkpress::publish::{MemoryPublisher, Publisher};
use inkpress::InkpressError;

/// State handed to every route. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// The process-wide progress hub.
    pub hub: Arc<ProgressHub>,

    /// Pipeline used by `POST /api/generate`.
    pub pipeline: Arc<GenerationPipeline>,

    /// SSE buffer and keep-alive settings.
    pub progress: ProgressConfig,

    /// Set while a generation job runs.
    generation_running: Arc<AtomicBool>,
}

impl AppState {
    /// Builds the state from configuration with an in-memory post store.
    pub fn from_config(config: &Config) -> Result<Self, InkpressError> {
        let publisher: Arc<dyn Publisher> = Arc::new(MemoryPublisher::new());
        let pipeline = GenerationPipeline::from_config(config, publisher)?;
        Ok(Self::new(
            Arc::new(ProgressHub::new()),
            Arc::new(pipeline),
            config.progress.clone(),
        ))
    }

    pub fn new(
        hub: Arc<ProgressHub>,
        pipeline: Arc<GenerationPipeline>,
        progress: ProgressConfig,
    ) -> Self {
        Self {
            hub,
            pipeline,
            progress,
            generation_running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(self.progress.keep_alive_secs)
    }

    /// Claims the single generation slot. Returns `None` if a job is running.
    pub fn try_begin_generation(&self) -> Option<GenerationSlot> {
        self.generation_running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| GenerationSlot {
                flag: Arc::clone(&self.generation_running),
            })
    }

    pub fn is_generating(&self) -> bool {
        self.generation_running.load(Ordering::Acquire)
    }
}

/// Releases the generation slot when dropped.
pub struct GenerationSlot {
    flag: Arc<AtomicBool>,
}

impl Drop for GenerationSlot {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
