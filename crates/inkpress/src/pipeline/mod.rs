pub mod config;
pub mod context;
pub mod error;
pub mod progress;
pub mod request;
pub mod runner;
pub mod stage;

pub use config::PipelineConfig;
pub use context::GenerationContext;
pub use error::{PipelineError, PipelineWarning};
pub use progress::{HubProgress, NoopProgress, ProgressEvent, ProgressReporter};
pub use request::GenerationRequest;
pub use runner::{GenerationPipeline, GenerationResult};
pub use stage::GenerationStage;
