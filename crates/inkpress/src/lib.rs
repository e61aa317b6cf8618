pub mod ai;
pub mod broadcast;
pub mod config;
pub mod error;
pub mod images;
pub mod logging;
pub mod pipeline;
pub mod publish;
pub mod sanitize;
pub mod secrets;

pub use ai::{ContentGenerator, Draft, Outline, TemplateGenerator};
pub use broadcast::{
    ChannelListener, DeliveryError, HubEvent, ProgressEntry, ProgressHub, ProgressListener,
    ProgressSnapshot, ProgressStatus, StepTracker, Subscription, SubscriptionGuard,
};
pub use config::{load_config, load_config_from_str, Config};
pub use error::{
    ConfigError, GeneratorError, ImageSearchError, InkpressError, PublishError, Result,
};
pub use images::{ImageResult, ImageSearch, NoImageSearch, UnsplashClient};
pub use logging::init_logging;
pub use pipeline::{
    GenerationContext, GenerationPipeline, GenerationRequest, GenerationResult, GenerationStage,
    HubProgress, NoopProgress, PipelineConfig, PipelineError, ProgressReporter,
};
pub use publish::{GeneratedPost, MemoryPublisher, PostStatus, Publisher};
pub use secrets::{resolve_secret, resolve_secret_optional, SecretError};
