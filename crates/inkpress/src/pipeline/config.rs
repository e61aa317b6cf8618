use crate::config::Config;

pub struct PipelineConfig {
    pub default_tone: String,
    pub max_tags: usize,
    /// Results requested from the image search; the first one is used.
    pub image_count: u8,
}

impl PipelineConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            default_tone: config.generation.default_tone.clone(),
            max_tags: config.generation.max_tags,
            image_count: config.images.per_page,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
