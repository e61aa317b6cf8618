use serde::{Deserialize, Serialize};

pub const CONFIG_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub version: String,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub progress: ProgressConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub images: ImagesConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            server: ServerConfig::default(),
            progress: ProgressConfig::default(),
            logging: LoggingConfig::default(),
            generation: GenerationConfig::default(),
            images: ImagesConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Allowed CORS origins. Empty means any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            cors_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressConfig {
    /// Events buffered per streaming listener before it is dropped.
    #[serde(default = "default_listener_buffer")]
    pub listener_buffer: usize,
    /// Interval between SSE keep-alive comments.
    #[serde(default = "default_keep_alive_secs")]
    pub keep_alive_secs: u64,
}

fn default_listener_buffer() -> usize {
    64
}

fn default_keep_alive_secs() -> u64 {
    15
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            listener_buffer: default_listener_buffer(),
            keep_alive_secs: default_keep_alive_secs(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `inkpress=debug,tower_http=info`.
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_tone")]
    pub default_tone: String,
    #[serde(default = "default_max_tags")]
    pub max_tags: usize,
}

fn default_tone() -> String {
    "informative".to_string()
}

fn default_max_tags() -> usize {
    5
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            default_tone: default_tone(),
            max_tags: default_max_tags(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageProvider {
    Unsplash,
    #[default]
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagesConfig {
    #[serde(default)]
    pub provider: ImageProvider,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Number of candidates requested per search.
    #[serde(default = "default_per_page")]
    pub per_page: u8,
    #[serde(default)]
    pub access_key: Option<String>,
    #[serde(default)]
    pub access_key_file: Option<String>,
    #[serde(default = "default_access_key_env_var")]
    pub access_key_env_var: Option<String>,
}

fn default_api_base() -> String {
    "https://api.unsplash.com".to_string()
}

fn default_per_page() -> u8 {
    3
}

fn default_access_key_env_var() -> Option<String> {
    Some("UNSPLASH_ACCESS_KEY".to_string())
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            provider: ImageProvider::default(),
            api_base: default_api_base(),
            per_page: default_per_page(),
            access_key: None,
            access_key_file: None,
            access_key_env_var: default_access_key_env_var(),
        }
    }
}
