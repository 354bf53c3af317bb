//! Layered configuration: defaults, then `pulse.ron`, then the environment
//! (API key only), then command-line flags.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use pulse_engine::PipelineConfig;
use pulse_logging::pulse_info;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "./pulse.ron";
pub const DEFAULT_OUTPUT_DIR: &str = "./output";
pub const API_KEY_ENV: &str = "YOUTUBE_API_KEY";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("malformed config file {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid configuration: {0}")]
    Invalid(#[from] pulse_engine::ConfigError),
}

/// On-disk shape of `pulse.ron`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub api_base_url: String,
    pub comments_api_url: String,
    pub api_key: String,
    pub max_comments: usize,
    pub page_size: u32,
    pub top_comments: usize,
    pub scrape_limit: usize,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_image_bytes: u64,
    pub output_dir: PathBuf,
}

impl Default for FileConfig {
    fn default() -> Self {
        let pipeline = PipelineConfig::default();
        Self {
            api_base_url: pipeline.api_base_url,
            comments_api_url: pipeline.comments_api_url,
            api_key: pipeline.api_key,
            max_comments: pipeline.max_comments,
            page_size: pipeline.page_size,
            top_comments: pipeline.top_comments,
            scrape_limit: pipeline.scrape_limit,
            connect_timeout_secs: pipeline.connect_timeout.as_secs(),
            request_timeout_secs: pipeline.request_timeout.as_secs(),
            max_image_bytes: pipeline.max_image_bytes,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

/// Values given on the command line; `None` keeps the file value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    pub api_base_url: Option<String>,
    pub api_key: Option<String>,
    pub max_comments: Option<usize>,
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub pipeline: PipelineConfig,
    pub output_dir: PathBuf,
}

/// Reads the RON file at `path`.
///
/// When no path was given explicitly, a missing default file means defaults.
/// An explicit path that does not exist is an error.
pub fn load_file_config(path: Option<&Path>) -> Result<FileConfig, ConfigError> {
    let (path, explicit) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
    };

    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound && !explicit => {
            return Ok(FileConfig::default());
        }
        Err(source) => return Err(ConfigError::Read { path, source }),
    };

    let config = ron::from_str(&text).map_err(|err| ConfigError::Parse {
        path: path.clone(),
        message: err.to_string(),
    })?;
    pulse_info!("loaded configuration from {:?}", path);
    Ok(config)
}

/// Applies the environment key fallback and command-line overrides on top of
/// the file values, then validates the result.
pub fn resolve(
    file: FileConfig,
    env_api_key: Option<String>,
    overrides: CliOverrides,
) -> Result<AppConfig, ConfigError> {
    let api_key = overrides
        .api_key
        .or_else(|| Some(file.api_key).filter(|key| !key.is_empty()))
        .or(env_api_key)
        .unwrap_or_default();

    let pipeline = PipelineConfig {
        api_base_url: overrides.api_base_url.unwrap_or(file.api_base_url),
        comments_api_url: file.comments_api_url,
        api_key,
        max_comments: overrides.max_comments.unwrap_or(file.max_comments),
        page_size: file.page_size,
        top_comments: file.top_comments,
        scrape_limit: file.scrape_limit,
        connect_timeout: Duration::from_secs(file.connect_timeout_secs),
        request_timeout: Duration::from_secs(file.request_timeout_secs),
        max_image_bytes: file.max_image_bytes,
    };
    pipeline.validate()?;

    Ok(AppConfig {
        pipeline,
        output_dir: overrides.output_dir.unwrap_or(file.output_dir),
    })
}

/// Loads the full configuration for one invocation.
pub fn load(path: Option<&Path>, overrides: CliOverrides) -> Result<AppConfig, ConfigError> {
    let file = load_file_config(path)?;
    let env_api_key = std::env::var(API_KEY_ENV)
        .ok()
        .filter(|key| !key.is_empty());
    resolve(file, env_api_key, overrides)
}
