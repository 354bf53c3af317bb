use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_COMMENTS_API_URL: &str = "https://www.googleapis.com/youtube/v3/commentThreads";

/// Why a [`PipelineConfig`] was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field}: {source}")]
    InvalidUrl {
        field: &'static str,
        source: url::ParseError,
    },
    #[error("{field}: unsupported scheme {scheme}")]
    UnsupportedScheme { field: &'static str, scheme: String },
    #[error("{field} must be at least 1")]
    Zero { field: &'static str },
}

/// Knobs for one analysis pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Base address of the scoring and chart backend.
    pub api_base_url: String,
    /// Comment-listing endpoint.
    pub comments_api_url: String,
    pub api_key: String,
    pub max_comments: usize,
    /// Items requested per listing page; the API accepts at most 100.
    pub page_size: u32,
    pub top_comments: usize,
    pub scrape_limit: usize,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_image_bytes: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            comments_api_url: DEFAULT_COMMENTS_API_URL.to_string(),
            api_key: String::new(),
            max_comments: 200,
            page_size: 100,
            top_comments: 25,
            scrape_limit: 100,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_image_bytes: 5 * 1024 * 1024,
        }
    }
}

impl PipelineConfig {
    pub fn page_size(&self) -> u32 {
        self.page_size.clamp(1, 100)
    }

    /// Joins `path` onto the backend base address.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Checks that both service addresses are absolute http(s) URLs and that
    /// at least one comment may be fetched.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("api_base_url", &self.api_base_url),
            ("comments_api_url", &self.comments_api_url),
        ] {
            let parsed =
                url::Url::parse(value).map_err(|source| ConfigError::InvalidUrl { field, source })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ConfigError::UnsupportedScheme {
                    field,
                    scheme: parsed.scheme().to_string(),
                });
            }
        }
        if self.max_comments == 0 {
            return Err(ConfigError::Zero {
                field: "max_comments",
            });
        }
        Ok(())
    }
}
