use std::fmt;

/// Terminal failures of an analysis run. Every variant ends the run and is
/// shown to the user as a single message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error("Please open a valid YouTube video page.")]
    InvalidPage { url: String },
    #[error("{message}")]
    RemoteApi { message: String },
    #[error("No comments found for this video.")]
    NoComments,
    #[error("{message}")]
    ScoringService { message: String },
    #[error("network error talking to {service}: {message}")]
    Network {
        service: &'static str,
        message: String,
    },
    #[error("request to {service} timed out")]
    Timeout { service: &'static str },
    #[error("unexpected response from {service}: {message}")]
    Decode {
        service: &'static str,
        message: String,
    },
}

impl PipelineError {
    pub(crate) fn from_reqwest(service: &'static str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return PipelineError::Timeout { service };
        }
        if err.is_decode() {
            return PipelineError::Decode {
                service,
                message: err.to_string(),
            };
        }
        PipelineError::Network {
            service,
            message: err.to_string(),
        }
    }

    /// Short machine-friendly name used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::InvalidPage { .. } => "invalid_page",
            PipelineError::RemoteApi { .. } => "remote_api",
            PipelineError::NoComments => "no_comments",
            PipelineError::ScoringService { .. } => "scoring_service",
            PipelineError::Network { .. } => "network",
            PipelineError::Timeout { .. } => "timeout",
            PipelineError::Decode { .. } => "decode",
        }
    }
}

/// Why a single chart request produced no image. Never fatal to a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartError {
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Network(String),
}

impl ChartError {
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ChartError::Timeout
        } else {
            ChartError::Network(err.to_string())
        }
    }
}

impl fmt::Display for ChartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartError::HttpStatus(code) => write!(f, "http status {code}"),
            ChartError::Timeout => write!(f, "timeout"),
            ChartError::TooLarge { max_bytes, actual } => {
                write!(f, "image too large (max {max_bytes}, actual {actual:?})")
            }
            ChartError::Network(message) => write!(f, "network error: {message}"),
        }
    }
}

impl std::error::Error for ChartError {}
