use crate::{PipelineConfig, PipelineError};

/// Builds the HTTP client shared by every collaborator of a pipeline.
pub fn build_client(config: &PipelineConfig) -> Result<reqwest::Client, PipelineError> {
    reqwest::Client::builder()
        .connect_timeout(config.connect_timeout)
        .timeout(config.request_timeout)
        .build()
        .map_err(|err| PipelineError::Network {
            service: "http client",
            message: err.to_string(),
        })
}
