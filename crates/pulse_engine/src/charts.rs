use bytes::Bytes;
use futures_util::StreamExt;
use pulse_logging::{pulse_debug, pulse_error};
use reqwest::header::CONTENT_TYPE;
use serde_json::json;

use crate::{Analysis, ChartError, ChartImage, ChartKind, ChartSet, PipelineConfig, RawComment};

/// Requests the distribution, trend and word-cloud images for a run.
#[derive(Debug, Clone)]
pub struct ChartRequester {
    client: reqwest::Client,
    config: PipelineConfig,
}

impl ChartRequester {
    pub fn new(client: reqwest::Client, config: &PipelineConfig) -> Self {
        Self {
            client,
            config: config.clone(),
        }
    }

    /// Fires all three chart requests concurrently and waits for every one.
    ///
    /// A failed request only leaves its slot empty; it is logged and never
    /// affects the other two.
    pub async fn request_all(&self, analysis: &Analysis, comments: &[RawComment]) -> ChartSet {
        let texts: Vec<&str> = comments.iter().map(|c| c.text.as_str()).collect();
        let distribution_body = json!({ "sentiment_counts": analysis.counts });
        let trend_body = json!({ "sentiment_data": analysis.series });
        let wordcloud_body = json!({ "comments": texts });

        let (distribution, trend, wordcloud) = tokio::join!(
            self.settle(ChartKind::Distribution, &distribution_body),
            self.settle(ChartKind::Trend, &trend_body),
            self.settle(ChartKind::WordCloud, &wordcloud_body),
        );

        ChartSet {
            distribution,
            trend,
            wordcloud,
        }
    }

    async fn settle(&self, kind: ChartKind, body: &serde_json::Value) -> Option<ChartImage> {
        match self.request(kind, body).await {
            Ok(image) => {
                pulse_debug!("chart {} rendered ({} bytes)", kind.name(), image.bytes.len());
                Some(image)
            }
            Err(err) => {
                pulse_error!(
                    "run={} error fetching {}: {}",
                    pulse_logging::run_id(),
                    kind.endpoint(),
                    err
                );
                None
            }
        }
    }

    /// Posts `body` to the chart endpoint for `kind` and downloads the image.
    pub async fn request(
        &self,
        kind: ChartKind,
        body: &serde_json::Value,
    ) -> Result<ChartImage, ChartError> {
        let response = self
            .client
            .post(self.config.endpoint(kind.endpoint()))
            .json(body)
            .send()
            .await
            .map_err(ChartError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChartError::HttpStatus(status.as_u16()));
        }

        let max_bytes = self.config.max_image_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(ChartError::TooLarge {
                    max_bytes,
                    actual: Some(content_len),
                });
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let mut buffer = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(ChartError::from_reqwest)?;
            let next_len = (buffer.len() + chunk.len()) as u64;
            if next_len > max_bytes {
                return Err(ChartError::TooLarge {
                    max_bytes,
                    actual: Some(next_len),
                });
            }
            buffer.extend_from_slice(&chunk);
        }

        Ok(ChartImage {
            kind,
            content_type,
            bytes: Bytes::from(buffer),
        })
    }
}
