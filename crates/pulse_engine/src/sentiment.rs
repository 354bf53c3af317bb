use pulse_logging::{pulse_debug, pulse_warn};
use serde::{Deserialize, Serialize};

use crate::{PipelineConfig, PipelineError, RawComment, Sentiment, SentimentPrediction};

const SERVICE: &str = "sentiment service";
const FALLBACK_MESSAGE: &str = "Backend sentiment analysis failed";

/// A free-text snippet scored without timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredText {
    pub comment: String,
    pub sentiment: Sentiment,
}

#[async_trait::async_trait]
pub trait SentimentScorer: Send + Sync {
    /// Scores a non-empty batch; predictions come back in request order.
    async fn predict_with_timestamps(
        &self,
        comments: &[RawComment],
    ) -> Result<Vec<SentimentPrediction>, PipelineError>;

    /// Scores bare text snippets.
    async fn predict(&self, texts: &[String]) -> Result<Vec<ScoredText>, PipelineError>;
}

/// Checks that `predictions` line up one-to-one with `comments`.
///
/// The scoring contract has no join key, so the echoed comment text at each
/// position is compared with the text that was sent.
pub fn verify_alignment(
    comments: &[RawComment],
    predictions: &[SentimentPrediction],
) -> Result<(), PipelineError> {
    if comments.len() != predictions.len() {
        return Err(PipelineError::ScoringService {
            message: format!(
                "sentiment service returned {} predictions for {} comments",
                predictions.len(),
                comments.len()
            ),
        });
    }
    if let Some(index) = comments
        .iter()
        .zip(predictions)
        .position(|(comment, prediction)| comment.text != prediction.comment)
    {
        return Err(PipelineError::ScoringService {
            message: format!("sentiment prediction {index} does not match its comment"),
        });
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct HttpSentimentClient {
    client: reqwest::Client,
    predict_timestamps_url: String,
    predict_url: String,
    home_url: String,
}

impl HttpSentimentClient {
    pub fn new(client: reqwest::Client, config: &PipelineConfig) -> Self {
        Self {
            client,
            predict_timestamps_url: config.endpoint("/predict_with_timestamps"),
            predict_url: config.endpoint("/predict"),
            home_url: config.endpoint("/"),
        }
    }

    /// Calls the backend's welcome route and returns its message.
    pub async fn health(&self) -> Result<String, PipelineError> {
        let response = self
            .client
            .get(&self.home_url)
            .send()
            .await
            .map_err(|err| PipelineError::from_reqwest(SERVICE, err))?;
        if !response.status().is_success() {
            return Err(failure(response).await);
        }
        let welcome: Welcome = response
            .json()
            .await
            .map_err(|err| PipelineError::from_reqwest(SERVICE, err))?;
        Ok(welcome.message)
    }

    async fn post<B, T>(&self, url: &str, body: &B) -> Result<T, PipelineError>
    where
        B: Serialize + Sync,
        T: for<'de> Deserialize<'de>,
    {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|err| PipelineError::from_reqwest(SERVICE, err))?;
        if !response.status().is_success() {
            return Err(failure(response).await);
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|err| PipelineError::from_reqwest(SERVICE, err))?;
        serde_json::from_slice(&bytes).map_err(|err| PipelineError::ScoringService {
            message: format!("unreadable sentiment response: {err}"),
        })
    }
}

#[async_trait::async_trait]
impl SentimentScorer for HttpSentimentClient {
    async fn predict_with_timestamps(
        &self,
        comments: &[RawComment],
    ) -> Result<Vec<SentimentPrediction>, PipelineError> {
        pulse_debug!("scoring {} comments", comments.len());
        let predictions: Vec<SentimentPrediction> = self
            .post(&self.predict_timestamps_url, &TimestampRequest { comments })
            .await?;
        verify_alignment(comments, &predictions)?;
        Ok(predictions)
    }

    async fn predict(&self, texts: &[String]) -> Result<Vec<ScoredText>, PipelineError> {
        pulse_debug!("scoring {} snippets", texts.len());
        let scored: Vec<ScoredText> = self
            .post(&self.predict_url, &TextRequest { comments: texts })
            .await?;
        if scored.len() != texts.len() {
            return Err(PipelineError::ScoringService {
                message: format!(
                    "sentiment service returned {} predictions for {} snippets",
                    scored.len(),
                    texts.len()
                ),
            });
        }
        Ok(scored)
    }
}

async fn failure(response: reqwest::Response) -> PipelineError {
    let status = response.status();
    let detail = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.detail)
        .and_then(|detail| match detail {
            serde_json::Value::String(text) if !text.is_empty() => Some(text),
            _ => None,
        });
    pulse_warn!(
        "sentiment service returned {} detail={:?}",
        status.as_u16(),
        detail
    );
    PipelineError::ScoringService {
        message: detail.unwrap_or_else(|| FALLBACK_MESSAGE.to_string()),
    }
}

#[derive(Serialize)]
struct TimestampRequest<'a> {
    comments: &'a [RawComment],
}

#[derive(Serialize)]
struct TextRequest<'a> {
    comments: &'a [String],
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct Welcome {
    message: String,
}
