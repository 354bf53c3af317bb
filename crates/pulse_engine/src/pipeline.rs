use std::sync::Arc;

use pulse_logging::{pulse_info, pulse_warn};

use crate::comments::{fetch_comments, CommentSource, YoutubeCommentSource};
use crate::sentiment::{verify_alignment, HttpSentimentClient, ScoredText, SentimentScorer};
use crate::{
    aggregate, build_client, parse_video_id, ChartRequester, EngineEvent, PipelineConfig,
    PipelineError, RunId, RunOutcome, Stage,
};

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// One analysis pipeline: listing API, scoring service and chart renderer.
pub struct Analyzer {
    config: PipelineConfig,
    comments: Arc<dyn CommentSource>,
    scorer: Arc<dyn SentimentScorer>,
    charts: ChartRequester,
}

impl Analyzer {
    pub fn new(
        config: PipelineConfig,
        comments: Arc<dyn CommentSource>,
        scorer: Arc<dyn SentimentScorer>,
        charts: ChartRequester,
    ) -> Self {
        Self {
            config,
            comments,
            scorer,
            charts,
        }
    }

    /// Wires the HTTP-backed collaborators over one shared client.
    pub fn from_config(config: PipelineConfig) -> Result<Self, PipelineError> {
        let client = build_client(&config)?;
        let comments = Arc::new(YoutubeCommentSource::new(client.clone(), &config));
        let scorer = Arc::new(HttpSentimentClient::new(client.clone(), &config));
        let charts = ChartRequester::new(client, &config);
        Ok(Self::new(config, comments, scorer, charts))
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Scores free-text snippets, such as those scraped from a page.
    pub async fn score_snippets(&self, texts: &[String]) -> Result<Vec<ScoredText>, PipelineError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.scorer.predict(texts).await
    }

    /// Runs the whole analysis for the page at `page_url`.
    ///
    /// Stages run strictly in sequence; only the chart requests fan out. Any
    /// error before the charts ends the run. Chart failures never do.
    pub async fn run(
        &self,
        run_id: RunId,
        page_url: &str,
        sink: &dyn ProgressSink,
    ) -> Result<RunOutcome, PipelineError> {
        let progress = |stage| sink.emit(EngineEvent::Progress { run_id, stage });

        progress(Stage::Connecting);
        let video_id = parse_video_id(page_url)?;

        progress(Stage::FetchingComments);
        let comments =
            fetch_comments(self.comments.as_ref(), &video_id, self.config.max_comments).await?;
        if comments.is_empty() {
            return Err(PipelineError::NoComments);
        }

        progress(Stage::Scoring {
            comment_count: comments.len(),
        });
        let predictions = self.scorer.predict_with_timestamps(&comments).await?;
        verify_alignment(&comments, &predictions)?;

        progress(Stage::Visualizing);
        let analysis = aggregate(&comments, &predictions, self.config.top_comments)?;
        let charts = self.charts.request_all(&analysis, &comments).await;
        if charts.rendered() < 3 {
            pulse_warn!(
                "run={} rendered {}/3 charts for video={}",
                run_id,
                charts.rendered(),
                video_id
            );
        }

        progress(Stage::Done);
        pulse_info!(
            "run={} video={} comments={} score={:.1}",
            run_id,
            video_id,
            analysis.metrics.total_comments,
            analysis.metrics.normalized_score
        );
        Ok(RunOutcome {
            video_id,
            analysis,
            charts,
            artifacts: None,
        })
    }
}
