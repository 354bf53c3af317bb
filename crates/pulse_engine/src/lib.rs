//! Pulse engine: comment ingestion, scoring, aggregation and chart requests.
mod aggregate;
mod charts;
mod comments;
mod config;
mod decode;
mod engine;
mod error;
mod export;
mod http;
mod persist;
mod pipeline;
mod scrape;
mod sentiment;
mod types;
mod video_id;

pub use aggregate::aggregate;
pub use charts::ChartRequester;
pub use comments::{fetch_comments, CommentPage, CommentSource, YoutubeCommentSource};
pub use config::{ConfigError, PipelineConfig};
pub use decode::{decode_page, DecodeError, DecodedPage};
pub use engine::{EngineConfig, EngineError, EngineHandle};
pub use error::{ChartError, PipelineError};
pub use export::{export_run, ExportError, ExportSummary};
pub use http::build_client;
pub use persist::{
    chart_filename, ensure_output_dir, report_filename, ArtifactWriter, PersistError,
};
pub use pipeline::{Analyzer, ChannelProgressSink, ProgressSink};
pub use scrape::{
    handle_message, ScrapeRequest, ScrapeResponse, Scraper, SelectorError, SelectorScraper,
    CONTENT_SELECTOR, GET_COMMENTS_ACTION,
};
pub use sentiment::{verify_alignment, HttpSentimentClient, ScoredText, SentimentScorer};
pub use types::{
    Analysis, ChartImage, ChartKind, ChartSet, EngineEvent, RankedPrediction, RawComment,
    RunId, RunOutcome, Sentiment, SentimentCounts, SentimentPoint, SentimentPrediction, Stage,
    SummaryMetrics, VideoId, UNKNOWN_AUTHOR,
};
pub use video_id::parse_video_id;
