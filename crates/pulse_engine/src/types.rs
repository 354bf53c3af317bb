use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize, Serializer};

use crate::export::ExportSummary;
use crate::PipelineError;

pub type RunId = u64;

/// Author id recorded when the listing API omits the channel id.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// 11-character video token taken from a watch page address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    pub(crate) fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawComment {
    pub text: String,
    pub timestamp: String,
    pub author_id: String,
}

/// Sentiment class as produced by the scoring service.
///
/// On the wire the classes are the strings `"1"`, `"0"` and `"-1"`; the plain
/// `/predict` endpoint returns bare integers, so both forms are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "WireLabel")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn score(self) -> i8 {
        match self {
            Sentiment::Positive => 1,
            Sentiment::Neutral => 0,
            Sentiment::Negative => -1,
        }
    }

    pub fn wire_label(self) -> &'static str {
        match self {
            Sentiment::Positive => "1",
            Sentiment::Neutral => "0",
            Sentiment::Negative => "-1",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
        }
    }

    fn from_score(score: i64) -> Option<Self> {
        match score {
            1 => Some(Sentiment::Positive),
            0 => Some(Sentiment::Neutral),
            -1 => Some(Sentiment::Negative),
            _ => None,
        }
    }
}

impl Serialize for Sentiment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.wire_label())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireLabel {
    Text(String),
    Number(i64),
}

impl TryFrom<WireLabel> for Sentiment {
    type Error = String;

    fn try_from(value: WireLabel) -> Result<Self, Self::Error> {
        let parsed = match &value {
            WireLabel::Text(text) => text.trim().parse::<i64>().ok(),
            WireLabel::Number(n) => Some(*n),
        };
        parsed
            .and_then(Sentiment::from_score)
            .ok_or_else(|| match value {
                WireLabel::Text(text) => format!("unknown sentiment label {text:?}"),
                WireLabel::Number(n) => format!("unknown sentiment label {n}"),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentPrediction {
    pub comment: String,
    pub sentiment: Sentiment,
    pub timestamp: String,
}

/// Per-class tallies, serialized with the service's label keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SentimentCounts {
    #[serde(rename = "1")]
    pub positive: usize,
    #[serde(rename = "0")]
    pub neutral: usize,
    #[serde(rename = "-1")]
    pub negative: usize,
}

impl SentimentCounts {
    pub(crate) fn record(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Neutral => self.neutral += 1,
            Sentiment::Negative => self.negative += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }

    pub fn get(&self, sentiment: Sentiment) -> usize {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Neutral => self.neutral,
            Sentiment::Negative => self.negative,
        }
    }
}

/// One point of the sentiment trend series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentimentPoint {
    pub timestamp: String,
    pub sentiment: i8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryMetrics {
    pub total_comments: usize,
    pub unique_users: usize,
    pub total_words: usize,
    pub avg_word_length: f64,
    pub normalized_score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedPrediction {
    pub rank: usize,
    pub comment: String,
    pub sentiment: Sentiment,
}

impl RankedPrediction {
    pub fn label(&self) -> &'static str {
        self.sentiment.display_name()
    }
}

/// Result of folding one batch of predictions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub counts: SentimentCounts,
    pub series: Vec<SentimentPoint>,
    pub metrics: SummaryMetrics,
    pub top_comments: Vec<RankedPrediction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Distribution,
    Trend,
    WordCloud,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Distribution, ChartKind::Trend, ChartKind::WordCloud];

    pub fn endpoint(self) -> &'static str {
        match self {
            ChartKind::Distribution => "/generate_chart",
            ChartKind::Trend => "/generate_trend_graph",
            ChartKind::WordCloud => "/generate_wordcloud",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ChartKind::Distribution => "distribution",
            ChartKind::Trend => "trend",
            ChartKind::WordCloud => "wordcloud",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartImage {
    pub kind: ChartKind,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// The three chart slots of a run; a `None` slot failed to render.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChartSet {
    pub distribution: Option<ChartImage>,
    pub trend: Option<ChartImage>,
    pub wordcloud: Option<ChartImage>,
}

impl ChartSet {
    pub fn get(&self, kind: ChartKind) -> Option<&ChartImage> {
        match kind {
            ChartKind::Distribution => self.distribution.as_ref(),
            ChartKind::Trend => self.trend.as_ref(),
            ChartKind::WordCloud => self.wordcloud.as_ref(),
        }
    }

    pub fn rendered(&self) -> usize {
        ChartKind::ALL
            .iter()
            .filter(|kind| self.get(**kind).is_some())
            .count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Connecting,
    FetchingComments,
    Scoring { comment_count: usize },
    Visualizing,
    Done,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub video_id: VideoId,
    pub analysis: Analysis,
    pub charts: ChartSet,
    pub artifacts: Option<ExportSummary>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Progress {
        run_id: RunId,
        stage: Stage,
    },
    RunCompleted {
        run_id: RunId,
        result: Result<RunOutcome, PipelineError>,
    },
}
