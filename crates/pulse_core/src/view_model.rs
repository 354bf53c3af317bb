use crate::{ChartSlot, RankedComment, RunPhase, RunReport};

/// Display strings for the summary metrics panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsView {
    pub total_comments: String,
    pub unique_users: String,
    pub avg_length: String,
    pub sentiment_score: String,
}

impl MetricsView {
    pub(crate) fn from_report(report: &RunReport) -> Self {
        Self {
            total_comments: report.total_comments.to_string(),
            unique_users: report.unique_users.to_string(),
            avg_length: format!("{:.1} words", report.avg_word_length),
            sentiment_score: format!("{:.1}/10", report.normalized_score),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRowView {
    pub rank: String,
    pub text: String,
    pub label: &'static str,
}

impl CommentRowView {
    pub(crate) fn from_ranked(comment: &RankedComment) -> Self {
        Self {
            rank: format!("#{}", comment.rank),
            text: comment.text.clone(),
            label: comment.label.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: RunPhase,
    pub analyze_enabled: bool,
    pub loader_text: Option<String>,
    pub error: Option<String>,
    pub metrics: Option<MetricsView>,
    pub charts: Vec<ChartSlot>,
    pub top_comments: Vec<CommentRowView>,
    pub dirty: bool,
}
