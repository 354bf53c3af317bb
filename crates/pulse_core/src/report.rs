/// Display label for a sentiment class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Negative => "Negative",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SentimentTally {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentTally {
    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedComment {
    pub rank: usize,
    pub text: String,
    pub label: SentimentLabel,
}

/// A chart the run asked for. `location` stays `None` when rendering failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSlot {
    pub name: String,
    pub location: Option<String>,
}

/// Everything the front end needs to display a finished run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunReport {
    pub video_id: String,
    pub total_comments: usize,
    pub unique_users: usize,
    pub avg_word_length: f64,
    pub normalized_score: f64,
    pub tally: SentimentTally,
    pub top_comments: Vec<RankedComment>,
    pub charts: Vec<ChartSlot>,
}
