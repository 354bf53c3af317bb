#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run the full analysis pipeline for the page at `url`.
    StartAnalysis { run_id: crate::RunId, url: String },
}
