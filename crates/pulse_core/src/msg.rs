#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User asked to analyze the page at `url`.
    AnalyzeClicked { url: String },
    /// Engine moved a run to a new stage.
    RunProgress {
        run_id: crate::RunId,
        stage: crate::Stage,
    },
    /// Engine finished a run.
    RunSucceeded {
        run_id: crate::RunId,
        report: crate::RunReport,
    },
    /// Engine aborted a run with a user-facing message.
    RunFailed {
        run_id: crate::RunId,
        message: String,
    },
    /// User acknowledged the outcome; return to idle.
    Dismissed,
    /// UI/render tick to coalesce rendering.
    Tick,
}
