use crate::view_model::{AppViewModel, CommentRowView, MetricsView};
use crate::RunReport;

pub type RunId = u64;

/// Pipeline stage reported while a run is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Connecting,
    FetchingComments,
    Scoring { comment_count: usize },
    Visualizing,
    Done,
}

impl Stage {
    pub fn loader_text(self) -> String {
        match self {
            Stage::Connecting => "Connecting to YouTube...".to_string(),
            Stage::FetchingComments => "Fetching comments from YouTube...".to_string(),
            Stage::Scoring { comment_count } => format!("Analyzing {comment_count} comments..."),
            Stage::Visualizing => "Generating visualizations...".to_string(),
            Stage::Done => "Done".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunPhase {
    #[default]
    Idle,
    Running {
        stage: Stage,
    },
    Success,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    phase: RunPhase,
    last_run_id: RunId,
    report: Option<RunReport>,
    error: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Id of the run currently in flight, if any.
    pub fn active_run(&self) -> Option<RunId> {
        match self.phase {
            RunPhase::Running { .. } => Some(self.last_run_id),
            _ => None,
        }
    }

    pub fn report(&self) -> Option<&RunReport> {
        self.report.as_ref()
    }

    pub fn view(&self) -> AppViewModel {
        let loader_text = match self.phase {
            RunPhase::Running { stage } => Some(stage.loader_text()),
            _ => None,
        };
        let (metrics, charts, top_comments) = match (&self.report, self.phase) {
            (Some(report), RunPhase::Success) => (
                Some(MetricsView::from_report(report)),
                report.charts.clone(),
                report
                    .top_comments
                    .iter()
                    .map(CommentRowView::from_ranked)
                    .collect(),
            ),
            _ => (None, Vec::new(), Vec::new()),
        };

        AppViewModel {
            phase: self.phase,
            analyze_enabled: !matches!(self.phase, RunPhase::Running { .. }),
            loader_text,
            error: self.error.clone(),
            metrics,
            charts,
            top_comments,
            dirty: self.dirty,
        }
    }

    /// Returns whether the state changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn is_current(&self, run_id: RunId) -> bool {
        self.active_run() == Some(run_id)
    }

    /// Previous results are discarded, never merged.
    pub(crate) fn start_run(&mut self) -> RunId {
        self.report = None;
        self.error = None;
        self.last_run_id += 1;
        self.phase = RunPhase::Running {
            stage: Stage::Connecting,
        };
        self.dirty = true;
        self.last_run_id
    }

    pub(crate) fn apply_progress(&mut self, stage: Stage) {
        if let RunPhase::Running { stage: current } = self.phase {
            if current != stage {
                self.phase = RunPhase::Running { stage };
                self.dirty = true;
            }
        }
    }

    pub(crate) fn apply_success(&mut self, report: RunReport) {
        self.phase = RunPhase::Success;
        self.report = Some(report);
        self.error = None;
        self.dirty = true;
    }

    pub(crate) fn apply_failure(&mut self, message: String) {
        self.phase = RunPhase::Failed;
        self.report = None;
        self.error = Some(message);
        self.dirty = true;
    }

    pub(crate) fn dismiss(&mut self) {
        self.phase = RunPhase::Idle;
        self.report = None;
        self.error = None;
        self.dirty = true;
    }
}
