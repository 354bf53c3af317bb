//! Pulse core: pure run state machine and view-model helpers.
mod effect;
mod msg;
mod report;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use report::{ChartSlot, RankedComment, RunReport, SentimentLabel, SentimentTally};
pub use state::{AppState, RunId, RunPhase, Stage};
pub use update::update;
pub use view_model::{AppViewModel, CommentRowView, MetricsView};
