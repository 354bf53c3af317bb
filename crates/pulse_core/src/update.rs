use crate::{AppState, Effect, Msg, RunPhase};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::AnalyzeClicked { url } => {
            let url = url.trim();
            if url.is_empty() {
                return (state, Vec::new());
            }
            // The trigger stays disabled while a run is in flight.
            if matches!(state.phase(), RunPhase::Running { .. }) {
                return (state, Vec::new());
            }
            let run_id = state.start_run();
            vec![Effect::StartAnalysis {
                run_id,
                url: url.to_owned(),
            }]
        }
        Msg::RunProgress { run_id, stage } => {
            if state.is_current(run_id) {
                state.apply_progress(stage);
            }
            Vec::new()
        }
        Msg::RunSucceeded { run_id, report } => {
            if state.is_current(run_id) {
                state.apply_success(report);
            }
            Vec::new()
        }
        Msg::RunFailed { run_id, message } => {
            if state.is_current(run_id) {
                state.apply_failure(message);
            }
            Vec::new()
        }
        Msg::Dismissed => {
            if matches!(state.phase(), RunPhase::Success | RunPhase::Failed) {
                state.dismiss();
            }
            Vec::new()
        }
        Msg::Tick => Vec::new(),
    };

    (state, effects)
}
