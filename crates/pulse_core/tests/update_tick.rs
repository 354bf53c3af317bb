use pulse_core::{update, AppState, Msg, RunPhase, Stage};

#[test]
fn tick_leaves_idle_state_untouched() {
    let state = AppState::new();
    let (mut next, effects) = update(state.clone(), Msg::Tick);

    assert_eq!(state, next);
    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
}

#[test]
fn tick_does_not_disturb_a_running_analysis() {
    let (mut state, _) = update(
        AppState::new(),
        Msg::AnalyzeClicked {
            url: "https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string(),
        },
    );
    assert!(state.consume_dirty());

    let (mut next, effects) = update(state, Msg::Tick);

    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
    assert_eq!(
        next.phase(),
        RunPhase::Running {
            stage: Stage::Connecting
        }
    );
}
