use std::time::Duration;

use pulse_core::{
    ChartSlot, Effect, Msg, RankedComment, RunId, RunReport, SentimentLabel, SentimentTally, Stage,
};
use pulse_engine::{ChartKind, EngineEvent, EngineHandle, RunOutcome, Sentiment};
use pulse_logging::{pulse_error, pulse_info, pulse_warn};

/// Executes core effects on the engine and turns engine events back into
/// core messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    /// Hands `effects` to the engine. Effects the engine can no longer accept
    /// come back as failure messages for their runs.
    pub fn enqueue(&self, effects: Vec<Effect>) -> Vec<Msg> {
        let mut feedback = Vec::new();
        for effect in effects {
            match effect {
                Effect::StartAnalysis { run_id, url } => {
                    pulse_info!("StartAnalysis run_id={} url={}", run_id, url);
                    if let Err(err) = self.engine.analyze(run_id, url) {
                        pulse_error!("run={} could not be started: {}", run_id, err);
                        feedback.push(Msg::RunFailed {
                            run_id,
                            message: err.to_string(),
                        });
                    }
                }
            }
        }
        feedback
    }

    /// Waits up to `timeout` for the next engine event. A timeout yields
    /// [`Msg::Tick`]; a dead engine fails `active_run`.
    pub fn poll(&self, active_run: RunId, timeout: Duration) -> Msg {
        match self.engine.recv_timeout(timeout) {
            Ok(Some(event)) => msg_from_event(event),
            Ok(None) => Msg::Tick,
            Err(err) => {
                pulse_error!("run={} lost its engine: {}", active_run, err);
                Msg::RunFailed {
                    run_id: active_run,
                    message: err.to_string(),
                }
            }
        }
    }
}

pub fn msg_from_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Progress { run_id, stage } => Msg::RunProgress {
            run_id,
            stage: map_stage(stage),
        },
        EngineEvent::RunCompleted { run_id, result } => match result {
            Ok(outcome) => Msg::RunSucceeded {
                run_id,
                report: report_from_outcome(&outcome),
            },
            Err(err) => {
                pulse_warn!("Run {} failed: {}", run_id, err);
                Msg::RunFailed {
                    run_id,
                    message: err.to_string(),
                }
            }
        },
    }
}

pub fn map_stage(stage: pulse_engine::Stage) -> Stage {
    match stage {
        pulse_engine::Stage::Connecting => Stage::Connecting,
        pulse_engine::Stage::FetchingComments => Stage::FetchingComments,
        pulse_engine::Stage::Scoring { comment_count } => Stage::Scoring { comment_count },
        pulse_engine::Stage::Visualizing => Stage::Visualizing,
        pulse_engine::Stage::Done => Stage::Done,
    }
}

/// Flattens an engine outcome into the report the front end displays.
///
/// A chart slot gets a location only when its image was both rendered and
/// written to disk.
pub fn report_from_outcome(outcome: &RunOutcome) -> RunReport {
    let analysis = &outcome.analysis;
    let charts = ChartKind::ALL
        .iter()
        .map(|kind| ChartSlot {
            name: kind.name().to_string(),
            location: outcome
                .artifacts
                .as_ref()
                .and_then(|artifacts| artifacts.chart_path(*kind))
                .map(|path| path.display().to_string()),
        })
        .collect();

    RunReport {
        video_id: outcome.video_id.to_string(),
        total_comments: analysis.metrics.total_comments,
        unique_users: analysis.metrics.unique_users,
        avg_word_length: analysis.metrics.avg_word_length,
        normalized_score: analysis.metrics.normalized_score,
        tally: SentimentTally {
            positive: analysis.counts.positive,
            neutral: analysis.counts.neutral,
            negative: analysis.counts.negative,
        },
        top_comments: analysis
            .top_comments
            .iter()
            .map(|ranked| RankedComment {
                rank: ranked.rank,
                text: ranked.comment.clone(),
                label: map_label(ranked.sentiment),
            })
            .collect(),
        charts,
    }
}

fn map_label(sentiment: Sentiment) -> SentimentLabel {
    match sentiment {
        Sentiment::Positive => SentimentLabel::Positive,
        Sentiment::Neutral => SentimentLabel::Neutral,
        Sentiment::Negative => SentimentLabel::Negative,
    }
}
