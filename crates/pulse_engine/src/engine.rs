use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use pulse_logging::{pulse_error, pulse_info, pulse_warn};

use crate::export::export_run;
use crate::pipeline::{Analyzer, ChannelProgressSink};
use crate::{ConfigError, EngineEvent, PipelineConfig, PipelineError, RunId};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("invalid pipeline configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("analysis engine stopped unexpectedly")]
    Disconnected,
}

#[derive(Clone)]
pub struct EngineConfig {
    pub pipeline: PipelineConfig,
    /// Where run artifacts go; `None` keeps everything in memory.
    pub output_dir: Option<PathBuf>,
    pub generated_utc: Arc<dyn Fn() -> String + Send + Sync>,
}

impl EngineConfig {
    pub fn new(pipeline: PipelineConfig, output_dir: Option<PathBuf>) -> Self {
        Self {
            pipeline,
            output_dir,
            generated_utc: Arc::new(|| {
                let secs = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_secs())
                    .unwrap_or_default();
                format!("unix:{secs}")
            }),
        }
    }
}

enum EngineCommand {
    Analyze { run_id: RunId, url: String },
}

/// Runs analyses on a background tokio runtime and reports back through
/// [`EngineEvent`]s.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.pipeline.validate()?;
        let analyzer = Arc::new(Analyzer::from_config(config.pipeline.clone())?);
        Self::with_analyzer(analyzer, config)
    }

    /// Uses a prebuilt analyzer, e.g. one wired to test doubles.
    pub fn with_analyzer(analyzer: Arc<Analyzer>, config: EngineConfig) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        // Runs execute one at a time on this single thread; chart requests
        // still interleave at their await points.
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                runtime.block_on(handle_command(&analyzer, &config, command, event_tx.clone()));
            }
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn analyze(&self, run_id: RunId, url: impl Into<String>) -> Result<(), EngineError> {
        self.cmd_tx
            .send(EngineCommand::Analyze {
                run_id,
                url: url.into(),
            })
            .map_err(|_| EngineError::Disconnected)
    }

    /// Next pending event, if any. Fails once the engine thread is gone.
    pub fn try_recv(&self) -> Result<Option<EngineEvent>, EngineError> {
        match self.event_rx.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::TryRecvError::Empty) => Ok(None),
            Err(mpsc::TryRecvError::Disconnected) => Err(EngineError::Disconnected),
        }
    }

    /// Waits up to `timeout` for the next event. `Ok(None)` means the wait
    /// timed out; an error means no event will ever arrive.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<EngineEvent>, EngineError> {
        match self.event_rx.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(EngineError::Disconnected),
        }
    }
}

async fn handle_command(
    analyzer: &Analyzer,
    config: &EngineConfig,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Analyze { run_id, url } => {
            pulse_logging::set_run_id(run_id);
            pulse_info!("run={} analyzing {}", run_id, url);
            let sink = ChannelProgressSink::new(event_tx.clone());
            let result = analyzer.run(run_id, &url, &sink).await.map(|mut outcome| {
                if let Some(dir) = config.output_dir.as_deref() {
                    match export_run(dir, &outcome, &(config.generated_utc)()) {
                        Ok(summary) => outcome.artifacts = Some(summary),
                        Err(err) => pulse_error!("run={} failed to export artifacts: {}", run_id, err),
                    }
                }
                outcome
            });
            if let Err(err) = &result {
                pulse_warn!("run={} failed kind={}: {}", run_id, err.kind(), err);
            }
            let _ = event_tx.send(EngineEvent::RunCompleted { run_id, result });
        }
    }
}
