use std::collections::VecDeque;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use pulse_core::{update, AppState, Msg, RunPhase};
use pulse_engine::{
    build_client, decode_page, handle_message, Analyzer, EngineConfig, EngineHandle,
    HttpSentimentClient, ScrapeRequest, SelectorScraper,
};
use pulse_logging::{pulse_debug, pulse_info};

use super::cli::{Cli, Command};
use super::config::{self, AppConfig};
use super::effects::EffectRunner;
use super::{logging, render};

/// Interval at which the front end ticks while waiting on the engine.
const TICK: Duration = Duration::from_millis(75);

pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::initialize(cli.log.into(), cli.verbose);

    match cli.command {
        Command::Analyze { url, overrides } => {
            let config = config::load(cli.config.as_deref(), overrides.into())?;
            analyze(config, &url)
        }
        Command::Scrape {
            html_file,
            request,
            score,
            overrides,
        } => {
            let config = config::load(cli.config.as_deref(), overrides.into())?;
            scrape(config, &html_file, &request, score)
        }
        Command::Health { overrides } => {
            let config = config::load(cli.config.as_deref(), overrides.into())?;
            health(config)
        }
    }
}

fn analyze(config: AppConfig, url: &str) -> Result<ExitCode> {
    let mut engine_config = EngineConfig::new(config.pipeline, Some(config.output_dir));
    engine_config.generated_utc = Arc::new(|| Utc::now().to_rfc3339());
    let engine = EngineHandle::new(engine_config).context("starting analysis engine")?;
    let runner = EffectRunner::new(engine);

    let mut app = App::default();
    let start = Msg::AnalyzeClicked {
        url: url.to_string(),
    };
    app.dispatch(start, &runner)?;
    if app.state.phase() == RunPhase::Failed {
        return Ok(ExitCode::FAILURE);
    }
    let Some(run_id) = app.state.active_run() else {
        bail!("no page address given");
    };

    loop {
        let msg = runner.poll(run_id, TICK);
        app.dispatch(msg, &runner)?;
        match app.state.phase() {
            RunPhase::Success => return Ok(ExitCode::SUCCESS),
            RunPhase::Failed => return Ok(ExitCode::FAILURE),
            RunPhase::Idle | RunPhase::Running { .. } => {}
        }
    }
}

#[derive(Default)]
struct App {
    state: AppState,
}

impl App {
    /// Applies `msg` and any messages its effects feed back, rendering after
    /// every change.
    fn dispatch(&mut self, msg: Msg, runner: &EffectRunner) -> io::Result<()> {
        let mut pending = VecDeque::from([msg]);
        while let Some(msg) = pending.pop_front() {
            let state = std::mem::take(&mut self.state);
            let (mut state, effects) = update(state, msg);
            let view = state.view();
            let was_dirty = state.consume_dirty();
            self.state = state;
            pending.extend(runner.enqueue(effects));

            if was_dirty {
                let mut out = io::stdout().lock();
                for line in render::render(&view) {
                    writeln!(out, "{line}")?;
                }
                out.flush()?;
            }
        }
        Ok(())
    }
}

fn scrape(config: AppConfig, html_file: &Path, request: &str, score: bool) -> Result<ExitCode> {
    let request: ScrapeRequest =
        serde_json::from_str(request).context("parsing scrape request")?;
    let bytes =
        fs::read(html_file).with_context(|| format!("reading {}", html_file.display()))?;
    let page = decode_page(&bytes, None)?;
    pulse_debug!(
        "decoded {} as {} ({} bytes)",
        html_file.display(),
        page.encoding_label,
        bytes.len()
    );

    let scraper = SelectorScraper::comments(config.pipeline.scrape_limit);
    let Some(response) = handle_message(&request, &page.html, &scraper) else {
        pulse_info!("no reply for action {:?}", request.action);
        return Ok(ExitCode::SUCCESS);
    };

    let output = if score {
        let analyzer = Analyzer::from_config(config.pipeline)?;
        let scored = runtime()?.block_on(analyzer.score_snippets(&response.comments))?;
        serde_json::to_string_pretty(&scored)?
    } else {
        serde_json::to_string_pretty(&response)?
    };
    println!("{output}");
    Ok(ExitCode::SUCCESS)
}

fn health(config: AppConfig) -> Result<ExitCode> {
    let client = HttpSentimentClient::new(build_client(&config.pipeline)?, &config.pipeline);
    match runtime()?.block_on(client.health()) {
        Ok(message) => {
            println!("{}: {}", config.pipeline.api_base_url, message);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("{}: {}", config.pipeline.api_base_url, err);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn runtime() -> io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}
