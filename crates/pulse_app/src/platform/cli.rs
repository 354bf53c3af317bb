use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use super::config::CliOverrides;
use super::logging::LogDestination;

#[derive(Parser, Debug)]
#[command(name = "pulse")]
#[command(about = "Sentiment analysis for the comments of a YouTube video")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Where log output goes
    #[arg(long, value_enum, default_value = "terminal", global = true)]
    pub log: LogTarget,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// RON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch, score and chart the comments of a video page
    Analyze {
        /// Watch page address, e.g. https://www.youtube.com/watch?v=...
        url: String,

        #[command(flatten)]
        overrides: OverrideArgs,
    },
    /// Extract visible comments from a saved page
    Scrape {
        /// Saved page HTML
        html_file: PathBuf,

        /// Inbound message as JSON
        #[arg(long, default_value = r#"{"action":"getComments"}"#)]
        request: String,

        /// Score the extracted snippets with the backend
        #[arg(long)]
        score: bool,

        #[command(flatten)]
        overrides: OverrideArgs,
    },
    /// Check that the scoring backend is reachable
    Health {
        #[command(flatten)]
        overrides: OverrideArgs,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct OverrideArgs {
    /// Scoring and chart backend base address
    #[arg(long)]
    pub api_base: Option<String>,

    /// YouTube Data API key
    #[arg(long)]
    pub api_key: Option<String>,

    /// Upper bound on fetched comments
    #[arg(long)]
    pub max_comments: Option<usize>,

    /// Directory for charts and the run report
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl From<OverrideArgs> for CliOverrides {
    fn from(args: OverrideArgs) -> Self {
        Self {
            api_base_url: args.api_base,
            api_key: args.api_key,
            max_comments: args.max_comments,
            output_dir: args.output,
        }
    }
}

/// CLI wrapper for [`LogDestination`] (needed for clap ValueEnum)
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum LogTarget {
    #[default]
    Terminal,
    File,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File,
            LogTarget::Both => LogDestination::Both,
        }
    }
}
