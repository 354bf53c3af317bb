use std::path::{Path, PathBuf};

use pulse_logging::pulse_info;
use serde_json::json;

use crate::persist::{ArtifactWriter, PersistError};
use crate::{ChartKind, RunOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub report_path: PathBuf,
    pub chart_paths: Vec<(ChartKind, PathBuf)>,
}

impl ExportSummary {
    pub fn chart_path(&self, kind: ChartKind) -> Option<&Path> {
        self.chart_paths
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, path)| path.as_path())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Writes every rendered chart as `{video_id}-{chart}.png` and the run report
/// as `{video_id}-report.json` into `output_dir`.
pub fn export_run(
    output_dir: &Path,
    outcome: &RunOutcome,
    generated_utc: &str,
) -> Result<ExportSummary, ExportError> {
    let writer = ArtifactWriter::new(output_dir)?;
    let video_id = &outcome.video_id;

    let mut chart_paths = Vec::new();
    for kind in ChartKind::ALL {
        if let Some(image) = outcome.charts.get(kind) {
            chart_paths.push((kind, writer.write_chart(video_id, image)?));
        }
    }

    let analysis = &outcome.analysis;
    let report = json!({
        "video_id": video_id.as_str(),
        "generated_utc": generated_utc,
        "metrics": analysis.metrics,
        "sentiment_counts": analysis.counts,
        "top_comments": analysis.top_comments.iter().map(|c| {
            json!({
                "rank": c.rank,
                "comment": c.comment,
                "sentiment": c.sentiment,
                "label": c.label(),
            })
        }).collect::<Vec<_>>(),
        "charts": chart_paths.iter().map(|(kind, path)| {
            json!({ "chart": kind.name(), "path": path.display().to_string() })
        }).collect::<Vec<_>>(),
    });
    let report_path = writer.write_report(video_id, &serde_json::to_string_pretty(&report)?)?;

    pulse_info!(
        "exported report and {} chart(s) for video={} to {:?}",
        chart_paths.len(),
        video_id,
        writer.dir()
    );
    Ok(ExportSummary {
        report_path,
        chart_paths,
    })
}
