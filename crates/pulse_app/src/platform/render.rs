//! Plain-text rendering of the view model.

use pulse_core::{AppViewModel, RunPhase};

const TEXT_PREVIEW_CHARS: usize = 80;

/// Lines to print for `view`. Empty while idle.
pub fn render(view: &AppViewModel) -> Vec<String> {
    match view.phase {
        RunPhase::Idle => Vec::new(),
        RunPhase::Running { .. } => view.loader_text.iter().cloned().collect(),
        RunPhase::Failed => vec![format!(
            "Error: {}",
            view.error.as_deref().unwrap_or("Analysis failed")
        )],
        RunPhase::Success => render_results(view),
    }
}

fn render_results(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(metrics) = &view.metrics {
        lines.push("Comment Analysis Summary".to_string());
        lines.push(format!("  Total comments   {}", metrics.total_comments));
        lines.push(format!("  Unique commenters {}", metrics.unique_users));
        lines.push(format!("  Avg comment length {}", metrics.avg_length));
        lines.push(format!("  Sentiment score  {}", metrics.sentiment_score));
    }

    if !view.charts.is_empty() {
        lines.push(String::new());
        lines.push("Charts".to_string());
        for chart in &view.charts {
            let location = chart.location.as_deref().unwrap_or("unavailable");
            lines.push(format!("  {:<13} {}", chart.name, location));
        }
    }

    if !view.top_comments.is_empty() {
        lines.push(String::new());
        lines.push(format!("Top {} Comments", view.top_comments.len()));
        for row in &view.top_comments {
            lines.push(format!(
                "  {:>4} [{}] {}",
                row.rank,
                row.label,
                preview(&row.text)
            ));
        }
    }
    lines
}

/// Single-line preview, cut on a char boundary.
fn preview(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= TEXT_PREVIEW_CHARS {
        return flat;
    }
    let cut: String = flat.chars().take(TEXT_PREVIEW_CHARS - 3).collect();
    format!("{cut}...")
}
