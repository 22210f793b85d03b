//! Terminal renderers
//!
//! Plain-text tables and CSV for the dashboard views.

use crate::aggregate::{Grouped, Leaderboard};
use crate::dashboard::DashboardSummary;
use crate::domain::PredictionRecord;

use super::formatter::format_output;

/// Leaderboard as a fixed-width table, one block per dataset
pub fn leaderboard_table(board: &Leaderboard) -> String {
    if board.is_empty() {
        return "No models yet.\n".to_string();
    }

    let mut out = String::new();
    for dataset in &board.datasets {
        out.push_str(&format!("{}\n", dataset.dataset));
        out.push_str(&format!(
            "  {:<4} {:<24} {:>16} {:>8} {:<10}\n",
            "Rank", "Model", "Avg output", "Records", "Status"
        ));
        out.push_str(&format!("  {}\n", "-".repeat(66)));

        for entry in &dataset.entries {
            let formatted = format_output(&dataset.dataset, entry.summary.avg_output, None);
            let marker = if entry.best { " *best*" } else { "" };
            out.push_str(&format!(
                "  {:<4} {:<24} {:>16} {:>8} {:<10}{}\n",
                entry.rank,
                entry.summary.model_name,
                formatted.value,
                entry.summary.records,
                entry.summary.status,
                marker
            ));
        }
        out.push('\n');
    }
    out
}

/// Prediction history as a table, grouped by dataset
pub fn history_table(history: &Grouped<PredictionRecord>) -> String {
    if history.is_empty() {
        return "No predictions yet.\n".to_string();
    }

    let mut out = String::new();
    for (dataset, records) in history.iter() {
        out.push_str(&format!("{} ({} predictions)\n", dataset, records.len()));
        out.push_str(&format!(
            "  {:<20} {:<24} {:>18} {:>10}\n",
            "Created", "Model", "Prediction", "Confidence"
        ));
        out.push_str(&format!("  {}\n", "-".repeat(75)));

        for record in records {
            let formatted = format_output(dataset, record.output, record.confidence);
            let created = record
                .created_at_utc()
                .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "-".to_string());
            out.push_str(&format!(
                "  {:<20} {:<24} {:>18} {:>10}\n",
                created,
                record.model_name,
                formatted.value,
                formatted.confidence.unwrap_or_else(|| "-".to_string())
            ));
        }
        out.push('\n');
    }
    out
}

/// Overview block
pub fn summary_text(summary: &DashboardSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!("Datasets:          {}\n", summary.datasets));
    out.push_str(&format!(
        "Models:            {} ({} active)\n",
        summary.models, summary.active_models
    ));
    out.push_str(&format!("Total predictions: {}\n", summary.total_predictions));

    if !summary.best_per_dataset.is_empty() {
        out.push_str("\nBest models:\n");
        for best in &summary.best_per_dataset {
            out.push_str(&format!(
                "  {:<20} {:<24} {}\n",
                best.dataset, best.model_name, best.display
            ));
        }
    }

    if !summary.errors.is_empty() {
        out.push_str("\nErrors:\n");
        for error in &summary.errors {
            out.push_str(&format!("  {}\n", error));
        }
    }
    out
}

/// Leaderboard as CSV
pub fn leaderboard_csv(board: &Leaderboard) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "dataset",
        "rank",
        "best",
        "model_name",
        "avg_output",
        "display",
        "records",
        "status",
    ])?;

    for dataset in &board.datasets {
        for entry in &dataset.entries {
            let formatted = format_output(&dataset.dataset, entry.summary.avg_output, None);
            writer.write_record([
                dataset.dataset.clone(),
                entry.rank.to_string(),
                entry.best.to_string(),
                entry.summary.model_name.clone(),
                entry.summary.avg_output.to_string(),
                formatted.value,
                entry.summary.records.to_string(),
                entry.summary.status.to_string(),
            ])?;
        }
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Prediction history as CSV
pub fn history_csv(history: &Grouped<PredictionRecord>) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "dataset",
        "model_name",
        "output",
        "display",
        "confidence",
        "created_at",
    ])?;

    for (dataset, records) in history.iter() {
        for record in records {
            let formatted = format_output(dataset, record.output, record.confidence);
            writer.write_record([
                dataset.to_string(),
                record.model_name.clone(),
                record.output.to_string(),
                formatted.value,
                formatted.confidence.unwrap_or_default(),
                record.created_at.clone(),
            ])?;
        }
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
