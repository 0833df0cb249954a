//! Bulk career prediction over a CSV of free-text descriptions.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use serde::Serialize;

use crate::catalog::{AliasMap, CareerTable};
use crate::error::{CareerCompassError, Result};
use crate::processing::classifier::ClassifierArtifact;

/// Column that must be present in the input CSV.
pub const DESCRIPTION_COLUMN: &str = "description";

/// Default output file name, next to wherever the command runs.
pub const DEFAULT_OUTPUT: &str = "career_predictions.csv";

/// What a bulk run produced, for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct BulkSummary {
    pub rows: usize,
    pub output_path: PathBuf,
    /// Predicted career names with how many rows got each, most frequent
    /// first.
    pub label_counts: Vec<(String, usize)>,
}

/// Classifies every row of `input` and writes the original columns plus
/// `predicted_career`, `career_description`, and `next_steps` to `output`.
///
/// Predicted labels are alias-resolved to catalog names; labels without a
/// catalog record get "N/A" metadata. Rows with an empty description still
/// get the classifier's intercept-only prediction rather than failing.
pub fn predict_csv(
    input: &Path,
    output: &Path,
    artifact: &ClassifierArtifact,
    table: &CareerTable,
    aliases: &AliasMap,
    show_progress: bool,
) -> Result<BulkSummary> {
    if !input.exists() {
        return Err(CareerCompassError::InvalidInput(format!(
            "CSV file does not exist: {}",
            input.display()
        )));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(input)?;

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let description_idx = headers
        .iter()
        .position(|h| h == DESCRIPTION_COLUMN)
        .ok_or_else(|| {
            CareerCompassError::InvalidInput(format!(
                "Input CSV must contain a '{}' column",
                DESCRIPTION_COLUMN
            ))
        })?;

    let records: Vec<csv::StringRecord> =
        reader.records().collect::<std::result::Result<_, _>>()?;

    let mut writer = csv::WriterBuilder::new().from_path(output)?;
    let mut output_headers = headers.clone();
    output_headers.extend(
        ["predicted_career", "career_description", "next_steps"]
            .iter()
            .map(|s| s.to_string()),
    );
    writer.write_record(&output_headers)?;

    let progress = if show_progress {
        let bar = ProgressBar::new(records.len() as u64);
        if let Ok(style) =
            ProgressStyle::default_bar().template("  Predicting [{bar:30}] {pos}/{len}")
        {
            bar.set_style(style);
        }
        Some(bar)
    } else {
        None
    };

    let mut counts: HashMap<String, usize> = HashMap::new();
    for record in &records {
        let description = record.get(description_idx).unwrap_or("");
        let prediction = artifact
            .predict_top_k(description, 1)?
            .into_iter()
            .next()
            .ok_or_else(|| {
                CareerCompassError::Processing("Classifier produced no prediction".to_string())
            })?;

        let career_name = aliases.resolve(&prediction.label).to_string();
        let (career_description, next_steps) = match table.get(&career_name) {
            Some(career) => (career.description.clone(), career.next_steps.join(", ")),
            None => ("N/A".to_string(), String::new()),
        };

        let mut row: Vec<String> = record.iter().map(|f| f.to_string()).collect();
        row.push(career_name.clone());
        row.push(career_description);
        row.push(next_steps);
        writer.write_record(&row)?;

        *counts.entry(career_name).or_insert(0) += 1;
        if let Some(bar) = &progress {
            bar.inc(1);
        }
    }
    writer.flush()?;
    if let Some(bar) = &progress {
        bar.finish_and_clear();
    }

    let mut label_counts: Vec<(String, usize)> = counts.into_iter().collect();
    label_counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    info!(
        "Bulk prediction complete: {} rows written to {}",
        records.len(),
        output.display()
    );

    Ok(BulkSummary {
        rows: records.len(),
        output_path: output.to_path_buf(),
        label_counts,
    })
}
