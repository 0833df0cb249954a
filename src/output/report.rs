//! Report structures shared by every output format

use crate::catalog::{AliasMap, CareerTable, Course};
use crate::processing::bulk::BulkSummary;
use crate::processing::classifier::Prediction;
use crate::processing::resume::ResumeAnalysis;
use crate::processing::similarity::RankedCareer;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

/// Metadata stamped onto every report
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub tool_version: String,
}

impl ReportMetadata {
    pub fn now() -> Self {
        Self {
            generated_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Default for ReportMetadata {
    fn default() -> Self {
        Self::now()
    }
}

/// One ranked career enriched with catalog details
#[derive(Debug, Clone, Serialize)]
pub struct CareerSuggestion {
    pub rank: usize,
    pub name: String,
    pub score: f64,
    pub description: String,
    pub next_steps: Vec<String>,
    pub courses: Vec<Course>,
}

/// Interest-based suggestion results
#[derive(Debug, Clone, Serialize)]
pub struct SuggestReport {
    pub query: String,
    pub suggestions: Vec<CareerSuggestion>,
    pub metadata: ReportMetadata,
}

impl SuggestReport {
    /// Joins ranked similarity results with the catalog entries behind them.
    pub fn new(query: impl Into<String>, ranked: &[RankedCareer], table: &CareerTable) -> Self {
        let suggestions = ranked
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let (description, next_steps, courses) = match table.get(&r.name) {
                    Some(rec) => (
                        rec.description.clone(),
                        rec.next_steps.clone(),
                        rec.courses.clone(),
                    ),
                    None => (String::new(), Vec::new(), Vec::new()),
                };
                CareerSuggestion {
                    rank: i + 1,
                    name: r.name.clone(),
                    score: r.score,
                    description,
                    next_steps,
                    courses,
                }
            })
            .collect();

        Self {
            query: query.into(),
            suggestions,
            metadata: ReportMetadata::now(),
        }
    }
}

/// One classifier prediction with its resolved catalog entry
#[derive(Debug, Clone, Serialize)]
pub struct PredictedCareer {
    pub rank: usize,
    /// Canonical catalog name after alias resolution.
    pub name: String,
    pub probability: f64,
    pub description: String,
    pub next_steps: Vec<String>,
}

/// Classifier-backed prediction results
#[derive(Debug, Clone, Serialize)]
pub struct PredictReport {
    pub query: String,
    pub predictions: Vec<PredictedCareer>,
    pub metadata: ReportMetadata,
}

impl PredictReport {
    /// Resolves classifier labels through the alias map and attaches catalog
    /// details. Labels without a catalog entry keep a placeholder description.
    pub fn new(
        query: impl Into<String>,
        predictions: &[Prediction],
        table: &CareerTable,
        aliases: &AliasMap,
    ) -> Self {
        let predictions = predictions
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let name = aliases.resolve(&p.label).to_string();
                let (description, next_steps) = match table.get(&name) {
                    Some(rec) => (rec.description.clone(), rec.next_steps.clone()),
                    None => ("N/A".to_string(), Vec::new()),
                };
                PredictedCareer {
                    rank: i + 1,
                    name,
                    probability: p.probability,
                    description,
                    next_steps,
                }
            })
            .collect();

        Self {
            query: query.into(),
            predictions,
            metadata: ReportMetadata::now(),
        }
    }
}

/// Resume analysis results for a single file
#[derive(Debug, Clone, Serialize)]
pub struct ResumeReport {
    pub resume_file: String,
    pub analysis: ResumeAnalysis,
    pub verdict: String,
    pub metadata: ReportMetadata,
}

impl ResumeReport {
    pub fn new(resume_file: &Path, analysis: ResumeAnalysis) -> Self {
        let verdict = Self::verdict_for(analysis.overall_score_pct).to_string();
        Self {
            resume_file: resume_file.display().to_string(),
            analysis,
            verdict,
            metadata: ReportMetadata::now(),
        }
    }

    fn verdict_for(pct: f64) -> &'static str {
        if pct >= 85.0 {
            "Strong alignment. This resume is ready for applications in this field."
        } else if pct >= 70.0 {
            "Good alignment. Tighten the flagged sections before applying."
        } else if pct >= 50.0 {
            "Fair alignment. Work the missing career terms into your experience."
        } else {
            "Weak alignment. Consider reshaping the resume around this career first."
        }
    }
}

/// Batch CSV prediction results
#[derive(Debug, Clone, Serialize)]
pub struct BulkReport {
    pub input_file: String,
    pub summary: BulkSummary,
    pub metadata: ReportMetadata,
}

impl BulkReport {
    pub fn new(input_file: &Path, summary: BulkSummary) -> Self {
        Self {
            input_file: input_file.display().to_string(),
            summary,
            metadata: ReportMetadata::now(),
        }
    }
}

/// Classifier training run results
#[derive(Debug, Clone, Serialize)]
pub struct TrainReport {
    pub examples: usize,
    pub classes: usize,
    pub training_accuracy: f64,
    pub artifact_path: String,
    pub metadata: ReportMetadata,
}

impl TrainReport {
    pub fn new(examples: usize, classes: usize, training_accuracy: f64, artifact_path: &Path) -> Self {
        Self {
            examples,
            classes,
            training_accuracy,
            artifact_path: artifact_path.display().to_string(),
            metadata: ReportMetadata::now(),
        }
    }
}

/// Every report kind the tool can emit
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "report_type", rename_all = "snake_case")]
pub enum Report {
    Suggest(SuggestReport),
    Predict(PredictReport),
    Resume(ResumeReport),
    Bulk(BulkReport),
    Train(TrainReport),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CareerRecord, DedupePolicy};
    use std::collections::HashMap;

    fn small_table() -> CareerTable {
        CareerTable::from_records(
            vec![
                CareerRecord {
                    name: "Chef".to_string(),
                    description: "Cook professionally".to_string(),
                    next_steps: vec!["Attend culinary school".to_string()],
                    courses: vec![],
                },
                CareerRecord {
                    name: "Software Engineer".to_string(),
                    description: "Write software".to_string(),
                    next_steps: vec!["Build projects".to_string()],
                    courses: vec![Course {
                        name: "CS50".to_string(),
                        url: "https://example.com/cs50".to_string(),
                    }],
                },
            ],
            DedupePolicy::Reject,
        )
        .unwrap()
    }

    #[test]
    fn test_suggest_report_attaches_catalog_details() {
        let table = small_table();
        let ranked = vec![
            RankedCareer {
                name: "Software Engineer".to_string(),
                score: 0.9,
            },
            RankedCareer {
                name: "Chef".to_string(),
                score: 0.1,
            },
        ];

        let report = SuggestReport::new("I like programming", &ranked, &table);
        assert_eq!(report.suggestions.len(), 2);
        assert_eq!(report.suggestions[0].rank, 1);
        assert_eq!(report.suggestions[0].name, "Software Engineer");
        assert_eq!(report.suggestions[0].description, "Write software");
        assert_eq!(report.suggestions[0].courses.len(), 1);
        assert_eq!(report.suggestions[1].rank, 2);
    }

    #[test]
    fn test_predict_report_resolves_aliases_and_falls_back() {
        let table = small_table();
        let aliases = AliasMap::new(
            HashMap::from([(
                "Software Engineer / Developer".to_string(),
                "Software Engineer".to_string(),
            )]),
            vec!["Astronaut".to_string()],
        );
        let predictions = vec![
            Prediction {
                label: "Software Engineer / Developer".to_string(),
                probability: 0.8,
            },
            Prediction {
                label: "Astronaut".to_string(),
                probability: 0.2,
            },
        ];

        let report = PredictReport::new("code all day", &predictions, &table, &aliases);
        assert_eq!(report.predictions[0].name, "Software Engineer");
        assert_eq!(report.predictions[0].description, "Write software");
        assert_eq!(report.predictions[1].name, "Astronaut");
        assert_eq!(report.predictions[1].description, "N/A");
        assert!(report.predictions[1].next_steps.is_empty());
    }

    #[test]
    fn test_verdict_buckets() {
        assert!(ResumeReport::verdict_for(92.0).starts_with("Strong"));
        assert!(ResumeReport::verdict_for(75.0).starts_with("Good"));
        assert!(ResumeReport::verdict_for(55.0).starts_with("Fair"));
        assert!(ResumeReport::verdict_for(20.0).starts_with("Weak"));
    }

    #[test]
    fn test_report_serializes_with_type_tag() {
        let table = small_table();
        let report = Report::Suggest(SuggestReport::new("cooking", &[], &table));
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"report_type\":\"suggest\""));
        assert!(json.contains("\"tool_version\""));
    }
}
