//! Multinomial logistic-regression classifier over TF-IDF features, stored
//! on disk as a single JSON artifact together with its fitted vectorizer.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{CareerCompassError, Result};
use crate::processing::tfidf::TfidfVectorizer;

/// Artifact format tag, checked on load.
pub const ARTIFACT_KIND: &str = "career-compass/logistic-regression";

/// One predicted label with its softmax probability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub label: String,
    pub probability: f64,
}

/// Trained classifier plus the vectorizer it was trained with. The
/// vectorizer travels inside the artifact so predictions always use the
/// vocabulary the weights were fitted against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierArtifact {
    pub kind: String,
    pub created_at: DateTime<Utc>,
    pub training_accuracy: f64,
    pub vectorizer: TfidfVectorizer,
    pub classes: Vec<String>,
    /// One weight row per class, each row as long as the vocabulary.
    pub weights: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

impl ClassifierArtifact {
    /// Writes the artifact as pretty-printed JSON, creating parent
    /// directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        info!("Saved classifier artifact to {}", path.display());
        Ok(())
    }

    /// Loads and validates an artifact. Any failure here is a configuration
    /// error: prediction cannot run without a usable artifact.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            CareerCompassError::Configuration(format!(
                "Cannot read classifier artifact {}: {}",
                path.display(),
                e
            ))
        })?;
        let artifact: ClassifierArtifact = serde_json::from_str(&raw).map_err(|e| {
            CareerCompassError::Configuration(format!(
                "Classifier artifact {} is not valid JSON: {}",
                path.display(),
                e
            ))
        })?;
        artifact.validate()?;
        info!(
            "Loaded classifier artifact: {} classes, trained {}",
            artifact.classes.len(),
            artifact.created_at.format("%Y-%m-%d %H:%M UTC")
        );
        Ok(artifact)
    }

    fn validate(&self) -> Result<()> {
        if self.kind != ARTIFACT_KIND {
            return Err(CareerCompassError::Configuration(format!(
                "Unsupported classifier artifact kind '{}', expected '{}'",
                self.kind, ARTIFACT_KIND
            )));
        }
        if self.classes.is_empty() {
            return Err(CareerCompassError::Configuration(
                "Classifier artifact has no classes".to_string(),
            ));
        }
        if self.weights.len() != self.classes.len() || self.intercepts.len() != self.classes.len()
        {
            return Err(CareerCompassError::Configuration(format!(
                "Classifier artifact shape mismatch: {} classes, {} weight rows, {} intercepts",
                self.classes.len(),
                self.weights.len(),
                self.intercepts.len()
            )));
        }
        if !self.vectorizer.is_fitted() {
            return Err(CareerCompassError::Configuration(
                "Classifier artifact contains an unfitted vectorizer".to_string(),
            ));
        }
        let features = self.vectorizer.vocabulary_size();
        if self.weights.iter().any(|row| row.len() != features) {
            return Err(CareerCompassError::Configuration(format!(
                "Classifier artifact weight rows do not match vocabulary size {}",
                features
            )));
        }
        Ok(())
    }

    /// Raw decision scores, one per class. A feature vector whose length
    /// disagrees with the weight rows contributes nothing, leaving the
    /// intercepts alone.
    fn decision_scores(&self, features: &[f64]) -> Vec<f64> {
        self.weights
            .iter()
            .zip(self.intercepts.iter())
            .map(|(row, intercept)| {
                if row.len() != features.len() {
                    warn!(
                        "Feature vector length {} does not match weight row length {}",
                        features.len(),
                        row.len()
                    );
                    return *intercept;
                }
                let dot: f64 = row.iter().zip(features.iter()).map(|(w, x)| w * x).sum();
                dot + intercept
            })
            .collect()
    }

    /// Softmax probabilities for every class, in stored class order.
    pub fn predict_proba(&self, text: &str) -> Result<Vec<f64>> {
        let features = self.vectorizer.transform(text)?;
        Ok(softmax(&self.decision_scores(&features)))
    }

    /// Top `k` predictions, highest probability first. Equal probabilities
    /// keep the stored class order. Text with no recognized terms falls
    /// back to the intercept-only distribution rather than failing.
    pub fn predict_top_k(&self, text: &str, k: usize) -> Result<Vec<Prediction>> {
        let probabilities = self.predict_proba(text)?;

        let mut predictions: Vec<Prediction> = self
            .classes
            .iter()
            .zip(probabilities.into_iter())
            .map(|(label, probability)| Prediction {
                label: label.clone(),
                probability,
            })
            .collect();

        predictions.sort_by(|a, b| {
            b.probability
                .partial_cmp(&a.probability)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        predictions.truncate(k.min(self.classes.len()));
        Ok(predictions)
    }
}

/// Numerically stable softmax. An empty score slice yields an empty vector.
pub fn softmax(scores: &[f64]) -> Vec<f64> {
    if scores.is_empty() {
        return Vec::new();
    }
    let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}
