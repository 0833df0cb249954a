//! Offline trainer: fits a TF-IDF vectorizer plus a multinomial
//! logistic-regression model on labeled interest statements and packages
//! both into a classifier artifact.

use std::collections::BTreeSet;

use chrono::Utc;
use log::{debug, info};
use serde::Deserialize;

use crate::config::ClassifierConfig;
use crate::error::{CareerCompassError, Result};
use crate::processing::classifier::{softmax, ClassifierArtifact, ARTIFACT_KIND};
use crate::processing::text_processor::TextProcessor;
use crate::processing::tfidf::TfidfVectorizer;

const TRAINING_TOML: &str = include_str!("../../data/training.toml");

/// One labeled statement of interests.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrainingExample {
    pub text: String,
    pub label: String,
}

#[derive(Debug, Deserialize)]
struct TrainingFile {
    #[serde(rename = "group")]
    groups: Vec<TrainingGroup>,
}

#[derive(Debug, Deserialize)]
struct TrainingGroup {
    label: String,
    texts: Vec<String>,
}

/// The labeled statements shipped with the binary.
pub fn builtin_training_set() -> Result<Vec<TrainingExample>> {
    let file: TrainingFile = toml::from_str(TRAINING_TOML).map_err(|e| {
        CareerCompassError::Configuration(format!("Failed to parse training data: {}", e))
    })?;

    let mut examples = Vec::new();
    for group in file.groups {
        if group.label.trim().is_empty() || group.texts.is_empty() {
            return Err(CareerCompassError::Configuration(
                "Training data contains an empty label or an empty text group".to_string(),
            ));
        }
        for text in group.texts {
            examples.push(TrainingExample {
                text,
                label: group.label.clone(),
            });
        }
    }
    Ok(examples)
}

/// Trains a classifier with batch gradient descent on the softmax
/// cross-entropy loss, with L2 weight decay. Classes are stored sorted, so
/// equal-probability ties later resolve alphabetically.
pub fn train(examples: &[TrainingExample], config: &ClassifierConfig) -> Result<ClassifierArtifact> {
    if examples.is_empty() {
        return Err(CareerCompassError::InvalidInput(
            "Cannot train on an empty example set".to_string(),
        ));
    }

    let classes: Vec<String> = examples
        .iter()
        .map(|e| e.label.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    if classes.len() < 2 {
        return Err(CareerCompassError::Training(format!(
            "Need at least 2 distinct labels to train, found {}",
            classes.len()
        )));
    }

    let texts: Vec<String> = examples.iter().map(|e| e.text.clone()).collect();
    let mut vectorizer = TfidfVectorizer::new()
        .with_ngram_range(1, 2)
        .with_max_features(config.max_features)
        .with_processor(TextProcessor::new(2, true));
    let dense = vectorizer.fit_transform(&texts)?;
    let n_features = vectorizer.vocabulary_size();

    // Statements are short, so each row has only a handful of nonzero
    // features. Keeping rows sparse makes the epoch loop cheap.
    let rows: Vec<Vec<(usize, f64)>> = dense
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .filter(|(_, v)| **v != 0.0)
                .map(|(j, v)| (j, *v))
                .collect()
        })
        .collect();
    let targets: Vec<usize> = examples
        .iter()
        .map(|e| {
            classes
                .iter()
                .position(|c| c == &e.label)
                .unwrap_or_default()
        })
        .collect();

    info!(
        "Training on {} examples, {} classes, {} features, {} epochs",
        examples.len(),
        classes.len(),
        n_features,
        config.epochs
    );

    let n = examples.len() as f64;
    let k = classes.len();
    let mut weights = vec![vec![0.0; n_features]; k];
    let mut intercepts = vec![0.0; k];

    for epoch in 0..config.epochs {
        let mut grad_w = vec![vec![0.0; n_features]; k];
        let mut grad_b = vec![0.0; k];

        for (row, &target) in rows.iter().zip(targets.iter()) {
            let probs = softmax(&scores(&weights, &intercepts, row));
            for (class, p) in probs.into_iter().enumerate() {
                let delta = if class == target { p - 1.0 } else { p };
                for &(j, x) in row {
                    grad_w[class][j] += delta * x;
                }
                grad_b[class] += delta;
            }
        }

        for class in 0..k {
            for j in 0..n_features {
                weights[class][j] -=
                    config.learning_rate * (grad_w[class][j] / n + config.l2_penalty * weights[class][j]);
            }
            intercepts[class] -= config.learning_rate * grad_b[class] / n;
        }

        if (epoch + 1) % 50 == 0 {
            debug!("Epoch {}/{} complete", epoch + 1, config.epochs);
        }
    }

    let correct = rows
        .iter()
        .zip(targets.iter())
        .filter(|(row, &target)| argmax(&scores(&weights, &intercepts, row)) == target)
        .count();
    let training_accuracy = correct as f64 / n;
    info!(
        "Training accuracy: {:.1}% ({}/{})",
        training_accuracy * 100.0,
        correct,
        examples.len()
    );

    Ok(ClassifierArtifact {
        kind: ARTIFACT_KIND.to_string(),
        created_at: Utc::now(),
        training_accuracy,
        vectorizer,
        classes,
        weights,
        intercepts,
    })
}

fn scores(weights: &[Vec<f64>], intercepts: &[f64], row: &[(usize, f64)]) -> Vec<f64> {
    weights
        .iter()
        .zip(intercepts.iter())
        .map(|(w, b)| row.iter().map(|&(j, x)| w[j] * x).sum::<f64>() + b)
        .collect()
}

fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn example(text: &str, label: &str) -> TrainingExample {
        TrainingExample {
            text: text.to_string(),
            label: label.to_string(),
        }
    }

    fn separable_examples() -> Vec<TrainingExample> {
        vec![
            example("cooking meals recipes kitchen", "Chef"),
            example("baking kitchen recipes food", "Chef"),
            example("cooking food restaurant dishes", "Chef"),
            example("coding software programming systems", "Software Engineer"),
            example("writing code debugging programs", "Software Engineer"),
            example("software development coding projects", "Software Engineer"),
            example("patients hospitals medicine care", "Nurse"),
            example("caring patients hospital wards", "Nurse"),
            example("medicine nursing patients recovery", "Nurse"),
        ]
    }

    #[test]
    fn test_builtin_training_set_loads() {
        let examples = builtin_training_set().unwrap();
        assert_eq!(examples.len(), 360);

        let labels: BTreeSet<&str> = examples.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels.len(), 24);
        assert!(labels.contains("Software Engineer"));
        assert!(labels.contains("Government Officer"));
        assert!(examples
            .iter()
            .any(|e| e.text == "I love coding and building software"));
    }

    #[test]
    fn test_train_separates_disjoint_vocabularies() {
        let config = Config::default().classifier;
        let artifact = train(&separable_examples(), &config).unwrap();

        assert_eq!(artifact.kind, ARTIFACT_KIND);
        assert_eq!(
            artifact.classes,
            vec!["Chef", "Nurse", "Software Engineer"]
        );
        assert!((artifact.training_accuracy - 1.0).abs() < 1e-9);

        let top = artifact.predict_top_k("I love cooking food", 1).unwrap();
        assert_eq!(top[0].label, "Chef");
        let top = artifact.predict_top_k("debugging software code", 1).unwrap();
        assert_eq!(top[0].label, "Software Engineer");
    }

    #[test]
    fn test_train_on_builtin_set_fits_well() {
        let config = Config::default().classifier;
        let examples = builtin_training_set().unwrap();
        let artifact = train(&examples, &config).unwrap();

        assert!(artifact.training_accuracy >= 0.8);

        let top = artifact
            .predict_top_k("I want to fly airplanes", 3)
            .unwrap();
        assert_eq!(top[0].label, "Pilot");
    }

    #[test]
    fn test_train_rejects_empty_set() {
        let config = Config::default().classifier;
        assert!(matches!(
            train(&[], &config).unwrap_err(),
            CareerCompassError::InvalidInput(_)
        ));
    }

    #[test]
    fn test_train_rejects_single_class() {
        let config = Config::default().classifier;
        let examples = vec![
            example("cooking meals", "Chef"),
            example("baking bread", "Chef"),
        ];
        assert!(matches!(
            train(&examples, &config).unwrap_err(),
            CareerCompassError::Training(_)
        ));
    }
}
