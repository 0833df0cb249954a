//! Configuration management for career compass

use crate::error::{CareerCompassError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub engine: EngineConfig,
    pub classifier: ClassifierConfig,
    pub analysis: AnalysisConfig,
    pub output: OutputConfig,
}

/// Settings for the corpus vectorizer and similarity ranker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub ngram_min: usize,
    pub ngram_max: usize,
    pub min_token_len: usize,
    pub max_suggestions: usize,
    pub default_suggestions: usize,
}

/// Settings for the trained classifier and its offline trainer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    pub artifact_path: PathBuf,
    pub max_features: usize,
    pub epochs: usize,
    pub learning_rate: f64,
    pub l2_penalty: f64,
}

/// Weights and knobs for the resume analyzer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub similarity_weight: f64,
    pub keyword_weight: f64,
    pub sections_weight: f64,
    pub contact_weight: f64,
    pub top_matches: usize,
    pub career_term_pool: usize,
    pub career_term_cap: usize,
    pub sections: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for Config {
    fn default() -> Self {
        let artifact_path = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("career-compass")
            .join("classifier.json");

        Self {
            engine: EngineConfig {
                ngram_min: 1,
                ngram_max: 2,
                min_token_len: 2,
                max_suggestions: 5,
                default_suggestions: 3,
            },
            classifier: ClassifierConfig {
                artifact_path,
                max_features: 5000,
                epochs: 300,
                learning_rate: 0.5,
                l2_penalty: 1e-4,
            },
            analysis: AnalysisConfig {
                similarity_weight: 0.5,
                keyword_weight: 0.25,
                sections_weight: 0.15,
                contact_weight: 0.10,
                top_matches: 5,
                career_term_pool: 30,
                career_term_cap: 20,
                sections: vec![
                    "experience".to_string(),
                    "education".to_string(),
                    "skills".to_string(),
                    "projects".to_string(),
                ],
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_path())
    }

    pub fn load_from(config_path: PathBuf) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content).map_err(|e| {
                CareerCompassError::Configuration(format!("Failed to parse config: {}", e))
            })?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    fn save_to(&self, config_path: &PathBuf) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            CareerCompassError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("career-compass")
            .join("config.toml")
    }

    /// Reject configs that would produce nonsense scores or vectors.
    pub fn validate(&self) -> Result<()> {
        if self.engine.ngram_min == 0 || self.engine.ngram_min > self.engine.ngram_max {
            return Err(CareerCompassError::Configuration(format!(
                "Invalid ngram range: ({}, {})",
                self.engine.ngram_min, self.engine.ngram_max
            )));
        }
        if self.engine.max_suggestions == 0 {
            return Err(CareerCompassError::Configuration(
                "max_suggestions must be at least 1".to_string(),
            ));
        }
        let weight_sum = self.analysis.similarity_weight
            + self.analysis.keyword_weight
            + self.analysis.sections_weight
            + self.analysis.contact_weight;
        if (weight_sum - 1.0).abs() > 1e-6 {
            return Err(CareerCompassError::Configuration(format!(
                "Analysis weights must sum to 1.0, got {}",
                weight_sum
            )));
        }
        Ok(())
    }

    pub fn artifact_path(&self) -> &PathBuf {
        &self.classifier.artifact_path
    }

    pub fn clamp_suggestions(&self, k: usize) -> usize {
        k.clamp(1, self.engine.max_suggestions)
    }
}
