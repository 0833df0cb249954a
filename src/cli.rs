//! CLI interface for career compass

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "career-compass")]
#[command(about = "Career guidance from interests, descriptions, and resumes")]
#[command(
    long_about = "Suggest matching careers for free-text interests, predict careers with a trained classifier, score resume alignment against a target career, and batch-predict CSV files"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Suggest careers matching an interest description
    Suggest {
        /// Free-text interests, e.g. "I enjoy cooking and creating recipes"
        #[arg(required_unless_present = "sample")]
        interests: Option<String>,

        /// Add a built-in sample interest (repeatable, 1-based, see `catalog samples`)
        #[arg(short, long)]
        sample: Vec<usize>,

        /// Number of suggestions to show
        #[arg(short = 'k', long)]
        top: Option<usize>,

        /// Include next steps and course links
        #[arg(short, long)]
        detailed: bool,

        /// Output format: console, json, markdown (defaults to configured format)
        #[arg(short, long)]
        output: Option<String>,

        /// Save the report to a file
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Predict careers with the trained classifier
    Predict {
        /// Free-text description of interests or activities
        text: String,

        /// Number of predictions to show
        #[arg(short = 'k', long)]
        top: Option<usize>,

        /// Path to a classifier artifact (defaults to the configured path)
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Include next steps for each prediction
        #[arg(short, long)]
        detailed: bool,

        /// Output format: console, json, markdown (defaults to configured format)
        #[arg(short, long)]
        output: Option<String>,

        /// Save the report to a file
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Analyze how well a resume aligns with a career
    Analyze {
        /// Path to the resume file (PDF, TXT, MD)
        resume: PathBuf,

        /// Target career (defaults to the best similarity match)
        #[arg(long)]
        career: Option<String>,

        /// Output format: console, json, markdown (defaults to configured format)
        #[arg(short, long)]
        output: Option<String>,

        /// Save the report to a file
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Predict a career for every row of a CSV file
    Bulk {
        /// Input CSV with a 'description' column
        input: PathBuf,

        /// Where to write the predictions CSV (defaults to career_predictions.csv)
        #[arg(long)]
        output_csv: Option<PathBuf>,

        /// Path to a classifier artifact (defaults to the configured path)
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Hide the per-row progress bar
        #[arg(long)]
        no_progress: bool,

        /// Output format: console, json, markdown (defaults to configured format)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Train the career classifier from the built-in training set
    Train {
        /// Where to write the trained artifact (defaults to the configured path)
        #[arg(short, long)]
        artifact: Option<PathBuf>,

        /// Output format: console, json, markdown (defaults to configured format)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Inspect the built-in career catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },

    /// Show or manage configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum CatalogAction {
    /// List every career in the catalog
    List,

    /// Show one career's details
    Show {
        /// Career name or classifier label
        name: String,
    },

    /// List careers that link online courses
    Courses,

    /// Show classifier label aliases and metadata-free labels
    Aliases,

    /// List built-in sample interests for `suggest --sample`
    Samples,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write the current configuration to the config file
    Init,

    /// Print the configuration file path
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(crate::config::OutputFormat::Console),
        "json" => Ok(crate::config::OutputFormat::Json),
        "markdown" | "md" => Ok(crate::config::OutputFormat::Markdown),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown",
            format
        )),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("console").unwrap(), OutputFormat::Console);
        assert_eq!(parse_output_format("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(parse_output_format("md").unwrap(), OutputFormat::Markdown);
        assert!(parse_output_format("html").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension(Path::new("resume.pdf"), &["pdf", "txt"]).is_ok());
        assert!(validate_file_extension(Path::new("resume.PDF"), &["pdf"]).is_ok());
        assert!(validate_file_extension(Path::new("resume.docx"), &["pdf", "txt"]).is_err());
        assert!(validate_file_extension(Path::new("resume"), &["pdf"]).is_err());
    }

    #[test]
    fn test_suggest_accepts_samples_in_place_of_text() {
        let cli =
            Cli::try_parse_from(["career-compass", "suggest", "-s", "1", "-s", "3"]).unwrap();
        match cli.command {
            Commands::Suggest { interests, sample, .. } => {
                assert!(interests.is_none());
                assert_eq!(sample, vec![1, 3]);
            }
            _ => panic!("expected suggest command"),
        }

        assert!(Cli::try_parse_from(["career-compass", "suggest"]).is_err());
    }

    #[test]
    fn test_suggest_combines_text_and_samples() {
        let cli = Cli::try_parse_from(["career-compass", "suggest", "I like music", "-s", "2"])
            .unwrap();
        match cli.command {
            Commands::Suggest { interests, sample, .. } => {
                assert_eq!(interests.as_deref(), Some("I like music"));
                assert_eq!(sample, vec![2]);
            }
            _ => panic!("expected suggest command"),
        }
    }
}
