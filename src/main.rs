//! Career compass: career matching and prediction from the command line

mod catalog;
mod cli;
mod config;
mod error;
mod input;
mod output;
mod processing;

use clap::Parser;
use cli::{CatalogAction, Cli, Commands, ConfigAction};
use config::{Config, OutputFormat};
use error::{CareerCompassError, Result};
use input::manager::InputManager;
use log::{error, info};
use output::formatter::{save_report_to_file, ReportGenerator};
use output::report::{BulkReport, PredictReport, Report, ResumeReport, SuggestReport, TrainReport};
use processing::bulk;
use processing::classifier::ClassifierArtifact;
use processing::resume::ResumeAnalyzer;
use processing::similarity::CorpusModelCache;
use processing::trainer;
use std::path::{Path, PathBuf};
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match load_config(cli.config.clone()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn load_config(path: Option<PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

async fn run_command(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Suggest {
            interests,
            sample,
            top,
            detailed,
            output,
            save,
        } => {
            let output_format = resolve_output_format(output.as_deref(), &config)?;

            if sample.len() > catalog::data::MAX_SAMPLE_SELECTIONS {
                return Err(CareerCompassError::InvalidInput(format!(
                    "Choose at most {} sample interests",
                    catalog::data::MAX_SAMPLE_SELECTIONS
                )));
            }

            let mut parts: Vec<String> = Vec::new();
            if let Some(text) = interests {
                if text.trim().is_empty() {
                    return Err(CareerCompassError::InvalidInput(
                        "Interest text is empty".to_string(),
                    ));
                }
                parts.push(text.trim().to_string());
            }
            if !sample.is_empty() {
                let samples = catalog::data::interest_samples()?;
                for index in &sample {
                    let sentence = index
                        .checked_sub(1)
                        .and_then(|i| samples.get(i))
                        .cloned()
                        .ok_or_else(|| {
                            CareerCompassError::InvalidInput(format!(
                                "Sample index {} is out of range (1-{})",
                                index,
                                samples.len()
                            ))
                        })?;
                    parts.push(sentence);
                }
            }
            if parts.is_empty() {
                return Err(CareerCompassError::InvalidInput(
                    "Provide interest text or --sample".to_string(),
                ));
            }
            let query = parts.join(". ");

            let (table, _aliases) = catalog::data::load_default_catalog()?;
            let k = config.clamp_suggestions(top.unwrap_or(config.engine.default_suggestions));

            let mut cache = CorpusModelCache::new();
            let model = cache.build_or_get(&table, &config.engine)?;
            let ranked = model.rank(&query, k)?;

            let report = Report::Suggest(SuggestReport::new(query, &ranked, &table));
            emit_report(&report, &output_format, &config, detailed, save.as_deref())?;
        }

        Commands::Predict {
            text,
            top,
            model,
            detailed,
            output,
            save,
        } => {
            let output_format = resolve_output_format(output.as_deref(), &config)?;
            if text.trim().is_empty() {
                return Err(CareerCompassError::InvalidInput(
                    "Prediction text is empty".to_string(),
                ));
            }

            let artifact_path = model.unwrap_or_else(|| config.artifact_path().clone());
            let artifact = ClassifierArtifact::load(&artifact_path)?;
            info!(
                "Loaded classifier with {} classes from {}",
                artifact.classes.len(),
                artifact_path.display()
            );

            let (table, aliases) = catalog::data::load_default_catalog()?;
            aliases.validate_labels(&artifact.classes, &table)?;

            let k = config.clamp_suggestions(top.unwrap_or(config.engine.default_suggestions));
            let predictions = artifact.predict_top_k(&text, k)?;

            let report = Report::Predict(PredictReport::new(text, &predictions, &table, &aliases));
            emit_report(&report, &output_format, &config, detailed, save.as_deref())?;
        }

        Commands::Analyze {
            resume,
            career,
            output,
            save,
        } => {
            let output_format = resolve_output_format(output.as_deref(), &config)?;
            cli::validate_file_extension(&resume, input::file_detector::supported_extensions())
                .map_err(|e| CareerCompassError::InvalidInput(format!("Resume file: {}", e)))?;

            if output_format == OutputFormat::Console {
                println!("📄 Extracting text from {}...", resume.display());
            }
            let mut input_manager = InputManager::new();
            let resume_text = input_manager.extract_text(&resume).await?;
            info!(
                "Extracted {} characters from {}",
                resume_text.len(),
                resume.display()
            );

            let (table, _aliases) = catalog::data::load_default_catalog()?;
            let mut cache = CorpusModelCache::new();
            let model = cache.build_or_get(&table, &config.engine)?;

            let analyzer = ResumeAnalyzer::new(config.analysis.clone())?;
            let analysis = analyzer.analyze(&resume_text, &model, career.as_deref())?;

            let report = Report::Resume(ResumeReport::new(&resume, analysis));
            emit_report(&report, &output_format, &config, true, save.as_deref())?;
        }

        Commands::Bulk {
            input,
            output_csv,
            model,
            no_progress,
            output,
        } => {
            let output_format = resolve_output_format(output.as_deref(), &config)?;

            let artifact_path = model.unwrap_or_else(|| config.artifact_path().clone());
            let artifact = ClassifierArtifact::load(&artifact_path)?;

            let (table, aliases) = catalog::data::load_default_catalog()?;
            aliases.validate_labels(&artifact.classes, &table)?;

            let destination = output_csv.unwrap_or_else(|| PathBuf::from(bulk::DEFAULT_OUTPUT));
            let summary = bulk::predict_csv(
                &input,
                &destination,
                &artifact,
                &table,
                &aliases,
                !no_progress,
            )?;

            let report = Report::Bulk(BulkReport::new(&input, summary));
            emit_report(&report, &output_format, &config, false, None)?;
        }

        Commands::Train { artifact, output } => {
            let output_format = resolve_output_format(output.as_deref(), &config)?;
            let destination = artifact.unwrap_or_else(|| config.artifact_path().clone());

            let examples = trainer::builtin_training_set()?;
            if output_format == OutputFormat::Console {
                println!("🧠 Training classifier on {} examples...", examples.len());
            }
            let trained = trainer::train(&examples, &config.classifier)?;
            trained.save(&destination)?;

            let report = Report::Train(TrainReport::new(
                examples.len(),
                trained.classes.len(),
                trained.training_accuracy,
                &destination,
            ));
            emit_report(&report, &output_format, &config, false, None)?;
        }

        Commands::Catalog { action } => {
            let (table, aliases) = catalog::data::load_default_catalog()?;
            match action {
                CatalogAction::List => {
                    println!("📚 {} careers in the catalog\n", table.len());
                    for (i, name) in table.names().iter().enumerate() {
                        println!("{:>3}. {}", i + 1, name);
                    }
                }

                CatalogAction::Show { name } => match aliases.lookup(&table, &name) {
                    Some(record) => {
                        println!("🎯 {}\n", record.name);
                        println!("{}\n", record.description);
                        if !record.next_steps.is_empty() {
                            println!("Next steps:");
                            for step in &record.next_steps {
                                println!("  • {}", step);
                            }
                        }
                        if !record.courses.is_empty() {
                            println!("\nCourses:");
                            for course in &record.courses {
                                println!("  • {} <{}>", course.name, course.url);
                            }
                        }
                    }
                    None => {
                        let message = match table.closest_name(&name) {
                            Some(suggestion) => {
                                format!("{} (did you mean '{}'?)", name, suggestion)
                            }
                            None => name,
                        };
                        return Err(CareerCompassError::UnknownCareer(message));
                    }
                },

                CatalogAction::Courses => {
                    for record in table.records() {
                        if record.courses.is_empty() {
                            continue;
                        }
                        println!("🎓 {}", record.name);
                        for course in &record.courses {
                            println!("  • {} <{}>", course.name, course.url);
                        }
                        println!();
                    }
                }

                CatalogAction::Aliases => {
                    println!("Label aliases:");
                    for (label, target) in aliases.entries() {
                        println!("  {} -> {}", label, target);
                    }
                    let metadata_free = aliases.metadata_free_labels();
                    if !metadata_free.is_empty() {
                        println!("\nLabels without catalog entries:");
                        for label in metadata_free {
                            println!("  {}", label);
                        }
                    }
                }

                CatalogAction::Samples => {
                    let samples = catalog::data::interest_samples()?;
                    println!("💡 {} sample interests\n", samples.len());
                    for (i, sample) in samples.iter().enumerate() {
                        println!("{:>3}. {}", i + 1, sample);
                    }
                }
            }
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration\n");
                println!("Config file: {}", Config::config_path().display());
                println!("Classifier artifact: {}", config.artifact_path().display());
                println!("\nEngine:");
                println!(
                    "  N-gram range: {}-{}",
                    config.engine.ngram_min, config.engine.ngram_max
                );
                println!("  Max suggestions: {}", config.engine.max_suggestions);
                println!("  Default suggestions: {}", config.engine.default_suggestions);
                println!("\nClassifier training:");
                println!("  Max features: {}", config.classifier.max_features);
                println!("  Epochs: {}", config.classifier.epochs);
                println!("  Learning rate: {}", config.classifier.learning_rate);
                println!("\nAnalysis weights:");
                println!(
                    "  Similarity: {:.0}%",
                    config.analysis.similarity_weight * 100.0
                );
                println!("  Keywords: {:.0}%", config.analysis.keyword_weight * 100.0);
                println!("  Sections: {:.0}%", config.analysis.sections_weight * 100.0);
                println!("  Contact: {:.0}%", config.analysis.contact_weight * 100.0);
            }

            Some(ConfigAction::Init) => {
                config.save()?;
                println!(
                    "✅ Configuration written to {}",
                    Config::config_path().display()
                );
            }

            Some(ConfigAction::Path) => {
                println!("{}", Config::config_path().display());
            }
        },
    }

    Ok(())
}

fn resolve_output_format(flag: Option<&str>, config: &Config) -> Result<OutputFormat> {
    match flag {
        Some(value) => cli::parse_output_format(value).map_err(CareerCompassError::InvalidInput),
        None => Ok(config.output.format),
    }
}

fn emit_report(
    report: &Report,
    format: &OutputFormat,
    config: &Config,
    detailed: bool,
    save: Option<&Path>,
) -> Result<()> {
    let detailed = detailed || config.output.detailed;
    let generator = ReportGenerator::with_options(config.output.color_output, detailed, true, true);
    let formatted = generator.generate_report(report, format)?;
    println!("{}", formatted);

    if let Some(path) = save {
        let plain = ReportGenerator::with_options(false, detailed, true, true)
            .generate_report(report, format)?;
        save_report_to_file(&plain, path)?;
        info!("Report saved to {}", path.display());
    }

    Ok(())
}
