//! Integration tests for career compass

use career_compass::catalog::data::{interest_samples, load_default_catalog};
use career_compass::config::Config;
use career_compass::error::CareerCompassError;
use career_compass::input::manager::InputManager;
use career_compass::processing::bulk;
use career_compass::processing::classifier::ClassifierArtifact;
use career_compass::processing::resume::ResumeAnalyzer;
use career_compass::processing::similarity::CorpusModelCache;
use career_compass::processing::trainer::{builtin_training_set, train, TrainingExample};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

fn small_training_subset() -> Vec<TrainingExample> {
    let keep = ["Chef", "Pilot", "Software Engineer"];
    builtin_training_set()
        .unwrap()
        .into_iter()
        .filter(|example| keep.contains(&example.label.as_str()))
        .collect()
}

#[tokio::test]
async fn test_text_extraction_from_txt() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let text = manager.extract_text(path).await.unwrap();
    assert!(text.contains("John Doe"));
    assert!(text.contains("Software Engineer"));
    assert!(text.contains("Rust"));
    assert!(text.contains("coding"));
}

#[tokio::test]
async fn test_text_extraction_from_markdown() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.md");

    let text = manager.extract_text(path).await.unwrap();
    assert!(text.contains("John Doe"));
    assert!(text.contains("Software Engineer"));
    assert!(text.contains("State University"));
    // Markdown formatting stripped
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));
}

#[tokio::test]
async fn test_extraction_caching() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let text1 = manager.extract_text(path).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    let text2 = manager.extract_text(path).await.unwrap();
    assert_eq!(text1, text2);
    assert_eq!(manager.cache_size(), 1);
}

#[tokio::test]
async fn test_unsupported_file_type() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/unsupported.xyz");

    let result = manager.extract_text(path).await;
    assert!(matches!(
        result,
        Err(CareerCompassError::UnsupportedFormat(_))
    ));
}

#[tokio::test]
async fn test_nonexistent_file() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/nonexistent.txt");

    let result = manager.extract_text(path).await;
    assert!(matches!(result, Err(CareerCompassError::InvalidInput(_))));
}

#[test]
fn test_coding_interests_rank_software_careers() {
    let config = Config::default();
    let (table, _aliases) = load_default_catalog().unwrap();
    let mut cache = CorpusModelCache::new();
    let model = cache.build_or_get(&table, &config.engine).unwrap();

    let ranked = model
        .rank("I enjoy coding and building web apps", 3)
        .unwrap();
    assert_eq!(ranked.len(), 3);

    let names: Vec<&str> = ranked.iter().map(|r| r.name.as_str()).collect();
    assert!(
        names.contains(&"Software Engineer") || names.contains(&"Full Stack Developer"),
        "expected a software career in the top 3, got {:?}",
        names
    );

    for pair in ranked.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn test_sample_interests_are_available() {
    let samples = interest_samples().unwrap();
    assert!(samples.len() >= 20);
    assert!(samples[0].contains("coding"));
}

#[test]
fn test_corpus_model_is_memoized() {
    let config = Config::default();
    let (table, _aliases) = load_default_catalog().unwrap();
    let mut cache = CorpusModelCache::new();

    let first = cache.build_or_get(&table, &config.engine).unwrap();
    let second = cache.build_or_get(&table, &config.engine).unwrap();

    assert_eq!(cache.fits(), 1);
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_every_training_label_resolves_in_catalog() {
    let (table, aliases) = load_default_catalog().unwrap();
    let examples = builtin_training_set().unwrap();

    let labels: Vec<String> = examples
        .iter()
        .map(|e| e.label.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    assert_eq!(labels.len(), 24);

    aliases.validate_labels(&labels, &table).unwrap();
}

#[test]
fn test_classifier_round_trip_from_training_to_prediction() {
    let config = Config::default();
    let examples = small_training_subset();
    let artifact = train(&examples, &config.classifier).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("models").join("classifier.json");
    artifact.save(&path).unwrap();

    let loaded = ClassifierArtifact::load(&path).unwrap();
    assert_eq!(loaded.classes, vec!["Chef", "Pilot", "Software Engineer"]);

    let predictions = loaded
        .predict_top_k("I want to fly airplanes for a living", 3)
        .unwrap();
    assert_eq!(predictions[0].label, "Pilot");

    let total: f64 = predictions.iter().map(|p| p.probability).sum();
    assert!((total - 1.0).abs() < 1e-9);
    for pair in predictions.windows(2) {
        assert!(pair[0].probability >= pair[1].probability);
    }
}

#[test]
fn test_empty_text_still_gets_a_probability_distribution() {
    let config = Config::default();
    let artifact = train(&small_training_subset(), &config.classifier).unwrap();

    let predictions = artifact.predict_top_k("", 3).unwrap();
    assert_eq!(predictions.len(), 3);

    let total: f64 = predictions.iter().map(|p| p.probability).sum();
    assert!((total - 1.0).abs() < 1e-9);
    for p in &predictions {
        assert!(p.probability >= 0.0 && p.probability <= 1.0);
    }
}

#[test]
fn test_bulk_csv_predictions_end_to_end() {
    let config = Config::default();
    let artifact = train(&small_training_subset(), &config.classifier).unwrap();
    let (table, aliases) = load_default_catalog().unwrap();

    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("interests.csv");
    std::fs::write(
        &input_path,
        "name,description\nAva,I love cooking and creating recipes\nNoah,I want to fly airplanes\n",
    )
    .unwrap();

    let output_path = dir.path().join("predictions.csv");
    let summary =
        bulk::predict_csv(&input_path, &output_path, &artifact, &table, &aliases, false).unwrap();

    assert_eq!(summary.rows, 2);
    assert!(output_path.exists());

    let content = std::fs::read_to_string(&output_path).unwrap();
    let header = content.lines().next().unwrap();
    assert!(header.contains("predicted_career"));
    assert!(header.contains("career_description"));
    assert!(header.contains("next_steps"));
    assert!(content.contains("Chef"));
    // Alias resolution maps the classifier label onto the catalog name.
    assert!(content.contains("Pilot / Aviation Professional"));
}

#[tokio::test]
async fn test_resume_analysis_with_explicit_target() {
    let mut manager = InputManager::new();
    let resume_text = manager
        .extract_text(Path::new("tests/fixtures/sample_resume.txt"))
        .await
        .unwrap();

    let config = Config::default();
    let (table, _aliases) = load_default_catalog().unwrap();
    let mut cache = CorpusModelCache::new();
    let model = cache.build_or_get(&table, &config.engine).unwrap();

    let analyzer = ResumeAnalyzer::new(config.analysis.clone()).unwrap();
    let analysis = analyzer
        .analyze(&resume_text, &model, Some("Software Engineer"))
        .unwrap();

    assert_eq!(analysis.target_career, "Software Engineer");
    assert!(!analysis.auto_detected);
    assert!(analysis.overall_score_pct >= 0.0 && analysis.overall_score_pct <= 100.0);
    assert!(analysis.word_count > 100);
    assert!(analysis
        .contact
        .emails
        .contains(&"john.doe@example.com".to_string()));
    assert!(!analysis.contact.phones.is_empty());
    assert!(analysis.quantifiable_numbers);

    for name in ["experience", "education", "skills", "projects"] {
        let check = analysis
            .sections
            .iter()
            .find(|s| s.name == name)
            .expect("section check present");
        assert!(check.present, "{} section should be detected", name);
    }
}

#[tokio::test]
async fn test_resume_analysis_auto_detects_target() {
    let mut manager = InputManager::new();
    let resume_text = manager
        .extract_text(Path::new("tests/fixtures/sample_resume.txt"))
        .await
        .unwrap();

    let config = Config::default();
    let (table, _aliases) = load_default_catalog().unwrap();
    let mut cache = CorpusModelCache::new();
    let model = cache.build_or_get(&table, &config.engine).unwrap();

    let analyzer = ResumeAnalyzer::new(config.analysis.clone()).unwrap();
    let analysis = analyzer.analyze(&resume_text, &model, None).unwrap();

    assert!(analysis.auto_detected);
    assert_eq!(analysis.target_career, analysis.top_matches[0].name);
}

#[test]
fn test_unknown_target_career_is_rejected() {
    let config = Config::default();
    let (table, _aliases) = load_default_catalog().unwrap();
    let mut cache = CorpusModelCache::new();
    let model = cache.build_or_get(&table, &config.engine).unwrap();

    let analyzer = ResumeAnalyzer::new(config.analysis.clone()).unwrap();
    let result = analyzer.analyze("some resume text", &model, Some("Dragon Tamer"));

    assert!(matches!(result, Err(CareerCompassError::UnknownCareer(_))));
}
