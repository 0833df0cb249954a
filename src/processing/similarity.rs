//! Cosine-similarity ranking of careers against a free-text interest
//! statement, plus a cache that avoids refitting the corpus model.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info, warn};
use serde::Serialize;

use crate::catalog::CareerTable;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::processing::text_processor::TextProcessor;
use crate::processing::tfidf::TfidfVectorizer;

/// One career with its similarity to the query, 0.0 through 1.0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCareer {
    pub name: String,
    pub score: f64,
}

/// Cosine similarity between two vectors. Returns 0.0 when either vector
/// has zero norm or when the dimensions disagree.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        warn!(
            "Vector dimension mismatch ({} vs {}), treating similarity as 0.0",
            a.len(),
            b.len()
        );
        return 0.0;
    }

    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// TF-IDF vectorizer fitted on the career corpus together with the vector
/// for every career, in table order.
#[derive(Debug, Clone)]
pub struct CorpusModel {
    vectorizer: TfidfVectorizer,
    matrix: Vec<Vec<f64>>,
    names: Vec<String>,
}

impl CorpusModel {
    /// Fits a fresh vectorizer on the description and next-step text of
    /// every career in the table.
    pub fn build(table: &CareerTable, engine: &EngineConfig) -> Result<Self> {
        let documents: Vec<String> = table
            .records()
            .iter()
            .map(|record| record.corpus_text())
            .collect();
        let names: Vec<String> = table
            .records()
            .iter()
            .map(|record| record.name.clone())
            .collect();

        let processor = TextProcessor::new(engine.min_token_len, true);
        let mut vectorizer = TfidfVectorizer::new()
            .with_ngram_range(engine.ngram_min, engine.ngram_max)
            .with_processor(processor);
        let matrix = vectorizer.fit_transform(&documents)?;

        info!(
            "Fitted corpus model: {} careers, {} features",
            names.len(),
            vectorizer.vocabulary_size()
        );

        Ok(Self {
            vectorizer,
            matrix,
            names,
        })
    }

    /// Ranks every career by similarity to the interest text and returns the
    /// top `k`. Ordering is stable, so careers with equal scores keep their
    /// table order. A query with no recognized terms scores 0.0 everywhere
    /// and therefore yields the first `k` careers in table order.
    pub fn rank(&self, interest: &str, k: usize) -> Result<Vec<RankedCareer>> {
        let query = self.vectorizer.transform(interest)?;

        let mut ranked: Vec<RankedCareer> = self
            .names
            .iter()
            .zip(self.matrix.iter())
            .map(|(name, row)| RankedCareer {
                name: name.clone(),
                score: cosine_similarity(&query, row),
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(k.min(self.names.len()));
        Ok(ranked)
    }

    /// Similarity of a single text against one career row.
    pub fn similarity_to(&self, text: &str, career_index: usize) -> Result<f64> {
        let query = self.vectorizer.transform(text)?;
        Ok(self
            .matrix
            .get(career_index)
            .map(|row| cosine_similarity(&query, row))
            .unwrap_or(0.0))
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn vector(&self, index: usize) -> Option<&[f64]> {
        self.matrix.get(index).map(Vec::as_slice)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Cache of fitted corpus models keyed by the content hash of the career
/// table. Repeated requests for an unchanged table reuse the fitted model
/// instead of fitting again.
#[derive(Debug, Default)]
pub struct CorpusModelCache {
    models: HashMap<u64, Arc<CorpusModel>>,
    fits: usize,
}

impl CorpusModelCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build_or_get(
        &mut self,
        table: &CareerTable,
        engine: &EngineConfig,
    ) -> Result<Arc<CorpusModel>> {
        let key = table.content_hash();
        if let Some(model) = self.models.get(&key) {
            debug!("Corpus model cache hit for key {:016x}", key);
            return Ok(Arc::clone(model));
        }

        debug!("Corpus model cache miss for key {:016x}, fitting", key);
        let model = Arc::new(CorpusModel::build(table, engine)?);
        self.fits += 1;
        self.models.insert(key, Arc::clone(&model));
        Ok(model)
    }

    /// Number of times a model was actually fitted.
    pub fn fits(&self) -> usize {
        self.fits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CareerRecord, CareerTable};
    use crate::config::Config;

    fn record(name: &str, description: &str) -> CareerRecord {
        CareerRecord {
            name: name.to_string(),
            description: description.to_string(),
            next_steps: vec![],
            courses: vec![],
        }
    }

    fn sample_table() -> CareerTable {
        CareerTable::new(vec![
            record("Software Engineer", "Writes code and builds software systems daily"),
            record("Chef", "Cooks meals and plans restaurant menus"),
            record("Nurse", "Cares for patients and supports hospital staff"),
        ])
        .unwrap()
    }

    #[test]
    fn test_cosine_identical_and_orthogonal() {
        let a = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-12);

        let x = vec![1.0, 0.0];
        let y = vec![0.0, 1.0];
        assert_eq!(cosine_similarity(&x, &y), 0.0);
    }

    #[test]
    fn test_cosine_zero_norm_guard() {
        let zero = vec![0.0, 0.0, 0.0];
        let other = vec![1.0, 2.0, 3.0];
        assert_eq!(cosine_similarity(&zero, &other), 0.0);
        assert_eq!(cosine_similarity(&other, &zero), 0.0);
        assert_eq!(cosine_similarity(&zero, &zero), 0.0);
    }

    #[test]
    fn test_cosine_dimension_mismatch_is_zero() {
        let a = vec![1.0, 2.0];
        let b = vec![1.0, 2.0, 3.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_rank_exact_text_scores_first() {
        let table = sample_table();
        let engine = Config::default().engine;
        let model = CorpusModel::build(&table, &engine).unwrap();

        let text = table.get("Chef").unwrap().corpus_text();
        let ranked = model.rank(&text, 3).unwrap();
        assert_eq!(ranked[0].name, "Chef");
        assert!((ranked[0].score - 1.0).abs() < 1e-9);
        assert!(ranked[0].score > ranked[1].score);
    }

    #[test]
    fn test_rank_is_capped_at_table_size() {
        let table = sample_table();
        let engine = Config::default().engine;
        let model = CorpusModel::build(&table, &engine).unwrap();

        let ranked = model.rank("cooking food", 10).unwrap();
        assert_eq!(ranked.len(), 3);
        assert!(model.rank("cooking food", 0).unwrap().is_empty());
    }

    #[test]
    fn test_empty_query_returns_table_order_with_zero_scores() {
        let table = sample_table();
        let engine = Config::default().engine;
        let model = CorpusModel::build(&table, &engine).unwrap();

        for query in ["", "   ", "the and of", "quantum archaeology"] {
            let ranked = model.rank(query, 2).unwrap();
            assert_eq!(ranked.len(), 2);
            assert_eq!(ranked[0].name, "Software Engineer");
            assert_eq!(ranked[1].name, "Chef");
            assert!(ranked.iter().all(|r| r.score == 0.0));
        }
    }

    #[test]
    fn test_rank_is_deterministic_across_calls() {
        let table = sample_table();
        let engine = Config::default().engine;
        let model = CorpusModel::build(&table, &engine).unwrap();

        let first = model.rank("cooking and writing code", 3).unwrap();
        let second = model.rank("cooking and writing code", 3).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_equal_scores_keep_table_order() {
        let table = CareerTable::new(vec![
            record("First", "identical description text"),
            record("Second", "identical description text"),
            record("Third", "something else entirely unrelated"),
        ])
        .unwrap();
        let engine = Config::default().engine;
        let model = CorpusModel::build(&table, &engine).unwrap();

        let ranked = model.rank("identical description text", 3).unwrap();
        assert_eq!(ranked[0].name, "First");
        assert_eq!(ranked[1].name, "Second");
        assert!((ranked[0].score - ranked[1].score).abs() < 1e-12);
    }

    #[test]
    fn test_cache_fits_once_for_same_table() {
        let table = sample_table();
        let engine = Config::default().engine;
        let mut cache = CorpusModelCache::new();

        let first = cache.build_or_get(&table, &engine).unwrap();
        let second = cache.build_or_get(&table, &engine).unwrap();
        assert_eq!(cache.fits(), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_cache_refits_when_table_changes() {
        let engine = Config::default().engine;
        let mut cache = CorpusModelCache::new();

        let table = sample_table();
        cache.build_or_get(&table, &engine).unwrap();

        let changed = CareerTable::new(vec![
            record("Software Engineer", "Writes code and builds software systems daily"),
            record("Chef", "Cooks meals and now also teaches cooking classes"),
            record("Nurse", "Cares for patients and supports hospital staff"),
        ])
        .unwrap();
        cache.build_or_get(&changed, &engine).unwrap();
        assert_eq!(cache.fits(), 2);
    }
}
