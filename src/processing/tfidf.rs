//! TF-IDF vectorization over word unigrams and bigrams.
//!
//! A fitted vectorizer is an immutable vocabulary (term -> column) plus one
//! smoothed idf weight per column. Transforming text never mutates the model;
//! unseen terms simply contribute nothing to the output vector.

use crate::error::{CareerCompassError, Result};
use crate::processing::text_processor::TextProcessor;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    processor: TextProcessor,
    ngram_min: usize,
    ngram_max: usize,
    max_features: Option<usize>,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    n_documents: usize,
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TfidfVectorizer {
    /// Unigrams and bigrams with English stop words removed.
    pub fn new() -> Self {
        Self {
            processor: TextProcessor::default(),
            ngram_min: 1,
            ngram_max: 2,
            max_features: None,
            vocabulary: HashMap::new(),
            idf: Vec::new(),
            n_documents: 0,
        }
    }

    pub fn with_ngram_range(mut self, ngram_min: usize, ngram_max: usize) -> Self {
        self.ngram_min = ngram_min;
        self.ngram_max = ngram_max;
        self
    }

    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = Some(max_features);
        self
    }

    pub fn with_processor(mut self, processor: TextProcessor) -> Self {
        self.processor = processor;
        self
    }

    /// Build the vocabulary and idf weights over a fixed document set.
    ///
    /// Uses the smoothed formulation `idf = ln((1+N)/(1+df)) + 1`, so a term
    /// present in every document still carries weight 1 rather than 0.
    pub fn fit(&mut self, documents: &[String]) -> Result<()> {
        if documents.is_empty() {
            return Err(CareerCompassError::InvalidInput(
                "Cannot fit vectorizer on an empty document set".to_string(),
            ));
        }

        let mut document_frequency: HashMap<String, usize> = HashMap::new();
        let mut corpus_frequency: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let terms = self.extract_terms(doc);
            for term in &terms {
                *corpus_frequency.entry(term.clone()).or_insert(0) += 1;
            }
            let unique: std::collections::HashSet<_> = terms.into_iter().collect();
            for term in unique {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        let mut selected: Vec<String> = if let Some(max) = self.max_features {
            let mut by_freq: Vec<(&String, &usize)> = corpus_frequency.iter().collect();
            by_freq.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
            by_freq.into_iter().take(max).map(|(t, _)| t.clone()).collect()
        } else {
            corpus_frequency.keys().cloned().collect()
        };

        // Column order is alphabetical, so fits are reproducible.
        selected.sort();

        let mut vocabulary = HashMap::with_capacity(selected.len());
        let mut idf = vec![0.0; selected.len()];
        let n = documents.len() as f64;

        for (idx, term) in selected.into_iter().enumerate() {
            let df = *document_frequency.get(&term).unwrap_or(&0) as f64;
            idf[idx] = ((1.0 + n) / (1.0 + df)).ln() + 1.0;
            vocabulary.insert(term, idx);
        }

        self.vocabulary = vocabulary;
        self.idf = idf;
        self.n_documents = documents.len();

        Ok(())
    }

    /// Transform text into an L2-normalized tf-idf vector.
    ///
    /// Out-of-vocabulary terms are silently ignored. Text that tokenizes to
    /// nothing yields the all-zero vector.
    pub fn transform(&self, text: &str) -> Result<Vec<f64>> {
        if self.n_documents == 0 {
            return Err(CareerCompassError::Processing(
                "Vectorizer has not been fitted".to_string(),
            ));
        }

        let mut vector = vec![0.0; self.vocabulary.len()];
        for term in self.extract_terms(text) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                vector[idx] += 1.0;
            }
        }

        for (idx, value) in vector.iter_mut().enumerate() {
            *value *= self.idf[idx];
        }

        let norm = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }

        Ok(vector)
    }

    /// Fit on the documents, then transform each one in order.
    pub fn fit_transform(&mut self, documents: &[String]) -> Result<Vec<Vec<f64>>> {
        self.fit(documents)?;
        documents.iter().map(|doc| self.transform(doc)).collect()
    }

    fn extract_terms(&self, text: &str) -> Vec<String> {
        self.processor.ngrams(text, self.ngram_min, self.ngram_max)
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn is_fitted(&self) -> bool {
        self.n_documents > 0
    }

    /// Feature names in column order.
    pub fn feature_names(&self) -> Vec<&str> {
        let mut names = vec![""; self.vocabulary.len()];
        for (term, &idx) in &self.vocabulary {
            names[idx] = term.as_str();
        }
        names
    }
}
