//! The static career table and its validation rules.
//!
//! Careers, courses, and label aliases are configuration data: loaded once at
//! startup, validated, then passed around immutably. Loading is where duplicate
//! names and unresolved classifier labels are caught, so the matching engine
//! never has to reason about dirty data.

pub mod data;

use crate::error::{CareerCompassError, Result};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};
use strsim::jaro_winkler;

/// Minimum jaro-winkler similarity before a near-miss name is suggested.
const FUZZY_NAME_THRESHOLD: f64 = 0.8;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Course {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CareerRecord {
    pub name: String,
    pub description: String,
    pub next_steps: Vec<String>,
    #[serde(default)]
    pub courses: Vec<Course>,
}

impl CareerRecord {
    /// The document text the corpus vectorizer is fitted on.
    pub fn corpus_text(&self) -> String {
        let mut text = self.description.clone();
        for step in &self.next_steps {
            text.push(' ');
            text.push_str(step);
        }
        text.trim().to_string()
    }
}

/// What to do when the seed data defines the same career name twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DedupePolicy {
    /// Refuse to load; duplicate keys in authored data are a bug.
    #[default]
    Reject,
    /// Keep the earliest definition, drop later ones.
    KeepFirst,
    /// Keep the latest definition at the earliest position.
    KeepLast,
}

/// An ordered, validated career table. Record order is the corpus row order
/// used by the ranker, so it is fixed at load and never reordered.
#[derive(Debug, Clone)]
pub struct CareerTable {
    records: Vec<CareerRecord>,
    index: HashMap<String, usize>,
}

impl CareerTable {
    pub fn new(records: Vec<CareerRecord>) -> Result<Self> {
        Self::from_records(records, DedupePolicy::Reject)
    }

    pub fn from_records(records: Vec<CareerRecord>, policy: DedupePolicy) -> Result<Self> {
        if records.is_empty() {
            return Err(CareerCompassError::InvalidInput(
                "Career table is empty".to_string(),
            ));
        }

        let mut deduped: Vec<CareerRecord> = Vec::with_capacity(records.len());
        let mut index: HashMap<String, usize> = HashMap::with_capacity(records.len());

        for record in records {
            if record.name.trim().is_empty() {
                return Err(CareerCompassError::InvalidInput(
                    "Career record with empty name".to_string(),
                ));
            }
            if record.description.trim().is_empty() {
                return Err(CareerCompassError::InvalidInput(format!(
                    "Career '{}' has an empty description",
                    record.name
                )));
            }

            match index.get(&record.name) {
                None => {
                    index.insert(record.name.clone(), deduped.len());
                    deduped.push(record);
                }
                Some(&existing) => match policy {
                    DedupePolicy::Reject => {
                        return Err(CareerCompassError::DuplicateCareer(record.name));
                    }
                    DedupePolicy::KeepFirst => {}
                    DedupePolicy::KeepLast => {
                        deduped[existing] = record;
                    }
                },
            }
        }

        Ok(Self {
            records: deduped,
            index,
        })
    }

    pub fn get(&self, name: &str) -> Option<&CareerRecord> {
        self.index.get(name).map(|&idx| &self.records[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn records(&self) -> &[CareerRecord] {
        &self.records
    }

    pub fn names(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.name.as_str()).collect()
    }

    /// Closest catalog name to a query, for "did you mean" hints on failed
    /// lookups. Returns nothing when no name is reasonably similar.
    pub fn closest_name(&self, query: &str) -> Option<&str> {
        let query = query.to_lowercase();
        self.records
            .iter()
            .map(|r| (jaro_winkler(&query, &r.name.to_lowercase()), r.name.as_str()))
            .filter(|(score, _)| *score >= FUZZY_NAME_THRESHOLD)
            .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(_, name)| name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Hash of the table content, used to key the memoized corpus model.
    /// Courses are excluded: they never feed the vectorizer.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        for record in &self.records {
            record.name.hash(&mut hasher);
            record.description.hash(&mut hasher);
            record.next_steps.hash(&mut hasher);
        }
        hasher.finish()
    }
}

/// Maps classifier labels (and other externally-authored names) onto canonical
/// career table names. Labels listed in `no_metadata` are declared to have no
/// catalog entry on purpose.
#[derive(Debug, Clone, Default)]
pub struct AliasMap {
    aliases: HashMap<String, String>,
    no_metadata: HashSet<String>,
}

impl AliasMap {
    pub fn new(aliases: HashMap<String, String>, no_metadata: Vec<String>) -> Self {
        Self {
            aliases,
            no_metadata: no_metadata.into_iter().collect(),
        }
    }

    /// Canonical name for a label: the alias target if one exists, otherwise
    /// the label itself.
    pub fn resolve<'a>(&'a self, label: &'a str) -> &'a str {
        self.aliases.get(label).map(String::as_str).unwrap_or(label)
    }

    /// Catalog record for a label, following the alias if needed.
    pub fn lookup<'a>(&self, table: &'a CareerTable, label: &str) -> Option<&'a CareerRecord> {
        table.get(self.resolve(label))
    }

    pub fn is_metadata_free(&self, label: &str) -> bool {
        self.no_metadata.contains(label)
    }

    /// All alias entries, sorted by label for stable listings.
    pub fn entries(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self
            .aliases
            .iter()
            .map(|(label, target)| (label.as_str(), target.as_str()))
            .collect();
        entries.sort();
        entries
    }

    /// Labels declared to have no catalog entry, sorted.
    pub fn metadata_free_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.no_metadata.iter().map(String::as_str).collect();
        labels.sort();
        labels
    }

    /// Startup validation: every classifier label must resolve to a career
    /// record or be explicitly declared metadata-free. Alias targets that do
    /// not exist in the table are rejected as well.
    pub fn validate_labels(&self, labels: &[String], table: &CareerTable) -> Result<()> {
        for (alias, target) in &self.aliases {
            if !table.contains(target) {
                return Err(CareerCompassError::Configuration(format!(
                    "Alias '{}' points at unknown career '{}'",
                    alias, target
                )));
            }
        }

        let unresolved: Vec<&str> = labels
            .iter()
            .filter(|label| {
                self.lookup(table, label).is_none() && !self.is_metadata_free(label)
            })
            .map(String::as_str)
            .collect();

        if unresolved.is_empty() {
            Ok(())
        } else {
            Err(CareerCompassError::Configuration(format!(
                "Classifier labels with no career record and no alias: {}",
                unresolved.join(", ")
            )))
        }
    }
}
