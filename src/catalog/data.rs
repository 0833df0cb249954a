//! Built-in career catalog and sample interest statements, embedded at
//! compile time and parsed on first use.

use std::collections::HashMap;

use serde::Deserialize;

use crate::catalog::{AliasMap, CareerRecord, CareerTable, DedupePolicy};
use crate::error::{CareerCompassError, Result};

const CAREERS_TOML: &str = include_str!("../../data/careers.toml");
const SAMPLES_TOML: &str = include_str!("../../data/samples.toml");

/// How many sample interests can be combined into a single suggest query.
pub const MAX_SAMPLE_SELECTIONS: usize = 5;

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    no_metadata: Vec<String>,
    #[serde(default)]
    aliases: HashMap<String, String>,
    #[serde(rename = "career")]
    careers: Vec<CareerRecord>,
}

#[derive(Debug, Deserialize)]
struct SamplesFile {
    samples: Vec<String>,
}

/// Loads the catalog shipped with the binary. Duplicate names and aliases
/// pointing at unknown careers are rejected.
pub fn load_default_catalog() -> Result<(CareerTable, AliasMap)> {
    parse_catalog(CAREERS_TOML)
}

fn parse_catalog(raw: &str) -> Result<(CareerTable, AliasMap)> {
    let file: CatalogFile = toml::from_str(raw).map_err(|e| {
        CareerCompassError::Configuration(format!("Failed to parse career catalog: {}", e))
    })?;

    let table = CareerTable::from_records(file.careers, DedupePolicy::Reject)?;
    let aliases = AliasMap::new(file.aliases, file.no_metadata);
    // Alias targets are checked up front even before any label list exists.
    aliases.validate_labels(&[], &table)?;

    Ok((table, aliases))
}

/// Interest statements offered as ready-made suggest inputs.
pub fn interest_samples() -> Result<Vec<String>> {
    let file: SamplesFile = toml::from_str(SAMPLES_TOML).map_err(|e| {
        CareerCompassError::Configuration(format!("Failed to parse sample statements: {}", e))
    })?;
    Ok(file.samples)
}
