//! # Config Module
//!
//! Weight-table loading and validation.
//!
//! A weight table is a TOML document with one `[[candidate]]` entry per
//! candidate. Entries are an array of tables, not a map: declaration order
//! is preserved and determines selection tie-breaking.
//!
//! ```toml
//! [[candidate]]
//! id = "shard-a"
//! weight = 5
//!
//! [[candidate]]
//! id = "shard-b"    # weight omitted -> 1
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::candidate::{Candidate, WeightConfig};
use crate::consts;
use crate::{Result, SwrrError};

/// A single `[[candidate]]` entry in a weight table
#[derive(Debug, Clone, Deserialize)]
pub struct CandidateEntry {
    /// Candidate identifier
    pub id: String,
    /// Relative weight
    #[serde(default = "default_weight")]
    pub weight: i64,
}

fn default_weight() -> i64 {
    consts::DEFAULT_WEIGHT as i64
}

/// Top-level weight-table document
#[derive(Debug, Clone, Deserialize)]
pub struct WeightTable {
    /// Candidates in declaration order
    #[serde(default, rename = "candidate")]
    pub candidates: Vec<CandidateEntry>,
}

impl WeightTable {
    /// Validate all entries and build a [`WeightConfig`]
    ///
    /// Weights are parsed as `i64` so that negative values reach this
    /// check and are rejected here rather than wrapping into `u32`.
    pub fn into_config(self) -> Result<WeightConfig> {
        let mut candidates = Vec::with_capacity(self.candidates.len());
        for entry in self.candidates {
            if entry.weight < 1 || entry.weight > consts::MAX_WEIGHT {
                warn!(
                    "Rejecting candidate {} with out-of-range weight {}",
                    entry.id, entry.weight
                );
                return Err(SwrrError::Config(format!(
                    "candidate {} has invalid weight {}",
                    entry.id, entry.weight
                )));
            }
            candidates.push(Candidate::new(entry.id, entry.weight as u32));
        }
        WeightConfig::new(candidates)
    }
}

/// Parse a weight table from TOML text
pub fn from_str(text: &str) -> Result<WeightConfig> {
    let table: WeightTable = toml::from_str(text)?;
    table.into_config()
}

/// Load a weight table from a TOML file
pub fn from_file(path: impl AsRef<Path>) -> Result<WeightConfig> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let config = from_str(&text)?;
    info!(
        "Loaded weight table from {}: {} candidates, total weight {}",
        path.display(),
        config.len(),
        config.total_weight()
    );
    Ok(config)
}
