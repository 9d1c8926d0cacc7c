//! Pipeline configuration.
//!
//! An explicit configuration value passed into each component — no ambient
//! global state. Defaults match the batch pipeline's historical settings and
//! every field can be overridden from a TOML file or per-run CLI flags.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cooccur::WeightPolicy;
use crate::error::ConfigError;
use crate::graph::Weight;

/// Configuration for one batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Initial weight assumed for an edge seen for the first time.
    pub default_edge_weight: Weight,
    /// Pruning threshold; edges with `weight <= edge_prune_min` are deleted.
    pub edge_prune_min: Weight,
    /// Target partition count for the forest partitioner (seeds the
    /// remaining-joins counter).
    pub num_subgraphs: usize,
    /// Edge-weighting strategy for the co-occurrence builder.
    pub weight_policy: WeightPolicy,
    /// Directory for outputs and persisted taxonomy artifacts.
    pub workdir: PathBuf,
    /// Co-occurrence records (tab-separated key + labels).
    pub uat_data: PathBuf,
    /// Taxonomy source (nested JSON thesaurus).
    pub uat_source_data: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            default_edge_weight: 0.0,
            edge_prune_min: 1.0,
            num_subgraphs: 10,
            weight_policy: WeightPolicy::Count,
            workdir: PathBuf::from("workdir"),
            uat_data: PathBuf::from("workdir/uat.csv"),
            uat_source_data: PathBuf::from("workdir/UAT.json"),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a TOML file.
    ///
    /// Unspecified keys fall back to their defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(config)
    }

    /// Load from `path` when given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                let config = Self::from_toml_file(p)?;
                tracing::info!(path = %p.display(), "loaded configuration");
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }
}
