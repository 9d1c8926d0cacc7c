//! Taxonomy tree ingestion, name index, and hierarchical distance.
//!
//! The thesaurus source is a nested JSON structure without a single root
//! (roughly ten top categories). Ingestion inserts a synthetic root above the
//! top-level branches, unifying the forest into one tree — a deliberate
//! modeling choice that increases the computed distance between terms that
//! recur in unrelated branches. The walk is iterative (explicit stack), since
//! taxonomy depth is not bounded by a small constant, and each uri is visited
//! exactly once, which also enforces the tree invariant at ingestion.
//!
//! After ingestion the tree and its name index are read-only and can be
//! shared freely by multiple consumers.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TaxonomyError;

/// Uri of the synthetic root inserted above the top-level branches.
pub const ROOT_URI: &str = "root";

/// Persisted flat tree artifact filename (keyed by uri).
pub const TREE_FILE: &str = "uat.tree.json";

/// Persisted name-to-uri index artifact filename.
pub const SYNONYMS_FILE: &str = "uat.synonyms.json";

/// A node of the taxonomy source, as found in the thesaurus JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceNode {
    /// Concept uri; nodes without one are skipped with their subtree.
    #[serde(default)]
    pub uri: Option<String>,
    /// Canonical concept name.
    #[serde(default)]
    pub name: String,
    /// Alternate names; the source sometimes carries an explicit null here.
    #[serde(default, rename = "altLabels")]
    pub alt_labels: Option<Vec<String>>,
    /// Child concepts.
    #[serde(default)]
    pub children: Vec<SourceNode>,
}

/// One ingested taxonomy concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyNode {
    /// Canonical short identifier (last path segment of the source uri).
    pub uri: String,
    /// Canonical name.
    pub name: String,
    /// Alternate names.
    pub alt: Vec<String>,
    /// Parent uri; absent only for the synthetic root.
    pub parent: Option<String>,
    /// Distance from the synthetic root (root = 0).
    pub level: usize,
    /// Ingestion-order id.
    pub id: usize,
    /// Child uris in ingestion order.
    pub children: Vec<String>,
}

/// The ingested taxonomy: flat uri-keyed node map plus a name index.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    nodes: HashMap<String, TaxonomyNode>,
    name_index: HashMap<String, String>,
}

impl Taxonomy {
    /// Ingest a parsed taxonomy source.
    ///
    /// `source` is the whole thesaurus document; its top-level children
    /// become the children of the synthetic root. Nodes missing a uri are
    /// reported and skipped together with their entire subtree.
    pub fn ingest(source: &SourceNode) -> Self {
        let mut nodes: HashMap<String, TaxonomyNode> = HashMap::new();
        nodes.insert(
            ROOT_URI.to_string(),
            TaxonomyNode {
                uri: ROOT_URI.to_string(),
                name: ROOT_URI.to_string(),
                alt: Vec::new(),
                parent: None,
                level: 0,
                id: 0,
                children: Vec::new(),
            },
        );

        // Depth-first walk with an explicit stack; reverse push keeps the
        // children in source order.
        let mut stack: Vec<(&SourceNode, usize, String)> = Vec::new();
        for child in source.children.iter().rev() {
            stack.push((child, 1, ROOT_URI.to_string()));
        }

        while let Some((node, level, parent)) = stack.pop() {
            let Some(raw_uri) = node.uri.as_deref() else {
                tracing::error!(
                    name = %node.name,
                    depth = level,
                    parent = %parent,
                    "taxonomy node without uri, skipping its subtree"
                );
                continue;
            };
            let uri = short_uri(raw_uri);
            if nodes.contains_key(uri) {
                // Already harvested under another parent; visit once only.
                continue;
            }

            let id = nodes.len();
            nodes.insert(
                uri.to_string(),
                TaxonomyNode {
                    uri: uri.to_string(),
                    name: node.name.clone(),
                    alt: node.alt_labels.clone().unwrap_or_default(),
                    parent: Some(parent.clone()),
                    level,
                    id,
                    children: Vec::new(),
                },
            );
            if let Some(parent_node) = nodes.get_mut(&parent) {
                parent_node.children.push(uri.to_string());
            }
            for child in node.children.iter().rev() {
                stack.push((child, level + 1, uri.to_string()));
            }
        }

        let name_index = build_name_index(&nodes);
        tracing::info!(
            nodes = nodes.len(),
            names = name_index.len(),
            "ingested taxonomy"
        );
        Self { nodes, name_index }
    }

    /// Read and parse a taxonomy source file, then ingest it.
    pub fn ingest_file(path: &Path) -> Result<Self, TaxonomyError> {
        let content = std::fs::read_to_string(path).map_err(|source| TaxonomyError::SourceIo {
            path: path.display().to_string(),
            source,
        })?;
        let source: SourceNode =
            serde_json::from_str(&content).map_err(|e| TaxonomyError::Parse {
                message: e.to_string(),
            })?;
        Ok(Self::ingest(&source))
    }

    /// The node for `uri`, if ingested.
    pub fn get(&self, uri: &str) -> Option<&TaxonomyNode> {
        self.nodes.get(uri)
    }

    /// Resolve a canonical or alternate name to its owning uri.
    pub fn resolve_name(&self, name: &str) -> Option<&str> {
        self.name_index.get(name).map(String::as_str)
    }

    /// Iterate over all resolvable names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.name_index.keys().map(String::as_str)
    }

    /// Number of ingested nodes, synthetic root included.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of resolvable names (canonical plus alternate).
    pub fn num_names(&self) -> usize {
        self.name_index.len()
    }

    fn node(&self, uri: &str) -> Result<&TaxonomyNode, TaxonomyError> {
        self.nodes.get(uri).ok_or_else(|| TaxonomyError::Inconsistent {
            uri: uri.to_string(),
        })
    }

    fn parent_of<'a>(&self, node: &'a TaxonomyNode) -> Result<&'a str, TaxonomyError> {
        node.parent
            .as_deref()
            .ok_or_else(|| TaxonomyError::Inconsistent {
                uri: node.uri.clone(),
            })
    }

    /// Taxonomy distance between two terms, with their lowest common ancestor.
    ///
    /// Both arguments resolve through the name index (canonical or alternate
    /// names); an unknown label is a [`TaxonomyError::LabelNotFound`]. The
    /// deeper side first walks up at cost `1/(level+1)` per step until the
    /// levels match, then both sides walk up together at cost `2/(level+1)`
    /// per step until they meet. Cost per step shrinks with depth, so
    /// divergence near the root costs more than divergence deep in a branch.
    pub fn distance(&self, a: &str, b: &str) -> Result<(f64, &TaxonomyNode), TaxonomyError> {
        let a_uri = self
            .name_index
            .get(a)
            .ok_or_else(|| TaxonomyError::LabelNotFound { label: a.to_string() })?;
        let b_uri = self
            .name_index
            .get(b)
            .ok_or_else(|| TaxonomyError::LabelNotFound { label: b.to_string() })?;

        // `lo` is the shallower side.
        let (mut lo, mut hi) = (a_uri.as_str(), b_uri.as_str());
        if self.node(lo)?.level > self.node(hi)?.level {
            std::mem::swap(&mut lo, &mut hi);
        }

        let mut distance = 0.0;
        let mut diff = self.node(hi)?.level - self.node(lo)?.level;

        // Bring the deeper side up to the shallower side's level.
        while diff > 0 && hi != ROOT_URI {
            let hi_node = self.node(hi)?;
            distance += 1.0 / (hi_node.level as f64 + 1.0);
            hi = self.parent_of(hi_node)?;
            diff -= 1;
        }

        // Ascend both sides together until they meet at the common ancestor.
        while lo != hi {
            let hi_node = self.node(hi)?;
            distance += 2.0 * (1.0 / (hi_node.level as f64 + 1.0));
            lo = self.parent_of(self.node(lo)?)?;
            hi = self.parent_of(hi_node)?;
        }

        Ok((distance, self.node(lo)?))
    }

    /// Persist the flat tree and the name index under `workdir` for reuse
    /// without re-ingesting the source.
    pub fn persist(&self, workdir: &Path) -> Result<(), TaxonomyError> {
        std::fs::create_dir_all(workdir).map_err(|source| TaxonomyError::Persist {
            path: workdir.display().to_string(),
            source,
        })?;
        let tree_path = workdir.join(TREE_FILE);
        let tree = serde_json::to_string(&self.nodes).map_err(|e| TaxonomyError::Parse {
            message: e.to_string(),
        })?;
        std::fs::write(&tree_path, tree).map_err(|source| TaxonomyError::Persist {
            path: tree_path.display().to_string(),
            source,
        })?;

        let index_path = workdir.join(SYNONYMS_FILE);
        let index = serde_json::to_string(&self.name_index).map_err(|e| TaxonomyError::Parse {
            message: e.to_string(),
        })?;
        std::fs::write(&index_path, index).map_err(|source| TaxonomyError::Persist {
            path: index_path.display().to_string(),
            source,
        })?;

        tracing::info!(workdir = %workdir.display(), "persisted taxonomy artifacts");
        Ok(())
    }

    /// Restore a taxonomy from artifacts written by [`Taxonomy::persist`].
    pub fn load(workdir: &Path) -> Result<Self, TaxonomyError> {
        let tree_path = workdir.join(TREE_FILE);
        let tree = std::fs::read_to_string(&tree_path).map_err(|source| {
            TaxonomyError::SourceIo {
                path: tree_path.display().to_string(),
                source,
            }
        })?;
        let nodes: HashMap<String, TaxonomyNode> =
            serde_json::from_str(&tree).map_err(|e| TaxonomyError::Parse {
                message: e.to_string(),
            })?;

        let index_path = workdir.join(SYNONYMS_FILE);
        let index = std::fs::read_to_string(&index_path).map_err(|source| {
            TaxonomyError::SourceIo {
                path: index_path.display().to_string(),
                source,
            }
        })?;
        let name_index: HashMap<String, String> =
            serde_json::from_str(&index).map_err(|e| TaxonomyError::Parse {
                message: e.to_string(),
            })?;

        Ok(Self { nodes, name_index })
    }
}

/// Canonical short identifier: the last `/`-separated segment of the uri.
fn short_uri(uri: &str) -> &str {
    uri.rsplit_once('/').map_or(uri, |(_, tail)| tail)
}

/// Map every canonical and alternate name to its owning uri.
///
/// Registration runs in ingestion-id order; the first registration of a name
/// wins, and later claims by a different uri are reported as warnings.
fn build_name_index(nodes: &HashMap<String, TaxonomyNode>) -> HashMap<String, String> {
    let mut ordered: Vec<&TaxonomyNode> = nodes.values().collect();
    ordered.sort_unstable_by_key(|node| node.id);

    let mut index: HashMap<String, String> = HashMap::new();
    for node in ordered {
        register_name(&mut index, &node.name, &node.uri);
        for alt in &node.alt {
            register_name(&mut index, alt, &node.uri);
        }
    }
    index
}

fn register_name(index: &mut HashMap<String, String>, name: &str, uri: &str) {
    if let Some(existing) = index.get(name) {
        if existing != uri {
            tracing::warn!(
                name,
                first = %existing,
                other = %uri,
                "name claimed by two different concepts, keeping the first"
            );
        }
        return;
    }
    index.insert(name.to_string(), uri.to_string());
}
