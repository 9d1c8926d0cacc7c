//! Co-occurrence graph construction, pruning and the distance transform.
//!
//! Each input record carries the concept labels of one bibliographic record.
//! Every unordered pair of label positions in a record contributes to the
//! weight of the edge between the two interned labels. Duplicate labels are
//! deliberately not deduplicated — a repeated label strengthens its pairwise
//! weights extra times. Cost is O(L²) per record, acceptable because records
//! carry only a handful of concepts.

use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::error::ConfigError;
use crate::graph::{Weight, WeightedGraph};
use crate::interner::LabelInterner;

/// One input record: an opaque grouping key (bibcode) plus its labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Record key, e.g. a publication bibcode.
    pub key: String,
    /// Concept labels in input order; duplicates preserved.
    pub labels: Vec<String>,
}

impl Record {
    /// Convenience constructor for tests and callers with owned parts.
    pub fn new(key: impl Into<String>, labels: Vec<String>) -> Self {
        Self {
            key: key.into(),
            labels,
        }
    }
}

/// Edge-weighting strategy applied when a label pair is observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeightPolicy {
    /// Occurrence counting: new weight = old weight + 1.
    #[default]
    Count,
    /// Relaxation: new weight = old weight / 2.
    Relax,
}

impl WeightPolicy {
    /// Produce the updated weight for an observed pair.
    pub fn apply(self, old: Weight) -> Weight {
        match self {
            WeightPolicy::Count => old + 1.0,
            WeightPolicy::Relax => old / 2.0,
        }
    }
}

impl std::str::FromStr for WeightPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "count" => Ok(WeightPolicy::Count),
            "relax" => Ok(WeightPolicy::Relax),
            other => Err(ConfigError::UnknownWeightPolicy {
                value: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for WeightPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeightPolicy::Count => write!(f, "count"),
            WeightPolicy::Relax => write!(f, "relax"),
        }
    }
}

/// Build the co-occurrence graph from a batch of records.
///
/// Labels are interned on first sight; for every pair of distinct label
/// positions `(i < j)` the current edge weight (or `default_edge_weight` when
/// absent) is passed through `policy` and stored back. Pairs whose two
/// positions intern to the same id are skipped — edges connect distinct
/// vertices.
pub fn build_graph<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    interner: &mut LabelInterner,
    config: &PipelineConfig,
) -> WeightedGraph {
    let mut graph = WeightedGraph::new();
    let mut record_count: usize = 0;

    for record in records {
        record_count += 1;
        for i in 0..record.labels.len() {
            for j in (i + 1)..record.labels.len() {
                let v = interner.intern(&record.labels[i]);
                let w = interner.intern(&record.labels[j]);
                if v == w {
                    continue;
                }
                let old = graph.get_weight(v, w, config.default_edge_weight);
                graph.add(v, w, config.weight_policy.apply(old));
            }
        }
    }

    tracing::info!(
        records = record_count,
        vertices = graph.num_vertices(),
        edges = graph.num_edges(),
        policy = %config.weight_policy,
        "built co-occurrence graph"
    );
    graph
}

/// Delete every edge whose weight does not exceed `min_weight`.
///
/// The threshold is non-strict: an edge with `weight == min_weight` is
/// removed. Operates over a snapshot of the edge list, so the mutation never
/// races the iteration. Endpoints stay behind as (possibly isolated)
/// vertices.
pub fn prune(graph: &mut WeightedGraph, min_weight: Weight) {
    let doomed: Vec<_> = graph
        .edges()
        .filter(|&(_, _, weight)| weight <= min_weight)
        .map(|(v, w, _)| (v, w))
        .collect();
    let pruned = doomed.len();
    for (v, w) in doomed {
        graph.delete(v, w);
    }
    tracing::info!(
        pruned,
        min_weight,
        remaining = graph.num_edges(),
        "pruned co-occurrence graph"
    );
}

/// Rewrite every edge weight as `1 / max(1, ln(weight))`.
///
/// Converts co-occurrence strength (higher is closer) into graph distance
/// (lower is closer), which the MST construction needs because it always
/// prefers smaller weights. Assumes every weight is >= 1; pruning with a
/// threshold of at least 1 under the counting policy guarantees that domain.
pub fn to_distance_weights(graph: &mut WeightedGraph) {
    let snapshot: Vec<_> = graph.edges().collect();
    for (v, w, weight) in snapshot {
        graph.add(v, w, 1.0 / weight.ln().max(1.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_config() -> PipelineConfig {
        PipelineConfig {
            default_edge_weight: 0.0,
            weight_policy: WeightPolicy::Count,
            ..Default::default()
        }
    }

    fn record(key: &str, labels: &[&str]) -> Record {
        Record::new(key, labels.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn counting_policy_accumulates_pair_observations() {
        let mut interner = LabelInterner::new();
        let records = vec![record("P1", &["A", "B", "C"]), record("P2", &["A", "B"])];
        let g = build_graph(&records, &mut interner, &count_config());

        let a = interner.id_of("A").unwrap();
        let b = interner.id_of("B").unwrap();
        let c = interner.id_of("C").unwrap();
        assert_eq!(g.get_weight(a, b, 0.0), 2.0);
        assert_eq!(g.get_weight(a, c, 0.0), 1.0);
        assert_eq!(g.get_weight(b, c, 0.0), 1.0);
        assert_eq!(g.num_edges(), 3);
    }

    #[test]
    fn relax_policy_halves_the_default() {
        let mut interner = LabelInterner::new();
        let config = PipelineConfig {
            default_edge_weight: 8.0,
            weight_policy: WeightPolicy::Relax,
            ..Default::default()
        };
        let records = vec![record("P1", &["A", "B"]), record("P2", &["A", "B"])];
        let g = build_graph(&records, &mut interner, &config);
        let a = interner.id_of("A").unwrap();
        let b = interner.id_of("B").unwrap();
        // 8 -> 4 on first sight, 4 -> 2 on second.
        assert_eq!(g.get_weight(a, b, 0.0), 2.0);
    }

    #[test]
    fn duplicate_labels_strengthen_other_pairs_but_add_no_self_loop() {
        let mut interner = LabelInterner::new();
        let records = vec![record("P1", &["A", "A", "B"])];
        let g = build_graph(&records, &mut interner, &count_config());
        let a = interner.id_of("A").unwrap();
        let b = interner.id_of("B").unwrap();
        // Pairs: (A,A) skipped, (A,B) twice.
        assert_eq!(g.get_weight(a, b, 0.0), 2.0);
        assert_eq!(g.num_edges(), 1);
    }

    #[test]
    fn prune_is_inclusive_and_keeps_isolated_vertices() {
        let mut interner = LabelInterner::new();
        let records = vec![record("P1", &["A", "B", "C"]), record("P2", &["A", "B"])];
        let mut g = build_graph(&records, &mut interner, &count_config());
        prune(&mut g, 1.0);

        let a = interner.id_of("A").unwrap();
        let b = interner.id_of("B").unwrap();
        let c = interner.id_of("C").unwrap();
        assert_eq!(g.num_edges(), 1);
        assert_eq!(g.get_weight(a, b, 0.0), 2.0);
        assert!(g.has_vertex(c));
        assert_eq!(g.adjacent(c).count(), 0);
    }

    #[test]
    fn distance_transform_inverts_strength() {
        let mut g = WeightedGraph::new();
        g.add(0, 1, 2.0);
        g.add(1, 2, 100.0);
        to_distance_weights(&mut g);
        // ln(2) < 1, clamped to 1 -> distance 1.
        assert_eq!(g.get_weight(0, 1, 0.0), 1.0);
        // Stronger co-occurrence maps to smaller distance.
        assert!(g.get_weight(1, 2, 0.0) < g.get_weight(0, 1, 0.0));
        assert_eq!(g.get_weight(1, 2, 0.0), 1.0 / 100.0_f64.ln());
    }

    #[test]
    fn weight_policy_parses_from_str() {
        assert_eq!("count".parse::<WeightPolicy>().unwrap(), WeightPolicy::Count);
        assert_eq!("RELAX".parse::<WeightPolicy>().unwrap(), WeightPolicy::Relax);
        assert!("half".parse::<WeightPolicy>().is_err());
    }
}
