//! Per-record distance aggregation against a fixed reference-concept list.
//!
//! Each reference concept carries a shortest-path computation rooted at that
//! concept over the full-graph spanning tree. For every record the aggregator
//! emits one distance per concept: the mean over the record's resolvable
//! labels of their tree distance to the concept. Labels that never made it
//! into the graph are tracked as missing and contribute nothing.

use std::collections::BTreeSet;

use crate::cooccur::Record;
use crate::error::PipelineError;
use crate::graph::shortest_path::ShortestPaths;
use crate::graph::WeightedGraph;
use crate::interner::{LabelInterner, VertexId};

/// A reference concept with its precomputed shortest-path tree.
#[derive(Debug, Clone)]
struct ReferenceConcept {
    label: String,
    paths: ShortestPaths,
}

/// One output row: record key plus one distance per reference concept, in
/// the configured concept order.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceRow {
    /// The record's grouping key.
    pub key: String,
    /// Mean distances, one per reference concept.
    pub values: Vec<f64>,
}

/// Batch summary of labels that could not be resolved.
#[derive(Debug, Clone, Default)]
pub struct MissingReport {
    /// Total occurrences of unresolvable labels across the batch.
    pub count: usize,
    /// Distinct unresolvable labels, sorted.
    pub labels: BTreeSet<String>,
}

/// Aggregates per-record label sets into distance vectors.
#[derive(Debug)]
pub struct DistanceAggregator<'a> {
    interner: &'a LabelInterner,
    tree: &'a WeightedGraph,
    concepts: Vec<ReferenceConcept>,
    missing: MissingReport,
}

impl<'a> DistanceAggregator<'a> {
    /// Prepare one shortest-path engine per reference concept over `tree`.
    ///
    /// `tree` is the spanning tree produced by the full-run forest
    /// partitioner. Every reference concept must be interned and present in
    /// the tree; an absent concept is a fatal
    /// [`PipelineError::UnknownConcept`].
    pub fn new(
        interner: &'a LabelInterner,
        tree: &'a WeightedGraph,
        concept_labels: &[String],
    ) -> Result<Self, PipelineError> {
        let mut concepts = Vec::with_capacity(concept_labels.len());
        for label in concept_labels {
            let vertex = interner
                .id_of(label)
                .filter(|&v| tree.has_vertex(v))
                .ok_or_else(|| PipelineError::UnknownConcept {
                    label: label.clone(),
                })?;
            let paths = ShortestPaths::new(tree, vertex)?;
            concepts.push(ReferenceConcept {
                label: label.clone(),
                paths,
            });
        }
        Ok(Self {
            interner,
            tree,
            concepts,
            missing: MissingReport::default(),
        })
    }

    /// Reference concept labels in output-column order.
    pub fn concept_labels(&self) -> impl Iterator<Item = &str> {
        self.concepts.iter().map(|c| c.label.as_str())
    }

    /// Aggregate one record into its distance row.
    ///
    /// Labels absent from the interner, or interned but outside the spanning
    /// tree, count as missing. A record with no resolvable label emits `0.0`
    /// for every concept.
    pub fn aggregate(&mut self, record: &Record) -> DistanceRow {
        let resolved: Vec<VertexId> = record
            .labels
            .iter()
            .filter_map(|label| {
                let vertex = self
                    .interner
                    .id_of(label)
                    .filter(|&v| self.tree.has_vertex(v));
                if vertex.is_none() {
                    self.missing.count += 1;
                    self.missing.labels.insert(label.clone());
                }
                vertex
            })
            .collect();

        let values = self
            .concepts
            .iter()
            .map(|concept| mean_distance(&concept.paths, &resolved))
            .collect();

        DistanceRow {
            key: record.key.clone(),
            values,
        }
    }

    /// Aggregate a whole batch, in input order.
    pub fn aggregate_all(&mut self, records: &[Record]) -> Vec<DistanceRow> {
        records.iter().map(|record| self.aggregate(record)).collect()
    }

    /// Batch summary of unresolvable labels, for reporting once at the end.
    pub fn missing_report(&self) -> &MissingReport {
        &self.missing
    }
}

/// Mean tree distance of `vertices` to the concept, ignoring vertices the
/// tree cannot reach; `0.0` when nothing contributes.
fn mean_distance(paths: &ShortestPaths, vertices: &[VertexId]) -> f64 {
    let reachable: Vec<f64> = vertices
        .iter()
        .filter_map(|&v| paths.distance_to(v))
        .collect();
    if reachable.is_empty() {
        return 0.0;
    }
    reachable.iter().sum::<f64>() / reachable.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Star tree around A: A-B (1.0), A-C (2.0).
    fn fixture() -> (LabelInterner, WeightedGraph) {
        let mut interner = LabelInterner::new();
        let a = interner.intern("A");
        let b = interner.intern("B");
        let c = interner.intern("C");
        let mut tree = WeightedGraph::new();
        tree.add(a, b, 1.0);
        tree.add(a, c, 2.0);
        (interner, tree)
    }

    fn record(key: &str, labels: &[&str]) -> Record {
        Record::new(key, labels.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn row_holds_mean_distance_per_concept() {
        let (interner, tree) = fixture();
        let concepts = vec!["A".to_string(), "B".to_string()];
        let mut agg = DistanceAggregator::new(&interner, &tree, &concepts).unwrap();

        let row = agg.aggregate(&record("P1", &["B", "C"]));
        assert_eq!(row.key, "P1");
        // To A: (1.0 + 2.0) / 2; to B: (0.0 + 3.0) / 2.
        assert_eq!(row.values, vec![1.5, 1.5]);
    }

    #[test]
    fn interned_label_off_the_tree_counts_as_missing() {
        // "C" is interned but only "A" and "B" made it onto the tree, the
        // fate of a label pruned away or outside the largest component.
        let mut interner = LabelInterner::new();
        let a = interner.intern("A");
        let b = interner.intern("B");
        interner.intern("C");
        let mut tree = WeightedGraph::new();
        tree.add(a, b, 1.0);

        let concepts = vec!["A".to_string()];
        let mut agg = DistanceAggregator::new(&interner, &tree, &concepts).unwrap();
        let row = agg.aggregate(&record("P1", &["B", "C"]));
        assert_eq!(row.values, vec![1.0]);

        let report = agg.missing_report();
        assert_eq!(report.count, 1);
        assert!(report.labels.contains("C"));
    }

    #[test]
    fn missing_labels_are_skipped_and_reported() {
        let (interner, tree) = fixture();
        let concepts = vec!["A".to_string()];
        let mut agg = DistanceAggregator::new(&interner, &tree, &concepts).unwrap();

        let row = agg.aggregate(&record("P1", &["B", "unknown", "unknown"]));
        assert_eq!(row.values, vec![1.0]);

        let report = agg.missing_report();
        assert_eq!(report.count, 2);
        assert_eq!(report.labels.len(), 1);
        assert!(report.labels.contains("unknown"));
    }

    #[test]
    fn record_with_no_resolvable_label_emits_zeroes() {
        let (interner, tree) = fixture();
        let concepts = vec!["A".to_string(), "C".to_string()];
        let mut agg = DistanceAggregator::new(&interner, &tree, &concepts).unwrap();
        let row = agg.aggregate(&record("P9", &["nope"]));
        assert_eq!(row.values, vec![0.0, 0.0]);
    }

    #[test]
    fn unknown_reference_concept_is_fatal() {
        let (interner, tree) = fixture();
        let concepts = vec!["Z".to_string()];
        let err = DistanceAggregator::new(&interner, &tree, &concepts).unwrap_err();
        assert!(matches!(err, PipelineError::UnknownConcept { .. }));
    }

    #[test]
    fn batch_order_follows_input_order() {
        let (interner, tree) = fixture();
        let concepts = vec!["A".to_string()];
        let mut agg = DistanceAggregator::new(&interner, &tree, &concepts).unwrap();
        let rows = agg.aggregate_all(&[record("P1", &["B"]), record("P2", &["C"])]);
        assert_eq!(rows[0].key, "P1");
        assert_eq!(rows[1].key, "P2");
        assert_eq!(rows[0].values, vec![1.0]);
        assert_eq!(rows[1].values, vec![2.0]);
    }
}
