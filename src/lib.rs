//! # uatgraph
//!
//! Concept graph toolkit for controlled vocabularies: turns label
//! co-occurrence data from bibliographic records into a weighted graph,
//! decomposes it into tightly-related clusters, and computes taxonomy-aware
//! semantic distances between concepts and a reference set.
//!
//! ## Architecture
//!
//! - **Label interning** (`interner`): bidirectional string⇄dense-id mapping
//! - **Graph engine** (`graph`): weighted undirected graph, union-find,
//!   connected components, Kruskal-style forest partitioning, shortest paths
//! - **Co-occurrence builder** (`cooccur`): records → graph, pruning, the
//!   strength→distance weight transform
//! - **Taxonomy** (`taxonomy`): thesaurus ingestion, name index, hierarchical
//!   distance with persisted artifacts
//! - **Aggregation** (`distance`): per-record distance vectors against a
//!   reference-concept list
//!
//! ## Library usage
//!
//! ```
//! use uatgraph::config::PipelineConfig;
//! use uatgraph::cooccur::{self, Record};
//! use uatgraph::graph::forest;
//! use uatgraph::interner::LabelInterner;
//!
//! let records = vec![Record::new("P1", vec!["stars".into(), "galaxies".into()])];
//! let mut interner = LabelInterner::new();
//! let mut graph = cooccur::build_graph(&records, &mut interner, &PipelineConfig::default());
//! cooccur::to_distance_weights(&mut graph);
//! let clusters = forest::partition(&graph, 1);
//! assert_eq!(clusters.len(), 1);
//! ```

pub mod config;
pub mod cooccur;
pub mod distance;
pub mod error;
pub mod graph;
pub mod interner;
pub mod io;
pub mod taxonomy;
