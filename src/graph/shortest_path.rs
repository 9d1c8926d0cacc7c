//! Single-source shortest paths.
//!
//! Dijkstra's algorithm over a [`WeightedGraph`]. The usual input is the
//! spanning tree produced by [`super::forest::ForestPartitioner::extract`],
//! where the shortest path reduces to the path-sum along the unique tree
//! path, but the relaxation is correct on any graph with non-negative
//! weights and makes no tree-only assumptions.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::error::GraphError;
use crate::interner::VertexId;

use super::{Weight, WeightedGraph};

/// Heap entry with inverted `Ord` so the max-heap pops the nearest vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Nearest {
    dist: Weight,
    vertex: VertexId,
}

impl Eq for Nearest {}

impl Ord for Nearest {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

impl PartialOrd for Nearest {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Shortest distances from one source vertex to every reachable vertex.
#[derive(Debug, Clone)]
pub struct ShortestPaths {
    dist: HashMap<VertexId, Weight>,
}

impl ShortestPaths {
    /// Run Dijkstra from `source` over `graph`.
    ///
    /// Fails with [`GraphError::VertexNotFound`] if the source is not a
    /// vertex of the graph.
    pub fn new(graph: &WeightedGraph, source: VertexId) -> Result<Self, GraphError> {
        if !graph.has_vertex(source) {
            return Err(GraphError::VertexNotFound { vertex: source });
        }

        let mut dist: HashMap<VertexId, Weight> = HashMap::new();
        let mut heap = BinaryHeap::new();
        dist.insert(source, 0.0);
        heap.push(Nearest {
            dist: 0.0,
            vertex: source,
        });

        while let Some(Nearest { dist: d, vertex }) = heap.pop() {
            // Stale entry: a shorter path to `vertex` was already settled.
            if d > dist[&vertex] {
                continue;
            }
            for (next, weight) in graph.adjacent(vertex) {
                let candidate = d + weight;
                let improved = dist
                    .get(&next)
                    .map(|&known| candidate < known)
                    .unwrap_or(true);
                if improved {
                    dist.insert(next, candidate);
                    heap.push(Nearest {
                        dist: candidate,
                        vertex: next,
                    });
                }
            }
        }

        Ok(Self { dist })
    }

    /// Distance from the source to `v`, or `None` if `v` is unreachable.
    pub fn distance_to(&self, v: VertexId) -> Option<Weight> {
        self.dist.get(&v).copied()
    }
}
