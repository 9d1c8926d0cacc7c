//! Weighted undirected graph and the algorithms that run over it.
//!
//! The graph is an adjacency store keyed by dense integer vertex ids (handed
//! out by [`crate::interner::LabelInterner`]). Submodules provide the
//! algorithmic surface:
//!
//! - [`union_find`]: disjoint-set structure with path compression
//! - [`components`]: connected-components discovery and splitting
//! - [`forest`]: Kruskal-style early-stopped minimum-spanning-forest
//! - [`shortest_path`]: single-source shortest paths

pub mod components;
pub mod forest;
pub mod shortest_path;
pub mod union_find;

use std::collections::HashMap;

use crate::interner::VertexId;

/// Edge weight. Co-occurrence strength before the distance transform,
/// graph distance after it.
pub type Weight = f64;

/// A weighted undirected graph over dense vertex ids.
///
/// An edge `{v, w}` is stored in both adjacency directions but counts as one
/// edge; `(v, w)` and `(w, v)` always resolve to the identical weight. A vertex
/// may exist with zero incident edges (for example a degree-0 survivor of
/// pruning) and is still enumerated by [`WeightedGraph::vertices`].
#[derive(Debug, Clone, Default)]
pub struct WeightedGraph {
    adj: HashMap<VertexId, HashMap<VertexId, Weight>>,
    num_edges: usize,
}

impl WeightedGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the edge `{v, w}` with `weight`.
    ///
    /// Last write wins — the weight is replaced, not accumulated. Both
    /// vertices are created if absent. Self-loops (`v == w`) are ignored:
    /// an edge is an unordered pair of distinct vertices.
    pub fn add(&mut self, v: VertexId, w: VertexId, weight: Weight) {
        if v == w {
            return;
        }
        let fresh = self
            .adj
            .entry(v)
            .or_default()
            .insert(w, weight)
            .is_none();
        self.adj.entry(w).or_default().insert(v, weight);
        if fresh {
            self.num_edges += 1;
        }
    }

    /// Ensure `v` exists, with no incident edges if new.
    pub fn add_vertex(&mut self, v: VertexId) {
        self.adj.entry(v).or_default();
    }

    /// The weight of edge `{v, w}`, or `default` if the edge is absent.
    pub fn get_weight(&self, v: VertexId, w: VertexId, default: Weight) -> Weight {
        self.adj
            .get(&v)
            .and_then(|nbrs| nbrs.get(&w))
            .copied()
            .unwrap_or(default)
    }

    /// Remove the edge `{v, w}` from both directions.
    ///
    /// Neither vertex is removed; vertices can become isolated.
    pub fn delete(&mut self, v: VertexId, w: VertexId) {
        let removed = self
            .adj
            .get_mut(&v)
            .map(|nbrs| nbrs.remove(&w).is_some())
            .unwrap_or(false);
        if let Some(nbrs) = self.adj.get_mut(&w) {
            nbrs.remove(&v);
        }
        if removed {
            self.num_edges -= 1;
        }
    }

    /// True if `v` is a vertex of this graph.
    pub fn has_vertex(&self, v: VertexId) -> bool {
        self.adj.contains_key(&v)
    }

    /// Iterate over `(neighbor, weight)` pairs incident to `v`.
    ///
    /// Callers that mutate the graph while iterating must snapshot first;
    /// the borrow checker enforces this.
    pub fn adjacent(&self, v: VertexId) -> impl Iterator<Item = (VertexId, Weight)> + '_ {
        self.adj
            .get(&v)
            .into_iter()
            .flat_map(|nbrs| nbrs.iter().map(|(&w, &weight)| (w, weight)))
    }

    /// Iterate over all vertex ids, isolated ones included.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.adj.keys().copied()
    }

    /// Iterate over each undirected edge exactly once, as `(v, w, weight)`
    /// with `v < w`.
    pub fn edges(&self) -> impl Iterator<Item = (VertexId, VertexId, Weight)> + '_ {
        self.adj.iter().flat_map(|(&v, nbrs)| {
            nbrs.iter()
                .filter(move |&(&w, _)| v < w)
                .map(move |(&w, &weight)| (v, w, weight))
        })
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.adj.len()
    }

    /// Number of undirected edges.
    pub fn num_edges(&self) -> usize {
        self.num_edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_lookup_is_symmetric() {
        let mut g = WeightedGraph::new();
        g.add(0, 1, 2.5);
        assert_eq!(g.get_weight(0, 1, 0.0), 2.5);
        assert_eq!(g.get_weight(1, 0, 0.0), 2.5);
        assert_eq!(g.get_weight(0, 2, -1.0), -1.0);
    }

    #[test]
    fn add_overwrites_instead_of_accumulating() {
        let mut g = WeightedGraph::new();
        g.add(0, 1, 1.0);
        g.add(0, 1, 7.0);
        assert_eq!(g.get_weight(0, 1, 0.0), 7.0);
        assert_eq!(g.get_weight(1, 0, 0.0), 7.0);
        assert_eq!(g.num_edges(), 1);
    }

    #[test]
    fn edges_yield_each_pair_once() {
        let mut g = WeightedGraph::new();
        g.add(0, 1, 1.0);
        g.add(1, 2, 2.0);
        g.add(0, 2, 3.0);
        let edges: Vec<_> = g.edges().collect();
        assert_eq!(edges.len(), g.num_edges());
        assert_eq!(edges.len(), 3);
        for (v, w, _) in edges {
            assert!(v < w);
        }
    }

    #[test]
    fn delete_keeps_vertices() {
        let mut g = WeightedGraph::new();
        g.add(0, 1, 1.0);
        g.delete(0, 1);
        assert_eq!(g.num_edges(), 0);
        assert!(g.has_vertex(0));
        assert!(g.has_vertex(1));
        assert_eq!(g.adjacent(0).count(), 0);
        // Deleting an absent edge is a no-op.
        g.delete(0, 1);
        assert_eq!(g.num_edges(), 0);
    }

    #[test]
    fn self_loops_are_ignored() {
        let mut g = WeightedGraph::new();
        g.add(3, 3, 9.0);
        assert_eq!(g.num_edges(), 0);
        assert!(!g.has_vertex(3));
    }

    #[test]
    fn isolated_vertices_are_enumerated() {
        let mut g = WeightedGraph::new();
        g.add_vertex(5);
        g.add(0, 1, 1.0);
        let mut vs: Vec<_> = g.vertices().collect();
        vs.sort_unstable();
        assert_eq!(vs, vec![0, 1, 5]);
        assert_eq!(g.num_vertices(), 3);
    }
}
