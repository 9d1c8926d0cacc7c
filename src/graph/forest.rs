//! Kruskal-based forest partitioner.
//!
//! Pushes every edge into a min-priority queue ordered by ascending weight and
//! repeatedly accepts the cheapest edge whose endpoints lie in different sets
//! — exactly Kruskal's minimum-spanning-tree construction. Run to completion
//! over a connected input this yields a single spanning tree; stopped early it
//! yields an approximate k-way decomposition whose retained intra-cluster
//! edges are the cheapest ones.
//!
//! Equal-weight edges are ordered by their `(v, w)` vertex pair so that pop
//! order, and therefore the produced forest, is deterministic.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::interner::VertexId;

use super::union_find::UnionFind;
use super::{Weight, WeightedGraph};

/// Heap entry. `Ord` is inverted so that `BinaryHeap` (a max-heap) pops the
/// smallest weight first, with the vertex pair as deterministic tie-break.
#[derive(Debug, Clone, Copy, PartialEq)]
struct QueuedEdge {
    weight: Weight,
    v: VertexId,
    w: VertexId,
}

impl Eq for QueuedEdge {}

impl Ord for QueuedEdge {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .total_cmp(&self.weight)
            .then_with(|| (other.v, other.w).cmp(&(self.v, self.w)))
    }
}

impl PartialOrd for QueuedEdge {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Incremental Kruskal run over one (usually connected) weighted graph.
///
/// Supports three consumption modes:
///
/// - [`ForestPartitioner::run_bounded`]: producer-stopped — halts after a
///   fixed number of successful joins.
/// - [`ForestPartitioner::snapshots`]: consumer-driven — a lazy sequence of
///   `(live-set count, partial forest)` snapshots after every successful
///   join; termination is entirely caller-controlled.
/// - [`ForestPartitioner::extract`]: full run — drains the queue and returns
///   the spanning tree.
#[derive(Debug)]
pub struct ForestPartitioner {
    queue: BinaryHeap<QueuedEdge>,
    uf: UnionFind,
    forest: WeightedGraph,
    original: Vec<(VertexId, VertexId, Weight)>,
}

impl ForestPartitioner {
    /// Seed the priority queue and union-find from `graph`.
    pub fn new(graph: &WeightedGraph) -> Self {
        let original: Vec<(VertexId, VertexId, Weight)> = graph.edges().collect();
        let mut queue = BinaryHeap::with_capacity(original.len());
        for &(v, w, weight) in &original {
            queue.push(QueuedEdge { weight, v, w });
        }
        let mut uf = UnionFind::new();
        let mut forest = WeightedGraph::new();
        for v in graph.vertices() {
            uf.get_key(v);
            forest.add_vertex(v);
        }
        Self {
            queue,
            uf,
            forest,
            original,
        }
    }

    /// Pop edges until one merges two sets; accept it into the forest.
    ///
    /// Returns the accepted edge, or `None` once the queue is exhausted.
    fn next_join(&mut self) -> Option<(VertexId, VertexId, Weight)> {
        while let Some(QueuedEdge { weight, v, w }) = self.queue.pop() {
            if self.uf.join(v, w) {
                self.forest.add(v, w, weight);
                return Some((v, w, weight));
            }
        }
        None
    }

    /// Producer-stopped mode: perform at most `max_joins` successful joins.
    ///
    /// The counter is decremented on every successful union regardless of the
    /// current component count, mirroring the decrement-based stopping rule
    /// of the batch pipeline. Returns the number of joins performed (smaller
    /// than `max_joins` only if the queue ran dry).
    pub fn run_bounded(&mut self, max_joins: usize) -> usize {
        let mut remaining = max_joins;
        while remaining > 0 {
            if self.next_join().is_none() {
                break;
            }
            remaining -= 1;
        }
        max_joins - remaining
    }

    /// Consumer-driven mode: lazy `(live-set count, partial forest)` snapshots.
    ///
    /// One snapshot is produced after every successful join; the partitioner
    /// itself never breaks early. The caller stops consuming once the live-set
    /// count satisfies its target, then typically runs
    /// [`super::components::split_components`] over the snapshot forest.
    pub fn snapshots(&mut self) -> Snapshots<'_> {
        Snapshots { inner: self }
    }

    /// Current count of live sets in the underlying union-find.
    pub fn num_components(&self) -> usize {
        self.uf.num_components()
    }

    /// Full-run mode: drain the queue completely and return the forest.
    ///
    /// Over a single connected input this is one minimum spanning tree with
    /// exactly `V - 1` edges, the basis for shortest-path computation.
    pub fn extract(mut self) -> WeightedGraph {
        while self.next_join().is_some() {}
        self.forest
    }

    /// Reconstruct the vertex partition induced by the joins so far.
    ///
    /// Computes the compressed representative of every vertex and groups each
    /// *original* edge whose endpoints share a representative into that
    /// representative's output graph. The results are induced subgraphs of
    /// the input — they may contain cycles, not just the spanning-tree edges
    /// that triggered the joins.
    pub fn into_partitions(mut self) -> Vec<WeightedGraph> {
        let roots = self.uf.compress();

        let mut by_root: HashMap<VertexId, WeightedGraph> = HashMap::new();
        for (&v, &root) in &roots {
            by_root.entry(root).or_default().add_vertex(v);
        }
        for (v, w, weight) in self.original {
            if roots[&v] == roots[&w] {
                by_root.get_mut(&roots[&v]).expect("root registered above").add(
                    v,
                    w,
                    weight,
                );
            }
        }

        // Deterministic output order: sort by representative id.
        let mut keyed: Vec<(VertexId, WeightedGraph)> = by_root.into_iter().collect();
        keyed.sort_unstable_by_key(|(root, _)| *root);
        keyed.into_iter().map(|(_, part)| part).collect()
    }
}

/// Lazy snapshot sequence produced by [`ForestPartitioner::snapshots`].
#[derive(Debug)]
pub struct Snapshots<'a> {
    inner: &'a mut ForestPartitioner,
}

impl Iterator for Snapshots<'_> {
    type Item = (usize, WeightedGraph);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next_join()
            .map(|_| (self.inner.uf.num_components(), self.inner.forest.clone()))
    }
}

/// Producer-stopped decomposition: seed the joins counter from `target_joins`
/// and reconstruct the induced partition graphs.
pub fn partition(graph: &WeightedGraph, target_joins: usize) -> Vec<WeightedGraph> {
    let mut partitioner = ForestPartitioner::new(graph);
    partitioner.run_bounded(target_joins);
    partitioner.into_partitions()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Path graph 0-1-2-3-4 with ascending weights.
    fn path_graph() -> WeightedGraph {
        let mut g = WeightedGraph::new();
        for v in 0..4 {
            g.add(v, v + 1, (v + 1) as Weight);
        }
        g
    }

    #[test]
    fn full_run_yields_spanning_tree_with_v_minus_1_edges() {
        let mut g = WeightedGraph::new();
        // Connected graph with a cycle; MST must drop the heaviest cycle edge.
        g.add(0, 1, 1.0);
        g.add(1, 2, 2.0);
        g.add(0, 2, 10.0);
        g.add(2, 3, 1.5);
        let tree = ForestPartitioner::new(&g).extract();
        assert_eq!(tree.num_vertices(), 4);
        assert_eq!(tree.num_edges(), 3);
        assert!(tree.get_weight(0, 2, f64::NAN).is_nan());
    }

    #[test]
    fn bounded_run_decrements_per_successful_join() {
        let g = path_graph();
        let mut partitioner = ForestPartitioner::new(&g);
        let joined = partitioner.run_bounded(2);
        assert_eq!(joined, 2);
        // 5 vertices minus 2 joins leaves 3 live sets.
        assert_eq!(partitioner.num_components(), 3);
        let parts = partitioner.into_partitions();
        assert_eq!(parts.len(), 3);
    }

    #[test]
    fn bounded_run_stops_when_queue_is_exhausted() {
        let g = path_graph();
        let mut partitioner = ForestPartitioner::new(&g);
        let joined = partitioner.run_bounded(100);
        assert_eq!(joined, 4);
        assert_eq!(partitioner.num_components(), 1);
    }

    #[test]
    fn cheapest_edges_are_joined_first() {
        let g = path_graph();
        let mut partitioner = ForestPartitioner::new(&g);
        partitioner.run_bounded(2);
        let parts = partitioner.into_partitions();
        // Edges with weights 1.0 and 2.0 were accepted: {0,1,2} plus
        // singletons {3} and {4}.
        let sizes: Vec<usize> = {
            let mut s: Vec<usize> = parts.iter().map(WeightedGraph::num_vertices).collect();
            s.sort_unstable();
            s
        };
        assert_eq!(sizes, vec![1, 1, 3]);
    }

    #[test]
    fn snapshots_are_caller_controlled() {
        let g = path_graph();
        let mut partitioner = ForestPartitioner::new(&g);
        let mut taken = Vec::new();
        for (live, forest) in partitioner.snapshots() {
            taken.push((live, forest.num_edges()));
            if live <= 3 {
                break;
            }
        }
        // 5 singletons: first join leaves 4 sets, second leaves 3.
        assert_eq!(taken, vec![(4, 1), (3, 2)]);
    }

    #[test]
    fn snapshots_end_when_queue_is_exhausted() {
        let g = path_graph();
        let mut partitioner = ForestPartitioner::new(&g);
        assert_eq!(partitioner.snapshots().count(), 4);
    }

    #[test]
    fn partitions_are_induced_subgraphs_not_trees() {
        let mut g = WeightedGraph::new();
        // Triangle with one cheap path to keep the cluster together, plus a
        // far-away pair. Accepting 2 joins merges the triangle only.
        g.add(0, 1, 1.0);
        g.add(1, 2, 1.1);
        g.add(0, 2, 5.0);
        g.add(10, 11, 9.0);
        let mut partitioner = ForestPartitioner::new(&g);
        partitioner.run_bounded(2);
        let parts = partitioner.into_partitions();
        let triangle = parts
            .iter()
            .find(|p| p.has_vertex(0))
            .expect("triangle partition");
        // All three original triangle edges belong to the induced subgraph,
        // including the 5.0 edge that never triggered a join.
        assert_eq!(triangle.num_edges(), 3);
    }

    #[test]
    fn equal_weights_pop_in_vertex_order() {
        let mut g = WeightedGraph::new();
        g.add(0, 1, 1.0);
        g.add(2, 3, 1.0);
        g.add(4, 5, 1.0);
        let mut partitioner = ForestPartitioner::new(&g);
        let first = partitioner.next_join().expect("three edges queued");
        assert_eq!((first.0, first.1), (0, 1));
        let second = partitioner.next_join().expect("two edges left");
        assert_eq!((second.0, second.1), (2, 3));
    }
}
