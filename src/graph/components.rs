//! Connected-components discovery: partition a graph into maximal connected
//! subgraphs.
//!
//! The flood fill uses an explicit stack rather than recursion so that long
//! chains in large vocabularies cannot overflow the call stack.

use std::collections::HashMap;

use crate::interner::VertexId;

use super::WeightedGraph;

/// Assign a component id to every vertex.
///
/// Returns the vertex→component mapping and the number of components found.
/// Component ids are dense, in order of first discovery.
pub fn label_components(graph: &WeightedGraph) -> (HashMap<VertexId, usize>, usize) {
    let mut visited: HashMap<VertexId, usize> = HashMap::with_capacity(graph.num_vertices());
    let mut count = 0;
    let mut stack: Vec<VertexId> = Vec::new();

    for start in graph.vertices() {
        if visited.contains_key(&start) {
            continue;
        }
        let component = count;
        count += 1;
        visited.insert(start, component);
        stack.push(start);
        while let Some(v) = stack.pop() {
            for (w, _) in graph.adjacent(v) {
                if !visited.contains_key(&w) {
                    visited.insert(w, component);
                    stack.push(w);
                }
            }
        }
    }

    (visited, count)
}

/// Split a graph into one subgraph per connected component.
///
/// Every vertex lands in exactly one output graph and the union of the output
/// edge sets equals the input edge set. Both endpoints of an edge always share
/// a component id, so each undirected edge is added to its component graph
/// exactly once. A single-component input is returned unchanged, no copy.
pub fn split_components(graph: WeightedGraph) -> Vec<WeightedGraph> {
    let (visited, count) = label_components(&graph);
    if count <= 1 {
        return vec![graph];
    }

    let mut parts: Vec<WeightedGraph> = vec![WeightedGraph::new(); count];

    // Isolated vertices carry no edges; insert all vertices explicitly.
    for (&v, &component) in &visited {
        parts[component].add_vertex(v);
    }
    for (v, w, weight) in graph.edges() {
        parts[visited[&v]].add(v, w, weight);
    }

    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_triangles_and_a_loner() -> WeightedGraph {
        let mut g = WeightedGraph::new();
        g.add(0, 1, 1.0);
        g.add(1, 2, 1.0);
        g.add(0, 2, 1.0);
        g.add(10, 11, 2.0);
        g.add(11, 12, 2.0);
        g.add_vertex(99);
        g
    }

    #[test]
    fn split_is_a_true_partition() {
        let g = two_triangles_and_a_loner();
        let total_vertices = g.num_vertices();
        let total_edges = g.num_edges();
        let parts = split_components(g);
        assert_eq!(parts.len(), 3);

        let vertex_sum: usize = parts.iter().map(WeightedGraph::num_vertices).sum();
        let edge_sum: usize = parts.iter().map(WeightedGraph::num_edges).sum();
        assert_eq!(vertex_sum, total_vertices);
        assert_eq!(edge_sum, total_edges);

        // Every vertex appears in exactly one part.
        let mut seen: Vec<usize> = parts.iter().flat_map(|p| p.vertices()).collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 10, 11, 12, 99]);
    }

    #[test]
    fn single_component_is_returned_unchanged() {
        let mut g = WeightedGraph::new();
        g.add(0, 1, 1.0);
        g.add(1, 2, 5.0);
        let parts = split_components(g);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].num_edges(), 2);
        assert_eq!(parts[0].get_weight(1, 2, 0.0), 5.0);
    }

    #[test]
    fn isolated_vertex_forms_its_own_component() {
        let mut g = WeightedGraph::new();
        g.add_vertex(7);
        let (labels, count) = label_components(&g);
        assert_eq!(count, 1);
        assert_eq!(labels[&7], 0);
    }

    #[test]
    fn edge_weights_survive_the_split() {
        let g = two_triangles_and_a_loner();
        let parts = split_components(g);
        let chain = parts
            .iter()
            .find(|p| p.has_vertex(10))
            .expect("component containing vertex 10");
        assert_eq!(chain.get_weight(10, 11, 0.0), 2.0);
        assert_eq!(chain.get_weight(12, 11, 0.0), 2.0);
    }
}
