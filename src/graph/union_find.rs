//! Union-find (disjoint set union) over externally-supplied vertex ids.
//!
//! Used by both the connected-components finder and the forest partitioner.
//! Instances are created fresh per decomposition call and discarded with the
//! result; they are never shared across calls.

use std::collections::HashMap;

use crate::interner::VertexId;

/// Disjoint-set structure with union by size and path compression.
#[derive(Debug, Clone, Default)]
pub struct UnionFind {
    parent: HashMap<VertexId, VertexId>,
    size: HashMap<VertexId, usize>,
    components: usize,
}

impl UnionFind {
    /// Create an empty structure.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `v` as its own singleton set if unseen; no-op otherwise.
    pub fn get_key(&mut self, v: VertexId) {
        if !self.parent.contains_key(&v) {
            self.parent.insert(v, v);
            self.size.insert(v, 1);
            self.components += 1;
        }
    }

    /// Follow parent pointers to the set representative, compressing the
    /// visited path onto the root.
    fn find(&mut self, v: VertexId) -> VertexId {
        let mut root = v;
        while self.parent[&root] != root {
            root = self.parent[&root];
        }
        let mut node = v;
        while self.parent[&node] != node {
            let next = self.parent[&node];
            self.parent.insert(node, root);
            node = next;
        }
        root
    }

    /// Union the sets containing `v` and `w`.
    ///
    /// Returns `true` and decrements the live-set counter by exactly one if
    /// the sets were distinct; no-op returning `false` otherwise. Both keys
    /// are registered if new.
    pub fn join(&mut self, v: VertexId, w: VertexId) -> bool {
        self.get_key(v);
        self.get_key(w);
        let mut rv = self.find(v);
        let mut rw = self.find(w);
        if rv == rw {
            return false;
        }
        // Union by size: hang the smaller tree under the larger root.
        if self.size[&rv] < self.size[&rw] {
            std::mem::swap(&mut rv, &mut rw);
        }
        self.parent.insert(rw, rv);
        let grown = self.size[&rv] + self.size[&rw];
        self.size.insert(rv, grown);
        self.components -= 1;
        true
    }

    /// True iff `v` and `w` share a set representative.
    pub fn is_connected(&mut self, v: VertexId, w: VertexId) -> bool {
        self.get_key(v);
        self.get_key(w);
        self.find(v) == self.find(w)
    }

    /// Fully compress every path and return the `key → representative`
    /// mapping for all registered keys.
    pub fn compress(&mut self) -> HashMap<VertexId, VertexId> {
        let keys: Vec<VertexId> = self.parent.keys().copied().collect();
        let mut resolved = HashMap::with_capacity(keys.len());
        for key in keys {
            let root = self.find(key);
            resolved.insert(key, root);
        }
        resolved
    }

    /// Current count of distinct live sets.
    pub fn num_components(&self) -> usize {
        self.components
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// True if no key has been registered.
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }
}
