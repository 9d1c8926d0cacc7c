//! Label interning: bidirectional string⇄dense-id mapping.
//!
//! Every concept label is assigned a dense non-negative id on first encounter,
//! in encounter order. Ids are stable for the lifetime of one interner and are
//! never reused or reassigned, so they double as graph vertex ids.

use std::collections::HashMap;

use crate::error::LabelError;

/// Dense vertex id handed out by the interner.
pub type VertexId = usize;

/// Bidirectional mapping between labels and dense integer ids.
#[derive(Debug, Clone, Default)]
pub struct LabelInterner {
    id2label: Vec<String>,
    label2id: HashMap<String, VertexId>,
}

impl LabelInterner {
    /// Create an empty interner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id for `label`, assigning the next dense id if unseen.
    pub fn intern(&mut self, label: &str) -> VertexId {
        if let Some(&id) = self.label2id.get(label) {
            return id;
        }
        let id = self.id2label.len();
        self.id2label.push(label.to_string());
        self.label2id.insert(label.to_string(), id);
        id
    }

    /// Look up an already-interned label without assigning a new id.
    pub fn id_of(&self, label: &str) -> Option<VertexId> {
        self.label2id.get(label).copied()
    }

    /// Reverse lookup: the label assigned to `id`.
    ///
    /// Fails explicitly if `id` was never handed out — no sentinel values.
    pub fn label_of(&self, id: VertexId) -> Result<&str, LabelError> {
        self.id2label
            .get(id)
            .map(String::as_str)
            .ok_or(LabelError::IdNotFound { id })
    }

    /// Number of distinct labels interned so far.
    pub fn len(&self) -> usize {
        self.id2label.len()
    }

    /// True if nothing has been interned yet.
    pub fn is_empty(&self) -> bool {
        self.id2label.is_empty()
    }
}
