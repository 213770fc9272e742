//! Per-cycle accumulation of resolved operations.

use crate::operation::{Operation, OperationKind};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

/// Maximum items per bulk job, and therefore per group.
pub const MAX_GROUP_SIZE: usize = 100;

/// Identifies one accumulation group within a batch cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BatchKey {
    pub entity_key: String,
    pub kind: OperationKind,
}

impl BatchKey {
    pub fn new(entity_key: impl Into<String>, kind: OperationKind) -> Self {
        Self {
            entity_key: entity_key.into(),
            kind,
        }
    }
}

impl fmt::Display for BatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.entity_key, self.kind)
    }
}

/// Operations grouped by `(custom_object_key, kind)`.
///
/// The batch is owned by exactly one cycle. The caller resets it at cycle
/// start and must flush once [`Batch::is_full`] reports true; enqueueing
/// past the ceiling is not rejected here but is caught at submission.
#[derive(Debug, Default)]
pub struct Batch {
    groups: BTreeMap<BatchKey, Vec<Operation>>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every group.
    pub fn reset(&mut self) {
        self.groups.clear();
    }

    /// Append `operation` to its group, creating the group if absent.
    pub fn enqueue(&mut self, entity_key: &str, operation: Operation) {
        let key = BatchKey::new(entity_key, operation.kind());
        let group = self.groups.entry(key).or_default();
        group.push(operation);

        if group.len() > MAX_GROUP_SIZE {
            warn!(
                entity_key,
                len = group.len(),
                ceiling = MAX_GROUP_SIZE,
                "Group grew past the ceiling without a flush"
            );
        }
    }

    /// Total operations across all groups.
    pub fn size(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.values().all(Vec::is_empty)
    }

    /// True once any single group holds [`MAX_GROUP_SIZE`] operations.
    pub fn is_full(&self) -> bool {
        self.groups.values().any(|g| g.len() >= MAX_GROUP_SIZE)
    }

    #[cfg(test)]
    fn group_len(&self, key: &BatchKey) -> usize {
        self.groups.get(key).map_or(0, Vec::len)
    }

    #[cfg(test)]
    fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Take every group out, leaving the batch empty.
    ///
    /// Groups come out ordered by custom object key, then kind.
    pub fn drain(&mut self) -> Vec<(BatchKey, Vec<Operation>)> {
        let groups = std::mem::take(&mut self.groups);
        debug!(groups = groups.len(), "Draining batch");
        groups.into_iter().collect()
    }
}
