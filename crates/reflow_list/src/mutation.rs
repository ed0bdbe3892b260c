//! Mutation batches
//!
//! One batch is the union of child additions and removals since the last
//! reconciliation cycle. A node present in both sets was added and removed
//! (or removed and re-added) within the batch and is neither an entrant nor
//! an exit.

use indexmap::IndexSet;
use reflow_core::NodeId;

/// One raw change notification from the host's observation mechanism
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MutationRecord {
    pub added: Vec<NodeId>,
    pub removed: Vec<NodeId>,
}

impl MutationRecord {
    pub fn added(nodes: impl IntoIterator<Item = NodeId>) -> Self {
        Self {
            added: nodes.into_iter().collect(),
            removed: Vec::new(),
        }
    }

    pub fn removed(nodes: impl IntoIterator<Item = NodeId>) -> Self {
        Self {
            added: Vec::new(),
            removed: nodes.into_iter().collect(),
        }
    }
}

/// Added/removed child sets for one reconciliation cycle
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MutationBatch {
    added: IndexSet<NodeId>,
    removed: IndexSet<NodeId>,
}

impl MutationBatch {
    /// Empty batch (pure reorder or layout-only change)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_added(mut self, nodes: impl IntoIterator<Item = NodeId>) -> Self {
        self.added.extend(nodes);
        self
    }

    pub fn with_removed(mut self, nodes: impl IntoIterator<Item = NodeId>) -> Self {
        self.removed.extend(nodes);
        self
    }

    /// Merge a sequence of records into one batch
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a MutationRecord>) -> Self {
        let mut batch = Self::new();
        for record in records {
            batch.added.extend(record.added.iter().copied());
            batch.removed.extend(record.removed.iter().copied());
        }
        batch
    }

    /// Derive a batch from the child order before and after a change
    pub fn diff(previous: &[NodeId], next: &[NodeId]) -> Self {
        let before: IndexSet<NodeId> = previous.iter().copied().collect();
        let after: IndexSet<NodeId> = next.iter().copied().collect();
        Self {
            added: after.difference(&before).copied().collect(),
            removed: before.difference(&after).copied().collect(),
        }
    }

    pub fn added(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.added.iter().copied()
    }

    pub fn removed(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.removed.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// Whether the node was both added and removed within this batch
    pub fn is_transient(&self, node: NodeId) -> bool {
        self.added.contains(&node) && self.removed.contains(&node)
    }

    /// `added - removed`, in insertion order
    pub fn entered(&self) -> Vec<NodeId> {
        self.added
            .iter()
            .filter(|n| !self.removed.contains(*n))
            .copied()
            .collect()
    }

    /// `removed - added`, in insertion order
    pub fn left(&self) -> Vec<NodeId> {
        self.removed
            .iter()
            .filter(|n| !self.added.contains(*n))
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn nodes(n: usize) -> Vec<NodeId> {
        let mut map: SlotMap<NodeId, ()> = SlotMap::with_key();
        (0..n).map(|_| map.insert(())).collect()
    }

    #[test]
    fn test_transient_nodes_are_excluded() {
        let n = nodes(3);
        let batch = MutationBatch::new()
            .with_added([n[0], n[1]])
            .with_removed([n[1], n[2]]);

        assert!(batch.is_transient(n[1]));
        assert_eq!(batch.entered(), vec![n[0]]);
        assert_eq!(batch.left(), vec![n[2]]);
    }

    #[test]
    fn test_records_merge_and_dedupe() {
        let n = nodes(2);
        let records = [
            MutationRecord::added([n[0]]),
            MutationRecord::added([n[0]]),
            MutationRecord::removed([n[1]]),
        ];
        let batch = MutationBatch::from_records(&records);

        assert_eq!(batch.added().count(), 1);
        assert_eq!(batch.entered(), vec![n[0]]);
        assert_eq!(batch.left(), vec![n[1]]);
    }

    #[test]
    fn test_diff_orders() {
        let n = nodes(4);
        let batch = MutationBatch::diff(&[n[0], n[1], n[2]], &[n[3], n[2], n[0]]);
        assert_eq!(batch.entered(), vec![n[3]]);
        assert_eq!(batch.left(), vec![n[1]]);

        let reorder = MutationBatch::diff(&[n[0], n[1]], &[n[1], n[0]]);
        assert!(reorder.is_empty());
    }
}
