//! Position snapshots
//!
//! A snapshot records where a container and each of its children sit in the
//! viewport at one point in time. Rects are *logical*: any translate an
//! active move/enter animation applies is subtracted at capture time, so two
//! snapshots compare layout positions, not animated ones.

use reflow_animation::{AnimationHandle, AnimationRole};
use reflow_core::{ContainerRect, NodeId, Rect, Surface, TransformValues};
use rustc_hash::{FxHashMap, FxHashSet};

/// One child's captured geometry
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionEntry {
    pub node: NodeId,
    pub rect: Rect,
}

/// Geometry of a container and its children, in child order
#[derive(Clone, Debug, Default)]
pub struct PositionSnapshot {
    pub container: ContainerRect,
    children: Vec<PositionEntry>,
    index: FxHashMap<NodeId, usize>,
}

impl PositionSnapshot {
    /// Capture the container's current geometry
    ///
    /// `handles` are the ledger's active handles; move and enter handles
    /// contribute in-flight offsets, and leave placeholders mounted inside
    /// the container are not children. Children the surface cannot measure
    /// are left out.
    pub fn capture(surface: &dyn Surface, container: NodeId, handles: &[AnimationHandle]) -> Self {
        let container_rect = surface
            .bounding_rect(container)
            .map(ContainerRect::from)
            .unwrap_or_default();

        let leaving = leaving_nodes(handles);
        let in_flight = in_flight_transforms(handles);
        let entries = surface
            .children(container)
            .into_iter()
            .filter(|node| !leaving.contains(node))
            .filter_map(|node| {
                let Some(rect) = surface.bounding_rect(node) else {
                    tracing::trace!(node = ?node, "PositionSnapshot: child has no geometry");
                    return None;
                };
                let offset = in_flight
                    .get(&node)
                    .map(TransformValues::as_offset)
                    .unwrap_or_default();
                Some(PositionEntry {
                    node,
                    rect: rect.translate_by(-offset),
                })
            })
            .collect();

        Self::from_entries(container_rect, entries)
    }

    /// Build a snapshot from already-measured entries
    pub fn from_entries(container: ContainerRect, entries: Vec<PositionEntry>) -> Self {
        let mut index = FxHashMap::default();
        for (i, entry) in entries.iter().enumerate() {
            index.entry(entry.node).or_insert(i);
        }
        Self {
            container,
            children: entries,
            index,
        }
    }

    pub fn get(&self, node: NodeId) -> Option<&PositionEntry> {
        self.index.get(&node).map(|&i| &self.children[i])
    }

    pub fn rect(&self, node: NodeId) -> Option<Rect> {
        self.get(node).map(|e| e.rect)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.index.contains_key(&node)
    }

    pub fn children(&self) -> &[PositionEntry] {
        &self.children
    }

    /// Child nodes in captured order
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.iter().map(|e| e.node)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Copy of this snapshot moved to where the nodes visually are right now
    ///
    /// Each rect is shifted by the transform its in-flight move/enter
    /// animation currently applies. Nodes without one keep their rect.
    pub fn adjusted_by(&self, handles: &[AnimationHandle]) -> Self {
        let in_flight = in_flight_transforms(handles);
        let children = self
            .children
            .iter()
            .map(|entry| PositionEntry {
                node: entry.node,
                rect: match in_flight.get(&entry.node) {
                    Some(values) => entry.rect.translate_by(values.as_offset()),
                    None => entry.rect,
                },
            })
            .collect();
        Self {
            container: self.container,
            children,
            index: self.index.clone(),
        }
    }
}

fn leaving_nodes(handles: &[AnimationHandle]) -> FxHashSet<NodeId> {
    handles
        .iter()
        .filter(|h| h.role() == AnimationRole::Leave && !h.is_completed())
        .flat_map(|h| h.targets().iter().copied())
        .collect()
}

fn is_offsetting(handle: &AnimationHandle) -> bool {
    handle.role() != AnimationRole::Leave && !handle.is_completed()
}

/// In-flight transforms of every node the move/enter handles animate
///
/// Later handles overwrite earlier ones for the same node.
fn in_flight_transforms(handles: &[AnimationHandle]) -> FxHashMap<NodeId, TransformValues> {
    let mut transforms = FxHashMap::default();
    for handle in handles.iter().filter(|h| is_offsetting(h)) {
        transforms.extend(handle.current_transforms());
    }
    transforms
}

/// In-flight transform applied to `node` by the given handles
///
/// Leave handles animate placeholders and never count. When several handles
/// report values for the same node, the last one wins.
pub fn transforms_for_node(node: NodeId, handles: &[AnimationHandle]) -> TransformValues {
    handles
        .iter()
        .filter(|h| is_offsetting(h))
        .filter_map(|h| h.current_values(node))
        .last()
        .unwrap_or(TransformValues::IDENTITY)
}
