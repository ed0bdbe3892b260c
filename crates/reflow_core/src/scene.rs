//! Headless surface
//!
//! A [`Surface`] with no renderer behind it. Containers flow their children
//! along one axis; every other node is a fixed-size box. Placeholders are
//! fixed-position and never take part in flow.
//!
//! # Example
//!
//! ```rust
//! use reflow_core::scene::{LayoutAxis, SceneTree};
//! use reflow_core::Surface;
//!
//! let mut scene = SceneTree::new();
//! let list = scene.create_container("list", 0.0, 0.0, LayoutAxis::Horizontal, 0.0);
//! let a = scene.create_node("a", 50.0, 50.0);
//! let b = scene.create_node("b", 50.0, 50.0);
//! scene.append_child(list, a);
//! scene.append_child(list, b);
//!
//! assert_eq!(scene.bounding_rect(b).map(|r| r.left), Some(50.0));
//! ```

use slotmap::SlotMap;

use crate::geometry::{Offset, Rect};
use crate::node::{NodeId, Surface};
use crate::style::StyleProperty;

/// Flow direction of a container
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutAxis {
    Horizontal,
    Vertical,
}

#[derive(Clone, Copy, Debug)]
struct FlowLayout {
    axis: LayoutAxis,
    gap: f32,
}

#[derive(Clone, Debug)]
struct SceneNode {
    label: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Untransformed layout position
    layout: Rect,
    translate: Offset,
    opacity: f32,
    resting_opacity: f32,
    transitions_enabled: bool,
    flow: Option<FlowLayout>,
    placeholder: bool,
}

impl SceneNode {
    fn new(label: impl Into<String>, layout: Rect) -> Self {
        Self {
            label: label.into(),
            parent: None,
            children: Vec::new(),
            layout,
            translate: Offset::ZERO,
            opacity: 1.0,
            resting_opacity: 1.0,
            transitions_enabled: true,
            flow: None,
            placeholder: false,
        }
    }
}

/// In-memory node tree implementing [`Surface`]
#[derive(Default)]
pub struct SceneTree {
    nodes: SlotMap<NodeId, SceneNode>,
}

impl SceneTree {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
        }
    }

    /// Create a container that flows its children from `(x, y)`
    pub fn create_container(
        &mut self,
        label: impl Into<String>,
        x: f32,
        y: f32,
        axis: LayoutAxis,
        gap: f32,
    ) -> NodeId {
        let mut node = SceneNode::new(label, Rect::new(x, y, 0.0, 0.0));
        node.flow = Some(FlowLayout { axis, gap });
        self.nodes.insert(node)
    }

    /// Create a detached fixed-size node
    pub fn create_node(&mut self, label: impl Into<String>, width: f32, height: f32) -> NodeId {
        self.nodes
            .insert(SceneNode::new(label, Rect::new(0.0, 0.0, width, height)))
    }

    pub fn append_child(&mut self, container: NodeId, node: NodeId) {
        let len = self
            .nodes
            .get(container)
            .map(|c| c.children.len())
            .unwrap_or(0);
        self.insert_child(container, len, node);
    }

    /// Insert `node` at `index`, detaching it from any previous parent
    pub fn insert_child(&mut self, container: NodeId, index: usize, node: NodeId) {
        if !self.nodes.contains_key(container) || !self.nodes.contains_key(node) {
            return;
        }
        self.detach(node);
        if let Some(parent) = self.nodes.get_mut(container) {
            let index = index.min(parent.children.len());
            parent.children.insert(index, node);
        }
        if let Some(child) = self.nodes.get_mut(node) {
            child.parent = Some(container);
        }
        self.relayout(container);
    }

    /// Remove `node` from `container`; the node stays alive, detached
    pub fn remove_child(&mut self, container: NodeId, node: NodeId) -> bool {
        let removed = match self.nodes.get_mut(container) {
            Some(parent) => {
                let before = parent.children.len();
                parent.children.retain(|c| *c != node);
                parent.children.len() != before
            }
            None => false,
        };
        if removed {
            if let Some(child) = self.nodes.get_mut(node) {
                child.parent = None;
            }
            self.relayout(container);
        }
        removed
    }

    /// Replace the container's child order wholesale
    ///
    /// Children not listed are detached; listed nodes are adopted.
    pub fn set_children(&mut self, container: NodeId, order: &[NodeId]) {
        let previous = match self.nodes.get(container) {
            Some(parent) => parent.children.clone(),
            None => return,
        };
        for child in previous.iter().filter(|c| !order.contains(c)) {
            if let Some(node) = self.nodes.get_mut(*child) {
                node.parent = None;
            }
        }
        for child in order.iter().filter(|c| !previous.contains(c)) {
            self.detach(*child);
        }
        let order: Vec<NodeId> = order
            .iter()
            .copied()
            .filter(|c| self.nodes.contains_key(*c))
            .collect();
        for child in &order {
            if let Some(node) = self.nodes.get_mut(*child) {
                node.parent = Some(container);
            }
        }
        if let Some(parent) = self.nodes.get_mut(container) {
            parent.children = order;
        }
        self.relayout(container);
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    pub fn label(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node).map(|n| n.label.as_str())
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|n| n.parent)
    }

    /// Layout position without the applied translate
    pub fn layout_rect(&self, node: NodeId) -> Option<Rect> {
        self.nodes.get(node).map(|n| n.layout)
    }

    pub fn translate(&self, node: NodeId) -> Option<Offset> {
        self.nodes.get(node).map(|n| n.translate)
    }

    pub fn opacity(&self, node: NodeId) -> Option<f32> {
        self.nodes.get(node).map(|n| n.opacity)
    }

    pub fn set_resting_opacity(&mut self, node: NodeId, opacity: f32) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.resting_opacity = opacity;
            n.opacity = opacity;
        }
    }

    pub fn transitions_enabled(&self, node: NodeId) -> bool {
        self.nodes
            .get(node)
            .map(|n| n.transitions_enabled)
            .unwrap_or(false)
    }

    pub fn is_placeholder(&self, node: NodeId) -> bool {
        self.nodes.get(node).map(|n| n.placeholder).unwrap_or(false)
    }

    /// All mounted placeholders
    pub fn placeholders(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, n)| n.placeholder)
            .map(|(id, _)| id)
            .collect()
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes.get(node).and_then(|n| n.parent) {
            self.remove_child(parent, node);
        }
    }

    fn relayout(&mut self, container: NodeId) {
        let (origin, flow, children) = match self.nodes.get(container) {
            Some(node) => match node.flow {
                Some(flow) => (node.layout, flow, node.children.clone()),
                None => return,
            },
            None => return,
        };

        let mut cursor = 0.0;
        let mut cross = 0.0_f32;
        let mut placed = 0usize;
        for child in children {
            let Some(node) = self.nodes.get_mut(child) else {
                continue;
            };
            if node.placeholder {
                continue;
            }
            if placed > 0 {
                cursor += flow.gap;
            }
            let (w, h) = (node.layout.width, node.layout.height);
            node.layout = match flow.axis {
                LayoutAxis::Horizontal => Rect::new(origin.x + cursor, origin.y, w, h),
                LayoutAxis::Vertical => Rect::new(origin.x, origin.y + cursor, w, h),
            };
            match flow.axis {
                LayoutAxis::Horizontal => {
                    cursor += w;
                    cross = cross.max(h);
                }
                LayoutAxis::Vertical => {
                    cursor += h;
                    cross = cross.max(w);
                }
            }
            placed += 1;
        }

        if let Some(node) = self.nodes.get_mut(container) {
            node.layout = match flow.axis {
                LayoutAxis::Horizontal => Rect::new(origin.x, origin.y, cursor, cross),
                LayoutAxis::Vertical => Rect::new(origin.x, origin.y, cross, cursor),
            };
        }
    }
}

impl Surface for SceneTree {
    fn children(&self, container: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(container)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn bounding_rect(&self, node: NodeId) -> Option<Rect> {
        self.nodes
            .get(node)
            .map(|n| n.layout.translate_by(n.translate))
    }

    fn style_value(&self, node: NodeId, property: StyleProperty) -> Option<f32> {
        self.nodes.get(node).map(|n| match property {
            StyleProperty::TranslateX => n.translate.x,
            StyleProperty::TranslateY => n.translate.y,
            StyleProperty::Opacity => n.opacity,
        })
    }

    fn resting_opacity(&self, node: NodeId) -> f32 {
        self.nodes
            .get(node)
            .map(|n| n.resting_opacity)
            .unwrap_or(1.0)
    }

    fn set_style(&mut self, node: NodeId, property: StyleProperty, value: f32) {
        if let Some(n) = self.nodes.get_mut(node) {
            match property {
                StyleProperty::TranslateX => n.translate.x = value,
                StyleProperty::TranslateY => n.translate.y = value,
                StyleProperty::Opacity => n.opacity = value,
            }
        }
    }

    fn set_transitions_enabled(&mut self, node: NodeId, enabled: bool) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.transitions_enabled = enabled;
        }
    }

    fn mount_placeholder(
        &mut self,
        source: NodeId,
        rect: Rect,
        root: Option<NodeId>,
    ) -> Option<NodeId> {
        let source = self.nodes.get(source)?;
        let mut clone = SceneNode::new(format!("{}-placeholder", source.label), rect);
        clone.opacity = source.opacity;
        clone.resting_opacity = source.resting_opacity;
        clone.transitions_enabled = false;
        clone.placeholder = true;
        clone.parent = root.filter(|r| self.nodes.contains_key(*r));

        let parent = clone.parent;
        let id = self.nodes.insert(clone);
        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(p)) {
            parent.children.push(id);
        }
        Some(id)
    }

    fn unmount(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes.get(node).and_then(|n| n.parent) {
            if let Some(p) = self.nodes.get_mut(parent) {
                p.children.retain(|c| *c != node);
            }
        }
        self.nodes.remove(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(scene: &mut SceneTree, labels: &[&str]) -> (NodeId, Vec<NodeId>) {
        let list = scene.create_container("list", 0.0, 0.0, LayoutAxis::Horizontal, 0.0);
        let nodes = labels
            .iter()
            .map(|l| {
                let n = scene.create_node(*l, 50.0, 50.0);
                scene.append_child(list, n);
                n
            })
            .collect();
        (list, nodes)
    }

    #[test]
    fn test_horizontal_flow() {
        let mut scene = SceneTree::new();
        let (list, nodes) = row(&mut scene, &["a", "b", "c"]);

        let lefts: Vec<f32> = nodes
            .iter()
            .map(|n| scene.bounding_rect(*n).unwrap().left)
            .collect();
        assert_eq!(lefts, vec![0.0, 50.0, 100.0]);
        assert_eq!(scene.layout_rect(list).unwrap().width, 150.0);
    }

    #[test]
    fn test_vertical_flow_with_gap() {
        let mut scene = SceneTree::new();
        let list = scene.create_container("list", 10.0, 20.0, LayoutAxis::Vertical, 5.0);
        let a = scene.create_node("a", 100.0, 30.0);
        let b = scene.create_node("b", 100.0, 30.0);
        scene.append_child(list, a);
        scene.append_child(list, b);

        assert_eq!(scene.bounding_rect(a).unwrap().top, 20.0);
        assert_eq!(scene.bounding_rect(b).unwrap().top, 55.0);
        assert_eq!(scene.bounding_rect(b).unwrap().left, 10.0);
    }

    #[test]
    fn test_translate_shifts_bounding_rect_only() {
        let mut scene = SceneTree::new();
        let (_, nodes) = row(&mut scene, &["a"]);
        scene.set_style(nodes[0], StyleProperty::TranslateX, 25.0);

        assert_eq!(scene.bounding_rect(nodes[0]).unwrap().left, 25.0);
        assert_eq!(scene.layout_rect(nodes[0]).unwrap().left, 0.0);
    }

    #[test]
    fn test_set_children_reorders_and_detaches() {
        let mut scene = SceneTree::new();
        let (list, nodes) = row(&mut scene, &["a", "b", "c"]);
        scene.set_children(list, &[nodes[2], nodes[0]]);

        assert_eq!(scene.children(list), vec![nodes[2], nodes[0]]);
        assert_eq!(scene.parent(nodes[1]), None);
        assert_eq!(scene.bounding_rect(nodes[0]).unwrap().left, 50.0);
    }

    #[test]
    fn test_placeholder_lifecycle() {
        let mut scene = SceneTree::new();
        let (list, nodes) = row(&mut scene, &["a", "b"]);
        let root = scene.create_node("root", 0.0, 0.0);
        scene.set_style(nodes[0], StyleProperty::Opacity, 0.5);
        scene.remove_child(list, nodes[0]);

        let rect = Rect::new(0.0, 0.0, 50.0, 50.0);
        let placeholder = scene.mount_placeholder(nodes[0], rect, Some(root)).unwrap();
        assert!(scene.is_placeholder(placeholder));
        assert_eq!(scene.opacity(placeholder), Some(0.5));
        assert_eq!(scene.children(root), vec![placeholder]);
        assert_eq!(scene.bounding_rect(placeholder), Some(rect));

        scene.unmount(placeholder);
        assert!(!scene.contains(placeholder));
        assert!(scene.children(root).is_empty());
    }
}
