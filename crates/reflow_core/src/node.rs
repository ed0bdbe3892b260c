//! Node identity and the host surface contract
//!
//! The host UI layer owns every node. Reflow only reads geometry and writes
//! transient translate/opacity styling through the [`Surface`] trait.

use slotmap::new_key_type;

use crate::geometry::Rect;
use crate::style::StyleProperty;

new_key_type! {
    /// Opaque, identity-comparable handle to a visual element
    pub struct NodeId;
}

impl NodeId {
    /// Convert to raw u64 so hosts can map their own element ids
    pub fn to_raw(self) -> u64 {
        self.0.as_ffi()
    }

    /// Reconstruct from raw u64
    ///
    /// The raw value must have been created by `to_raw()` on a valid NodeId.
    pub fn from_raw(raw: u64) -> Self {
        NodeId::from(slotmap::KeyData::from_ffi(raw))
    }
}

/// Host environment the engine and animation drivers talk to
///
/// Geometry reads are side-effect free. Style writes apply instantly; whether
/// the host interpolates them itself is governed by
/// [`set_transitions_enabled`](Surface::set_transitions_enabled).
pub trait Surface {
    /// Direct children of a container, in tree order
    fn children(&self, container: NodeId) -> Vec<NodeId>;

    /// Current visual bounding rect, including any applied translate
    fn bounding_rect(&self, node: NodeId) -> Option<Rect>;

    /// Current value of a transient style property
    fn style_value(&self, node: NodeId, property: StyleProperty) -> Option<f32>;

    /// Computed opacity the node has when no animation styling is applied
    fn resting_opacity(&self, node: NodeId) -> f32 {
        let _ = node;
        1.0
    }

    /// Write a transient style property
    fn set_style(&mut self, node: NodeId, property: StyleProperty, value: f32);

    /// Toggle host-side transition styling on a node
    fn set_transitions_enabled(&mut self, node: NodeId, enabled: bool);

    /// Clone `source` into a fixed-position placeholder at `rect`
    ///
    /// The placeholder is mounted under `root` (or the surface's top level when
    /// `None`). Returns `None` if the source can no longer be cloned.
    fn mount_placeholder(&mut self, source: NodeId, rect: Rect, root: Option<NodeId>)
        -> Option<NodeId>;

    /// Detach and discard a node previously returned by `mount_placeholder`
    fn unmount(&mut self, node: NodeId);
}
