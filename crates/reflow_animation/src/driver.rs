//! Animation driver contract
//!
//! A driver interpolates style properties over time. Reflow only ever asks it
//! for one thing: animate these targets towards these values.

use reflow_core::{NodeId, PropertyTargets, Result, StyleProperty, Surface};

use crate::easing::{Easing, DEFAULT_ELASTICITY};
use crate::handle::{AnimationHandle, AnimationRole};

/// Callback run by the driver once an animation completes
pub type OnComplete = Box<dyn FnOnce(&mut dyn Surface) + Send>;

/// Default duration for every request
pub const DEFAULT_DURATION_MS: u32 = 1000;

/// One animation request
///
/// Every target animates towards `properties`; per-target overrides replace
/// individual property values for that target only.
pub struct AnimationRequest {
    pub role: AnimationRole,
    pub targets: Vec<NodeId>,
    pub properties: PropertyTargets,
    pub overrides: Vec<(NodeId, PropertyTargets)>,
    pub duration_ms: u32,
    pub easing: Easing,
    pub elasticity: f32,
    pub autoplay: bool,
    pub on_complete: Option<OnComplete>,
}

impl AnimationRequest {
    pub fn new(role: AnimationRole, targets: Vec<NodeId>) -> Self {
        Self {
            role,
            targets,
            properties: PropertyTargets::new(),
            overrides: Vec::new(),
            duration_ms: DEFAULT_DURATION_MS,
            easing: Easing::default(),
            elasticity: DEFAULT_ELASTICITY,
            autoplay: true,
            on_complete: None,
        }
    }

    /// Animate `property` to `value` on every target
    pub fn to(mut self, property: StyleProperty, value: f32) -> Self {
        self.properties.set(property, value);
        self
    }

    /// Animate `property` to `value` on `node` only
    pub fn override_for(mut self, node: NodeId, property: StyleProperty, value: f32) -> Self {
        if let Some((_, targets)) = self.overrides.iter_mut().find(|(n, _)| *n == node) {
            targets.set(property, value);
        } else {
            self.overrides
                .push((node, PropertyTargets::new().with(property, value)));
        }
        self
    }

    pub fn duration(mut self, duration_ms: u32) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn elasticity(mut self, elasticity: f32) -> Self {
        self.elasticity = elasticity;
        self
    }

    pub fn autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }

    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(&mut dyn Surface) + Send + 'static,
    {
        self.on_complete = Some(Box::new(callback));
        self
    }

    /// Resolved property targets for one node
    pub fn targets_for(&self, node: NodeId) -> PropertyTargets {
        let mut resolved = self.properties.clone();
        if let Some((_, overrides)) = self.overrides.iter().find(|(n, _)| *n == node) {
            for (property, value) in overrides.iter() {
                resolved.set(property, value);
            }
        }
        resolved
    }
}

impl std::fmt::Debug for AnimationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationRequest")
            .field("role", &self.role)
            .field("targets", &self.targets)
            .field("properties", &self.properties)
            .field("overrides", &self.overrides)
            .field("duration_ms", &self.duration_ms)
            .field("easing", &self.easing)
            .field("elasticity", &self.elasticity)
            .field("autoplay", &self.autoplay)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

/// Pluggable animation engine
///
/// `animate` must return immediately; progress is driven on the driver's own
/// schedule. Rejections (for example an empty target list) are reported as
/// errors and treated by callers as completed no-op animations.
pub trait AnimationDriver {
    fn animate(
        &mut self,
        surface: &dyn Surface,
        request: AnimationRequest,
    ) -> Result<AnimationHandle>;
}
