//! Move/enter/leave strategies
//!
//! A strategy turns one role's classified targets into a single animation.
//! The built-in choreography is selected with [`Strategy::Builtin`] and tuned
//! by its [`RoleTiming`]; [`Strategy::Custom`] hands the targets to a caller
//! supplied function instead.
//!
//! # Built-in choreography
//!
//! - **Move**: translate back to `(0, 0)` from the inverse offset the engine
//!   already applied, opacity to the node's resting value
//! - **Enter**: jump to `translateX(+enter_offset)` at opacity 0, then slide
//!   and fade in to each node's resting opacity
//! - **Leave**: mount a fixed-position placeholder at the node's last rect,
//!   fade it out and unmount it once the fade completes; the detached node
//!   itself is reset to identity styling

use std::sync::Arc;

use reflow_animation::{AnimationDriver, AnimationHandle, AnimationRequest, AnimationRole};
use reflow_core::{NodeId, Offset, Rect, StyleProperty, Surface};

use crate::config::RoleTiming;

/// Custom strategy function
pub type CustomStrategy =
    Arc<dyn Fn(&[StrategyTarget], &mut StrategyContext<'_>) -> AnimationHandle + Send + Sync>;

/// Strategy for one role
#[derive(Clone)]
pub enum Strategy {
    /// Built-in choreography with the given timing
    Builtin(RoleTiming),
    /// Caller supplied choreography
    Custom(CustomStrategy),
}

impl Strategy {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&[StrategyTarget], &mut StrategyContext<'_>) -> AnimationHandle
            + Send
            + Sync
            + 'static,
    {
        Strategy::Custom(Arc::new(f))
    }

    /// Timing of a built-in strategy
    pub fn timing(&self) -> Option<&RoleTiming> {
        match self {
            Strategy::Builtin(timing) => Some(timing),
            Strategy::Custom(_) => None,
        }
    }

    pub(crate) fn timing_mut(&mut self) -> Option<&mut RoleTiming> {
        match self {
            Strategy::Builtin(timing) => Some(timing),
            Strategy::Custom(_) => None,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Strategy::Custom(_))
    }

    /// Run the strategy for the context's role
    ///
    /// No targets yields a completed no-op handle without calling the driver.
    pub fn run(
        &self,
        targets: &[StrategyTarget],
        ctx: &mut StrategyContext<'_>,
    ) -> AnimationHandle {
        if targets.is_empty() {
            return AnimationHandle::completed(ctx.role, Vec::new());
        }
        match self {
            Strategy::Builtin(timing) => match ctx.role {
                AnimationRole::Move => builtin_move(timing, targets, ctx),
                AnimationRole::Enter => builtin_enter(timing, targets, ctx),
                AnimationRole::Leave => builtin_leave(timing, targets, ctx),
            },
            Strategy::Custom(f) => f(targets, ctx),
        }
    }
}

impl std::fmt::Debug for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Builtin(timing) => f.debug_tuple("Builtin").field(timing).finish(),
            Strategy::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// One classified node handed to a strategy
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrategyTarget {
    pub node: NodeId,
    /// New logical rect for move/enter targets, last known rect for leave
    pub rect: Rect,
    /// Inverse offset already applied to move targets, zero otherwise
    pub offset: Offset,
}

impl StrategyTarget {
    pub fn new(node: NodeId, rect: Rect) -> Self {
        Self {
            node,
            rect,
            offset: Offset::ZERO,
        }
    }

    pub fn with_offset(mut self, offset: Offset) -> Self {
        self.offset = offset;
        self
    }
}

/// Everything a strategy may touch during one cycle
pub struct StrategyContext<'a> {
    pub role: AnimationRole,
    pub surface: &'a mut dyn Surface,
    pub driver: &'a mut dyn AnimationDriver,
    pub autoplay: bool,
    /// Mount point for leave placeholders
    pub root: Option<NodeId>,
    /// Horizontal slide distance for entrances
    pub enter_offset: f32,
}

impl StrategyContext<'_> {
    /// Issue a request, turning a driver rejection into a completed no-op
    pub fn animate(&mut self, request: AnimationRequest) -> AnimationHandle {
        let role = request.role;
        let targets = request.targets.clone();
        match self.driver.animate(&*self.surface, request) {
            Ok(handle) => handle,
            Err(err) => {
                tracing::warn!(
                    role = role.as_str(),
                    targets = targets.len(),
                    error = %err,
                    "animation request rejected; treating as completed"
                );
                AnimationHandle::completed(role, targets)
            }
        }
    }

    fn request(&self, timing: &RoleTiming, targets: Vec<NodeId>) -> AnimationRequest {
        AnimationRequest::new(self.role, targets)
            .duration(timing.duration_ms)
            .easing(timing.easing)
            .elasticity(timing.elasticity)
            .autoplay(self.autoplay)
    }
}

fn builtin_move(
    timing: &RoleTiming,
    targets: &[StrategyTarget],
    ctx: &mut StrategyContext<'_>,
) -> AnimationHandle {
    let nodes: Vec<NodeId> = targets.iter().map(|t| t.node).collect();
    let mut request = ctx
        .request(timing, nodes)
        .to(StyleProperty::TranslateX, 0.0)
        .to(StyleProperty::TranslateY, 0.0)
        .to(StyleProperty::Opacity, 1.0);
    for target in targets {
        let resting = ctx.surface.resting_opacity(target.node);
        if resting != 1.0 {
            request = request.override_for(target.node, StyleProperty::Opacity, resting);
        }
    }
    ctx.animate(request)
}

fn builtin_enter(
    timing: &RoleTiming,
    targets: &[StrategyTarget],
    ctx: &mut StrategyContext<'_>,
) -> AnimationHandle {
    let resting: Vec<(NodeId, f32)> = targets
        .iter()
        .map(|t| (t.node, ctx.surface.resting_opacity(t.node)))
        .collect();

    for &(node, _) in &resting {
        ctx.surface.set_transitions_enabled(node, false);
        ctx.surface
            .set_style(node, StyleProperty::TranslateX, ctx.enter_offset);
        ctx.surface.set_style(node, StyleProperty::TranslateY, 0.0);
        ctx.surface.set_style(node, StyleProperty::Opacity, 0.0);
    }

    let mut request = ctx
        .request(timing, resting.iter().map(|(n, _)| *n).collect())
        .to(StyleProperty::TranslateX, 0.0)
        .to(StyleProperty::Opacity, 1.0);
    for &(node, opacity) in &resting {
        if opacity != 1.0 {
            request = request.override_for(node, StyleProperty::Opacity, opacity);
        }
    }
    let handle = ctx.animate(request);

    for &(node, _) in &resting {
        ctx.surface.set_transitions_enabled(node, true);
    }
    handle
}

fn builtin_leave(
    timing: &RoleTiming,
    targets: &[StrategyTarget],
    ctx: &mut StrategyContext<'_>,
) -> AnimationHandle {
    let mut placeholders = Vec::with_capacity(targets.len());
    for target in targets {
        match ctx
            .surface
            .mount_placeholder(target.node, target.rect, ctx.root)
        {
            Some(placeholder) => placeholders.push(placeholder),
            None => tracing::warn!(
                node = ?target.node,
                "could not mount leave placeholder; skipping exit animation"
            ),
        }
    }

    // The detached originals keep no transient styling
    for target in targets {
        let resting = ctx.surface.resting_opacity(target.node);
        ctx.surface.set_style(target.node, StyleProperty::TranslateX, 0.0);
        ctx.surface.set_style(target.node, StyleProperty::TranslateY, 0.0);
        ctx.surface.set_style(target.node, StyleProperty::Opacity, resting);
    }

    if placeholders.is_empty() {
        return AnimationHandle::completed(ctx.role, Vec::new());
    }

    let mounted = placeholders.clone();
    let request = ctx
        .request(timing, placeholders)
        .to(StyleProperty::Opacity, 0.0)
        .on_complete(move |surface| {
            for placeholder in mounted {
                surface.unmount(placeholder);
            }
        });

    let handle = ctx.animate(request);
    if handle.is_noop() {
        // Nothing will fade these out
        for placeholder in handle.targets() {
            ctx.surface.unmount(*placeholder);
        }
    }
    handle
}

#[cfg(test)]
mod tests {
    use super::*;
    use reflow_animation::{Easing, TweenDriver};
    use reflow_core::{LayoutAxis, SceneTree};

    fn linear(duration_ms: u32) -> Strategy {
        Strategy::Builtin(RoleTiming::new(duration_ms, Easing::Linear))
    }

    fn context<'a>(
        role: AnimationRole,
        scene: &'a mut SceneTree,
        driver: &'a mut TweenDriver,
        root: Option<NodeId>,
    ) -> StrategyContext<'a> {
        StrategyContext {
            role,
            surface: scene,
            driver,
            autoplay: true,
            root,
            enter_offset: 200.0,
        }
    }

    #[test]
    fn test_empty_targets_skip_driver() {
        let mut scene = SceneTree::new();
        let mut driver = TweenDriver::new();
        let mut ctx = context(AnimationRole::Move, &mut scene, &mut driver, None);

        let handle = linear(100).run(&[], &mut ctx);
        assert!(handle.is_noop());
        assert_eq!(driver.tween_count(), 0);
    }

    #[test]
    fn test_enter_restores_resting_opacity() {
        let mut scene = SceneTree::new();
        let list = scene.create_container("list", 0.0, 0.0, LayoutAxis::Vertical, 0.0);
        let node = scene.create_node("a", 40.0, 40.0);
        scene.append_child(list, node);
        scene.set_resting_opacity(node, 0.6);
        let rect = scene.bounding_rect(node).unwrap();

        let mut driver = TweenDriver::new();
        let handle = {
            let mut ctx = context(AnimationRole::Enter, &mut scene, &mut driver, None);
            linear(100).run(&[StrategyTarget::new(node, rect)], &mut ctx)
        };

        assert_eq!(scene.translate(node).unwrap().x, 200.0);
        assert_eq!(scene.opacity(node), Some(0.0));
        assert!(scene.transitions_enabled(node));

        driver.run_to_completion(&mut scene, 25.0, 10);
        assert!(handle.is_completed());
        assert_eq!(scene.translate(node).unwrap().x, 0.0);
        assert!((scene.opacity(node).unwrap() - 0.6).abs() < 1e-5);
    }

    #[test]
    fn test_leave_placeholder_is_unmounted() {
        let mut scene = SceneTree::new();
        let root = scene.create_container("root", 0.0, 0.0, LayoutAxis::Vertical, 0.0);
        let node = scene.create_node("gone", 40.0, 40.0);
        let rect = Rect::new(10.0, 20.0, 40.0, 40.0);

        let mut driver = TweenDriver::new();
        let handle = {
            let mut ctx = context(AnimationRole::Leave, &mut scene, &mut driver, Some(root));
            linear(100).run(&[StrategyTarget::new(node, rect)], &mut ctx)
        };

        let placeholders = scene.placeholders();
        assert_eq!(placeholders.len(), 1);
        assert_eq!(scene.bounding_rect(placeholders[0]), Some(rect));
        assert_eq!(scene.parent(placeholders[0]), Some(root));

        driver.run_to_completion(&mut scene, 50.0, 10);
        assert!(handle.is_completed());
        assert!(scene.placeholders().is_empty());
    }

    #[test]
    fn test_custom_strategy_is_called() {
        let mut scene = SceneTree::new();
        let list = scene.create_container("list", 0.0, 0.0, LayoutAxis::Vertical, 0.0);
        let node = scene.create_node("a", 40.0, 40.0);
        scene.append_child(list, node);
        let rect = scene.bounding_rect(node).unwrap();

        let strategy = Strategy::custom(|targets, ctx| {
            let request = AnimationRequest::new(
                ctx.role,
                targets.iter().map(|t| t.node).collect(),
            )
            .to(StyleProperty::Opacity, 0.25)
            .duration(10);
            ctx.animate(request)
        });
        assert!(strategy.is_custom());

        let mut driver = TweenDriver::new();
        let handle = {
            let mut ctx = context(AnimationRole::Move, &mut scene, &mut driver, None);
            strategy.run(&[StrategyTarget::new(node, rect)], &mut ctx)
        };
        driver.run_to_completion(&mut scene, 10.0, 5);
        assert!(handle.is_completed());
        assert_eq!(scene.opacity(node), Some(0.25));
    }

    #[test]
    fn test_driver_rejection_is_noop() {
        let mut scene = SceneTree::new();
        let mut driver = TweenDriver::new();
        let mut ctx = context(AnimationRole::Move, &mut scene, &mut driver, None);

        // Empty property set is rejected by the driver
        let handle = ctx.animate(AnimationRequest::new(AnimationRole::Move, Vec::new()));
        assert!(handle.is_completed());
        assert!(handle.is_noop());
    }
}
