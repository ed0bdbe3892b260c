//! Reconciliation engine
//!
//! [`ListAnimator`] owns the previous position snapshot and the animation
//! ledger for one container. Each mutation batch runs one cycle:
//!
//! 1. Collect the ledger's active handles
//! 2. Pause them and move the previous snapshot to where nodes visually are
//! 3. Classify children as entered, left or moved
//! 4. Apply each moved node's inverse offset instantly
//! 5. Run the enter, leave and move strategies
//! 6. Supersede old move/enter handles and register the new ones
//! 7. Keep the new snapshot for the next cycle
//!
//! All geometry is read before any style is written.
//!
//! ```ignore
//! let driver = TweenDriver::new();
//! let config = ListAnimationConfig::default();
//! let mut animator = ListAnimator::new(&scene, list, driver.clone(), config);
//!
//! animator.take_snapshot_before_update(&scene);
//! scene.set_children(list, &[d, a, b, c]);
//! let report = animator.on_mutation(&mut scene, MutationBatch::new());
//!
//! // per frame
//! driver.tick(&mut scene, 16.0);
//! ```

use reflow_animation::{AnimationDriver, AnimationHandle, AnimationRole};
use reflow_core::{NodeId, Offset, StyleProperty, Surface};
use rustc_hash::FxHashSet;

use crate::config::ListAnimationConfig;
use crate::ledger::AnimationLedger;
use crate::mutation::MutationBatch;
use crate::snapshot::PositionSnapshot;
use crate::strategy::{Strategy, StrategyContext, StrategyTarget};

/// Opacity difference below which a node counts as at rest
const OPACITY_EPSILON: f32 = 0.001;

/// Outcome of one reconciliation cycle
#[derive(Clone, Debug, Default)]
pub struct CycleReport {
    pub entered: Vec<NodeId>,
    pub left: Vec<NodeId>,
    pub moved: Vec<NodeId>,
    /// Moved nodes handed to the move strategy
    pub animated: Vec<NodeId>,
    /// Moved nodes with no previous position, animated as entrances
    pub implicit_entrants: Vec<NodeId>,
    /// Inverse offset applied to each moved node
    pub offsets: Vec<(NodeId, Offset)>,
    /// The proactive snapshot was skipped; offsets used the last stored one
    pub degraded: bool,
    pub move_handle: Option<AnimationHandle>,
    pub enter_handle: Option<AnimationHandle>,
    pub leave_handle: Option<AnimationHandle>,
}

impl CycleReport {
    /// Inverse offset applied to `node` this cycle
    pub fn offset(&self, node: NodeId) -> Option<Offset> {
        self.offsets
            .iter()
            .find(|(n, _)| *n == node)
            .map(|(_, offset)| *offset)
    }

    /// Handles created this cycle
    pub fn handles(&self) -> impl Iterator<Item = &AnimationHandle> {
        self.move_handle
            .iter()
            .chain(&self.enter_handle)
            .chain(&self.leave_handle)
    }

    /// Whether the cycle started no animation at all
    pub fn is_noop(&self) -> bool {
        self.handles().next().is_none()
    }
}

/// FLIP reconciliation engine for one container
pub struct ListAnimator {
    container: NodeId,
    driver: Box<dyn AnimationDriver>,
    config: ListAnimationConfig,
    ledger: AnimationLedger,
    previous: PositionSnapshot,
    /// Set by `take_snapshot_before_update`, consumed by the next cycle
    snapshot_fresh: bool,
    cycles: u64,
}

impl ListAnimator {
    /// Create an animator and capture the container's initial geometry
    pub fn new(
        surface: &dyn Surface,
        container: NodeId,
        driver: impl AnimationDriver + 'static,
        config: ListAnimationConfig,
    ) -> Self {
        let previous = PositionSnapshot::capture(surface, container, &[]);
        tracing::debug!(
            container = ?container,
            children = previous.len(),
            "ListAnimator: created"
        );
        Self {
            container,
            driver: Box::new(driver),
            config,
            ledger: AnimationLedger::new(),
            previous,
            snapshot_fresh: true,
            cycles: 0,
        }
    }

    /// Record logical positions right before the host applies a mutation
    pub fn take_snapshot_before_update(&mut self, surface: &dyn Surface) {
        let active = self.ledger.active_handles();
        self.previous = PositionSnapshot::capture(surface, self.container, &active);
        self.snapshot_fresh = true;
    }

    /// Run one cycle after the host applied a mutation
    pub fn on_mutation(&mut self, surface: &mut dyn Surface, batch: MutationBatch) -> CycleReport {
        let active = self.ledger.active_handles();
        let new_snapshot = PositionSnapshot::capture(&*surface, self.container, &active);
        self.reconcile(surface, batch, new_snapshot)
    }

    /// Run one cycle against an explicitly captured snapshot
    pub fn reconcile(
        &mut self,
        surface: &mut dyn Surface,
        batch: MutationBatch,
        new_snapshot: PositionSnapshot,
    ) -> CycleReport {
        self.cycles += 1;
        let degraded = !std::mem::replace(&mut self.snapshot_fresh, false);
        if degraded {
            tracing::warn!(
                container = ?self.container,
                "snapshot before update was skipped; using last stored snapshot"
            );
        }

        self.ledger.prune_completed();
        let active = self.ledger.active_handles();

        let previous = if active.is_empty() {
            self.previous.clone()
        } else {
            self.ledger.pause_all();
            self.previous.adjusted_by(&active)
        };

        let mut report = CycleReport {
            degraded,
            ..CycleReport::default()
        };

        report.entered = batch
            .entered()
            .into_iter()
            .filter(|n| new_snapshot.contains(*n))
            .collect();

        report.left = batch
            .left()
            .into_iter()
            .filter(|n| !new_snapshot.contains(*n))
            .filter(|n| {
                let known = previous.contains(*n);
                if !known {
                    tracing::debug!(node = ?n, "removed node has no previous position; skipping");
                }
                known
            })
            .collect();

        // Reads: offsets and rest state for every moved node
        let entered: FxHashSet<NodeId> = report.entered.iter().copied().collect();
        let mut move_targets = Vec::new();
        for entry in new_snapshot.children() {
            let node = entry.node;
            if entered.contains(&node) {
                continue;
            }
            let Some(prev) = previous.get(node) else {
                tracing::warn!(
                    node = ?node,
                    "moved node has no previous position; animating as an entrance"
                );
                report.implicit_entrants.push(node);
                continue;
            };

            let offset = entry.rect.inverse_offset_from(&prev.rect);
            let opacity = surface
                .style_value(node, StyleProperty::Opacity)
                .unwrap_or(1.0);
            let at_rest = (opacity - surface.resting_opacity(node)).abs() < OPACITY_EPSILON;

            tracing::trace!(node = ?node, dx = offset.x, dy = offset.y, "inverse offset");
            report.moved.push(node);
            report.offsets.push((node, offset));
            if !offset.is_zero() || !at_rest {
                move_targets.push(StrategyTarget::new(node, entry.rect).with_offset(offset));
            }
        }
        report.entered.extend(report.implicit_entrants.iter().copied());

        let enter_targets: Vec<StrategyTarget> = report
            .entered
            .iter()
            .filter_map(|&n| new_snapshot.rect(n).map(|rect| StrategyTarget::new(n, rect)))
            .collect();
        let leave_targets: Vec<StrategyTarget> = report
            .left
            .iter()
            .filter_map(|&n| previous.rect(n).map(|rect| StrategyTarget::new(n, rect)))
            .collect();

        // Writes: every moved node jumps back to where it was
        for &(node, offset) in &report.offsets {
            surface.set_transitions_enabled(node, false);
            surface.set_style(node, StyleProperty::TranslateX, offset.x);
            surface.set_style(node, StyleProperty::TranslateY, offset.y);
        }

        let enter_handle = self.run_strategy(AnimationRole::Enter, &enter_targets, surface);
        let leave_handle = self.run_strategy(AnimationRole::Leave, &leave_targets, surface);
        let move_handle = self.run_strategy(AnimationRole::Move, &move_targets, surface);

        // Without an animation to play the offsets back, settle at the new layout
        if move_handle.as_ref().is_some_and(|h| h.is_noop()) {
            for target in &move_targets {
                surface.set_style(target.node, StyleProperty::TranslateX, 0.0);
                surface.set_style(target.node, StyleProperty::TranslateY, 0.0);
            }
        }

        // The inverse translate is committed; host transitions go back on
        for &(node, _) in &report.offsets {
            surface.set_transitions_enabled(node, true);
        }

        self.ledger.remove_all_animations();
        for handle in [&move_handle, &enter_handle, &leave_handle]
            .into_iter()
            .flatten()
        {
            self.ledger.add_animation(handle.clone());
        }

        report.animated = move_targets.iter().map(|t| t.node).collect();
        report.move_handle = move_handle;
        report.enter_handle = enter_handle;
        report.leave_handle = leave_handle;

        tracing::debug!(
            cycle = self.cycles,
            entered = report.entered.len(),
            left = report.left.len(),
            moved = report.moved.len(),
            animated = report.animated.len(),
            degraded,
            "ListAnimator: reconciled"
        );

        self.previous = new_snapshot;
        report
    }

    fn run_strategy(
        &mut self,
        role: AnimationRole,
        targets: &[StrategyTarget],
        surface: &mut dyn Surface,
    ) -> Option<AnimationHandle> {
        if targets.is_empty() {
            return None;
        }
        let strategy: &Strategy = self.config.strategy(role);
        let mut ctx = StrategyContext {
            role,
            surface,
            driver: self.driver.as_mut(),
            autoplay: self.config.autoplay,
            root: self.config.root,
            enter_offset: self.config.enter_offset,
        };
        let handle = strategy.run(targets, &mut ctx);
        if handle.is_noop() {
            tracing::trace!(role = role.as_str(), "strategy produced no animation");
        }
        Some(handle)
    }

    /// Pause in-flight move and enter animations
    pub fn pause(&mut self) {
        self.ledger.pause_all();
    }

    /// Resume paused move and enter animations
    pub fn play_all(&mut self) {
        self.ledger.play_all();
    }

    /// Seek every registered animation, leave animations included
    pub fn seek(&mut self, time_ms: f32) {
        self.ledger.seek(time_ms);
    }

    pub fn has_active_animations(&self) -> bool {
        self.ledger.has_active_animations()
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn config(&self) -> &ListAnimationConfig {
        &self.config
    }

    pub fn previous_snapshot(&self) -> &PositionSnapshot {
        &self.previous
    }

    pub fn ledger(&self) -> &AnimationLedger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut AnimationLedger {
        &mut self.ledger
    }

    /// Number of cycles run so far
    pub fn cycles(&self) -> u64 {
        self.cycles
    }
}

impl std::fmt::Debug for ListAnimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListAnimator")
            .field("container", &self.container)
            .field("children", &self.previous.len())
            .field("ledger", &self.ledger)
            .field("cycles", &self.cycles)
            .finish()
    }
}
