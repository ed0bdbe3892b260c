//! Animation handles
//!
//! An [`AnimationHandle`] is what a driver hands back for one request. The
//! driver-specific part lives behind [`AnimationControl`]; a handle without a
//! control is a completed no-op.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use reflow_core::{NodeId, TransformValues};

use crate::completion::Completion;

static NEXT_ANIMATION_ID: AtomicU64 = AtomicU64::new(1);

/// Unique id of one animation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationId(u64);

impl AnimationId {
    /// Allocate a fresh id
    pub fn next() -> Self {
        AnimationId(NEXT_ANIMATION_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Which lifecycle an animation belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimationRole {
    Move,
    Enter,
    Leave,
}

impl AnimationRole {
    pub const ALL: [AnimationRole; 3] = [
        AnimationRole::Move,
        AnimationRole::Enter,
        AnimationRole::Leave,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AnimationRole::Move => "move",
            AnimationRole::Enter => "enter",
            AnimationRole::Leave => "leave",
        }
    }
}

/// Playback state of an animation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayState {
    /// Created, not yet advanced by the driver
    Pending,
    Running,
    Paused,
    /// Terminal; never leaves this state
    Completed,
}

/// Driver-side control of a live animation
pub trait AnimationControl: Send + Sync {
    fn state(&self) -> PlayState;

    fn pause(&self);

    fn play(&self);

    /// Jump to `time_ms` from the animation start
    fn seek(&self, time_ms: f32);

    /// Transform the animation currently applies to `node`, if it animates it
    fn current_values(&self, node: NodeId) -> Option<TransformValues>;

    /// Transforms currently applied to each of `nodes` the animation animates
    fn current_transforms(&self, nodes: &[NodeId]) -> Vec<(NodeId, TransformValues)> {
        nodes
            .iter()
            .filter_map(|&node| self.current_values(node).map(|values| (node, values)))
            .collect()
    }

    /// Stop driving visual change; the animation reads as completed afterwards
    fn cancel(&self);
}

/// Handle to one in-flight or completed animation
#[derive(Clone)]
pub struct AnimationHandle {
    id: AnimationId,
    role: AnimationRole,
    targets: Arc<[NodeId]>,
    control: Option<Arc<dyn AnimationControl>>,
    completion: Completion,
}

impl AnimationHandle {
    pub fn new(
        id: AnimationId,
        role: AnimationRole,
        targets: Vec<NodeId>,
        control: Arc<dyn AnimationControl>,
        completion: Completion,
    ) -> Self {
        Self {
            id,
            role,
            targets: targets.into(),
            control: Some(control),
            completion,
        }
    }

    /// A handle that is already completed and controls nothing
    pub fn completed(role: AnimationRole, targets: Vec<NodeId>) -> Self {
        let id = AnimationId::next();
        Self {
            id,
            role,
            targets: targets.into(),
            control: None,
            completion: Completion::resolved(id),
        }
    }

    pub fn id(&self) -> AnimationId {
        self.id
    }

    pub fn role(&self) -> AnimationRole {
        self.role
    }

    pub fn targets(&self) -> &[NodeId] {
        &self.targets
    }

    pub fn state(&self) -> PlayState {
        if self.completion.is_complete() {
            return PlayState::Completed;
        }
        self.control
            .as_ref()
            .map(|c| c.state())
            .unwrap_or(PlayState::Completed)
    }

    pub fn is_completed(&self) -> bool {
        self.state() == PlayState::Completed
    }

    /// Whether this handle came from a rejected or empty request
    pub fn is_noop(&self) -> bool {
        self.control.is_none()
    }

    pub fn pause(&self) {
        if let Some(control) = &self.control {
            control.pause();
        }
    }

    pub fn play(&self) {
        if let Some(control) = &self.control {
            control.play();
        }
    }

    pub fn seek(&self, time_ms: f32) {
        if let Some(control) = &self.control {
            control.seek(time_ms);
        }
    }

    pub fn cancel(&self) {
        if let Some(control) = &self.control {
            control.cancel();
        }
    }

    /// In-flight transform for `node`, `None` if not animated by this handle
    pub fn current_values(&self, node: NodeId) -> Option<TransformValues> {
        if !self.targets.contains(&node) {
            return None;
        }
        self.control.as_ref().and_then(|c| c.current_values(node))
    }

    /// In-flight transform of every target, in one driver query
    pub fn current_transforms(&self) -> Vec<(NodeId, TransformValues)> {
        match &self.control {
            Some(control) => control.current_transforms(&self.targets),
            None => Vec::new(),
        }
    }

    pub fn completion(&self) -> &Completion {
        &self.completion
    }
}

impl std::fmt::Debug for AnimationHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationHandle")
            .field("id", &self.id)
            .field("role", &self.role)
            .field("targets", &self.targets.len())
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = AnimationId::next();
        let b = AnimationId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn test_completed_handle_is_inert() {
        let handle = AnimationHandle::completed(AnimationRole::Move, Vec::new());
        assert!(handle.is_completed());
        assert!(handle.is_noop());
        assert!(handle.completion().is_complete());

        // Control calls must be safe no-ops
        handle.pause();
        handle.play();
        handle.seek(100.0);
        handle.cancel();
        assert_eq!(handle.state(), PlayState::Completed);
        assert!(handle.current_transforms().is_empty());
    }

    #[test]
    fn test_role_names() {
        let names: Vec<&str> = AnimationRole::ALL.iter().map(|r| r.as_str()).collect();
        assert_eq!(names, vec!["move", "enter", "leave"]);
    }
}
