//! Animation ledger
//!
//! Tracks registered animation handles in three buckets by role. Completed
//! handles are pruned from a channel their completion signals post into; the
//! channel is drained at the start of every mutating ledger operation, so a
//! handle is never dropped from inside the cycle that registered it. Queries
//! skip completed handles without pruning.

use std::sync::mpsc::{self, Receiver, Sender};

use reflow_animation::{AnimationHandle, AnimationId, AnimationRole};

/// Handles grouped by role
pub struct AnimationLedger {
    move_animations: Vec<AnimationHandle>,
    enter_animations: Vec<AnimationHandle>,
    leave_animations: Vec<AnimationHandle>,
    completed_tx: Sender<AnimationId>,
    completed_rx: Receiver<AnimationId>,
}

impl AnimationLedger {
    pub fn new() -> Self {
        let (completed_tx, completed_rx) = mpsc::channel();
        Self {
            move_animations: Vec::new(),
            enter_animations: Vec::new(),
            leave_animations: Vec::new(),
            completed_tx,
            completed_rx,
        }
    }

    fn bucket(&self, role: AnimationRole) -> &Vec<AnimationHandle> {
        match role {
            AnimationRole::Move => &self.move_animations,
            AnimationRole::Enter => &self.enter_animations,
            AnimationRole::Leave => &self.leave_animations,
        }
    }

    fn bucket_mut(&mut self, role: AnimationRole) -> &mut Vec<AnimationHandle> {
        match role {
            AnimationRole::Move => &mut self.move_animations,
            AnimationRole::Enter => &mut self.enter_animations,
            AnimationRole::Leave => &mut self.leave_animations,
        }
    }

    /// Register a handle under its role
    ///
    /// Returns `false` without registering if the handle already completed.
    pub fn add_animation(&mut self, handle: AnimationHandle) -> bool {
        self.prune_completed();
        if handle.is_completed() {
            tracing::trace!(
                id = handle.id().as_u64(),
                role = handle.role().as_str(),
                "AnimationLedger: skipping completed handle"
            );
            return false;
        }
        handle.completion().subscribe(self.completed_tx.clone());
        self.bucket_mut(handle.role()).push(handle);
        true
    }

    /// Drop every move and enter handle, cancelling it at the driver
    ///
    /// Leave handles run on detached placeholders and are left alone.
    pub fn remove_all_animations(&mut self) {
        self.prune_completed();
        let superseded = self.move_animations.len() + self.enter_animations.len();
        for handle in self
            .move_animations
            .drain(..)
            .chain(self.enter_animations.drain(..))
        {
            handle.cancel();
        }
        if superseded > 0 {
            tracing::trace!(superseded, "AnimationLedger: superseded move/enter handles");
        }
    }

    pub fn has_active_animations(&self) -> bool {
        self.iter().any(|h| !h.is_completed())
    }

    /// Non-completed handles across every bucket
    pub fn active_handles(&self) -> Vec<AnimationHandle> {
        self.iter().filter(|h| !h.is_completed()).cloned().collect()
    }

    /// Pause move and enter handles
    pub fn pause_all(&mut self) {
        self.prune_completed();
        for handle in self.move_animations.iter().chain(&self.enter_animations) {
            handle.pause();
        }
    }

    /// Resume move and enter handles
    pub fn play_all(&mut self) {
        self.prune_completed();
        for handle in self.move_animations.iter().chain(&self.enter_animations) {
            handle.play();
        }
    }

    /// Seek every handle, leave handles included
    pub fn seek(&mut self, time_ms: f32) {
        self.prune_completed();
        for handle in self.iter() {
            handle.seek(time_ms);
        }
    }

    /// Apply pending completion events
    ///
    /// Returns the number of handles removed.
    pub fn prune_completed(&mut self) -> usize {
        let mut removed = 0;
        while let Ok(id) = self.completed_rx.try_recv() {
            for role in AnimationRole::ALL {
                let bucket = self.bucket_mut(role);
                let before = bucket.len();
                bucket.retain(|h| h.id() != id);
                removed += before - bucket.len();
            }
        }
        removed
    }

    /// Handles currently registered under `role`
    pub fn handles(&self, role: AnimationRole) -> &[AnimationHandle] {
        self.bucket(role)
    }

    pub fn len(&self, role: AnimationRole) -> usize {
        self.bucket(role).len()
    }

    pub fn is_empty(&self) -> bool {
        AnimationRole::ALL.iter().all(|r| self.bucket(*r).is_empty())
    }

    fn iter(&self) -> impl Iterator<Item = &AnimationHandle> {
        self.move_animations
            .iter()
            .chain(&self.enter_animations)
            .chain(&self.leave_animations)
    }
}

impl Default for AnimationLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AnimationLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationLedger")
            .field("move", &self.move_animations.len())
            .field("enter", &self.enter_animations.len())
            .field("leave", &self.leave_animations.len())
            .finish()
    }
}
