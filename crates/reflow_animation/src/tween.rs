//! Tween driver
//!
//! Reference [`AnimationDriver`] that interpolates style properties with an
//! easing curve. Tweens are registered in a slotmap behind a shared lock and
//! advanced by [`TweenDriver::tick`]; handles keep only a weak reference, so a
//! dropped driver makes every outstanding handle read as completed.
//!
//! ```ignore
//! let driver = TweenDriver::new();
//! let handle = driver.clone().animate(&scene, request)?;
//!
//! // once per frame
//! while driver.tick(&mut scene, 16.0) {}
//! assert!(handle.is_completed());
//! ```

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use reflow_core::{NodeId, ReflowError, Result, StyleProperty, Surface, TransformValues};
use rustc_hash::FxHashSet;

use crate::completion::Completion;
use crate::driver::{AnimationDriver, AnimationRequest, OnComplete};
use crate::easing::Easing;
use crate::handle::{AnimationControl, AnimationHandle, AnimationId, PlayState};

new_key_type! {
    /// Handle to a registered tween
    struct TweenKey;
}

#[derive(Clone, Copy, Debug)]
struct Track {
    property: StyleProperty,
    from: f32,
    to: f32,
}

#[derive(Clone, Debug)]
struct TweenTarget {
    node: NodeId,
    /// Transform the node had at creation, for axes the tween leaves alone
    base: TransformValues,
    tracks: SmallVec<[Track; 3]>,
}

impl TweenTarget {
    fn transform_at(&self, eased: f32) -> TransformValues {
        let mut values = self.base;
        for track in &self.tracks {
            let value = track.from + (track.to - track.from) * eased;
            match track.property {
                StyleProperty::TranslateX => values.translate_x = value,
                StyleProperty::TranslateY => values.translate_y = value,
                StyleProperty::Opacity => {}
            }
        }
        values
    }
}

struct Tween {
    targets: Vec<TweenTarget>,
    duration_ms: f32,
    elapsed_ms: f32,
    easing: Easing,
    elasticity: f32,
    state: PlayState,
    /// Values must be written on the next tick even if paused (after a seek)
    needs_write: bool,
    cancelled: bool,
    completion: Completion,
    on_complete: Option<OnComplete>,
}

impl Tween {
    fn progress(&self) -> f32 {
        if self.duration_ms <= 0.0 {
            1.0
        } else {
            (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
        }
    }

    fn eased(&self) -> f32 {
        self.easing.apply(self.progress(), self.elasticity)
    }

    fn transform_for(&self, node: NodeId) -> Option<TransformValues> {
        let target = self.targets.iter().find(|t| t.node == node)?;
        Some(target.transform_at(self.eased()))
    }

    fn collect_writes(&self, writes: &mut Vec<(NodeId, StyleProperty, f32)>) {
        let eased = self.eased();
        for target in &self.targets {
            for track in &target.tracks {
                let value = track.from + (track.to - track.from) * eased;
                writes.push((target.node, track.property, value));
            }
        }
    }
}

struct DriverInner {
    tweens: SlotMap<TweenKey, Tween>,
}

/// Easing-curve driver advanced by explicit ticks
#[derive(Clone)]
pub struct TweenDriver {
    inner: Arc<Mutex<DriverInner>>,
}

impl TweenDriver {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(DriverInner {
                tweens: SlotMap::with_key(),
            })),
        }
    }

    /// Advance every tween by `dt_ms` and write the resulting styles
    ///
    /// Completed tweens are removed, their completion fires and their
    /// `on_complete` callback runs with the surface. Returns true if any tween
    /// still needs ticking.
    pub fn tick(&self, surface: &mut dyn Surface, dt_ms: f32) -> bool {
        let mut writes = Vec::new();
        let mut finished = Vec::new();

        let has_active = {
            let mut inner = self.inner.lock();
            let mut done_keys = Vec::new();

            for (key, tween) in inner.tweens.iter_mut() {
                if tween.cancelled {
                    done_keys.push(key);
                    continue;
                }
                match tween.state {
                    PlayState::Pending => {
                        tween.state = PlayState::Running;
                        tween.elapsed_ms += dt_ms;
                    }
                    PlayState::Running => tween.elapsed_ms += dt_ms,
                    PlayState::Paused if !tween.needs_write => continue,
                    PlayState::Paused | PlayState::Completed => {}
                }

                tween.collect_writes(&mut writes);
                tween.needs_write = false;

                if tween.state == PlayState::Running && tween.elapsed_ms >= tween.duration_ms {
                    tween.state = PlayState::Completed;
                    done_keys.push(key);
                }
            }

            for key in done_keys {
                if let Some(tween) = inner.tweens.remove(key) {
                    finished.push(tween);
                }
            }

            inner
                .tweens
                .values()
                .any(|t| matches!(t.state, PlayState::Pending | PlayState::Running))
        };

        for (node, property, value) in writes {
            surface.set_style(node, property, value);
        }

        for mut tween in finished {
            tween.completion.fire();
            if let Some(callback) = tween.on_complete.take() {
                callback(surface);
            }
        }

        has_active
    }

    /// Tick with a fixed step until nothing is active
    ///
    /// Returns the number of ticks taken, capped at `max_ticks`.
    pub fn run_to_completion(
        &self,
        surface: &mut dyn Surface,
        step_ms: f32,
        max_ticks: usize,
    ) -> usize {
        let mut ticks = 0;
        while ticks < max_ticks {
            ticks += 1;
            if !self.tick(surface, step_ms) {
                break;
            }
        }
        ticks
    }

    /// Check if any tween is pending or running
    pub fn has_active_animations(&self) -> bool {
        self.inner
            .lock()
            .tweens
            .values()
            .any(|t| matches!(t.state, PlayState::Pending | PlayState::Running))
    }

    /// Number of registered tweens (including paused ones)
    pub fn tween_count(&self) -> usize {
        self.inner.lock().tweens.len()
    }
}

impl Default for TweenDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationDriver for TweenDriver {
    fn animate(
        &mut self,
        surface: &dyn Surface,
        request: AnimationRequest,
    ) -> Result<AnimationHandle> {
        if request.targets.is_empty() {
            return Err(ReflowError::DriverRejected("empty target list".into()));
        }
        if request.properties.is_empty() && request.overrides.is_empty() {
            return Err(ReflowError::DriverRejected("no property targets".into()));
        }

        let mut seen: FxHashSet<NodeId> = FxHashSet::default();
        let mut nodes: Vec<NodeId> = Vec::with_capacity(request.targets.len());
        let mut targets = Vec::with_capacity(request.targets.len());
        for &node in &request.targets {
            if !seen.insert(node) {
                continue;
            }
            let (Some(tx), Some(ty)) = (
                surface.style_value(node, StyleProperty::TranslateX),
                surface.style_value(node, StyleProperty::TranslateY),
            ) else {
                tracing::trace!(node = ?node, "TweenDriver: skipping unknown target");
                continue;
            };

            let tracks = request
                .targets_for(node)
                .iter()
                .map(|(property, to)| Track {
                    property,
                    from: surface
                        .style_value(node, property)
                        .unwrap_or_else(|| property.identity()),
                    to,
                })
                .collect();

            nodes.push(node);
            targets.push(TweenTarget {
                node,
                base: TransformValues::new(tx, ty),
                tracks,
            });
        }

        if targets.is_empty() {
            return Err(ReflowError::UnknownNode(request.targets[0]));
        }

        let id = AnimationId::next();
        let completion = Completion::new(id);
        let tween = Tween {
            targets,
            duration_ms: request.duration_ms as f32,
            elapsed_ms: 0.0,
            easing: request.easing,
            elasticity: request.elasticity,
            state: if request.autoplay {
                PlayState::Pending
            } else {
                PlayState::Paused
            },
            needs_write: false,
            cancelled: false,
            completion: completion.clone(),
            on_complete: request.on_complete,
        };

        let key = self.inner.lock().tweens.insert(tween);
        tracing::trace!(
            id = id.as_u64(),
            role = request.role.as_str(),
            targets = nodes.len(),
            duration_ms = request.duration_ms,
            "TweenDriver: registered tween"
        );

        let control = TweenControl {
            inner: Arc::downgrade(&self.inner),
            key,
        };
        Ok(AnimationHandle::new(
            id,
            request.role,
            nodes,
            Arc::new(control),
            completion,
        ))
    }
}

/// Weak control over one registered tween
struct TweenControl {
    inner: Weak<Mutex<DriverInner>>,
    key: TweenKey,
}

impl TweenControl {
    fn with_tween<F, R>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut Tween) -> R,
    {
        let inner = self.inner.upgrade()?;
        let mut guard = inner.lock();
        guard.tweens.get_mut(self.key).map(f)
    }
}

impl AnimationControl for TweenControl {
    fn state(&self) -> PlayState {
        self.with_tween(|t| {
            if t.cancelled {
                PlayState::Completed
            } else {
                t.state
            }
        })
        // Tween gone (completed and swept, or driver dropped)
        .unwrap_or(PlayState::Completed)
    }

    fn pause(&self) {
        self.with_tween(|t| {
            if matches!(t.state, PlayState::Pending | PlayState::Running) {
                t.state = PlayState::Paused;
            }
        });
    }

    fn play(&self) {
        self.with_tween(|t| {
            if t.state == PlayState::Paused && !t.cancelled {
                t.state = PlayState::Running;
            }
        });
    }

    fn seek(&self, time_ms: f32) {
        self.with_tween(|t| {
            t.elapsed_ms = time_ms.clamp(0.0, t.duration_ms);
            t.needs_write = true;
        });
    }

    fn current_values(&self, node: NodeId) -> Option<TransformValues> {
        self.with_tween(|t| t.transform_for(node)).flatten()
    }

    fn current_transforms(&self, _nodes: &[NodeId]) -> Vec<(NodeId, TransformValues)> {
        self.with_tween(|t| {
            let eased = t.eased();
            t.targets
                .iter()
                .map(|target| (target.node, target.transform_at(eased)))
                .collect()
        })
        .unwrap_or_default()
    }

    fn cancel(&self) {
        self.with_tween(|t| t.cancelled = true);
    }
}
