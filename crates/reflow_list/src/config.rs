//! List animation configuration.

use reflow_animation::{AnimationRole, Easing, DEFAULT_DURATION_MS, DEFAULT_ELASTICITY};
use reflow_core::{NodeId, ReflowError, Result};
use serde::{Deserialize, Serialize};

use crate::strategy::Strategy;

/// Default horizontal slide distance for entrances (px).
pub const DEFAULT_ENTER_OFFSET: f32 = 200.0;

/// Timing of one built-in strategy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoleTiming {
    pub duration_ms: u32,
    pub easing: Easing,
    /// Elastic curve stiffness (0..1000); only used by `Easing::OutElastic`.
    pub elasticity: f32,
}

impl RoleTiming {
    pub fn new(duration_ms: u32, easing: Easing) -> Self {
        Self {
            duration_ms,
            easing,
            elasticity: DEFAULT_ELASTICITY,
        }
    }

    pub fn with_elasticity(mut self, elasticity: f32) -> Self {
        self.elasticity = elasticity;
        self
    }

    /// Default timing for a role
    pub fn default_for(role: AnimationRole) -> Self {
        let timing = Self::new(DEFAULT_DURATION_MS, Easing::OutElastic);
        match role {
            AnimationRole::Leave => timing.with_elasticity(0.0),
            AnimationRole::Move | AnimationRole::Enter => timing,
        }
    }
}

/// Serializable timing options.
///
/// Every field is optional in a config file; missing ones keep their
/// defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub move_duration: u32,
    pub move_easing: Easing,
    pub enter_duration: u32,
    pub enter_easing: Easing,
    pub leave_duration: u32,
    pub leave_easing: Easing,
    pub leave_elasticity: f32,
    /// Start animations as soon as they are created.
    pub autoplay: bool,
    /// Horizontal slide distance for entrances (px).
    pub enter_offset: f32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            move_duration: DEFAULT_DURATION_MS,
            move_easing: Easing::OutElastic,
            enter_duration: DEFAULT_DURATION_MS,
            enter_easing: Easing::OutElastic,
            leave_duration: DEFAULT_DURATION_MS,
            leave_easing: Easing::OutElastic,
            leave_elasticity: 0.0,
            autoplay: true,
            enter_offset: DEFAULT_ENTER_OFFSET,
        }
    }
}

impl TimingConfig {
    /// Parse from a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| ReflowError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| ReflowError::Config(e.to_string()))
    }
}

/// Configuration for a [`ListAnimator`](crate::ListAnimator).
#[derive(Clone, Debug)]
pub struct ListAnimationConfig {
    pub move_strategy: Strategy,
    pub enter_strategy: Strategy,
    pub leave_strategy: Strategy,
    /// Start animations as soon as they are created.
    pub autoplay: bool,
    /// Horizontal slide distance for entrances (px).
    pub enter_offset: f32,
    /// Placeholder mount point for leave animations.
    pub root: Option<NodeId>,
}

impl Default for ListAnimationConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl ListAnimationConfig {
    /// Elastic one-second motion for every role.
    pub fn standard() -> Self {
        Self::from_timing(&TimingConfig::default())
    }

    /// Short, non-elastic motion.
    pub fn snappy() -> Self {
        Self::standard()
            .with_move_timing(RoleTiming::new(250, Easing::EaseOutCubic))
            .with_enter_timing(RoleTiming::new(250, Easing::EaseOutCubic))
            .with_leave_timing(RoleTiming::new(200, Easing::EaseInQuad))
    }

    /// Linear 100ms timing for deterministic tests.
    pub fn testing() -> Self {
        Self::standard()
            .with_move_timing(RoleTiming::new(100, Easing::Linear))
            .with_enter_timing(RoleTiming::new(100, Easing::Linear))
            .with_leave_timing(RoleTiming::new(100, Easing::Linear))
    }

    /// Build from serializable timing; strategies are all built-in.
    pub fn from_timing(timing: &TimingConfig) -> Self {
        Self {
            move_strategy: Strategy::Builtin(
                RoleTiming::new(timing.move_duration, timing.move_easing),
            ),
            enter_strategy: Strategy::Builtin(
                RoleTiming::new(timing.enter_duration, timing.enter_easing),
            ),
            leave_strategy: Strategy::Builtin(
                RoleTiming::new(timing.leave_duration, timing.leave_easing)
                    .with_elasticity(timing.leave_elasticity),
            ),
            autoplay: timing.autoplay,
            enter_offset: timing.enter_offset,
            root: None,
        }
    }

    /// Parse timing options from a TOML document.
    ///
    /// ```toml
    /// move_duration = 400
    /// move_easing = "ease_out_cubic"
    /// leave_elasticity = 0
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(Self::from_timing(&TimingConfig::from_toml_str(source)?))
    }

    /// Strategy for a role.
    pub fn strategy(&self, role: AnimationRole) -> &Strategy {
        match role {
            AnimationRole::Move => &self.move_strategy,
            AnimationRole::Enter => &self.enter_strategy,
            AnimationRole::Leave => &self.leave_strategy,
        }
    }

    fn strategy_mut(&mut self, role: AnimationRole) -> &mut Strategy {
        match role {
            AnimationRole::Move => &mut self.move_strategy,
            AnimationRole::Enter => &mut self.enter_strategy,
            AnimationRole::Leave => &mut self.leave_strategy,
        }
    }

    fn update_timing(mut self, role: AnimationRole, f: impl FnOnce(&mut RoleTiming)) -> Self {
        match self.strategy_mut(role).timing_mut() {
            Some(timing) => f(timing),
            None => tracing::debug!(
                role = role.as_str(),
                "timing ignored for custom strategy"
            ),
        }
        self
    }

    /// Replace the move strategy with built-in timing.
    pub fn with_move_timing(mut self, timing: RoleTiming) -> Self {
        self.move_strategy = Strategy::Builtin(timing);
        self
    }

    /// Replace the enter strategy with built-in timing.
    pub fn with_enter_timing(mut self, timing: RoleTiming) -> Self {
        self.enter_strategy = Strategy::Builtin(timing);
        self
    }

    /// Replace the leave strategy with built-in timing.
    pub fn with_leave_timing(mut self, timing: RoleTiming) -> Self {
        self.leave_strategy = Strategy::Builtin(timing);
        self
    }

    pub fn with_move_duration(self, duration_ms: u32) -> Self {
        self.update_timing(AnimationRole::Move, |t| t.duration_ms = duration_ms)
    }

    pub fn with_move_easing(self, easing: Easing) -> Self {
        self.update_timing(AnimationRole::Move, |t| t.easing = easing)
    }

    pub fn with_enter_duration(self, duration_ms: u32) -> Self {
        self.update_timing(AnimationRole::Enter, |t| t.duration_ms = duration_ms)
    }

    pub fn with_enter_easing(self, easing: Easing) -> Self {
        self.update_timing(AnimationRole::Enter, |t| t.easing = easing)
    }

    pub fn with_leave_duration(self, duration_ms: u32) -> Self {
        self.update_timing(AnimationRole::Leave, |t| t.duration_ms = duration_ms)
    }

    pub fn with_leave_easing(self, easing: Easing) -> Self {
        self.update_timing(AnimationRole::Leave, |t| t.easing = easing)
    }

    pub fn with_leave_elasticity(self, elasticity: f32) -> Self {
        self.update_timing(AnimationRole::Leave, |t| t.elasticity = elasticity)
    }

    /// Use a custom move strategy.
    pub fn with_custom_move(mut self, strategy: Strategy) -> Self {
        self.move_strategy = strategy;
        self
    }

    /// Use a custom enter strategy.
    pub fn with_custom_enter(mut self, strategy: Strategy) -> Self {
        self.enter_strategy = strategy;
        self
    }

    /// Use a custom leave strategy.
    pub fn with_custom_leave(mut self, strategy: Strategy) -> Self {
        self.leave_strategy = strategy;
        self
    }

    /// Set the placeholder mount point for leave animations.
    pub fn with_root(mut self, root: NodeId) -> Self {
        self.root = Some(root);
        self
    }

    pub fn with_autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }

    pub fn with_enter_offset(mut self, offset: f32) -> Self {
        self.enter_offset = offset;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ListAnimationConfig::default();
        for role in AnimationRole::ALL {
            let timing = config.strategy(role).timing().copied().unwrap();
            assert_eq!(timing.duration_ms, 1000);
            assert_eq!(timing.easing, Easing::OutElastic);
        }
        assert_eq!(config.leave_strategy.timing().unwrap().elasticity, 0.0);
        assert_eq!(config.move_strategy.timing().unwrap().elasticity, 500.0);
        assert!(config.autoplay);
        assert_eq!(config.enter_offset, 200.0);
        assert!(config.root.is_none());
    }

    #[test]
    fn test_snappy_preset_is_short_and_not_elastic() {
        let config = ListAnimationConfig::snappy();
        for role in AnimationRole::ALL {
            let timing = config.strategy(role).timing().copied().unwrap();
            assert!(timing.duration_ms <= 250);
            assert_ne!(timing.easing, Easing::OutElastic);
        }
        assert_eq!(
            config.leave_strategy.timing().map(|t| t.easing),
            Some(Easing::EaseInQuad)
        );
        assert!(config.autoplay);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ListAnimationConfig::from_toml_str(
            r#"
            move_duration = 400
            move_easing = "ease_out_cubic"
            autoplay = false
            "#,
        )
        .unwrap();

        let moving = config.move_strategy.timing().copied().unwrap();
        assert_eq!(moving, RoleTiming::new(400, Easing::EaseOutCubic));
        assert_eq!(
            config.leave_strategy.timing().copied(),
            Some(RoleTiming::default_for(AnimationRole::Leave))
        );
        assert!(!config.autoplay);
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        let err = ListAnimationConfig::from_toml_str("move_duration = \"slow\"").unwrap_err();
        assert!(matches!(err, ReflowError::Config(_)));
    }

    #[test]
    fn test_timing_round_trips_through_toml() {
        let timing = TimingConfig {
            leave_elasticity: 250.0,
            ..TimingConfig::default()
        };
        let text = timing.to_toml_string().unwrap();
        assert_eq!(TimingConfig::from_toml_str(&text).unwrap(), timing);
    }

    #[test]
    fn test_timing_setters_skip_custom_strategies() {
        let custom = Strategy::custom(|targets, ctx| {
            reflow_animation::AnimationHandle::completed(
                ctx.role,
                targets.iter().map(|t| t.node).collect(),
            )
        });
        let config = ListAnimationConfig::standard()
            .with_custom_move(custom)
            .with_move_duration(10)
            .with_enter_duration(10);

        assert!(config.move_strategy.is_custom());
        assert_eq!(config.enter_strategy.timing().unwrap().duration_ms, 10);
    }
}
