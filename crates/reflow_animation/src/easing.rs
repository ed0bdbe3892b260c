//! Easing curves
//!
//! `OutElastic` takes an elasticity in `0..=1000` (higher overshoots more).
//! Every other curve ignores elasticity.

use serde::{Deserialize, Serialize};

/// Elasticity used when none is configured
pub const DEFAULT_ELASTICITY: f32 = 500.0;

/// Easing curve applied to normalized animation progress
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    #[default]
    OutElastic,
}

impl Easing {
    /// Map progress `t` in `[0, 1]` to eased progress
    pub fn apply(self, t: f32, elasticity: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::OutElastic => 1.0 - elastic(1.0 - t, elastic_period(elasticity)),
        }
    }
}

/// Period of the elastic wave for a given elasticity
fn elastic_period(elasticity: f32) -> f32 {
    (1000.0 - elasticity.clamp(1.0, 999.0)) / 1000.0
}

fn elastic(t: f32, period: f32) -> f32 {
    if t == 0.0 || t == 1.0 {
        return t;
    }
    let tau = std::f32::consts::TAU;
    let shift = period / tau * 1.0_f32.asin();
    -(2.0_f32.powf(10.0 * (t - 1.0))) * (((t - 1.0) - shift) * tau / period).sin()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 8] = [
        Easing::Linear,
        Easing::EaseInQuad,
        Easing::EaseOutQuad,
        Easing::EaseInOutQuad,
        Easing::EaseInCubic,
        Easing::EaseOutCubic,
        Easing::EaseInOutCubic,
        Easing::OutElastic,
    ];

    #[test]
    fn test_endpoints_are_stable() {
        for easing in ALL {
            assert_eq!(easing.apply(0.0, DEFAULT_ELASTICITY), 0.0, "{easing:?}");
            assert_eq!(easing.apply(1.0, DEFAULT_ELASTICITY), 1.0, "{easing:?}");
        }
    }

    #[test]
    fn test_progress_is_clamped() {
        assert_eq!(Easing::Linear.apply(-1.0, 0.0), 0.0);
        assert_eq!(Easing::EaseOutCubic.apply(2.0, 0.0), 1.0);
    }

    #[test]
    fn test_elastic_overshoots() {
        let peak = (1..100)
            .map(|i| Easing::OutElastic.apply(i as f32 / 100.0, DEFAULT_ELASTICITY))
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn test_serde_names() {
        let parsed: Easing = from_toml("\"ease_out_cubic\"");
        assert_eq!(parsed, Easing::EaseOutCubic);
    }

    fn from_toml(s: &str) -> Easing {
        #[derive(Deserialize)]
        struct Wrapper {
            easing: Easing,
        }
        let doc = format!("easing = {s}");
        toml::from_str::<Wrapper>(&doc).unwrap().easing
    }
}
