//! Reflow Animation
//!
//! The animation-driver side of reflow: everything the reconciliation engine
//! needs to request, observe and control animations.
//!
//! # Features
//!
//! - **Driver contract**: `AnimationDriver` + `AnimationRequest`, pluggable per host
//! - **Handles**: pause/play/seek/cancel and live transform readout per node
//! - **Completion signals**: fire exactly once, feed channels or futures
//! - **Easing**: quad/cubic curves and an elastic curve with tunable elasticity
//! - **TweenDriver**: a tick-driven reference driver with no runtime dependencies

pub mod completion;
pub mod driver;
pub mod easing;
pub mod handle;
pub mod tween;

pub use completion::{Completion, Finished};
pub use driver::{AnimationDriver, AnimationRequest, OnComplete, DEFAULT_DURATION_MS};
pub use easing::{Easing, DEFAULT_ELASTICITY};
pub use handle::{AnimationControl, AnimationHandle, AnimationId, AnimationRole, PlayState};
pub use tween::TweenDriver;
