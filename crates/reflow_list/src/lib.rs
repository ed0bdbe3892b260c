//! Reflow List
//!
//! FLIP (First, Last, Invert, Play) animation for an ordered container whose
//! children are inserted, removed or reordered by the host.
//!
//! # Features
//!
//! - **Position snapshots**: logical child geometry with in-flight transforms removed
//! - **Reconciliation**: entered/left/moved classification and inverse offsets
//! - **Interruption safety**: a mutation mid-animation continues from the visual position
//! - **Strategies**: built-in slide/fade choreography or caller supplied functions
//! - **Ledger**: per-role handle tracking with channel-fed pruning
//!
//! # Example
//!
//! ```ignore
//! use reflow_list::prelude::*;
//!
//! let driver = TweenDriver::new();
//! let config = ListAnimationConfig::default();
//! let mut animator = ListAnimator::new(&scene, list, driver.clone(), config);
//!
//! animator.take_snapshot_before_update(&scene);
//! scene.insert_child(list, 0, item);
//! animator.on_mutation(&mut scene, MutationBatch::new().with_added([item]));
//!
//! while driver.tick(&mut scene, 16.0) {}
//! ```

pub mod config;
pub mod engine;
pub mod ledger;
pub mod mutation;
pub mod snapshot;
pub mod strategy;


pub use config::{ListAnimationConfig, RoleTiming, TimingConfig, DEFAULT_ENTER_OFFSET};
pub use engine::{CycleReport, ListAnimator};
pub use ledger::AnimationLedger;
pub use mutation::{MutationBatch, MutationRecord};
pub use snapshot::{transforms_for_node, PositionEntry, PositionSnapshot};
pub use strategy::{CustomStrategy, Strategy, StrategyContext, StrategyTarget};

/// Prelude module - import everything commonly needed
pub mod prelude {
    pub use crate::config::{ListAnimationConfig, RoleTiming, TimingConfig};
    pub use crate::engine::{CycleReport, ListAnimator};
    pub use crate::mutation::{MutationBatch, MutationRecord};
    pub use crate::strategy::{Strategy, StrategyContext, StrategyTarget};

    pub use reflow_animation::{
        AnimationDriver, AnimationHandle, AnimationRequest, AnimationRole, Easing, PlayState,
        TweenDriver,
    };
    pub use reflow_core::{LayoutAxis, NodeId, Offset, Rect, SceneTree, StyleProperty, Surface};
}
