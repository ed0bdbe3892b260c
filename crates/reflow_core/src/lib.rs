//! Reflow Core
//!
//! Foundational types shared by the reflow crates:
//!
//! - **Geometry**: viewport rects and translation offsets
//! - **Node identity**: opaque `NodeId` handles owned by the host
//! - **Style vocabulary**: the translate/opacity properties animations write
//! - **Surface**: the host contract for geometry reads and style writes
//! - **SceneTree**: a headless surface for tests and offscreen hosts

pub mod error;
pub mod geometry;
pub mod node;
pub mod scene;
pub mod style;

pub use error::{ReflowError, Result};
pub use geometry::{ContainerRect, Offset, Rect};
pub use node::{NodeId, Surface};
pub use scene::{LayoutAxis, SceneTree};
pub use style::{PropertyTargets, StyleProperty, TransformValues};
