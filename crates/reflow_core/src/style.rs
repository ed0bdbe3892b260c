//! Transient style vocabulary
//!
//! The engine only ever writes translate and opacity on nodes it animates.

use smallvec::SmallVec;

use crate::geometry::Offset;

/// A style property the engine (or a driver) may write on a node
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StyleProperty {
    TranslateX,
    TranslateY,
    Opacity,
}

impl StyleProperty {
    /// Resting value when nothing is applied
    pub fn identity(self) -> f32 {
        match self {
            StyleProperty::TranslateX | StyleProperty::TranslateY => 0.0,
            StyleProperty::Opacity => 1.0,
        }
    }
}

/// In-flight transform of a node as reported by an animation
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TransformValues {
    pub translate_x: f32,
    pub translate_y: f32,
}

impl TransformValues {
    pub const IDENTITY: TransformValues = TransformValues {
        translate_x: 0.0,
        translate_y: 0.0,
    };

    pub fn new(translate_x: f32, translate_y: f32) -> Self {
        Self {
            translate_x,
            translate_y,
        }
    }

    pub fn as_offset(&self) -> Offset {
        Offset::new(self.translate_x, self.translate_y)
    }
}

/// Target values for one animation request, keyed by property
///
/// Later entries for the same property replace earlier ones.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyTargets {
    entries: SmallVec<[(StyleProperty, f32); 3]>,
}

impl PropertyTargets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a target value (builder form)
    pub fn with(mut self, property: StyleProperty, value: f32) -> Self {
        self.set(property, value);
        self
    }

    pub fn set(&mut self, property: StyleProperty, value: f32) {
        if let Some(entry) = self.entries.iter_mut().find(|(p, _)| *p == property) {
            entry.1 = value;
        } else {
            self.entries.push((property, value));
        }
    }

    pub fn get(&self, property: StyleProperty) -> Option<f32> {
        self.entries
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (StyleProperty, f32)> + '_ {
        self.entries.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
