//! Viewport geometry
//!
//! Rects here mirror what a host's bounding-box query reports: every edge is
//! stored explicitly so snapshot math never has to recompute them.

/// 2D offset (translation delta) in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Offset {
    pub x: f32,
    pub y: f32,
}

impl Offset {
    pub const ZERO: Offset = Offset { x: 0.0, y: 0.0 };

    /// Offsets smaller than this are treated as no movement
    pub const EPSILON: f32 = 0.01;

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Check if the offset moves nothing
    pub fn is_zero(&self) -> bool {
        self.x.abs() < Self::EPSILON && self.y.abs() < Self::EPSILON
    }
}

impl std::ops::Add for Offset {
    type Output = Offset;

    fn add(self, rhs: Offset) -> Offset {
        Offset::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Neg for Offset {
    type Output = Offset;

    fn neg(self) -> Offset {
        Offset::new(-self.x, -self.y)
    }
}

/// Axis-aligned rectangle in viewport coordinates
///
/// `x`/`left` and `y`/`top` are kept in sync by every constructor; they are
/// separate fields because hosts report both.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        x: 0.0,
        y: 0.0,
        top: 0.0,
        bottom: 0.0,
        left: 0.0,
        right: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            top: y,
            bottom: y + height,
            left: x,
            right: x + width,
            width,
            height,
        }
    }

    /// Offset the rect by a delta
    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Offset the rect by an [`Offset`]
    pub fn translate_by(&self, offset: Offset) -> Self {
        self.translate(offset.x, offset.y)
    }

    /// Inverse offset that places a node laid out at `self` back onto `from`
    ///
    /// This is the FLIP "Invert" step: `from - self` on the left/top edges.
    pub fn inverse_offset_from(&self, from: &Rect) -> Offset {
        Offset::new(from.left - self.left, from.top - self.top)
    }

    /// Compare two rects within a tolerance
    pub fn approx_eq(&self, other: &Rect, epsilon: f32) -> bool {
        (self.left - other.left).abs() < epsilon
            && (self.top - other.top).abs() < epsilon
            && (self.width - other.width).abs() < epsilon
            && (self.height - other.height).abs() < epsilon
    }
}

/// Container origin recorded alongside a snapshot
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ContainerRect {
    pub x: f32,
    pub y: f32,
    pub left: f32,
    pub top: f32,
}

impl From<Rect> for ContainerRect {
    fn from(rect: Rect) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            left: rect.left,
            top: rect.top,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let rect = Rect::new(10.0, 20.0, 50.0, 30.0);
        assert_eq!(rect.left, 10.0);
        assert_eq!(rect.right, 60.0);
        assert_eq!(rect.top, 20.0);
        assert_eq!(rect.bottom, 50.0);
    }

    #[test]
    fn test_translate_keeps_edges_in_sync() {
        let rect = Rect::new(0.0, 0.0, 50.0, 50.0).translate(-5.0, 12.0);
        assert_eq!(rect.x, rect.left);
        assert_eq!(rect.y, rect.top);
        assert_eq!(rect.right, 45.0);
        assert_eq!(rect.bottom, 62.0);
    }

    #[test]
    fn test_inverse_offset() {
        let old = Rect::new(0.0, 0.0, 50.0, 50.0);
        let new = Rect::new(50.0, 0.0, 50.0, 50.0);
        assert_eq!(new.inverse_offset_from(&old), Offset::new(-50.0, 0.0));
        assert_eq!(old.inverse_offset_from(&new), Offset::new(50.0, 0.0));
    }

    #[test]
    fn test_offset_is_zero() {
        assert!(Offset::ZERO.is_zero());
        assert!(Offset::new(0.001, -0.001).is_zero());
        assert!(!Offset::new(0.0, 1.0).is_zero());
    }
}
