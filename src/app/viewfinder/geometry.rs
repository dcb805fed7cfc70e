// SPDX-License-Identifier: GPL-3.0-only

//! Integer rectangles and decoder points

/// Axis-aligned rectangle in pixel coordinates
///
/// `right` and `bottom` are exclusive, so `width() == right - left`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    /// Grow the rectangle by `margin` on every side
    pub fn outset(&self, margin: i32) -> Self {
        Self::new(
            self.left - margin,
            self.top - margin,
            self.right + margin,
            self.bottom + margin,
        )
    }

    /// Smallest rectangle covering both
    pub fn union(&self, other: &Rect) -> Self {
        Self::new(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }

    /// Clip to `[0, width) x [0, height)`
    pub fn clamp_to(&self, width: i32, height: i32) -> Self {
        Self::new(
            self.left.clamp(0, width),
            self.top.clamp(0, height),
            self.right.clamp(0, width),
            self.bottom.clamp(0, height),
        )
    }
}

/// A point the decoder found interesting, in preview crop pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResultPoint {
    pub x: f32,
    pub y: f32,
}

impl ResultPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Integer width/height pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_dimensions() {
        let rect = Rect::new(10, 20, 110, 70);
        assert_eq!(rect.width(), 100);
        assert_eq!(rect.height(), 50);
        assert!(!rect.is_empty());
        assert!(Rect::new(5, 5, 5, 10).is_empty());
    }

    #[test]
    fn test_rect_union_and_outset() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, -5, 20, 8);
        assert_eq!(a.union(&b), Rect::new(0, -5, 20, 10));
        assert_eq!(a.outset(6), Rect::new(-6, -6, 16, 16));
    }

    #[test]
    fn test_rect_clamp() {
        let rect = Rect::new(-4, -4, 50, 50);
        assert_eq!(rect.clamp_to(40, 30), Rect::new(0, 0, 40, 30));
    }
}
