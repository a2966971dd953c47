//! Axis-aligned rectangle math in viewport coordinates.

use serde::{Deserialize, Serialize};

/// A bounding box as reported by `getBoundingClientRect()`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Build a rect from its origin and size
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            right: left + width,
            bottom: top + height,
            width,
            height,
        }
    }

    /// Grow the rect by `margin` on every edge
    pub fn expand(&self, margin: f64) -> Self {
        Self::new(
            self.left - margin,
            self.top - margin,
            self.width + margin * 2.0,
            self.height + margin * 2.0,
        )
    }

    /// Whether `other` lies entirely inside this rect (edges inclusive)
    pub fn contains(&self, other: &Rect) -> bool {
        other.left >= self.left
            && other.right <= self.right
            && other.top >= self.top
            && other.bottom <= self.bottom
    }
}

/// Overlap area of two rects, zero when they are disjoint.
pub fn intersection_area(a: &Rect, b: &Rect) -> f64 {
    let overlap_width = a.right.min(b.right) - a.left.max(b.left);
    let overlap_height = a.bottom.min(b.bottom) - a.top.max(b.top);
    overlap_width.max(0.0) * overlap_height.max(0.0)
}

/// Area of a rect. Degenerate rects yield 0.
pub fn area(r: &Rect) -> f64 {
    if r.width <= 0.0 || r.height <= 0.0 {
        return 0.0;
    }
    r.width * r.height
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersection_partial_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(intersection_area(&a, &b), 25.0);
        assert_eq!(intersection_area(&b, &a), 25.0);
    }

    #[test]
    fn test_intersection_disjoint_is_zero() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 0.0, 10.0, 10.0);
        assert_eq!(intersection_area(&a, &b), 0.0);

        // Overlapping on one axis only
        let c = Rect::new(2.0, 30.0, 4.0, 4.0);
        assert_eq!(intersection_area(&a, &c), 0.0);
    }

    #[test]
    fn test_intersection_nested() {
        let outer = Rect::new(0.0, 0.0, 100.0, 50.0);
        let inner = Rect::new(10.0, 10.0, 20.0, 5.0);
        assert_eq!(intersection_area(&outer, &inner), area(&inner));
    }

    #[test]
    fn test_area_degenerate() {
        assert_eq!(area(&Rect::new(3.0, 3.0, 0.0, 10.0)), 0.0);
        assert_eq!(area(&Rect::new(3.0, 3.0, 10.0, 0.0)), 0.0);
        assert_eq!(area(&Rect::new(0.0, 0.0, 4.0, 2.5)), 10.0);
    }

    #[test]
    fn test_expand_and_contains() {
        let r = Rect::new(10.0, 10.0, 100.0, 100.0);
        let grown = r.expand(2.0);
        assert_eq!(grown.left, 8.0);
        assert_eq!(grown.bottom, 112.0);
        assert!(grown.contains(&Rect::new(9.0, 9.0, 102.0, 102.0)));
        assert!(!r.contains(&Rect::new(9.0, 9.0, 10.0, 10.0)));
    }
}
