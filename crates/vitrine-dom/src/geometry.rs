//! Geometry
//!
//! Rectangle maths for element bounds and viewport tests.

/// Element rectangle in page coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DomRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DomRect {
    /// Create with dimensions
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Top edge (same as y)
    #[inline]
    pub fn top(&self) -> f64 {
        self.y
    }

    /// Right edge
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Left edge (same as x)
    #[inline]
    pub fn left(&self) -> f64 {
        self.x
    }

    /// Rectangle area
    #[inline]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Check if rects intersect
    pub fn intersects(&self, other: &DomRect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Get intersection rect
    pub fn intersection(&self, other: &DomRect) -> Option<DomRect> {
        if !self.intersects(other) {
            return None;
        }

        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        Some(DomRect::from_xywh(x, y, right - x, bottom - y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        let r = DomRect::from_xywh(10.0, 20.0, 100.0, 50.0);
        assert_eq!(r.top(), 20.0);
        assert_eq!(r.left(), 10.0);
        assert_eq!(r.right(), 110.0);
        assert_eq!(r.bottom(), 70.0);
    }

    #[test]
    fn test_intersection() {
        let a = DomRect::from_xywh(0.0, 0.0, 100.0, 100.0);
        let b = DomRect::from_xywh(50.0, 50.0, 100.0, 100.0);
        let c = DomRect::from_xywh(200.0, 200.0, 10.0, 10.0);

        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));

        let i = a.intersection(&b).unwrap();
        assert_eq!(i, DomRect::from_xywh(50.0, 50.0, 50.0, 50.0));
        assert!(a.intersection(&c).is_none());
    }
}
