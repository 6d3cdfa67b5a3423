// Integer screen geometry shared by the state machine and the compositor.

use std::ops::{Add, Sub};

/// A point in screen (or image-local) pixel coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Geometric center, truncated toward zero.
    pub fn center(&self) -> Point {
        Point::new(self.width / 2, self.height / 2)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// Axis-aligned rectangle; `right` and `bottom` are exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x < self.right && p.y >= self.top && p.y < self.bottom
    }

    pub fn offset(&self, by: Point) -> Rect {
        Rect {
            left: self.left + by.x,
            top: self.top + by.y,
            right: self.right + by.x,
            bottom: self.bottom + by.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_half_open() {
        let r = Rect { left: 10, top: 20, right: 30, bottom: 40 };
        assert!(r.contains(Point::new(10, 20)));
        assert!(r.contains(Point::new(29, 39)));
        assert!(!r.contains(Point::new(30, 25)));
        assert!(!r.contains(Point::new(15, 40)));
        assert!(!r.contains(Point::new(9, 25)));
    }

    #[test]
    fn offset_moves_all_edges() {
        let r = Rect { left: 0, top: 0, right: 5, bottom: 6 }.offset(Point::new(-3, 7));
        assert_eq!(r, Rect { left: -3, top: 7, right: 2, bottom: 13 });
    }

    #[test]
    fn center_truncates_odd_sizes() {
        assert_eq!(Size::new(64, 64).center(), Point::new(32, 32));
        assert_eq!(Size::new(65, 33).center(), Point::new(32, 16));
    }

    #[test]
    fn zero_area_is_empty() {
        assert!(Size::new(0, 10).is_empty());
        assert!(!Size::new(1, 1).is_empty());
    }
}
