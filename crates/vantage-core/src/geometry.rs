//! Geometric primitives: `Point`, `Size`, `Rect`.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// The origin.
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Angle of `other` seen from `self`, measured clockwise from 12 o'clock
    /// and normalized to `[0, TAU)`.
    #[must_use]
    pub fn clock_angle_to(&self, other: &Self) -> f32 {
        let angle = (other.y - self.y).atan2(other.x - self.x) + std::f32::consts::FRAC_PI_2;
        angle.rem_euclid(std::f32::consts::TAU)
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A 2D size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Size {
    /// Zero size.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Create a new size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of `size` at the origin.
    #[must_use]
    pub const fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    /// Size of the rectangle.
    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether `point` lies inside (edges inclusive).
    #[must_use]
    pub fn contains_point(&self, point: &Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Shrink on all sides, never below zero size.
    #[must_use]
    pub fn inset(&self, amount: f32) -> Self {
        Self::new(
            self.x + amount,
            self.y + amount,
            amount.mul_add(-2.0, self.width).max(0.0),
            amount.mul_add(-2.0, self.height).max(0.0),
        )
    }

    /// Split off a strip of `height` from the top; returns `(top, rest)`.
    #[must_use]
    pub fn split_top(&self, height: f32) -> (Self, Self) {
        let h = height.clamp(0.0, self.height);
        (
            Self::new(self.x, self.y, self.width, h),
            Self::new(self.x, self.y + h, self.width, self.height - h),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_point_distance() {
        assert!((Point::ORIGIN.distance(&Point::new(3.0, 4.0)) - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_point_ops() {
        let p = Point::new(1.0, 2.0) + Point::new(3.0, 4.0);
        assert_eq!(p, Point::new(4.0, 6.0));
        assert_eq!(p - Point::new(4.0, 6.0), Point::ORIGIN);
    }

    #[test]
    fn test_clock_angle_quadrants() {
        let c = Point::ORIGIN;
        let top = c.clock_angle_to(&Point::new(0.0, -10.0));
        let right = c.clock_angle_to(&Point::new(10.0, 0.0));
        let bottom = c.clock_angle_to(&Point::new(0.0, 10.0));
        let left = c.clock_angle_to(&Point::new(-10.0, 0.0));
        assert!(top.abs() < 0.001 || (top - std::f32::consts::TAU).abs() < 0.001);
        assert!((right - std::f32::consts::FRAC_PI_2).abs() < 0.001);
        assert!((bottom - std::f32::consts::PI).abs() < 0.001);
        assert!((left - 3.0 * std::f32::consts::FRAC_PI_2).abs() < 0.001);
    }

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(r.right(), 110.0);
        assert_eq!(r.bottom(), 70.0);
        assert_eq!(r.center(), Point::new(60.0, 45.0));
    }

    #[test]
    fn test_rect_contains_point_inclusive() {
        let r = Rect::new(10.0, 10.0, 100.0, 100.0);
        assert!(r.contains_point(&Point::new(10.0, 10.0)));
        assert!(r.contains_point(&Point::new(110.0, 110.0)));
        assert!(!r.contains_point(&Point::new(9.9, 50.0)));
    }

    #[test]
    fn test_rect_inset_never_negative() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0).inset(20.0);
        assert_eq!(r.width, 0.0);
        assert_eq!(r.height, 0.0);
    }

    #[test]
    fn test_split_top() {
        let (top, rest) = Rect::new(0.0, 0.0, 100.0, 100.0).split_top(30.0);
        assert_eq!(top, Rect::new(0.0, 0.0, 100.0, 30.0));
        assert_eq!(rest, Rect::new(0.0, 30.0, 100.0, 70.0));
    }

    #[test]
    fn test_split_top_clamps() {
        let (top, rest) = Rect::new(0.0, 0.0, 100.0, 20.0).split_top(30.0);
        assert_eq!(top.height, 20.0);
        assert_eq!(rest.height, 0.0);
    }

    proptest! {
        #[test]
        fn prop_rect_contains_center(x in -1000.0f32..1000.0, y in -1000.0f32..1000.0, w in 1.0f32..1000.0, h in 1.0f32..1000.0) {
            let r = Rect::new(x, y, w, h);
            prop_assert!(r.contains_point(&r.center()));
        }

        #[test]
        fn prop_clock_angle_in_range(x in -100.0f32..100.0, y in -100.0f32..100.0) {
            let a = Point::ORIGIN.clock_angle_to(&Point::new(x, y));
            prop_assert!((0.0..std::f32::consts::TAU + 0.0001).contains(&a));
        }
    }
}
