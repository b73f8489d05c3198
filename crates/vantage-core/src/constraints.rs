//! Layout constraints for widgets.

use crate::geometry::Size;
use serde::{Deserialize, Serialize};

/// Minimum and maximum sizes a widget may take.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    /// Minimum width
    pub min_width: f32,
    /// Maximum width
    pub max_width: f32,
    /// Minimum height
    pub min_height: f32,
    /// Maximum height
    pub max_height: f32,
}

impl Constraints {
    /// Create new constraints.
    #[must_use]
    pub const fn new(min_width: f32, max_width: f32, min_height: f32, max_height: f32) -> Self {
        Self {
            min_width,
            max_width,
            min_height,
            max_height,
        }
    }

    /// Exactly `size`.
    #[must_use]
    pub const fn tight(size: Size) -> Self {
        Self::new(size.width, size.width, size.height, size.height)
    }

    /// Anything up to `size`.
    #[must_use]
    pub const fn loose(size: Size) -> Self {
        Self::new(0.0, size.width, 0.0, size.height)
    }

    /// No upper bound.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self::new(0.0, f32::INFINITY, 0.0, f32::INFINITY)
    }

    /// Clamp `size` into these constraints.
    #[must_use]
    pub fn constrain(&self, size: Size) -> Size {
        Size::new(
            size.width.clamp(self.min_width, self.max_width),
            size.height.clamp(self.min_height, self.max_height),
        )
    }

    /// Widest finite width allowed, or `fallback` when unbounded.
    #[must_use]
    pub fn max_width_or(&self, fallback: f32) -> f32 {
        if self.max_width.is_finite() {
            self.max_width
        } else {
            fallback.max(self.min_width)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tight_and_loose() {
        let tight = Constraints::tight(Size::new(100.0, 200.0));
        assert_eq!(tight.min_width, 100.0);
        assert_eq!(tight.max_height, 200.0);

        let loose = Constraints::loose(Size::new(100.0, 200.0));
        assert_eq!(loose.min_width, 0.0);
        assert_eq!(loose.max_width, 100.0);
    }

    #[test]
    fn test_constrain() {
        let c = Constraints::new(50.0, 150.0, 50.0, 150.0);
        assert_eq!(c.constrain(Size::new(10.0, 200.0)), Size::new(50.0, 150.0));
        assert_eq!(c.constrain(Size::new(100.0, 100.0)), Size::new(100.0, 100.0));
    }

    #[test]
    fn test_max_width_or() {
        assert_eq!(Constraints::unbounded().max_width_or(400.0), 400.0);
        assert_eq!(Constraints::loose(Size::new(320.0, 10.0)).max_width_or(400.0), 320.0);
    }
}
