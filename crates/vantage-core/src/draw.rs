//! Draw commands: the backend-neutral output of painting.

use crate::geometry::{Point, Rect};
use crate::widget::TextStyle;
use crate::Color;
use serde::{Deserialize, Serialize};

/// Stroke style for lines and outlines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    /// Stroke color
    pub color: Color,
    /// Stroke width in pixels
    pub width: f32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 1.0,
        }
    }
}

/// Fill and/or stroke of a box-like primitive.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoxStyle {
    /// Fill color
    pub fill: Option<Color>,
    /// Outline
    pub stroke: Option<StrokeStyle>,
}

impl BoxStyle {
    /// Fill only.
    #[must_use]
    pub const fn fill(color: Color) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
        }
    }

    /// Outline only.
    #[must_use]
    pub const fn stroke(stroke: StrokeStyle) -> Self {
        Self {
            fill: None,
            stroke: Some(stroke),
        }
    }
}

/// Drawing primitive. Every paint call reduces to these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// Rectangle
    Rect {
        /// Bounds
        bounds: Rect,
        /// Style
        style: BoxStyle,
    },
    /// Circle
    Circle {
        /// Center
        center: Point,
        /// Radius
        radius: f32,
        /// Style
        style: BoxStyle,
    },
    /// Annular sector
    Arc {
        /// Center
        center: Point,
        /// Inner radius (0 for a full wedge)
        inner_radius: f32,
        /// Outer radius
        outer_radius: f32,
        /// Start angle, radians
        start_angle: f32,
        /// End angle, radians
        end_angle: f32,
        /// Fill color
        color: Color,
    },
    /// Open polyline
    Path {
        /// Vertices
        points: Vec<Point>,
        /// Stroke
        style: StrokeStyle,
    },
    /// Filled polygon
    Polygon {
        /// Vertices
        points: Vec<Point>,
        /// Fill color
        color: Color,
    },
    /// Text run
    Text {
        /// Content
        content: String,
        /// Baseline-left position
        position: Point,
        /// Style
        style: TextStyle,
    },
}

impl DrawCommand {
    /// Filled rectangle.
    #[must_use]
    pub const fn filled_rect(bounds: Rect, color: Color) -> Self {
        Self::Rect {
            bounds,
            style: BoxStyle::fill(color),
        }
    }

    /// Filled circle.
    #[must_use]
    pub const fn filled_circle(center: Point, radius: f32, color: Color) -> Self {
        Self::Circle {
            center,
            radius,
            style: BoxStyle::fill(color),
        }
    }

    /// Text content, if this is a text command.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text { content, .. } => Some(content),
            _ => None,
        }
    }
}
