//! Widget trait and related types.
//!
//! Widgets follow a measure-layout-paint cycle:
//!
//! 1. **Measure**: compute intrinsic size given constraints
//! 2. **Layout**: position self (and children) within allocated bounds
//! 3. **Paint**: emit draw commands onto a [`Canvas`]
//!
//! Input arrives through [`Widget::event`], which may return a message
//! describing what happened (e.g. a chart element was clicked). Composite
//! widgets inspect the messages of their children and decide whether to
//! forward, translate, or swallow them.
//!
//! # Examples
//!
//! ```
//! use vantage_core::{TextStyle, FontWeight, Color};
//!
//! let heading = TextStyle {
//!     size: 18.0,
//!     weight: FontWeight::Semibold,
//!     ..TextStyle::default()
//! };
//! assert_eq!(heading.color, Color::BLACK);
//! ```

use crate::constraints::Constraints;
use crate::event::Event;
use crate::geometry::{Point, Rect, Size};
use crate::Color;
use serde::{Deserialize, Serialize};
use std::any::Any;

/// Type identifier for widget types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(std::any::TypeId);

impl TypeId {
    /// Get the type ID for a type.
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        Self(std::any::TypeId::of::<T>())
    }
}

/// Result of laying out a widget.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutResult {
    /// Size after layout
    pub size: Size,
}

/// Message returned from [`Widget::event`].
pub type Message = Box<dyn Any + Send>;

/// Core widget trait.
pub trait Widget: Send + Sync {
    /// Type identifier for this widget type.
    fn type_id(&self) -> TypeId;

    /// Compute intrinsic size within `constraints`.
    fn measure(&self, constraints: Constraints) -> Size;

    /// Accept the allocated bounds.
    fn layout(&mut self, bounds: Rect) -> LayoutResult;

    /// Emit draw commands.
    fn paint(&self, canvas: &mut dyn Canvas);

    /// Handle an input event.
    fn event(&mut self, event: &Event) -> Option<Message>;

    /// Whether the widget currently reacts to input.
    fn is_interactive(&self) -> bool {
        false
    }

    /// Whether the widget can take keyboard focus.
    fn is_focusable(&self) -> bool {
        false
    }

    /// Name exposed to assistive technology.
    fn accessible_name(&self) -> Option<&str> {
        None
    }

    /// Role exposed to assistive technology.
    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::Generic
    }

    /// Stable identifier for tests.
    fn test_id(&self) -> Option<&str> {
        None
    }

    /// Bounds from the last layout.
    fn bounds(&self) -> Rect {
        Rect::default()
    }
}

/// Backend-agnostic paint surface.
pub trait Canvas {
    /// Fill a rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Stroke a rectangle outline.
    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32);

    /// Draw text with its baseline-left at `position`.
    fn draw_text(&mut self, text: &str, position: Point, style: &TextStyle);

    /// Draw a line segment.
    fn draw_line(&mut self, from: Point, to: Point, color: Color, width: f32);

    /// Fill a circle.
    fn fill_circle(&mut self, center: Point, radius: f32, color: Color);

    /// Fill an annular sector (donut slice). Angles are in radians, canvas
    /// convention: 0 points right and angles grow clockwise.
    fn fill_arc(
        &mut self,
        center: Point,
        inner_radius: f32,
        outer_radius: f32,
        start_angle: f32,
        end_angle: f32,
        color: Color,
    );

    /// Stroke a polyline.
    fn draw_path(&mut self, points: &[Point], color: Color, width: f32);

    /// Fill a closed polygon.
    fn fill_polygon(&mut self, points: &[Point], color: Color);
}

/// Text style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font size in pixels
    pub size: f32,
    /// Text color
    pub color: Color,
    /// Font weight
    pub weight: FontWeight,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 14.0,
            color: Color::BLACK,
            weight: FontWeight::Normal,
        }
    }
}

impl TextStyle {
    /// Style of `size` and `color` with normal weight.
    #[must_use]
    pub fn sized(size: f32, color: Color) -> Self {
        Self {
            size,
            color,
            weight: FontWeight::Normal,
        }
    }

    /// Same style with a different weight.
    #[must_use]
    pub const fn weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }
}

/// Font weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontWeight {
    /// 400
    Normal,
    /// 500
    Medium,
    /// 600
    Semibold,
    /// 700
    Bold,
}

/// Accessibility roles used by the dashboard widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccessibleRole {
    /// Generic container
    #[default]
    Generic,
    /// Activatable button
    Button,
    /// Non-textual figure
    Image,
    /// Self-contained region
    Region,
    /// Progress / placeholder indicator
    ProgressBar,
}

/// Rough text width for layout, assuming an average glyph of 0.6em.
#[must_use]
pub fn estimate_text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.6
}
