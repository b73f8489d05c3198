//! Canvas implementations.

use crate::draw::{BoxStyle, DrawCommand, StrokeStyle};
use crate::widget::{Canvas, TextStyle};
use crate::{Color, Point, Rect};

/// A [`Canvas`] that records every operation as a [`DrawCommand`].
///
/// Used by tests to check what was painted and by hosts that ship the
/// command list to a real renderer (canvas 2D, GPU, terminal).
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    /// Create an empty canvas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded commands in paint order.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the recorded commands, leaving the canvas empty.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of recorded commands.
    #[must_use]
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    /// Whether nothing was painted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// All painted text runs, in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(DrawCommand::text)
    }

    /// Whether some text run equals `text` exactly.
    #[must_use]
    pub fn has_text(&self, text: &str) -> bool {
        self.texts().any(|t| t == text)
    }

    /// Whether some text run contains `needle`.
    #[must_use]
    pub fn has_text_containing(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }

    /// Number of arc (pie slice) commands.
    #[must_use]
    pub fn arc_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Arc { .. }))
            .count()
    }

    /// Filled rectangles painted with exactly `color`.
    pub fn rects_filled_with(&self, color: Color) -> impl Iterator<Item = &Rect> {
        self.commands.iter().filter_map(move |c| match c {
            DrawCommand::Rect { bounds, style } if style.fill == Some(color) => Some(bounds),
            _ => None,
        })
    }
}

impl Canvas for RecordingCanvas {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::filled_rect(rect, color));
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32) {
        self.commands.push(DrawCommand::Rect {
            bounds: rect,
            style: BoxStyle::stroke(StrokeStyle { color, width }),
        });
    }

    fn draw_text(&mut self, text: &str, position: Point, style: &TextStyle) {
        self.commands.push(DrawCommand::Text {
            content: text.to_string(),
            position,
            style: style.clone(),
        });
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Color, width: f32) {
        self.commands.push(DrawCommand::Path {
            points: vec![from, to],
            style: StrokeStyle { color, width },
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color) {
        self.commands
            .push(DrawCommand::filled_circle(center, radius, color));
    }

    fn fill_arc(
        &mut self,
        center: Point,
        inner_radius: f32,
        outer_radius: f32,
        start_angle: f32,
        end_angle: f32,
        color: Color,
    ) {
        self.commands.push(DrawCommand::Arc {
            center,
            inner_radius,
            outer_radius,
            start_angle,
            end_angle,
            color,
        });
    }

    fn draw_path(&mut self, points: &[Point], color: Color, width: f32) {
        self.commands.push(DrawCommand::Path {
            points: points.to_vec(),
            style: StrokeStyle { color, width },
        });
    }

    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_canvas_starts_empty() {
        let canvas = RecordingCanvas::new();
        assert!(canvas.is_empty());
        assert_eq!(canvas.command_count(), 0);
    }

    #[test]
    fn test_records_in_order() {
        let mut canvas = RecordingCanvas::new();
        canvas.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::WHITE);
        canvas.draw_text("hello", Point::ORIGIN, &TextStyle::default());
        canvas.fill_arc(Point::ORIGIN, 5.0, 10.0, 0.0, 1.0, Color::BLACK);

        assert_eq!(canvas.command_count(), 3);
        assert!(matches!(canvas.commands()[0], DrawCommand::Rect { .. }));
        assert!(canvas.has_text("hello"));
        assert!(canvas.has_text_containing("ell"));
        assert_eq!(canvas.arc_count(), 1);
    }

    #[test]
    fn test_rects_filled_with() {
        let mut canvas = RecordingCanvas::new();
        canvas.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE);
        canvas.fill_rect(Rect::new(1.0, 0.0, 1.0, 1.0), Color::BLACK);
        canvas.stroke_rect(Rect::new(2.0, 0.0, 1.0, 1.0), Color::WHITE, 1.0);
        assert_eq!(canvas.rects_filled_with(Color::WHITE).count(), 1);
    }

    #[test]
    fn test_take_commands_clears() {
        let mut canvas = RecordingCanvas::new();
        canvas.draw_line(Point::ORIGIN, Point::new(1.0, 1.0), Color::BLACK, 1.0);
        canvas.fill_polygon(&[Point::ORIGIN, Point::new(1.0, 0.0), Point::new(0.0, 1.0)], Color::BLACK);
        let cmds = canvas.take_commands();
        assert_eq!(cmds.len(), 2);
        assert!(canvas.is_empty());
    }
}
