//! Test harness for Vantage widgets.

use std::any::Any;
use std::collections::VecDeque;
use tracing::trace;
use vantage_core::{
    Constraints, Event, Key, Message, MouseButton, Point, RecordingCanvas, Rect, Size, Widget,
};

/// Drives one widget: layout, simulated input, captured messages.
pub struct Harness<W: Widget> {
    /// Widget under test
    root: W,
    /// Event queue for simulation
    event_queue: VecDeque<Event>,
    /// Messages returned by the widget, oldest first
    messages: Vec<Message>,
    /// Current viewport size
    viewport: Rect,
}

impl<W: Widget> Harness<W> {
    /// Create a harness and lay `root` out in a 1280x720 viewport.
    pub fn new(root: W) -> Self {
        let mut harness = Self {
            root,
            event_queue: VecDeque::new(),
            messages: Vec::new(),
            viewport: Rect::new(0.0, 0.0, 1280.0, 720.0),
        };
        harness.relayout();
        harness
    }

    /// Set the viewport size and lay the widget out again.
    #[must_use]
    pub fn viewport(mut self, width: f32, height: f32) -> Self {
        self.viewport = Rect::new(0.0, 0.0, width, height);
        self.relayout();
        self
    }

    /// Measure the widget against the viewport width and give it that size.
    pub fn relayout(&mut self) -> &mut Self {
        let constraints = Constraints::loose(Size::new(self.viewport.width, f32::INFINITY));
        let size = self.root.measure(constraints);
        self.root.layout(Rect::new(
            self.viewport.x,
            self.viewport.y,
            size.width,
            size.height,
        ));
        self
    }

    /// The widget under test.
    pub const fn widget(&self) -> &W {
        &self.root
    }

    /// Mutable access to the widget under test. Call [`Harness::relayout`]
    /// after changes that affect its size.
    pub fn widget_mut(&mut self) -> &mut W {
        &mut self.root
    }

    // === Event Simulation ===

    /// Simulate a left click at `position`.
    pub fn click_at(&mut self, position: Point) -> &mut Self {
        self.event_queue.push_back(Event::MouseMove { position });
        self.event_queue.push_back(Event::MouseDown {
            position,
            button: MouseButton::Left,
        });
        self.event_queue.push_back(Event::MouseUp {
            position,
            button: MouseButton::Left,
        });
        self.process_events();
        self
    }

    /// Simulate a left click at the center of `rect`.
    pub fn click_rect(&mut self, rect: Rect) -> &mut Self {
        self.click_at(rect.center())
    }

    /// Press at `from` and release at `to`.
    pub fn drag(&mut self, from: Point, to: Point) -> &mut Self {
        self.event_queue.push_back(Event::press(from));
        self.event_queue
            .push_back(Event::MouseMove { position: to });
        self.event_queue.push_back(Event::release(to));
        self.process_events();
        self
    }

    /// Move the pointer to `position`.
    pub fn hover(&mut self, position: Point) -> &mut Self {
        self.event_queue.push_back(Event::MouseMove { position });
        self.process_events();
        self
    }

    /// Move the pointer off the widget.
    pub fn leave(&mut self) -> &mut Self {
        self.event_queue.push_back(Event::MouseLeave);
        self.process_events();
        self
    }

    /// Simulate a key press.
    pub fn press_key(&mut self, key: Key) -> &mut Self {
        self.event_queue.push_back(Event::KeyDown { key });
        self.event_queue.push_back(Event::KeyUp { key });
        self.process_events();
        self
    }

    /// Deliver an arbitrary event.
    pub fn send(&mut self, event: Event) -> &mut Self {
        self.event_queue.push_back(event);
        self.process_events();
        self
    }

    // === Messages ===

    /// Every message captured so far.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Most recent message of type `T`.
    pub fn message<T: Any>(&self) -> Option<&T> {
        self.messages.iter().rev().find_map(|m| m.downcast_ref::<T>())
    }

    /// All messages of type `T`, oldest first.
    pub fn messages_of<T: Any>(&self) -> Vec<&T> {
        self.messages
            .iter()
            .filter_map(|m| m.downcast_ref::<T>())
            .collect()
    }

    /// Forget captured messages.
    pub fn clear_messages(&mut self) -> &mut Self {
        self.messages.clear();
        self
    }

    // === Painting ===

    /// Paint the widget into a fresh recording canvas.
    pub fn paint(&self) -> RecordingCanvas {
        let mut canvas = RecordingCanvas::new();
        self.root.paint(&mut canvas);
        canvas
    }

    // === Assertions ===

    /// Assert that a message of type `T` was captured.
    ///
    /// # Panics
    ///
    /// Panics if no such message exists.
    pub fn assert_message<T: Any>(&self) -> &T {
        match self.message::<T>() {
            Some(m) => m,
            None => panic!(
                "Expected a {} message, captured {} message(s) of other types",
                std::any::type_name::<T>(),
                self.messages.len()
            ),
        }
    }

    /// Assert that no message was captured.
    ///
    /// # Panics
    ///
    /// Panics if any message exists.
    pub fn assert_no_messages(&self) -> &Self {
        assert!(
            self.messages.is_empty(),
            "Expected no messages but captured {}",
            self.messages.len()
        );
        self
    }

    /// Assert that painting produces `text` verbatim.
    ///
    /// # Panics
    ///
    /// Panics if the text is not painted.
    pub fn assert_painted(&self, text: &str) -> &Self {
        let canvas = self.paint();
        assert!(
            canvas.has_text(text),
            "Expected '{text}' to be painted, got {:?}",
            canvas.texts().collect::<Vec<_>>()
        );
        self
    }

    /// Assert that painting does not produce `text`.
    ///
    /// # Panics
    ///
    /// Panics if the text is painted.
    pub fn assert_not_painted(&self, text: &str) -> &Self {
        assert!(
            !self.paint().has_text(text),
            "Expected '{text}' not to be painted"
        );
        self
    }

    // === Internal ===

    fn process_events(&mut self) {
        while let Some(event) = self.event_queue.pop_front() {
            trace!(?event, "harness event");
            if let Some(message) = self.root.event(&event) {
                self.messages.push(message);
            }
        }
    }
}
