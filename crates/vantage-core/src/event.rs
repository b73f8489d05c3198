//! Input events delivered to widgets.

use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// Input event types.
///
/// Hosts translate their native input (DOM events, winit, a terminal) into
/// these before handing them to [`Widget::event`](crate::Widget::event).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Pointer moved
    MouseMove {
        /// New position
        position: Point,
    },
    /// Button pressed
    MouseDown {
        /// Press position
        position: Point,
        /// Button pressed
        button: MouseButton,
    },
    /// Button released
    MouseUp {
        /// Release position
        position: Point,
        /// Button released
        button: MouseButton,
    },
    /// Pointer entered the widget
    MouseEnter,
    /// Pointer left the widget
    MouseLeave,
    /// Key pressed
    KeyDown {
        /// Key pressed
        key: Key,
    },
    /// Key released
    KeyUp {
        /// Key released
        key: Key,
    },
    /// Widget gained keyboard focus
    FocusIn,
    /// Widget lost keyboard focus
    FocusOut,
}

impl Event {
    /// Pointer position carried by the event, if any.
    #[must_use]
    pub const fn position(&self) -> Option<Point> {
        match self {
            Self::MouseMove { position }
            | Self::MouseDown { position, .. }
            | Self::MouseUp { position, .. } => Some(*position),
            _ => None,
        }
    }

    /// Left-button press at `position`.
    #[must_use]
    pub const fn press(position: Point) -> Self {
        Self::MouseDown {
            position,
            button: MouseButton::Left,
        }
    }

    /// Left-button release at `position`.
    #[must_use]
    pub const fn release(position: Point) -> Self {
        Self::MouseUp {
            position,
            button: MouseButton::Left,
        }
    }
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    /// Primary button
    Left,
    /// Secondary button
    Right,
    /// Wheel button
    Middle,
}

/// Keys the dashboard widgets react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Enter / Return
    Enter,
    /// Space bar
    Space,
    /// Tab
    Tab,
    /// Escape
    Escape,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
}

impl Key {
    /// Whether this key activates a focused control.
    #[must_use]
    pub const fn is_activation(self) -> bool {
        matches!(self, Self::Enter | Self::Space)
    }
}
