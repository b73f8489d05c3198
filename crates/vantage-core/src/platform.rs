//! Platform capability ports.
//!
//! Widgets never reach for host globals. Anything environment-specific (the
//! system clipboard, document-level pointer listeners) is passed in through
//! one of these traits. In-memory implementations are provided for tests and
//! headless hosts.

use crate::geometry::Point;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Clipboard port failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    /// Host denied clipboard access.
    #[error("clipboard access denied")]
    PermissionDenied,
    /// Clipboard is not available on this host.
    #[error("clipboard unavailable")]
    Unavailable,
    /// Any other host failure.
    #[error("clipboard error: {0}")]
    Other(String),
}

/// Text clipboard.
pub trait Clipboard: Send + Sync {
    /// Replace the clipboard contents with `text`.
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;

    /// Current clipboard text, if any.
    fn read_text(&self) -> Result<Option<String>, ClipboardError>;
}

/// In-memory clipboard. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Arc<RwLock<Option<String>>>,
}

impl MemoryClipboard {
    /// Create an empty clipboard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the contents.
    pub fn clear(&self) {
        if let Ok(mut contents) = self.contents.write() {
            *contents = None;
        }
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut contents = self
            .contents
            .write()
            .map_err(|e| ClipboardError::Other(e.to_string()))?;
        *contents = Some(text.to_string());
        Ok(())
    }

    fn read_text(&self) -> Result<Option<String>, ClipboardError> {
        self.contents
            .read()
            .map(|c| c.clone())
            .map_err(|e| ClipboardError::Other(e.to_string()))
    }
}

/// Clipboard that always fails; handy for exercising error paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeniedClipboard;

impl Clipboard for DeniedClipboard {
    fn write_text(&self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::PermissionDenied)
    }

    fn read_text(&self) -> Result<Option<String>, ClipboardError> {
        Err(ClipboardError::PermissionDenied)
    }
}

/// Receives pointer movement observed by a widget.
pub trait PointerTracker: Send + Sync {
    /// Pointer moved to `position` (widget coordinates).
    fn pointer_moved(&self, position: Point);

    /// Pointer left the widget.
    fn pointer_left(&self);

    /// Last known position, `None` when outside.
    fn position(&self) -> Option<Point>;
}

/// Shared last-position tracker. Clones observe the same pointer.
#[derive(Debug, Clone, Default)]
pub struct SharedPointer {
    position: Arc<RwLock<Option<Point>>>,
}

impl SharedPointer {
    /// Create a tracker with no known position.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn set(&self, value: Option<Point>) {
        if let Ok(mut position) = self.position.write() {
            *position = value;
        }
    }
}

impl PointerTracker for SharedPointer {
    fn pointer_moved(&self, position: Point) {
        self.set(Some(position));
    }

    fn pointer_left(&self) {
        self.set(None);
    }

    fn position(&self) -> Option<Point> {
        self.position.read().ok().and_then(|p| *p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ===== Clipboard Tests =====

    #[test]
    fn test_memory_clipboard_roundtrip() {
        let clipboard = MemoryClipboard::new();
        assert_eq!(clipboard.read_text().unwrap(), None);
        clipboard.write_text("a,b\n1,2").unwrap();
        assert_eq!(clipboard.read_text().unwrap().as_deref(), Some("a,b\n1,2"));
    }

    #[test]
    fn test_memory_clipboard_clones_share_contents() {
        let a = MemoryClipboard::new();
        let b = a.clone();
        a.write_text("shared").unwrap();
        assert_eq!(b.read_text().unwrap().as_deref(), Some("shared"));
        b.clear();
        assert_eq!(a.read_text().unwrap(), None);
    }

    #[test]
    fn test_denied_clipboard_errors() {
        assert_eq!(
            DeniedClipboard.write_text("x"),
            Err(ClipboardError::PermissionDenied)
        );
        assert_eq!(
            ClipboardError::PermissionDenied.to_string(),
            "clipboard access denied"
        );
    }

    // ===== Pointer Tests =====

    #[test]
    fn test_shared_pointer_tracks_position() {
        let tracker = SharedPointer::new();
        let observer = tracker.clone();
        assert_eq!(observer.position(), None);

        tracker.pointer_moved(Point::new(4.0, 5.0));
        assert_eq!(observer.position(), Some(Point::new(4.0, 5.0)));

        tracker.pointer_left();
        assert_eq!(observer.position(), None);
    }
}
