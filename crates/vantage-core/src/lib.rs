//! Core types and traits for Vantage dashboard widgets.
//!
//! This crate provides the foundation the widgets are built on:
//! - Geometric primitives: [`Point`], [`Size`], [`Rect`]
//! - Color representation: [`Color`] with hex parsing
//! - Layout constraints: [`Constraints`]
//! - Input: [`Event`], [`Key`], [`MouseButton`]
//! - The [`Widget`] and [`Canvas`] traits, plus [`RecordingCanvas`]
//! - Reducer-style state: [`State`], [`Command`]
//! - Injected platform ports: [`Clipboard`], [`PointerTracker`]

mod canvas;
mod color;
mod constraints;
pub mod draw;
mod event;
mod geometry;
mod platform;
mod state;
pub mod widget;

pub use canvas::RecordingCanvas;
pub use color::{Color, ColorParseError};
pub use constraints::Constraints;
pub use draw::{BoxStyle, DrawCommand, StrokeStyle};
pub use event::{Event, Key, MouseButton};
pub use geometry::{Point, Rect, Size};
pub use platform::{
    Clipboard, ClipboardError, DeniedClipboard, MemoryClipboard, PointerTracker, SharedPointer,
};
pub use state::{Command, State};
pub use widget::{
    estimate_text_width, AccessibleRole, Canvas, FontWeight, LayoutResult, Message, TextStyle,
    TypeId, Widget,
};
