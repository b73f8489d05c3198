//! Testing utilities for Vantage widgets.
//!
//! [`Harness`] lays a widget out, feeds it simulated pointer and keyboard
//! input, and keeps every message the widget returned. [`CallLog`] records
//! host callback invocations.
//!
//! ```
//! use vantage_test::CallLog;
//!
//! let log = CallLog::new();
//! let record = log.recorder();
//! record("Feb".to_string());
//! assert_eq!(log.entries(), vec!["Feb".to_string()]);
//! ```

#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_panics_doc)]

mod calls;
mod harness;

pub use calls::CallLog;
pub use harness::Harness;
