//! Reducer-style state management.
//!
//! Widget state follows the Elm Architecture:
//! `State + Message -> (State, Command)`. Transitions are pure and
//! synchronous; side effects are described by the returned [`Command`] and
//! carried out by whoever owns the state.
//!
//! # Examples
//!
//! ```
//! use vantage_core::{Command, State};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Default, Serialize, Deserialize)]
//! struct Toggle {
//!     on: bool,
//! }
//!
//! enum ToggleMessage {
//!     Flip,
//! }
//!
//! impl State for Toggle {
//!     type Message = ToggleMessage;
//!     type Output = bool;
//!
//!     fn update(&mut self, msg: Self::Message) -> Command<Self::Output> {
//!         match msg {
//!             ToggleMessage::Flip => self.on = !self.on,
//!         }
//!         Command::Emit(self.on)
//!     }
//! }
//!
//! let mut t = Toggle::default();
//! assert!(matches!(t.update(ToggleMessage::Flip), Command::Emit(true)));
//! ```

use serde::{Deserialize, Serialize};

/// Reducer state.
pub trait State: Clone + Serialize + for<'de> Deserialize<'de> + Send + Sync {
    /// Input messages
    type Message: Send;
    /// Values announced to the owner as side effects
    type Output: Send;

    /// Apply `msg` and describe the resulting side effects.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Output>;
}

/// Side effects requested by a state transition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Command<E> {
    /// Nothing to do
    #[default]
    None,
    /// Several effects, in order
    Batch(Vec<Command<E>>),
    /// Navigate to a route
    Navigate {
        /// Route path or URL
        route: String,
    },
    /// Announce a value to the owner
    Emit(E),
}

impl<E> Command<E> {
    /// Create a batch of commands.
    pub fn batch(commands: impl IntoIterator<Item = Self>) -> Self {
        Self::Batch(commands.into_iter().collect())
    }

    /// Check if this is the none command.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Map emitted values.
    pub fn map<F, G>(self, f: G) -> Command<F>
    where
        G: Fn(E) -> F + Copy,
    {
        match self {
            Self::None => Command::None,
            Self::Batch(cmds) => Command::Batch(cmds.into_iter().map(|c| c.map(f)).collect()),
            Self::Navigate { route } => Command::Navigate { route },
            Self::Emit(e) => Command::Emit(f(e)),
        }
    }

    /// Flatten into the emitted values, in order.
    #[must_use]
    pub fn into_emitted(self) -> Vec<E> {
        let mut out = Vec::new();
        self.collect_emitted(&mut out);
        out
    }

    fn collect_emitted(self, out: &mut Vec<E>) {
        match self {
            Self::Emit(e) => out.push(e),
            Self::Batch(cmds) => {
                for cmd in cmds {
                    cmd.collect_emitted(out);
                }
            }
            Self::None | Self::Navigate { .. } => {}
        }
    }
}
