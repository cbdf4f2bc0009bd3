//! Input abstraction layer.

mod mock;

pub use mock::{NoInput, ScriptedIntents};

use alloc::string::String;

use crate::session::Speed;

/// User intents dispatched from the reading screen.
#[derive(Clone, Debug, PartialEq)]
pub enum Intent {
    /// Replace the text field contents.
    EditText(String),
    /// Append words to the current text, separated by a single space.
    AppendText(String),
    SetSpeed(Speed),
    SpeedUp,
    SpeedDown,
    /// Primary button: start, resume or pause.
    ToggleReading,
    Clear,
    DismissAlert,
}

/// Polled intent provider.
pub trait IntentProvider {
    type Error: core::fmt::Debug;

    fn poll_intent(&mut self) -> Result<Option<Intent>, Self::Error>;
}
