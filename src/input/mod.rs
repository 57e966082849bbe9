//! Keyboard input: where bytes come from and what they mean.

mod decoder;
mod source;

pub use decoder::{KEY_WINDOW, KeyEvent, decode};
#[cfg(unix)]
pub use source::StdinSource;
pub use source::{ByteSource, ScriptedSource};
