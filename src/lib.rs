// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. input::InputSource)
    clippy::module_name_repetitions
)]

//! # rawline
//!
//! An interactive single-line editor for raw-mode terminals.
//!
//! rawline reads keystrokes straight from the terminal and provides:
//! - Insert and overwrite editing with incremental redraws
//! - Cursor movement (arrows, Home, End) and Backspace/Delete
//! - Transient highlight messages for Escape, Insert and empty-line events
//! - Callbacks that can rewrite the line, move the cursor, flip the mode or
//!   end the read after any action
//!
//! ## Architecture
//!
//! - **Decode**: a raw byte window becomes one [`KeyEvent`]
//! - **Edit**: the key mutates the [`LineBuffer`] and redraws the
//!   [`Screen`](ui::Screen)
//! - **Intercept**: the matching [`Action`] callback runs and its
//!   [`CallbackResult`] is merged back
//!
//! ## Modules
//!
//! - [`app`]: The read session, callbacks and merge rules
//! - [`editor`]: The token buffer
//! - [`input`]: Key decoding and byte sources
//! - [`ui`]: Line rendering and highlight overlays
//! - [`terminal`]: Raw mode guard
//! - [`config`]: Option files and flags for the demo binary
//!
//! ## Example
//!
//! ```no_run
//! use rawline::{Action, CallbackResult, Callbacks, HighlightOptions};
//!
//! let callbacks = Callbacks::new().on(Action::Down, |line, _, _| {
//!     CallbackResult::none().with_string(line.to_uppercase())
//! });
//! let line = rawline::read(20, callbacks, HighlightOptions::default())?;
//! println!("got {line}");
//! # Ok::<(), rawline::Error>(())
//! ```

pub mod app;
pub mod config;
pub mod editor;
pub mod error;
pub mod input;
pub mod perf;
#[cfg(unix)]
pub mod terminal;
pub mod ui;

pub use app::{Action, CallbackResult, Callbacks, EditState, LocalParams, ReadOptions, Session};
pub use editor::{LineBuffer, Token};
pub use error::{Error, Result};
pub use input::KeyEvent;
pub use ui::HighlightOptions;

/// Read one line from the terminal.
///
/// Switches standard input to raw mode for the duration of the call (it is
/// restored on every exit path), echoes edits to standard output, and
/// returns the line once Enter is pressed or a callback sets `end`.
///
/// # Errors
/// Returns an error if standard input is not a terminal, or on I/O failure.
#[cfg(unix)]
pub fn read(
    max_length: usize,
    callbacks: Callbacks,
    highlight: HighlightOptions,
) -> Result<String> {
    read_with(
        ReadOptions::new(max_length).with_highlight(highlight),
        callbacks,
    )
}

/// [`read`] with full [`ReadOptions`].
///
/// # Errors
/// Returns an error if standard input is not a terminal, or on I/O failure.
#[cfg(unix)]
pub fn read_with(options: ReadOptions, callbacks: Callbacks) -> Result<String> {
    let _raw_mode = terminal::RawModeGuard::enable(std::io::stdin())?;
    let source = input::StdinSource::new()?;
    let mut session = Session::new(source, std::io::stdout(), options, callbacks);
    session.run()
}

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{
        Action, CallbackResult, Callbacks, EditState, LocalParams, ReadOptions, Session,
    };
    pub use crate::input::{ByteSource, KeyEvent, ScriptedSource};
    pub use crate::ui::{HighlightKind, HighlightOptions};
}
