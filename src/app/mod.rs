//! The read session and its callback plumbing.
//!
//! A [`Session`] owns everything one `read` needs:
//! - the byte source it waits on
//! - the [`Screen`] it redraws
//! - the [`LineBuffer`] being edited
//! - the [`Callbacks`] that may rewrite the line after any action
//!
//! [`Session::run`] loops until Enter is pressed or a callback asks to end,
//! then returns the line.

mod callbacks;
mod dispatch;
mod event_loop;
mod update;


pub use callbacks::{
    Action, CallbackResult, Callbacks, EditState, Handler, LocalParams, ParseActionError,
};

use std::io::Write;
use std::time::Duration;

use crate::editor::LineBuffer;
use crate::ui::{HighlightOptions, Screen};

/// Default ceiling on the line length.
pub const DEFAULT_MAX_LENGTH: usize = 30;

/// How long each readiness poll waits before checking again.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2);

/// Options for one read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOptions {
    /// Maximum number of tokens the line may hold
    pub max_length: usize,
    pub highlight: HighlightOptions,
    pub poll_interval: Duration,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LENGTH)
    }
}

impl ReadOptions {
    pub fn new(max_length: usize) -> Self {
        Self {
            max_length,
            highlight: HighlightOptions::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    #[must_use]
    pub fn with_highlight(mut self, highlight: HighlightOptions) -> Self {
        self.highlight = highlight;
        self
    }

    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

/// One interactive line read.
pub struct Session<S, W: Write> {
    source: S,
    screen: Screen<W>,
    buffer: LineBuffer,
    callbacks: Callbacks,
    highlight: HighlightOptions,
    poll_interval: Duration,
    terminated: bool,
    /// Set while a `begin` callback runs and its result is merged
    in_begin: bool,
}

impl<S, W: Write> Session<S, W> {
    /// A fresh session: empty line, cursor 0, insert mode, not terminated.
    pub fn new(source: S, sink: W, options: ReadOptions, callbacks: Callbacks) -> Self {
        Self {
            source,
            screen: Screen::new(sink),
            buffer: LineBuffer::new(options.max_length),
            callbacks,
            highlight: options.highlight,
            poll_interval: options.poll_interval,
            terminated: false,
            in_begin: false,
        }
    }

    pub const fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }

    pub const fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Everything written to the sink so far.
    pub const fn sink(&self) -> &W {
        self.screen.get_ref()
    }

    pub const fn source(&self) -> &S {
        &self.source
    }

    pub fn into_sink(self) -> W {
        self.screen.into_inner()
    }
}

impl<S, W: Write> std::fmt::Debug for Session<S, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("buffer", &self.buffer)
            .field("callbacks", &self.callbacks)
            .field("highlight", &self.highlight)
            .field("terminated", &self.terminated)
            .finish_non_exhaustive()
    }
}
