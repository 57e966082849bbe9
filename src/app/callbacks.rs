use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Editing actions external code can intercept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Cursor was sent to column 0
    Begin,
    /// Home key
    Start,
    /// End key
    End,
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    /// Insert/overwrite toggle
    Insert,
    Delete,
    Backspace,
    Tab,
    Escape,
    /// A character was accepted into the line
    Character,
}

impl Action {
    pub const ALL: [Self; 15] = [
        Self::Begin,
        Self::Start,
        Self::End,
        Self::Up,
        Self::Down,
        Self::Left,
        Self::Right,
        Self::PageUp,
        Self::PageDown,
        Self::Insert,
        Self::Delete,
        Self::Backspace,
        Self::Tab,
        Self::Escape,
        Self::Character,
    ];

    /// The action's callback-table name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Begin => "begin",
            Self::Start => "start",
            Self::End => "end",
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
            Self::PageUp => "pgup",
            Self::PageDown => "pgdown",
            Self::Insert => "insert",
            Self::Delete => "delete",
            Self::Backspace => "backspace",
            Self::Tab => "tab",
            Self::Escape => "escape",
            Self::Character => "character",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown action: {0}")]
pub struct ParseActionError(String);

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.name() == s)
            .ok_or_else(|| ParseActionError(s.to_string()))
    }
}

/// Snapshot of the editor handed to a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditState {
    pub pos: usize,
    pub insert_mode: bool,
}

/// Action-specific details handed to a callback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalParams {
    /// Cursor position before the action
    pub old_pos: Option<usize>,
    /// Token removed by Delete, if any
    pub deleted_char: Option<String>,
    /// Token accepted by a character key
    pub character: Option<String>,
}

impl LocalParams {
    pub fn with_old_pos(old_pos: usize) -> Self {
        Self {
            old_pos: Some(old_pos),
            ..Self::default()
        }
    }

    pub fn with_character(character: impl Into<String>) -> Self {
        Self {
            character: Some(character.into()),
            ..Self::default()
        }
    }
}

/// What a callback wants changed. Every field is optional.
///
/// Merge order: `string` replaces the line (cursor to its end), then `pos`
/// moves the cursor if it fits the new line, then `end` is copied into the
/// termination flag (absent means `false`), then `insert_mode` overrides the
/// mode if present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackResult {
    pub string: Option<String>,
    pub pos: Option<usize>,
    pub insert_mode: Option<bool>,
    pub end: Option<bool>,
}

impl CallbackResult {
    /// A result that changes nothing (except clearing the termination flag).
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_string(mut self, string: impl Into<String>) -> Self {
        self.string = Some(string.into());
        self
    }

    #[must_use]
    pub const fn with_pos(mut self, pos: usize) -> Self {
        self.pos = Some(pos);
        self
    }

    #[must_use]
    pub const fn with_insert_mode(mut self, insert_mode: bool) -> Self {
        self.insert_mode = Some(insert_mode);
        self
    }

    #[must_use]
    pub const fn with_end(mut self, end: bool) -> Self {
        self.end = Some(end);
        self
    }
}

/// A callback: `(current line, state, local params) -> result`.
pub type Handler = Box<dyn FnMut(&str, EditState, &LocalParams) -> CallbackResult>;

/// Lookup table from [`Action`] to an optional handler.
#[derive(Default)]
pub struct Callbacks {
    handlers: HashMap<Action, Handler>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `action`, replacing any previous one.
    #[must_use]
    pub fn on<F>(mut self, action: Action, handler: F) -> Self
    where
        F: FnMut(&str, EditState, &LocalParams) -> CallbackResult + 'static,
    {
        self.set(action, handler);
        self
    }

    pub fn set<F>(&mut self, action: Action, handler: F)
    where
        F: FnMut(&str, EditState, &LocalParams) -> CallbackResult + 'static,
    {
        self.handlers.insert(action, Box::new(handler));
    }

    pub fn remove(&mut self, action: Action) -> bool {
        self.handlers.remove(&action).is_some()
    }

    pub fn contains(&self, action: Action) -> bool {
        self.handlers.contains_key(&action)
    }

    /// Run the handler for `action`; `None` if there is none.
    pub fn invoke(
        &mut self,
        action: Action,
        line: &str,
        state: EditState,
        params: &LocalParams,
    ) -> Option<CallbackResult> {
        let handler = self.handlers.get_mut(&action)?;
        Some(handler(line, state, params))
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut actions: Vec<&str> = self.handlers.keys().map(|a| a.name()).collect();
        actions.sort_unstable();
        f.debug_struct("Callbacks").field("actions", &actions).finish()
    }
}
