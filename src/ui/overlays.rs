use std::fmt;
use std::io::{self, Write};
use std::time::Duration;

use crossterm::cursor::{RestorePosition, SavePosition};
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};

use super::Screen;

/// Placeholder in [`HighlightOptions::highlight_style`] replaced by the message.
pub const STYLE_SLOT: &str = "%s";

/// Events that may flash a message over the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightKind {
    /// The line became (or stayed) empty after a deletion
    Empty,
    /// Bare Escape was pressed
    Escape,
    /// Insert/overwrite mode was toggled
    Insert,
}

impl HighlightKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Escape => "escape",
            Self::Insert => "insert",
        }
    }
}

impl fmt::Display for HighlightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings for the transient message overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightOptions {
    /// Master switch for every overlay
    pub message_highlight: bool,
    pub escape_highlight: bool,
    pub insert_highlight: bool,
    pub empty_highlight: bool,
    /// Template with one [`STYLE_SLOT`] for the message
    pub highlight_style: Option<String>,
    /// How long the message stays up
    pub highlight_time: Duration,
    pub escape_message: Option<String>,
    pub insert_message: Option<String>,
    pub empty_message: Option<String>,
}

impl Default for HighlightOptions {
    fn default() -> Self {
        Self {
            message_highlight: true,
            escape_highlight: true,
            insert_highlight: true,
            empty_highlight: true,
            highlight_style: Some(" [ \x1b[1m%s\x1b[0m ] ".to_string()),
            highlight_time: Duration::from_micros(1_000_000),
            escape_message: Some("ESCAPE".to_string()),
            insert_message: Some("INSERT".to_string()),
            empty_message: Some("EMPTY".to_string()),
        }
    }
}

impl HighlightOptions {
    /// Options with every overlay switched off.
    pub fn disabled() -> Self {
        Self {
            message_highlight: false,
            ..Self::default()
        }
    }

    /// The formatted message to flash for `kind`, if that overlay is on.
    ///
    /// Requires the master switch, the per-kind switch, a style and a
    /// non-empty message.
    pub fn message_for(&self, kind: HighlightKind) -> Option<String> {
        if !self.message_highlight {
            return None;
        }
        let (enabled, message) = match kind {
            HighlightKind::Empty => (self.empty_highlight, &self.empty_message),
            HighlightKind::Escape => (self.escape_highlight, &self.escape_message),
            HighlightKind::Insert => (self.insert_highlight, &self.insert_message),
        };
        if !enabled {
            return None;
        }
        let style = self.highlight_style.as_deref().filter(|s| !s.is_empty())?;
        let message = message.as_deref().filter(|m| !m.is_empty())?;
        Some(style.replacen(STYLE_SLOT, message, 1))
    }
}

impl<W: Write> Screen<W> {
    /// Show `message` in place of the line for `pause`, then put the line
    /// and the cursor back exactly as they were.
    ///
    /// Blocks the calling thread for the whole pause.
    ///
    /// # Errors
    /// Returns an error if writing to the sink fails.
    pub fn flash(
        &mut self,
        cursor: usize,
        line: &[u8],
        line_len: usize,
        message: &str,
        pause: Duration,
    ) -> io::Result<()> {
        self.move_cursor(cursor, 0)?;
        queue!(self.out_mut(), SavePosition, Clear(ClearType::UntilNewLine))?;
        self.put(message.as_bytes())?;
        self.flush()?;

        std::thread::sleep(pause);

        queue!(self.out_mut(), RestorePosition, Clear(ClearType::UntilNewLine))?;
        self.put(line)?;
        self.move_cursor(line_len, cursor)?;
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_format_every_kind() {
        let opts = HighlightOptions::default();
        assert_eq!(
            opts.message_for(HighlightKind::Empty).as_deref(),
            Some(" [ \x1b[1mEMPTY\x1b[0m ] ")
        );
        assert!(opts.message_for(HighlightKind::Escape).unwrap().contains("ESCAPE"));
        assert!(opts.message_for(HighlightKind::Insert).unwrap().contains("INSERT"));
    }

    #[test]
    fn test_master_switch_disables_all() {
        let opts = HighlightOptions::disabled();
        assert!(opts.message_for(HighlightKind::Empty).is_none());
        assert!(opts.message_for(HighlightKind::Escape).is_none());
    }

    #[test]
    fn test_per_kind_switch() {
        let opts = HighlightOptions {
            escape_highlight: false,
            ..HighlightOptions::default()
        };
        assert!(opts.message_for(HighlightKind::Escape).is_none());
        assert!(opts.message_for(HighlightKind::Insert).is_some());
    }

    #[test]
    fn test_missing_style_or_message_suppresses() {
        let no_style = HighlightOptions {
            highlight_style: None,
            ..HighlightOptions::default()
        };
        assert!(no_style.message_for(HighlightKind::Empty).is_none());

        let no_message = HighlightOptions {
            empty_message: Some(String::new()),
            ..HighlightOptions::default()
        };
        assert!(no_message.message_for(HighlightKind::Empty).is_none());
    }

    #[test]
    fn test_flash_restores_line_and_cursor() {
        let mut screen = Screen::new(Vec::new());
        screen
            .flash(2, b"hello", 5, "[MSG]", Duration::ZERO)
            .unwrap();
        let out = String::from_utf8(screen.into_inner()).unwrap();
        assert_eq!(
            out,
            "\x1b[2D\x1b7\x1b[K[MSG]\x1b8\x1b[Khello\x1b[3D"
        );
    }

    #[test]
    fn test_flash_with_cursor_at_end_adds_no_movement() {
        let mut screen = Screen::new(Vec::new());
        screen.flash(3, b"abc", 3, "!", Duration::ZERO).unwrap();
        let out = String::from_utf8(screen.into_inner()).unwrap();
        assert_eq!(out, "\x1b[3D\x1b7\x1b[K!\x1b8\x1b[Kabc");
    }

    #[test]
    fn test_flash_on_empty_line() {
        let mut screen = Screen::new(Vec::new());
        screen.flash(0, b"", 0, "EMPTY", Duration::ZERO).unwrap();
        let out = String::from_utf8(screen.into_inner()).unwrap();
        assert_eq!(out, "\x1b7\x1b[KEMPTY\x1b8\x1b[K");
    }
}
