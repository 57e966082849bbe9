//! Key decoding for raw terminal input.
//!
//! One read from a raw-mode terminal yields a short byte window (at most
//! [`KEY_WINDOW`] bytes). [`decode`] classifies that window as exactly one
//! [`KeyEvent`]. Decoding is total: anything it does not recognize becomes
//! [`KeyEvent::Unknown`].

use std::fmt;

use crate::editor::Token;

/// Maximum number of bytes read for a single key press.
pub const KEY_WINDOW: usize = 6;

const BACKSPACE: u8 = 127;
const TAB: u8 = 9;
const ENTER: u8 = 10;
const ESC: u8 = 27;
const CSI: u8 = b'[';
const SS3: u8 = b'O';
const TILDE: u8 = b'~';

/// A classified key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    /// Printable input (possibly multi-byte), occupying one column
    Character(Token),
    Backspace,
    Tab,
    Enter,
    /// ESC with nothing after it
    BareEscape,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    Insert,
    Delete,
    PageUp,
    PageDown,
    /// An escape sequence this decoder does not handle
    Unknown,
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Character(token) => write!(f, "Character({token})"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Decode one key press from a byte window.
///
/// Only the bytes in `window` are inspected; a short window never causes a
/// read past its end. An empty window decodes to [`KeyEvent::Unknown`].
pub fn decode(window: &[u8]) -> KeyEvent {
    let Some(&first) = window.first() else {
        return KeyEvent::Unknown;
    };
    match first {
        BACKSPACE => KeyEvent::Backspace,
        TAB => KeyEvent::Tab,
        ENTER => KeyEvent::Enter,
        ESC => decode_escape(&window[1..]),
        _ => Token::capture(window).map_or(KeyEvent::Unknown, KeyEvent::Character),
    }
}

/// Decode whatever followed an ESC byte.
fn decode_escape(tail: &[u8]) -> KeyEvent {
    match tail.first() {
        None => KeyEvent::BareEscape,
        Some(&CSI) => decode_csi(&tail[1..]),
        Some(&SS3) => match tail.get(1) {
            Some(b'H') => KeyEvent::Home,
            Some(b'F') => KeyEvent::End,
            _ => KeyEvent::Unknown,
        },
        Some(_) => KeyEvent::Unknown,
    }
}

/// Decode the bytes after `ESC [`.
fn decode_csi(params: &[u8]) -> KeyEvent {
    match params.first() {
        Some(b'A') => KeyEvent::ArrowUp,
        Some(b'B') => KeyEvent::ArrowDown,
        Some(b'C') => KeyEvent::ArrowRight,
        Some(b'D') => KeyEvent::ArrowLeft,
        Some(&code) if params.get(1) == Some(&TILDE) => match code {
            b'2' => KeyEvent::Insert,
            b'3' => KeyEvent::Delete,
            b'5' => KeyEvent::PageUp,
            b'6' => KeyEvent::PageDown,
            _ => KeyEvent::Unknown,
        },
        _ => KeyEvent::Unknown,
    }
}
