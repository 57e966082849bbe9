use std::fmt;

/// Maximum number of raw bytes captured into one token.
pub const MAX_TOKEN_BYTES: usize = 4;

/// One column's worth of input: 1 to 4 raw bytes.
///
/// Tokens are opaque. Their bytes are written to the terminal unchanged and
/// every token is assumed to occupy exactly one column.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    bytes: [u8; MAX_TOKEN_BYTES],
    len: u8,
}

impl Token {
    /// Capture the leading bytes of `window` (at most [`MAX_TOKEN_BYTES`]).
    ///
    /// Returns `None` for an empty window.
    pub fn capture(window: &[u8]) -> Option<Self> {
        if window.is_empty() {
            return None;
        }
        let n = window.len().min(MAX_TOKEN_BYTES);
        let mut bytes = [0u8; MAX_TOKEN_BYTES];
        bytes[..n].copy_from_slice(&window[..n]);
        #[allow(clippy::cast_possible_truncation)]
        let len = n as u8;
        Some(Self { bytes, len })
    }

    /// The token holding a single `char`.
    pub fn from_char(ch: char) -> Self {
        let mut bytes = [0u8; MAX_TOKEN_BYTES];
        #[allow(clippy::cast_possible_truncation)]
        let len = ch.encode_utf8(&mut bytes).len() as u8;
        Self { bytes, len }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..usize::from(self.len)]
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.as_bytes()))
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({:?})", String::from_utf8_lossy(self.as_bytes()))
    }
}

/// What [`LineBuffer::insert_at`] did, so the caller can redraw just enough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    /// The buffer was full; nothing changed.
    Rejected,
    /// The token was added at the end of the line.
    Appended,
    /// The token replaced the one under the cursor (overwrite mode).
    Overwrote,
    /// The token was spliced in; everything after it shifted right.
    Spliced,
}

/// A single editable line.
///
/// Holds the tokens, the cursor (`0..=len`), the insert/overwrite mode and
/// the length ceiling. All mutations keep `cursor <= len <= max_length`.
#[derive(Debug, Clone)]
pub struct LineBuffer {
    tokens: Vec<Token>,
    cursor: usize,
    insert_mode: bool,
    max_length: usize,
}

impl LineBuffer {
    /// An empty buffer in insert mode.
    pub fn new(max_length: usize) -> Self {
        Self {
            tokens: Vec::with_capacity(max_length.min(256)),
            cursor: 0,
            insert_mode: true,
            max_length,
        }
    }

    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.tokens.len() >= self.max_length
    }

    pub const fn max_length(&self) -> usize {
        self.max_length
    }

    pub const fn insert_mode(&self) -> bool {
        self.insert_mode
    }

    pub const fn set_insert_mode(&mut self, insert_mode: bool) {
        self.insert_mode = insert_mode;
    }

    /// Flip between insert and overwrite; returns the new mode.
    pub const fn toggle_insert_mode(&mut self) -> bool {
        self.insert_mode = !self.insert_mode;
        self.insert_mode
    }

    pub fn token_at(&self, pos: usize) -> Option<Token> {
        self.tokens.get(pos).copied()
    }

    /// Put `token` at `pos` and leave the cursor just after it.
    ///
    /// At the end of the line, or in overwrite mode, the token is written in
    /// place (replacing whatever was at `pos`). Otherwise it is spliced in.
    /// A full buffer rejects the token, even in overwrite mode. `pos` past
    /// the end is clamped to the end.
    pub fn insert_at(&mut self, pos: usize, token: Token) -> Edit {
        if self.is_full() {
            return Edit::Rejected;
        }
        let pos = pos.min(self.tokens.len());
        let edit = if pos == self.tokens.len() {
            self.tokens.push(token);
            Edit::Appended
        } else if self.insert_mode {
            self.tokens.insert(pos, token);
            Edit::Spliced
        } else {
            self.tokens[pos] = token;
            Edit::Overwrote
        };
        self.cursor = pos + 1;
        edit
    }

    /// Remove the token at `pos`.
    ///
    /// Returns `None` (and changes nothing) when `pos` is past the last
    /// token. A cursor after the removed token moves left with the text.
    pub fn remove_at(&mut self, pos: usize) -> Option<Token> {
        if pos >= self.tokens.len() {
            return None;
        }
        let removed = self.tokens.remove(pos);
        if self.cursor > pos {
            self.cursor -= 1;
        }
        Some(removed)
    }

    /// Move the cursor; positions past the end are ignored.
    ///
    /// Returns `true` if `pos` was in range.
    pub fn set_cursor(&mut self, pos: usize) -> bool {
        if pos > self.tokens.len() {
            return false;
        }
        self.cursor = pos;
        true
    }

    /// Replace the whole line with the characters of `text`.
    ///
    /// Each `char` becomes one token. Text beyond `max_length` characters is
    /// dropped. The cursor lands at the new end.
    pub fn replace(&mut self, text: &str) {
        self.tokens.clear();
        self.tokens
            .extend(text.chars().take(self.max_length).map(Token::from_char));
        self.cursor = self.tokens.len();
    }

    /// Raw bytes of the tokens from `from` to the end.
    pub fn render(&self, from: usize) -> Vec<u8> {
        self.tokens
            .get(from..)
            .unwrap_or_default()
            .iter()
            .flat_map(Token::as_bytes)
            .copied()
            .collect()
    }

    /// The whole line as a string (invalid byte sequences become U+FFFD).
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.render(0)).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(s: &str) -> Token {
        Token::capture(s.as_bytes()).unwrap()
    }

    fn buffer_with(text: &str, max_length: usize) -> LineBuffer {
        let mut buf = LineBuffer::new(max_length);
        for ch in text.chars() {
            buf.insert_at(buf.cursor(), Token::from_char(ch));
        }
        buf
    }

    // --- Tokens ---

    #[test]
    fn test_token_capture_keeps_at_most_four_bytes() {
        assert_eq!(tok("abcdef").as_bytes(), b"abcd");
        assert_eq!(tok("x").as_bytes(), b"x");
        assert!(Token::capture(&[]).is_none());
    }

    #[test]
    fn test_token_from_multibyte_char() {
        let token = Token::from_char('€');
        assert_eq!(token.as_bytes(), "€".as_bytes());
        assert_eq!(token.to_string(), "€");
    }

    // --- Insertion ---

    #[test]
    fn test_append_advances_cursor() {
        let buf = buffer_with("hello", 10);
        assert_eq!(buf.text(), "hello");
        assert_eq!(buf.cursor(), 5);
        assert_eq!(buf.len(), 5);
    }

    #[test]
    fn test_insert_mode_splices() {
        let mut buf = buffer_with("hllo", 10);
        buf.set_cursor(1);
        assert_eq!(buf.insert_at(1, tok("e")), Edit::Spliced);
        assert_eq!(buf.text(), "hello");
        assert_eq!(buf.cursor(), 2);
    }

    #[test]
    fn test_overwrite_mode_replaces_in_place() {
        let mut buf = buffer_with("hxllo", 10);
        buf.set_insert_mode(false);
        assert_eq!(buf.insert_at(1, tok("e")), Edit::Overwrote);
        assert_eq!(buf.text(), "hello");
        assert_eq!(buf.len(), 5);
        assert_eq!(buf.cursor(), 2);
    }

    #[test]
    fn test_overwrite_mode_at_end_appends() {
        let mut buf = buffer_with("hell", 10);
        buf.set_insert_mode(false);
        assert_eq!(buf.insert_at(4, tok("o")), Edit::Appended);
        assert_eq!(buf.text(), "hello");
    }

    #[test]
    fn test_full_buffer_rejects_even_in_overwrite_mode() {
        let mut buf = buffer_with("abc", 3);
        assert_eq!(buf.insert_at(3, tok("d")), Edit::Rejected);
        buf.set_insert_mode(false);
        assert_eq!(buf.insert_at(0, tok("z")), Edit::Rejected);
        assert_eq!(buf.text(), "abc");
        assert_eq!(buf.cursor(), 3);
    }

    // --- Removal ---

    #[test]
    fn test_remove_before_cursor_moves_cursor() {
        let mut buf = buffer_with("hello", 10);
        assert_eq!(buf.remove_at(4), Some(tok("o")));
        assert_eq!(buf.text(), "hell");
        assert_eq!(buf.cursor(), 4);
    }

    #[test]
    fn test_remove_at_cursor_keeps_cursor() {
        let mut buf = buffer_with("hello", 10);
        buf.set_cursor(1);
        assert_eq!(buf.remove_at(1), Some(tok("e")));
        assert_eq!(buf.text(), "hllo");
        assert_eq!(buf.cursor(), 1);
    }

    #[test]
    fn test_remove_past_end_is_noop() {
        let mut buf = buffer_with("hi", 10);
        assert_eq!(buf.remove_at(2), None);
        assert_eq!(buf.text(), "hi");
        assert_eq!(buf.cursor(), 2);
    }

    // --- Cursor ---

    #[test]
    fn test_set_cursor_out_of_range_is_ignored() {
        let mut buf = buffer_with("hi", 10);
        assert!(!buf.set_cursor(3));
        assert_eq!(buf.cursor(), 2);
        assert!(buf.set_cursor(0));
        assert_eq!(buf.cursor(), 0);
    }

    #[test]
    fn test_toggle_insert_mode() {
        let mut buf = LineBuffer::new(5);
        assert!(buf.insert_mode());
        assert!(!buf.toggle_insert_mode());
        assert!(buf.toggle_insert_mode());
    }

    // --- Replacement and rendering ---

    #[test]
    fn test_replace_moves_cursor_to_end() {
        let mut buf = buffer_with("hello", 10);
        buf.set_cursor(1);
        buf.replace("ABC");
        assert_eq!(buf.text(), "ABC");
        assert_eq!(buf.cursor(), 3);
    }

    #[test]
    fn test_replace_truncates_to_max_length() {
        let mut buf = LineBuffer::new(4);
        buf.replace("Crash Test Dummy");
        assert_eq!(buf.text(), "Cras");
        assert_eq!(buf.cursor(), 4);
    }

    #[test]
    fn test_replace_tokenizes_per_char() {
        let mut buf = LineBuffer::new(10);
        buf.replace("añb");
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.token_at(1), Some(Token::from_char('ñ')));
    }

    #[test]
    fn test_render_from_offset() {
        let buf = buffer_with("hello", 10);
        assert_eq!(buf.render(2), b"llo");
        assert_eq!(buf.render(5), b"");
        assert_eq!(buf.render(9), b"");
    }

    #[test]
    fn test_text_with_invalid_bytes_is_lossy() {
        let mut buf = LineBuffer::new(10);
        buf.insert_at(0, Token::capture(&[0xff]).unwrap());
        assert_eq!(buf.text(), "\u{fffd}");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Insert(usize, char),
            Remove(usize),
            Cursor(usize),
            Toggle,
            Replace(String),
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                (0..40usize, any::<char>()).prop_map(|(p, c)| Op::Insert(p, c)),
                (0..40usize).prop_map(Op::Remove),
                (0..40usize).prop_map(Op::Cursor),
                Just(Op::Toggle),
                "[a-z]{0,30}".prop_map(Op::Replace),
            ]
        }

        proptest! {
            #[test]
            fn cursor_and_length_stay_in_bounds(
                max_length in 1..20usize,
                ops in proptest::collection::vec(op(), 0..100),
            ) {
                let mut buf = LineBuffer::new(max_length);
                for op in ops {
                    match op {
                        Op::Insert(p, c) => { buf.insert_at(p, Token::from_char(c)); }
                        Op::Remove(p) => { buf.remove_at(p); }
                        Op::Cursor(p) => { buf.set_cursor(p); }
                        Op::Toggle => { buf.toggle_insert_mode(); }
                        Op::Replace(s) => buf.replace(&s),
                    }
                    prop_assert!(buf.cursor() <= buf.len());
                    prop_assert!(buf.len() <= max_length);
                }
            }

            #[test]
            fn typing_n_chars_gives_length_n(
                max_length in 1..30usize,
                text in "[a-zA-Z0-9 ]{0,40}",
            ) {
                let mut buf = LineBuffer::new(max_length);
                for ch in text.chars() {
                    buf.insert_at(buf.cursor(), Token::from_char(ch));
                }
                let expected = text.chars().count().min(max_length);
                prop_assert_eq!(buf.len(), expected);
                prop_assert_eq!(buf.cursor(), expected);
            }
        }
    }
}
