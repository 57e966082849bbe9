use std::io::Write;

use super::{Action, LocalParams, Session};
use crate::editor::{Edit, Token};
use crate::error::Result;
use crate::input::KeyEvent;
use crate::ui::HighlightKind;

impl<S, W: Write> Session<S, W> {
    /// Apply one decoded key to the session.
    pub(super) fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        match key {
            KeyEvent::Character(token) => self.key_character(token),
            KeyEvent::Backspace => self.key_backspace(),
            KeyEvent::Delete => self.key_delete(),
            KeyEvent::Tab => self.fire(Action::Tab, LocalParams::default()),
            KeyEvent::Enter => self.key_enter(),
            KeyEvent::BareEscape => {
                self.fire(Action::Escape, LocalParams::default())?;
                self.highlight(HighlightKind::Escape)
            }
            KeyEvent::Insert => self.key_insert(),
            KeyEvent::ArrowLeft => self.key_left(),
            KeyEvent::ArrowRight => self.key_right(),
            KeyEvent::ArrowUp => self.fire(Action::Up, LocalParams::default()),
            KeyEvent::ArrowDown => self.fire(Action::Down, LocalParams::default()),
            KeyEvent::PageUp => self.fire(Action::PageUp, LocalParams::default()),
            KeyEvent::PageDown => self.fire(Action::PageDown, LocalParams::default()),
            KeyEvent::Home => self.key_home(),
            KeyEvent::End => self.key_end(),
            KeyEvent::Unknown => Ok(()),
        }
    }

    fn key_character(&mut self, token: Token) -> Result<()> {
        let pos = self.buffer.cursor();
        match self.buffer.insert_at(pos, token) {
            Edit::Rejected => {
                tracing::trace!(max_length = self.buffer.max_length(), "line full, key dropped");
                return Ok(());
            }
            Edit::Appended | Edit::Overwrote => self.screen.put(token.as_bytes())?,
            Edit::Spliced => {
                let tail = self.buffer.render(pos + 1);
                self.screen.splice(token.as_bytes(), &tail)?;
            }
        }
        self.fire(Action::Character, LocalParams::with_character(token.to_string()))
    }

    fn key_backspace(&mut self) -> Result<()> {
        let old_pos = self.buffer.cursor();
        if old_pos > 0 && self.buffer.remove_at(old_pos - 1).is_some() {
            let tail = self.buffer.render(old_pos - 1);
            self.screen.erase_before(&tail)?;
        }
        self.fire(Action::Backspace, LocalParams::with_old_pos(old_pos))?;
        if self.buffer.is_empty() {
            self.highlight(HighlightKind::Empty)?;
        }
        Ok(())
    }

    fn key_delete(&mut self) -> Result<()> {
        let old_pos = self.buffer.cursor();
        let deleted = self.buffer.remove_at(old_pos);
        if deleted.is_some() {
            let tail = self.buffer.render(old_pos);
            self.screen.erase_at(&tail)?;
        }
        let params = LocalParams {
            old_pos: Some(old_pos),
            deleted_char: deleted.map(|token| token.to_string()),
            character: None,
        };
        self.fire(Action::Delete, params)?;
        if self.buffer.is_empty() {
            self.highlight(HighlightKind::Empty)?;
        }
        Ok(())
    }

    fn key_enter(&mut self) -> Result<()> {
        self.terminated = true;
        self.screen.newline()?;
        Ok(())
    }

    fn key_insert(&mut self) -> Result<()> {
        let insert_mode = self.buffer.toggle_insert_mode();
        tracing::debug!(insert_mode, "insert mode toggled");
        self.fire(Action::Insert, LocalParams::default())?;
        self.highlight(HighlightKind::Insert)
    }

    fn key_left(&mut self) -> Result<()> {
        let old_pos = self.buffer.cursor();
        if old_pos > 0 {
            self.move_cursor_to(old_pos - 1)?;
        }
        self.fire(Action::Left, LocalParams::with_old_pos(old_pos))
    }

    fn key_right(&mut self) -> Result<()> {
        let old_pos = self.buffer.cursor();
        if old_pos < self.buffer.len() {
            self.move_cursor_to(old_pos + 1)?;
        }
        self.fire(Action::Right, LocalParams::with_old_pos(old_pos))
    }

    fn key_home(&mut self) -> Result<()> {
        let old_pos = self.buffer.cursor();
        self.go_to_beginning()?;
        self.fire(Action::Start, LocalParams::with_old_pos(old_pos))
    }

    fn key_end(&mut self) -> Result<()> {
        let old_pos = self.buffer.cursor();
        self.move_cursor_to(self.buffer.len())?;
        self.fire(Action::End, LocalParams::with_old_pos(old_pos))
    }
}
