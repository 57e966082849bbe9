use std::io::Write;

use super::{Action, CallbackResult, EditState, LocalParams, Session};
use crate::error::Result;
use crate::ui::HighlightKind;

impl<S, W: Write> Session<S, W> {
    /// Hand `action` to its callback, if one is registered, and merge the
    /// result back into the session.
    pub(super) fn fire(&mut self, action: Action, params: LocalParams) -> Result<()> {
        let state = EditState {
            pos: self.buffer.cursor(),
            insert_mode: self.buffer.insert_mode(),
        };
        let line = self.buffer.text();
        let Some(result) = self.callbacks.invoke(action, &line, state, &params) else {
            return Ok(());
        };
        tracing::debug!(%action, ?params, ?result, "callback returned");
        crate::perf::log_event(
            "callback.merge",
            format!("action={action} params={params:?} result={result:?}"),
        );
        self.merge(result)
    }

    /// Apply a callback result.
    ///
    /// A `string` first sends the cursor home through [`Self::go_to_beginning`]
    /// (firing `begin` with the prior cursor), then replaces and redraws.
    ///
    /// `end` is always copied into the termination flag: a result without
    /// it clears a termination requested earlier in the same key press.
    pub(super) fn merge(&mut self, result: CallbackResult) -> Result<()> {
        if let Some(string) = result.string {
            self.go_to_beginning()?;
            let from = self.buffer.cursor();
            self.buffer.replace(&string);
            self.screen.redraw_line(from, &self.buffer.render(0))?;
        }
        if let Some(pos) = result.pos {
            self.move_cursor_to(pos)?;
        }
        self.terminated = result.end.unwrap_or(false);
        if let Some(insert_mode) = result.insert_mode {
            self.buffer.set_insert_mode(insert_mode);
        }
        Ok(())
    }

    /// Flash the configured message for `kind`, if that overlay is enabled.
    pub(super) fn highlight(&mut self, kind: HighlightKind) -> Result<()> {
        let Some(message) = self.highlight.message_for(kind) else {
            return Ok(());
        };
        crate::perf::log_event(
            "highlight.show",
            format!("kind={kind} pos={}", self.buffer.cursor()),
        );
        let line = self.buffer.render(0);
        self.screen.flash(
            self.buffer.cursor(),
            &line,
            self.buffer.len(),
            &message,
            self.highlight.highlight_time,
        )?;
        Ok(())
    }

    /// Move the cursor, emitting the column delta. Out-of-range positions
    /// are ignored.
    pub(super) fn move_cursor_to(&mut self, pos: usize) -> Result<()> {
        let from = self.buffer.cursor();
        if self.buffer.set_cursor(pos) {
            self.screen.move_cursor(from, pos)?;
        } else {
            tracing::trace!(pos, len = self.buffer.len(), "cursor target out of range");
        }
        Ok(())
    }

    /// Send the cursor to column 0 and fire [`Action::Begin`].
    ///
    /// While a `begin` result is being merged, a nested call only moves the
    /// cursor, so a `begin` handler returning a `string` does not recurse.
    pub(super) fn go_to_beginning(&mut self) -> Result<()> {
        let old_pos = self.buffer.cursor();
        self.move_cursor_to(0)?;
        if self.in_begin {
            return Ok(());
        }
        self.in_begin = true;
        let fired = self.fire(Action::Begin, LocalParams::with_old_pos(old_pos));
        self.in_begin = false;
        fired
    }
}
