use std::io::Write;

use crate::error::{Error, Result};
use crate::input::{ByteSource, KEY_WINDOW, decode};

use super::Session;

impl<S: ByteSource, W: Write> Session<S, W> {
    /// Run the read loop until the session terminates and return the line.
    ///
    /// Each iteration polls the source for at most the configured interval;
    /// when input is ready, one window of up to [`KEY_WINDOW`] bytes is read
    /// and handled as a single key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InputClosed`] if the source hits end of input, or an
    /// I/O error from the source or the sink.
    pub fn run(&mut self) -> Result<String> {
        let _run_scope = crate::perf::scope("session.run");
        let mut window = [0u8; KEY_WINDOW];

        while !self.terminated {
            if !self.source.poll_readable(self.poll_interval)? {
                continue;
            }
            let n = self.source.read_window(&mut window)?;
            if n == 0 {
                tracing::debug!("input closed mid-line");
                return Err(Error::InputClosed);
            }
            self.feed(&window[..n])?;
        }

        let line = self.buffer.text();
        tracing::debug!(len = self.buffer.len(), "session finished");
        Ok(line)
    }
}

impl<S, W: Write> Session<S, W> {
    /// Decode one byte window as a key, apply it, and flush the screen.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the sink fails.
    pub fn feed(&mut self, window: &[u8]) -> Result<()> {
        let key = decode(window);
        tracing::debug!(%key, pos = self.buffer.cursor(), "key decoded");
        crate::perf::log_event(
            "key.decoded",
            format!(
                "key={key} pos={} len={}",
                self.buffer.cursor(),
                self.buffer.len()
            ),
        );
        self.handle_key(key)?;
        self.screen.flush()?;
        Ok(())
    }
}
