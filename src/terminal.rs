//! Terminal mode control.

use std::os::fd::{AsFd, OwnedFd};

use nix::sys::termios::{self, LocalFlags, SetArg, SpecialCharacterIndices, Termios};

use crate::error::Result;

/// RAII guard for raw terminal mode.
///
/// Canonical line buffering and local echo are switched off for the
/// terminal while the guard lives. Signals, output processing and CR/NL
/// input translation are left alone, so Enter still arrives as `\n`, Ctrl-C
/// still interrupts, and `\n` on output still returns the carriage. Dropping
/// the guard restores the attributes captured by [`RawModeGuard::enable`].
#[derive(Debug)]
pub struct RawModeGuard {
    fd: OwnedFd,
    original: Termios,
}

impl RawModeGuard {
    /// Put the terminal behind `fd` into raw mode.
    ///
    /// The descriptor is duplicated, so the guard outlives any borrow of it.
    ///
    /// # Errors
    /// Returns an error if `fd` is not a terminal or its attributes cannot
    /// be changed.
    pub fn enable(fd: impl AsFd) -> Result<Self> {
        let fd = fd.as_fd().try_clone_to_owned()?;
        let original = termios::tcgetattr(&fd)?;
        termios::tcsetattr(&fd, SetArg::TCSANOW, &raw_attributes(&original))?;
        tracing::debug!("raw mode enabled");
        Ok(Self { fd, original })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(err) = termios::tcsetattr(&self.fd, SetArg::TCSANOW, &self.original) {
            tracing::warn!("failed to restore terminal mode: {err}");
        } else {
            tracing::debug!("raw mode restored");
        }
    }
}

/// Attributes for non-canonical, no-echo input with blocking single-byte reads.
fn raw_attributes(original: &Termios) -> Termios {
    let mut raw = original.clone();
    raw.local_flags.remove(LocalFlags::ICANON);
    raw.local_flags.remove(LocalFlags::ECHO);
    raw.control_chars[SpecialCharacterIndices::VMIN as usize] = 1;
    raw.control_chars[SpecialCharacterIndices::VTIME as usize] = 0;
    raw
}
