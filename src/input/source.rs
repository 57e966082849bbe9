//! Byte sources feeding the read loop.

use std::collections::VecDeque;
use std::io::{self, Read};
use std::time::Duration;

use crate::error::Result;

/// Something keys can be read from.
///
/// The read loop waits with [`ByteSource::poll_readable`] and then pulls one
/// key's worth of bytes with [`ByteSource::read_window`].
pub trait ByteSource {
    /// Wait up to `timeout` for input.
    ///
    /// Returns `true` if a subsequent [`ByteSource::read_window`] will not
    /// block.
    ///
    /// # Errors
    /// Returns an error if readiness cannot be determined.
    fn poll_readable(&mut self, timeout: Duration) -> Result<bool>;

    /// Read up to `buf.len()` bytes in a single read.
    ///
    /// Returns the number of bytes read; `0` means end of input.
    ///
    /// # Errors
    /// Returns an error if the underlying read fails.
    fn read_window(&mut self, buf: &mut [u8]) -> Result<usize>;
}

/// Standard input of the current process, or any other terminal descriptor.
///
/// Holds an unbuffered duplicate of the descriptor so one read is one
/// syscall and readiness polling never misses bytes parked in a buffer.
#[cfg(unix)]
#[derive(Debug)]
pub struct StdinSource {
    file: std::fs::File,
}

#[cfg(unix)]
impl StdinSource {
    /// # Errors
    /// Returns an error if the standard input descriptor cannot be duplicated.
    pub fn new() -> Result<Self> {
        Self::from_fd(io::stdin())
    }

    /// Read from a duplicate of `fd` instead of standard input.
    ///
    /// # Errors
    /// Returns an error if the descriptor cannot be duplicated.
    pub fn from_fd(fd: impl std::os::fd::AsFd) -> Result<Self> {
        let fd = fd.as_fd().try_clone_to_owned()?;
        Ok(Self {
            file: std::fs::File::from(fd),
        })
    }
}

#[cfg(unix)]
impl ByteSource for StdinSource {
    fn poll_readable(&mut self, timeout: Duration) -> Result<bool> {
        use nix::poll::{PollFd, PollFlags, poll};

        let mut fds = [PollFd::new(&self.file, PollFlags::POLLIN)];
        let timeout_ms = i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX);
        match poll(&mut fds, timeout_ms) {
            Ok(n) if n > 0 => Ok(fds[0]
                .revents()
                .is_some_and(|r| r.intersects(PollFlags::POLLIN | PollFlags::POLLHUP))),
            Ok(_) | Err(nix::errno::Errno::EINTR) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn read_window(&mut self, buf: &mut [u8]) -> Result<usize> {
        loop {
            match self.file.read(buf) {
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// A prerecorded sequence of reads.
///
/// Each chunk is delivered by exactly one [`ByteSource::read_window`] call,
/// the way a terminal delivers one key press per read. Once the chunks are
/// used up the source reports end of input.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    chunks: VecDeque<Vec<u8>>,
    idle_polls: usize,
}

impl ScriptedSource {
    pub fn new<I, C>(chunks: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: AsRef<[u8]>,
    {
        Self {
            chunks: chunks.into_iter().map(|c| c.as_ref().to_vec()).collect(),
            idle_polls: 0,
        }
    }

    /// Append one more chunk.
    #[must_use]
    pub fn then(mut self, chunk: impl AsRef<[u8]>) -> Self {
        self.chunks.push_back(chunk.as_ref().to_vec());
        self
    }

    /// Report "not ready" this many times before the first chunk.
    #[must_use]
    pub const fn with_idle_polls(mut self, idle_polls: usize) -> Self {
        self.idle_polls = idle_polls;
        self
    }

    /// Chunks not yet read.
    pub fn remaining(&self) -> usize {
        self.chunks.len()
    }
}

impl ByteSource for ScriptedSource {
    fn poll_readable(&mut self, _timeout: Duration) -> Result<bool> {
        if self.idle_polls > 0 {
            self.idle_polls -= 1;
            return Ok(false);
        }
        Ok(true)
    }

    fn read_window(&mut self, buf: &mut [u8]) -> Result<usize> {
        let Some(chunk) = self.chunks.pop_front() else {
            return Ok(0);
        };
        let n = chunk.len().min(buf.len());
        buf[..n].copy_from_slice(&chunk[..n]);
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_source_delivers_one_chunk_per_read() {
        let mut source = ScriptedSource::new(["ab", "\x1b[A"]);
        let mut buf = [0u8; 6];
        assert!(source.poll_readable(Duration::ZERO).unwrap());
        assert_eq!(source.read_window(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], b"ab");
        assert_eq!(source.read_window(&mut buf).unwrap(), 3);
        assert_eq!(&buf[..3], b"\x1b[A");
        assert_eq!(source.read_window(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_scripted_source_truncates_to_buffer() {
        let mut source = ScriptedSource::new(["abcdefgh"]);
        let mut buf = [0u8; 6];
        assert_eq!(source.read_window(&mut buf).unwrap(), 6);
        assert_eq!(&buf, b"abcdef");
    }

    #[test]
    fn test_idle_polls_report_not_ready() {
        let mut source = ScriptedSource::new(["a"]).with_idle_polls(2);
        assert!(!source.poll_readable(Duration::ZERO).unwrap());
        assert!(!source.poll_readable(Duration::ZERO).unwrap());
        assert!(source.poll_readable(Duration::ZERO).unwrap());
        assert_eq!(source.remaining(), 1);
    }

    #[cfg(unix)]
    mod pty {
        use std::io::Write;

        use nix::pty::openpty;

        use super::*;
        use crate::input::KEY_WINDOW;
        use crate::terminal::RawModeGuard;

        /// Poll and read until `want` bytes arrived or a poll times out.
        fn read_key(source: &mut StdinSource, want: usize) -> Vec<u8> {
            let mut got = Vec::new();
            let mut window = [0u8; KEY_WINDOW];
            while got.len() < want && source.poll_readable(Duration::from_secs(1)).unwrap() {
                let n = source.read_window(&mut window).unwrap();
                got.extend_from_slice(&window[..n]);
            }
            got
        }

        #[test]
        fn test_poll_without_input_is_not_ready() {
            let pty = openpty(None, None).unwrap();
            let _raw_mode = RawModeGuard::enable(&pty.slave).unwrap();
            let mut source = StdinSource::from_fd(&pty.slave).unwrap();
            assert!(!source.poll_readable(Duration::from_millis(10)).unwrap());
        }

        #[test]
        fn test_reads_key_bytes_written_to_terminal() {
            let pty = openpty(None, None).unwrap();
            let _raw_mode = RawModeGuard::enable(&pty.slave).unwrap();
            let mut source = StdinSource::from_fd(&pty.slave).unwrap();
            let mut master = std::fs::File::from(pty.master);

            master.write_all(b"\x1b[A").unwrap();
            assert_eq!(read_key(&mut source, 3), b"\x1b[A");

            // Raw mode: a lone byte is delivered without waiting for Enter
            master.write_all(b"x").unwrap();
            assert_eq!(read_key(&mut source, 1), b"x");
        }
    }
}
