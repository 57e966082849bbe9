//! Error types for line reading.
//!
//! Editing anomalies (malformed keys, out-of-range callback positions,
//! overflowing input) are never errors. Only the terminal and the byte
//! streams can fail.

use std::io;
use thiserror::Error;

/// Line reading error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error on the byte source or sink
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Terminal attributes could not be read or changed
    #[cfg(unix)]
    #[error("Terminal error: {0}")]
    Terminal(#[from] nix::Error),

    /// The byte source reported readiness but delivered no bytes (end of file)
    #[error("Input closed before the line was finished")]
    InputClosed,
}

/// Result type for line reading
pub type Result<T> = std::result::Result<T, Error>;
