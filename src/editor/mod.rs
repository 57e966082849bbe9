//! The edited line.
//!
//! Provides a token-vector line buffer with cursor management and
//! insert/overwrite semantics. Rendering lives in [`crate::ui`].

mod buffer;

pub use buffer::{Edit, LineBuffer, MAX_TOKEN_BYTES, Token};
