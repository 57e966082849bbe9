//! Terminal output for the edited line.
//!
//! This module handles:
//! - Incremental redraws after each edit ([`Screen`])
//! - Transient highlight messages over the line ([`HighlightOptions`])

mod overlays;
mod screen;

pub use overlays::{HighlightKind, HighlightOptions, STYLE_SLOT};
pub use screen::Screen;
