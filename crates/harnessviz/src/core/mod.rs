//! Shared building blocks for the harness model
//!
//! Identifier types, errors, text and unit helpers, color tables and
//! logging setup.

pub mod colors;
pub(crate) mod de;
mod error;
pub mod logging;
mod text;
mod types;
pub mod units;

pub use colors::{color_hex, translate_color, ColorMode, ColorNotation};
pub use error::*;
pub use text::*;
pub use types::*;
