//! Shared value types for the portal scene viewer.

mod color;
mod viewport;

pub use color::{Color, ColorParseError};
pub use viewport::Viewport;
