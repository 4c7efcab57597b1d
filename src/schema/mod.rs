//! Schema module - Configuration, pattern catalog and search result types.

mod config;
mod evolution;
pub mod pattern;

pub use config::*;
pub use evolution::*;
pub use pattern::{Offset, PatternError, PatternName};
