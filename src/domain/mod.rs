//! Core types: Zettel, the pattern set, and link resolution.

pub mod patterns;
pub mod zettel;

pub use patterns::{PatternConfig, PatternError, Patterns};
pub use zettel::{find_zettel, Zettel, ZettelError};
