//! Utilities shared by the collaboration server crates.

pub mod logger;
pub mod time;
