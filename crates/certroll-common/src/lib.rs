//! Shared building blocks for the certroll crates.

pub mod encoding;
pub mod error;
pub mod persist;
