//! Reading progress and mastery scoring for young readers.
//!
//! `engine` holds the pure scoring functions. `content`, `config` and
//! `store` supply their inputs, and `report` turns results into plain text
//! for the `readwise` binary.

pub mod config;
pub mod content;
pub mod engine;
pub mod report;
pub mod store;

mod serde_helpers;
