//! Services
//!
//! - [`engine`] - the loyalty engine and its operations
//! - [`directory`] - customer identity collaborator

pub mod directory;
pub mod engine;

pub use directory::{CustomerDirectory, OpenDirectory, StaticDirectory};
pub use engine::LoyaltyEngine;
