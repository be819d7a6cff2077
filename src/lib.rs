//! NPC outfit resolution and server asset generation for a TibiaWiki mirror.

pub mod assets;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod outfit;
pub mod wiki;

pub use error::{Error, Result};
