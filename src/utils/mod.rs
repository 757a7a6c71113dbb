//! # Utilities Module
//!
//! Graph analysis shared by generation and the game engine.

pub mod paths;

pub use paths::*;
