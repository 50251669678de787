//! Chess Review Core Library
//!
//! Evaluates every move of a finished game against a UCI engine's judgment
//! and buckets each move into a quality category, aggregated per side.

pub mod config;
pub mod engine;
pub mod error;
pub mod parser;
pub mod review;

pub use config::EngineConfig;
pub use error::{Error, Result};
pub use parser::{parse_game, PgnGame};
pub use review::{analyze_game, Category, GameStats, DEFAULT_DEPTH, MAX_DEPTH, MIN_DEPTH};
