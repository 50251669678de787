//! Move-quality review pipeline
//!
//! Loss computation, classification, per-side aggregation, and the
//! orchestrator that drives one game through the engine.

pub mod classify;
pub mod game;
pub mod loss;
pub mod stats;

pub use classify::{classify, Category};
pub use game::{analyze_game, replay_and_classify, DEFAULT_DEPTH, MAX_DEPTH, MIN_DEPTH};
pub use loss::{accuracy_from_acl, centipawn_loss};
pub use stats::{GameStats, SideStats};
