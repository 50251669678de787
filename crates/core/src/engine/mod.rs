//! Chess engine integration
//!
//! Provides the evaluation client for UCI-compatible engines like Stockfish.

pub mod analysis;
pub mod stockfish;

pub use analysis::{Evaluation, Evaluator, Score, MATE_SCORE};
pub use stockfish::{EngineError, StockfishEngine};
