//! Game-record parsing

pub mod pgn;

pub use pgn::{parse_game, PgnError, PgnGame};
