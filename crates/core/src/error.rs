//! Error types for chess-review-core

use thiserror::Error;

use crate::engine::EngineError;
use crate::parser::PgnError;

#[derive(Error, Debug)]
pub enum Error {
    /// The game record is empty, malformed, or has no decodable moves.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The engine executable is missing or failed to launch.
    #[error("engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<PgnError> for Error {
    fn from(error: PgnError) -> Self {
        Error::InvalidInput(error.to_string())
    }
}

impl Error {
    /// Wraps a launch-time engine failure. Per-ply engine failures are
    /// recovered locally and never reach this type.
    pub fn engine_unavailable(error: EngineError) -> Self {
        Error::EngineUnavailable(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
