//! Engine configuration resolved once at startup

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Where to find the evaluation engine and how long to wait for it.
///
/// Constructed once at process start and passed by reference to each
/// analysis; never mutated afterwards.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Path to the Stockfish binary.
    pub stockfish_path: PathBuf,
    /// Per-reply timeout for a single engine query. An exceeded timeout is
    /// treated the same as any other per-ply engine failure.
    pub reply_timeout: Duration,
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let stockfish_path = env::var("STOCKFISH_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_stockfish_path());

        let reply_timeout = env::var("ENGINE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(60));

        Self {
            stockfish_path,
            reply_timeout,
        }
    }
}

/// Default binary location, relative to the working directory.
fn default_stockfish_path() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from("stockfish/stockfish.exe")
    } else {
        PathBuf::from("stockfish/stockfish")
    }
}
