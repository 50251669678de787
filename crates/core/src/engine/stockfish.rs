//! Stockfish chess engine interface
//!
//! Spawns Stockfish as a subprocess and communicates via the UCI protocol.
//! One instance is bound to one subprocess for the lifetime of one game
//! analysis; the process is terminated on every exit path.

use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use super::analysis::{Evaluation, Evaluator, Score};

/// Error type for engine operations
#[derive(Error, Debug)]
pub enum EngineError {
    /// Failed to start the engine process
    #[error("failed to start engine: {0}")]
    Spawn(String),
    /// Failed to communicate with the engine
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The engine produced no reply within the configured window
    #[error("engine did not reply within {0:?}")]
    Timeout(Duration),
    /// The engine process closed its output stream
    #[error("engine closed its output stream")]
    Disconnected,
}

/// Wrapper around a Stockfish subprocess
pub struct StockfishEngine {
    /// The child process
    process: Child,
    /// Stdin for sending commands
    stdin: ChildStdin,
    /// Lines read from the engine by a dedicated reader thread, so every
    /// reply can be awaited with a timeout
    lines: Receiver<String>,
    /// Per-reply timeout
    reply_timeout: Duration,
}

impl StockfishEngine {
    /// Spawns a new Stockfish process and completes the UCI handshake.
    ///
    /// # Arguments
    /// * `path` - Path to the stockfish binary
    /// * `reply_timeout` - How long to wait for any single reply line
    pub fn new(path: &Path, reply_timeout: Duration) -> Result<Self, EngineError> {
        let mut process = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null()) // Ignore stderr
            .spawn()
            .map_err(|e| EngineError::Spawn(e.to_string()))?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| EngineError::Spawn("failed to open stdin".into()))?;

        let stdout = process
            .stdout
            .take()
            .ok_or_else(|| EngineError::Spawn("failed to open stdout".into()))?;

        // Reader thread: forwards engine output line by line until EOF.
        // Exits on its own once the process dies and the pipe closes.
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut reader = BufReader::new(stdout);
            let mut line = String::new();
            loop {
                line.clear();
                match reader.read_line(&mut line) {
                    Ok(0) | Err(_) => break,
                    Ok(_) => {
                        if tx.send(line.trim().to_string()).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        let mut engine = StockfishEngine {
            process,
            stdin,
            lines: rx,
            reply_timeout,
        };

        // If the handshake fails, Drop kills the process
        engine.init_uci()?;

        Ok(engine)
    }

    /// Sends a command to the engine
    fn send(&mut self, cmd: &str) -> Result<(), EngineError> {
        debug!(cmd, "engine <");
        writeln!(self.stdin, "{}", cmd)?;
        self.stdin.flush()?;
        Ok(())
    }

    /// Reads the next line from the engine, enforcing the reply timeout
    fn read_line(&mut self) -> Result<String, EngineError> {
        match self.lines.recv_timeout(self.reply_timeout) {
            Ok(line) => {
                debug!(line = %line, "engine >");
                Ok(line)
            }
            Err(RecvTimeoutError::Timeout) => Err(EngineError::Timeout(self.reply_timeout)),
            Err(RecvTimeoutError::Disconnected) => Err(EngineError::Disconnected),
        }
    }

    /// Reads lines until one starts with the expected token
    fn read_until(&mut self, expected: &str) -> Result<(), EngineError> {
        loop {
            if self.read_line()?.starts_with(expected) {
                return Ok(());
            }
        }
    }

    /// Initialize UCI protocol
    fn init_uci(&mut self) -> Result<(), EngineError> {
        self.send("uci")?;
        self.read_until("uciok")?;

        self.send("isready")?;
        self.read_until("readyok")?;

        Ok(())
    }

    /// Sets up the position reached by playing `moves` (UCI notation) from
    /// the standard starting position
    pub fn set_position(&mut self, moves: &[String]) -> Result<(), EngineError> {
        let cmd = if moves.is_empty() {
            "position startpos".to_string()
        } else {
            format!("position startpos moves {}", moves.join(" "))
        };
        self.send(&cmd)
    }

    /// Searches the current position to the given depth.
    ///
    /// The caller is responsible for clamping `depth` to a supported range.
    pub fn go_depth(&mut self, depth: u8) -> Result<Evaluation, EngineError> {
        self.send(&format!("go depth {}", depth))?;

        let mut eval = Evaluation::default();

        // Read until we get bestmove
        loop {
            let line = self.read_line()?;

            if line.starts_with("bestmove") {
                // Parse: "bestmove e2e4 ponder e7e5"
                let mut parts = line.split_whitespace();
                parts.next();
                match parts.next() {
                    Some("(none)") | None => {}
                    Some(m) => eval.best_move = Some(m.to_string()),
                }
                break;
            } else if line.starts_with("info") {
                parse_info_line(&line, &mut eval);
            }
        }

        // A malformed bestmove still leaves the PV head as the recommendation
        if eval.best_move.is_none() {
            eval.best_move = eval.pv.first().cloned();
        }

        Ok(eval)
    }

    /// Quit the engine cleanly, then make sure the process is gone
    pub fn quit(&mut self) {
        let _ = self.send("quit");
        // Give it a moment to exit
        thread::sleep(Duration::from_millis(100));
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}

impl Evaluator for StockfishEngine {
    fn evaluate(&mut self, moves: &[String], depth: u8) -> Result<Evaluation, EngineError> {
        self.set_position(moves)?;
        self.go_depth(depth)
    }
}

impl Drop for StockfishEngine {
    fn drop(&mut self) {
        self.quit();
    }
}

/// Parses one "info ..." line into the evaluation being built
fn parse_info_line(line: &str, eval: &mut Evaluation) {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let mut i = 0;

    while i < parts.len() {
        match parts[i] {
            "depth" => {
                if i + 1 < parts.len() {
                    eval.depth = parts[i + 1].parse().unwrap_or(0);
                }
                i += 2;
            }
            "score" => {
                if i + 2 < parts.len() {
                    match parts[i + 1] {
                        "cp" => {
                            if let Ok(cp) = parts[i + 2].parse::<i32>() {
                                eval.score = Some(Score::Centipawns(cp));
                            }
                        }
                        "mate" => {
                            if let Ok(m) = parts[i + 2].parse::<i32>() {
                                eval.score = Some(Score::Mate(m));
                            }
                        }
                        _ => {}
                    }
                }
                i += 3;
            }
            "pv" => {
                // Everything after "pv" is the principal variation
                eval.pv = parts[i + 1..].iter().map(|s| s.to_string()).collect();
                break;
            }
            _ => {
                i += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_info_cp_line() {
        let mut eval = Evaluation::default();
        parse_info_line(
            "info depth 15 seldepth 21 score cp 35 nodes 100000 pv e2e4 e7e5 g1f3",
            &mut eval,
        );
        assert_eq!(eval.depth, 15);
        assert_eq!(eval.score, Some(Score::Centipawns(35)));
        assert_eq!(eval.pv, vec!["e2e4", "e7e5", "g1f3"]);
    }

    #[test]
    fn test_parse_info_mate_line() {
        let mut eval = Evaluation::default();
        parse_info_line("info depth 20 score mate -3 pv h7h8q", &mut eval);
        assert_eq!(eval.score, Some(Score::Mate(-3)));
        assert_eq!(eval.pv, vec!["h7h8q"]);
    }

    #[test]
    fn test_parse_info_line_without_score() {
        let mut eval = Evaluation::default();
        parse_info_line("info depth 5 currmove e2e4 currmovenumber 1", &mut eval);
        assert_eq!(eval.score, None);
        assert!(eval.pv.is_empty());
    }

    #[test]
    fn test_spawn_missing_binary_fails() {
        let result = StockfishEngine::new(
            Path::new("/nonexistent/stockfish"),
            Duration::from_secs(1),
        );
        assert!(matches!(result, Err(EngineError::Spawn(_))));
    }

    #[test]
    #[ignore] // Ignore by default - requires stockfish installed
    fn test_stockfish_init() {
        let engine = StockfishEngine::new(Path::new("stockfish"), Duration::from_secs(10));
        assert!(engine.is_ok());
    }

    #[test]
    #[ignore]
    fn test_evaluate_starting_position() {
        let mut engine =
            StockfishEngine::new(Path::new("stockfish"), Duration::from_secs(10)).unwrap();
        let eval = engine.evaluate(&[], 10).unwrap();

        assert!(eval.best_move.is_some());
        assert!(eval.score.is_some());
    }
}
