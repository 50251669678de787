//! Types for representing engine evaluation output

use std::fmt;

use super::EngineError;

/// Sentinel magnitude substituted for forced mates so mate distances stay
/// orderable against centipawn scores. Must exceed any realistic centipawn
/// evaluation.
pub const MATE_SCORE: i32 = 100_000;

/// A raw engine score, relative to the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    /// Centipawn score (positive = side to move is better)
    Centipawns(i32),
    /// Forced mate in N (positive = side to move mates, negative = side to
    /// move gets mated)
    Mate(i32),
}

impl Score {
    /// Converts the score to integer centipawns from a chosen point of view.
    ///
    /// `pov_is_side_to_move` states whether the side whose point of view we
    /// want is the side to move in the evaluated position. Forced mates map
    /// to the sentinel scaled by mate distance, so a faster mate scores
    /// higher and the winner's sign is preserved.
    pub fn pov_centipawns(self, pov_is_side_to_move: bool) -> i32 {
        let raw = match self {
            Score::Centipawns(cp) => cp,
            Score::Mate(n) => {
                if n > 0 {
                    MATE_SCORE - n
                } else {
                    -MATE_SCORE - n
                }
            }
        };
        if pov_is_side_to_move {
            raw
        } else {
            -raw
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Centipawns(cp) => {
                let pawns = *cp as f32 / 100.0;
                if pawns >= 0.0 {
                    write!(f, "+{:.2}", pawns)
                } else {
                    write!(f, "{:.2}", pawns)
                }
            }
            Score::Mate(n) => write!(f, "M{}", n),
        }
    }
}

/// Output of one engine query against a position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evaluation {
    /// The engine's recommended move in UCI notation, if it produced one
    /// (absent on checkmate/stalemate or a malformed response).
    pub best_move: Option<String>,
    /// Raw score relative to the side to move, if reported.
    pub score: Option<Score>,
    /// Principal variation in UCI notation (first move = recommendation).
    pub pv: Vec<String>,
    /// Depth the engine reached.
    pub depth: u8,
}

/// The evaluation seam between the orchestrator and the engine process.
///
/// `moves` is the cumulative UCI move list from the game start; the
/// implementation evaluates the position those moves lead to. `depth` is
/// pre-clamped by the caller.
pub trait Evaluator {
    fn evaluate(&mut self, moves: &[String], depth: u8) -> Result<Evaluation, EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centipawns_pov() {
        assert_eq!(Score::Centipawns(35).pov_centipawns(true), 35);
        assert_eq!(Score::Centipawns(35).pov_centipawns(false), -35);
        assert_eq!(Score::Centipawns(-120).pov_centipawns(false), 120);
    }

    #[test]
    fn test_mate_maps_to_sentinel() {
        // Mate in 3 for the side to move, seen from that side
        assert_eq!(Score::Mate(3).pov_centipawns(true), MATE_SCORE - 3);
        // Getting mated in 2, seen from the side to move
        assert_eq!(Score::Mate(-2).pov_centipawns(true), -MATE_SCORE + 2);
        // Same mate seen from the opponent
        assert_eq!(Score::Mate(-2).pov_centipawns(false), MATE_SCORE - 2);
    }

    #[test]
    fn test_faster_mate_scores_higher() {
        assert!(Score::Mate(1).pov_centipawns(true) > Score::Mate(5).pov_centipawns(true));
        assert!(Score::Mate(5).pov_centipawns(true) > Score::Centipawns(2000).pov_centipawns(true));
    }

    #[test]
    fn test_display() {
        assert_eq!(Score::Centipawns(35).to_string(), "+0.35");
        assert_eq!(Score::Centipawns(-150).to_string(), "-1.50");
        assert_eq!(Score::Mate(-4).to_string(), "M-4");
    }
}
