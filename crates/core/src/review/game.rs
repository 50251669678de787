//! Game analysis orchestration
//!
//! Replays a parsed game ply by ply, querying the engine before and after
//! each move, and accumulates per-side classification statistics. One
//! engine subprocess serves exactly one call and is released on every exit
//! path.

use shakmaty::{CastlingMode, Chess, Position};
use tracing::{info, warn};

use super::classify::classify;
use super::loss::centipawn_loss;
use super::stats::GameStats;
use crate::config::EngineConfig;
use crate::engine::{Evaluator, StockfishEngine};
use crate::error::{Error, Result};
use crate::parser::PgnGame;

/// Supported search-depth range; the service layer clamps to this before
/// calling in
pub const MIN_DEPTH: u8 = 5;
pub const MAX_DEPTH: u8 = 25;
pub const DEFAULT_DEPTH: u8 = 15;

/// Analyzes one game with a freshly spawned engine.
///
/// Fails fast with `InvalidInput` for a moveless game and with
/// `EngineUnavailable` when the engine binary is missing or will not
/// launch; per-ply engine trouble after that never fails the call.
pub fn analyze_game(
    config: &EngineConfig,
    game: &PgnGame,
    depth: u8,
    with_accuracy: bool,
) -> Result<GameStats> {
    if game.sans.is_empty() {
        return Err(Error::InvalidInput("game record has no moves".into()));
    }

    if !config.stockfish_path.exists() {
        return Err(Error::EngineUnavailable(format!(
            "engine not found at {}",
            config.stockfish_path.display()
        )));
    }

    let mut engine = StockfishEngine::new(&config.stockfish_path, config.reply_timeout)
        .map_err(Error::engine_unavailable)?;

    let result = replay_and_classify(&mut engine, game, depth, with_accuracy);
    engine.quit();
    result
}

/// Replays the game against any [`Evaluator`] and classifies every ply.
///
/// A recorded move that matches no legal move is excluded from evaluation
/// and statistics but does not abort the analysis.
pub fn replay_and_classify<E: Evaluator>(
    evaluator: &mut E,
    game: &PgnGame,
    depth: u8,
    with_accuracy: bool,
) -> Result<GameStats> {
    info!(game = %game.summary(), plies = game.move_count(), depth, "starting analysis");

    let mut position = Chess::default();
    let mut played: Vec<String> = Vec::new();
    let mut stats = GameStats::new();

    for san in &game.sans {
        let mover = position.turn();
        let move_number = position.fullmoves().get();

        let mv = match san.to_move(&position) {
            Ok(mv) => mv,
            Err(_) => {
                warn!(%san, move_number, "recorded move matches no legal move, skipping");
                continue;
            }
        };

        // The mover is on move in the pre-move position, so the raw score
        // is already from their point of view
        let (best_move, score_before) = match evaluator.evaluate(&played, depth) {
            Ok(eval) => (eval.best_move, eval.score.map(|s| s.pov_centipawns(true))),
            Err(e) => {
                warn!(move_number, error = %e, "engine failed before move, assuming no loss");
                (None, None)
            }
        };

        let uci = mv.to_uci(CastlingMode::Standard).to_string();
        position = match position.clone().play(mv) {
            Ok(next) => next,
            Err(_) => {
                warn!(%san, move_number, "recorded move is illegal, skipping");
                continue;
            }
        };
        played.push(uci.clone());

        // After the move the opponent is on move, so flip the raw score
        // back to the mover's point of view
        let score_after = match evaluator.evaluate(&played, depth) {
            Ok(eval) => eval.score.map(|s| s.pov_centipawns(false)),
            Err(e) => {
                warn!(move_number, error = %e, "engine failed after move, assuming no loss");
                None
            }
        };

        let loss = centipawn_loss(score_before, score_after);
        let is_engine_choice = best_move.as_deref() == Some(uci.as_str());
        let category = classify(loss, is_engine_choice);
        stats.record(mover, move_number, category, loss);
    }

    if with_accuracy {
        stats.fill_accuracy();
    }

    info!(
        white_plies = stats.white.evaluated_plies(),
        black_plies = stats.black.evaluated_plies(),
        "analysis complete"
    );

    Ok(stats)
}
