use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::Semaphore;

use chess_review_core::{parse_game, review, GameStats, DEFAULT_DEPTH, MAX_DEPTH, MIN_DEPTH};

use crate::error::AppError;
use crate::AppState;

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub white_name: String,
    pub black_name: String,
    pub game_url: String,
    #[serde(flatten)]
    pub stats: GameStats,
}

pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Chess Review backend running" }))
}

pub async fn ping() -> Json<Value> {
    Json(json!({
        "status": "alive",
        "time": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Receives a PGN upload plus optional `url`, `depth` and `accuracy` form
/// fields, runs the engine analysis, and returns per-side statistics.
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let mut pgn: Option<String> = None;
    let mut url = String::new();
    let mut depth = DEFAULT_DEPTH;
    let mut with_accuracy = false;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => pgn = Some(field.text().await?),
            Some("url") => url = field.text().await?,
            Some("depth") => {
                depth = field.text().await?.trim().parse().unwrap_or(DEFAULT_DEPTH);
            }
            Some("accuracy") => {
                with_accuracy = field.text().await?.trim().eq_ignore_ascii_case("true");
            }
            _ => {}
        }
    }

    let depth = depth.clamp(MIN_DEPTH, MAX_DEPTH);
    let pgn = pgn.ok_or_else(|| AppError::BadRequest("missing 'file' field".to_string()))?;

    let engine = state.engine.clone();
    let (game, stats) = run_limited(state.analysis_slots.clone(), move || {
        let game = parse_game(&pgn)?;
        let stats = review::analyze_game(&engine, &game, depth, with_accuracy)?;
        Ok((game, stats))
    })
    .await?;

    Ok(Json(AnalyzeResponse {
        white_name: game.white_name().to_string(),
        black_name: game.black_name().to_string(),
        game_url: url,
        stats,
    }))
}

/// Runs `work` on the blocking pool while holding one analysis slot.
///
/// The permit travels into the closure, so the slot stays occupied for as
/// long as the work (and its engine subprocess) is actually running, even
/// if the request future is dropped mid-flight.
async fn run_limited<T, F>(slots: Arc<Semaphore>, work: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, chess_review_core::Error> + Send + 'static,
    T: Send + 'static,
{
    let permit = slots
        .acquire_owned()
        .await
        .map_err(|_| AppError::Internal("analysis slots closed".to_string()))?;

    tokio::task::spawn_blocking(move || {
        let _permit = permit;
        work()
    })
    .await
    .map_err(|e| AppError::Internal(format!("analysis task failed: {e}")))?
    .map_err(AppError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn test_response_wire_shape() {
        let response = AnalyzeResponse {
            white_name: "Alice".to_string(),
            black_name: "".to_string(),
            game_url: "https://lichess.org/sample".to_string(),
            stats: GameStats::new(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["white_name"], "Alice");
        assert_eq!(json["black_name"], "");
        assert_eq!(json["game_url"], "https://lichess.org/sample");
        // GameStats flattens to top-level white/black objects
        assert_eq!(json["white"]["counts"]["best"], 0);
        assert!(json["black"]["moves"]["blunder"].as_array().unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_slot_stays_held_when_request_is_dropped() {
        let slots = Arc::new(Semaphore::new(1));
        let (started_tx, started_rx) = mpsc::channel();
        let (finish_tx, finish_rx) = mpsc::channel::<()>();

        let request = tokio::spawn(run_limited(slots.clone(), move || {
            started_tx.send(()).unwrap();
            finish_rx.recv().unwrap();
            Ok(())
        }));

        // Wait for the blocking work to start, then cancel the request
        started_rx.recv().unwrap();
        request.abort();

        // The slot is still occupied: the work is running detached
        assert_eq!(slots.available_permits(), 0);

        // Once the work finishes the slot comes back
        finish_tx.send(()).unwrap();
        for _ in 0..100 {
            if slots.available_permits() == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(slots.available_permits(), 1);
    }

    #[tokio::test]
    async fn test_slot_released_after_failed_analysis() {
        let slots = Arc::new(Semaphore::new(1));

        let result = run_limited(slots.clone(), || {
            Err::<(), _>(chess_review_core::Error::InvalidInput("no moves".into()))
        })
        .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert_eq!(slots.available_permits(), 1);
    }
}
