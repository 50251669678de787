//! Per-side aggregation of classified moves

use std::collections::BTreeMap;

use serde::Serialize;
use shakmaty::Color;

use super::classify::Category;
use super::loss::accuracy_from_acl;

/// Accumulated counts and move-number lists for one side.
///
/// Every category is present from the start (count 0, empty list) so the
/// wire shape is stable regardless of what the game contained.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SideStats {
    pub counts: BTreeMap<Category, u32>,
    pub moves: BTreeMap<Category, Vec<u32>>,
    /// Chess.com-style accuracy; only populated when the caller opts in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    #[serde(skip)]
    total_loss_cp: i64,
    #[serde(skip)]
    evaluated_plies: u32,
}

impl SideStats {
    fn new() -> Self {
        SideStats {
            counts: Category::ALL.iter().map(|&c| (c, 0)).collect(),
            moves: Category::ALL.iter().map(|&c| (c, Vec::new())).collect(),
            accuracy: None,
            total_loss_cp: 0,
            evaluated_plies: 0,
        }
    }

    fn tally(&mut self, move_number: u32, category: Category) {
        *self.counts.entry(category).or_insert(0) += 1;
        self.moves.entry(category).or_default().push(move_number);
    }

    /// Number of plies that were actually evaluated and classified
    pub fn evaluated_plies(&self) -> u32 {
        self.evaluated_plies
    }

    /// Mean centipawn loss across this side's evaluated plies
    pub fn average_loss(&self) -> f64 {
        if self.evaluated_plies == 0 {
            0.0
        } else {
            self.total_loss_cp as f64 / self.evaluated_plies as f64
        }
    }
}

/// The per-game result: one [`SideStats`] per side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameStats {
    pub white: SideStats,
    pub black: SideStats,
}

impl GameStats {
    pub fn new() -> Self {
        GameStats {
            white: SideStats::new(),
            black: SideStats::new(),
        }
    }

    pub fn side(&self, color: Color) -> &SideStats {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    /// Records one classified ply for `color`.
    ///
    /// Mistakes and blunders are additionally tallied under `missed`, so
    /// those plies are deliberately double-counted.
    pub fn record(&mut self, color: Color, move_number: u32, category: Category, loss_cp: i32) {
        let side = match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        };

        side.tally(move_number, category);
        if matches!(category, Category::Mistake | Category::Blunder) {
            side.tally(move_number, Category::Missed);
        }

        side.total_loss_cp += loss_cp as i64;
        side.evaluated_plies += 1;
    }

    /// Populates per-side accuracy from the accumulated average loss
    pub fn fill_accuracy(&mut self) {
        self.white.accuracy = Some(accuracy_from_acl(self.white.average_loss()));
        self.black.accuracy = Some(accuracy_from_acl(self.black.average_loss()));
    }
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}
