//! Move quality classification

use serde::{Deserialize, Serialize};

/// Centipawn-loss thresholds, checked in ascending order
const THRESHOLD_GREAT: i32 = 10;
const THRESHOLD_EXCELLENT: i32 = 30;
const THRESHOLD_GOOD: i32 = 75;
const THRESHOLD_INACCURACY: i32 = 150;
const THRESHOLD_MISTAKE: i32 = 300;

/// Move quality category, ordered by severity.
///
/// `Brilliant` and `Book` are reserved members of the taxonomy: they appear
/// in every stats payload but no classification rule assigns them. `Missed`
/// overlays `Mistake` and `Blunder` rather than partitioning with the rest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Best,
    Brilliant,
    Great,
    Excellent,
    Good,
    Book,
    Inaccuracy,
    Mistake,
    Blunder,
    Missed,
}

impl Category {
    /// Every member of the taxonomy, in severity order
    pub const ALL: [Category; 10] = [
        Category::Best,
        Category::Brilliant,
        Category::Great,
        Category::Excellent,
        Category::Good,
        Category::Book,
        Category::Inaccuracy,
        Category::Mistake,
        Category::Blunder,
        Category::Missed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Best => "best",
            Category::Brilliant => "brilliant",
            Category::Great => "great",
            Category::Excellent => "excellent",
            Category::Good => "good",
            Category::Book => "book",
            Category::Inaccuracy => "inaccuracy",
            Category::Mistake => "mistake",
            Category::Blunder => "blunder",
            Category::Missed => "missed",
        }
    }
}

/// Classifies one ply by its centipawn loss.
///
/// `is_engine_choice` is true iff the played move equals the engine's
/// recommended move for the pre-move position. A zero-loss move that is not
/// the engine's own pick is `Great`, never `Best`.
pub fn classify(loss_cp: i32, is_engine_choice: bool) -> Category {
    if loss_cp == 0 && is_engine_choice {
        return Category::Best;
    }
    if loss_cp <= THRESHOLD_GREAT {
        Category::Great
    } else if loss_cp <= THRESHOLD_EXCELLENT {
        Category::Excellent
    } else if loss_cp <= THRESHOLD_GOOD {
        Category::Good
    } else if loss_cp <= THRESHOLD_INACCURACY {
        Category::Inaccuracy
    } else if loss_cp <= THRESHOLD_MISTAKE {
        Category::Mistake
    } else {
        Category::Blunder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_loss() {
        assert_eq!(classify(0, true), Category::Best);
        assert_eq!(classify(0, false), Category::Great);
    }

    #[test]
    fn test_threshold_boundaries() {
        assert_eq!(classify(10, false), Category::Great);
        assert_eq!(classify(11, false), Category::Excellent);
        assert_eq!(classify(30, false), Category::Excellent);
        assert_eq!(classify(31, false), Category::Good);
        assert_eq!(classify(75, false), Category::Good);
        assert_eq!(classify(76, false), Category::Inaccuracy);
        assert_eq!(classify(150, false), Category::Inaccuracy);
        assert_eq!(classify(151, false), Category::Mistake);
        assert_eq!(classify(300, false), Category::Mistake);
        assert_eq!(classify(301, false), Category::Blunder);
        assert_eq!(classify(400, false), Category::Blunder);
    }

    #[test]
    fn test_engine_choice_only_matters_at_zero_loss() {
        assert_eq!(classify(5, true), Category::Great);
        assert_eq!(classify(200, true), Category::Mistake);
    }

    #[test]
    fn test_buckets_partition_non_negative_losses() {
        // No gaps, no overlaps: every non-negative loss lands in exactly
        // one partition category, never a reserved or overlay one.
        for loss in 0..=1000 {
            let cat = classify(loss, false);
            assert!(!matches!(
                cat,
                Category::Best | Category::Brilliant | Category::Book | Category::Missed
            ));
        }
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(Category::Inaccuracy.as_str(), "inaccuracy");
        assert_eq!(
            serde_json::to_string(&Category::Blunder).unwrap(),
            "\"blunder\""
        );
    }
}
