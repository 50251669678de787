//! Centipawn-loss and accuracy math, pure functions only

/// Computes the centipawn loss of a move from the before/after scores,
/// both expressed from the mover's point of view.
///
/// A negative raw difference (the move improved the position per a later
/// and possibly deeper re-evaluation, or plain noise) clamps to 0. A missing score
/// on either side also yields 0: the "assume no loss" fallback for plies
/// where the engine failed.
pub fn centipawn_loss(before: Option<i32>, after: Option<i32>) -> i32 {
    match (before, after) {
        (Some(before), Some(after)) => (before - after).max(0),
        _ => 0,
    }
}

/// Approximate Chess.com-style accuracy from average centipawn loss,
/// a quadratic curve fit clamped to [0, 100] and rounded to 2 decimals.
pub fn accuracy_from_acl(acl: f64) -> f64 {
    let acc = 103.3979 - 0.3820659 * acl - 0.002169231 * acl * acl;
    let acc = acc.clamp(0.0, 100.0);
    (acc * 100.0).round() / 100.0
}
