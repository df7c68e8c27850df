//! Geometric cross-check between two extractions of the same piece.

use jigsaw_core::{angle_diff_abs, cyclic_order, Side, SideFit};

/// Score returned when no cyclic alignment passes the orientation check.
pub const NO_ALIGNMENT_SCORE: f64 = 1000.0;

/// Shape deviation between two pieces believed to be the same physical piece.
///
/// The two extractions may number their sides from different starting
/// corners, so every cyclic rotation of `a` is tried against `b`. A rotation
/// is only scored when each aligned side pair points within
/// `max_misalignment` radians of each other (duplicates are photographed in
/// place, so they are not expected to be rotated). The result is the lowest
/// summed per-side fit error, or [`NO_ALIGNMENT_SCORE`].
pub fn geometric_similarity<F>(a: &[Side; 4], b: &[Side; 4], fit: &F, max_misalignment: f64) -> f64
where
    F: SideFit + ?Sized,
{
    let mut best = NO_ALIGNMENT_SCORE;
    for offset in 0..4 {
        let order = cyclic_order(offset);
        let aligned = order
            .iter()
            .zip(b)
            .all(|(&i, sb)| angle_diff_abs(a[i].angle(), sb.angle()) <= max_misalignment);
        if !aligned {
            continue;
        }
        let total: f64 = order
            .iter()
            .zip(b)
            .map(|(&i, sb)| fit.error_when_fit_with(&a[i], sb))
            .sum();
        if total < best {
            best = total;
        }
    }
    best
}
