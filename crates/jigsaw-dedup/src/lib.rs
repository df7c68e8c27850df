//! Duplicate piece detection.
//!
//! The same physical piece is often photographed more than once. Pieces
//! whose centroids land at the same motor-space position are grouped, one
//! representative per group is kept (the one closest to the center of its
//! photo), and every duplicate is cross-checked against its anchor's
//! geometry so vision errors can be flagged.

mod cluster;
mod detector;
mod io;
mod similarity;

pub use detector::{
    DedupError, DedupParams, DedupReport, DuplicateCluster, DuplicateDetector, DuplicateMember,
    SimilarPair,
};
pub use io::{deduplicate_dir, ensure_piece_count, DEDUPE_REPORT_FILE};
pub use similarity::{geometric_similarity, NO_ALIGNMENT_SCORE};
