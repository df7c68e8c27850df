//! Duplicate detection pipeline.
//!
//! Maps every piece centroid into motor space, finds pairs closer than the
//! duplicate threshold, groups them into clusters, keeps one representative
//! per cluster and cross-checks each duplicate's geometry against its anchor.

mod error;
mod params;
mod pipeline;
mod result;

pub use error::DedupError;
pub use params::DedupParams;
pub use pipeline::DuplicateDetector;
pub use result::{DedupReport, DuplicateCluster, DuplicateMember, SimilarPair};
