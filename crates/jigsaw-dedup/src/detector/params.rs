use jigsaw_core::{AssemblyConfig, ClusteringMode, MotorSpaceMapper};
use serde::{Deserialize, Serialize};

/// Configuration for [`super::DuplicateDetector`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DedupParams {
    /// Photo-to-motor conversion for centroids.
    pub mapper: MotorSpaceMapper,
    /// Centroid distance in pixels below which two pieces are duplicates.
    pub duplicate_delta_px: f64,
    /// Pairs below `similar_factor * duplicate_delta_px` (but not duplicates)
    /// are logged as similar.
    pub similar_factor: f64,
    /// Similarity score above which a duplicate pair is flagged.
    pub mismatch_threshold: f64,
    /// Per-side orientation tolerance for the similarity score, in radians.
    pub max_side_misalignment: f64,
    /// Resampling count for the built-in side fitter.
    pub fit_samples: usize,
    pub clustering: ClusteringMode,
}

impl Default for DedupParams {
    fn default() -> Self {
        Self::from_config(&AssemblyConfig::default())
    }
}

impl DedupParams {
    pub fn from_config(cfg: &AssemblyConfig) -> Self {
        Self {
            mapper: cfg.mapper(),
            duplicate_delta_px: cfg.duplicate_centroid_delta_px,
            similar_factor: cfg.similar_centroid_factor,
            mismatch_threshold: cfg.geometric_mismatch_threshold,
            max_side_misalignment: cfg.side_misalignment_deg.to_radians(),
            fit_samples: cfg.fit_samples,
            clustering: cfg.clustering,
        }
    }

    /// Upper bound of the "similar" band, in pixels.
    #[inline]
    pub fn similar_radius_px(&self) -> f64 {
        self.duplicate_delta_px * self.similar_factor
    }
}
