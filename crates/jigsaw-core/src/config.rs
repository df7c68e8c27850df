//! Run-wide configuration shared by the dedupe and placement stages.

use crate::mapper::MotorSpaceMapper;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("{field} must be finite and > 0 (got {value})")]
    NonPositive { field: &'static str, value: f64 },
    #[error("similar_centroid_factor must be >= 1 (got {0})")]
    SimilarFactorTooSmall(f64),
}

/// How duplicate candidates are grouped into clusters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusteringMode {
    /// Single ordered pass: each anchor absorbs every not-yet-removed piece
    /// within the threshold. Results depend on piece id order.
    #[default]
    AnchorOrder,
    /// Transitive closure of the within-threshold relation (union-find).
    /// Order independent.
    Transitive,
}

fn default_counts_per_pixel() -> f64 {
    10.0
}
fn default_duplicate_delta_px() -> f64 {
    50.0
}
fn default_similar_factor() -> f64 {
    3.0
}
fn default_mismatch_threshold() -> f64 {
    2.2
}
fn default_misalignment_deg() -> f64 {
    12.0
}
fn default_fit_samples() -> usize {
    32
}
fn default_svg_scale() -> f64 {
    0.2
}

/// Thresholds and calibration constants for one assembly run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssemblyConfig {
    /// Robot counts per photo pixel (motor-space calibration).
    #[serde(default = "default_counts_per_pixel")]
    pub robot_counts_per_pixel: f64,
    /// Centroid distance (pixels) under which two pieces are duplicates.
    #[serde(default = "default_duplicate_delta_px")]
    pub duplicate_centroid_delta_px: f64,
    /// Upper bound of the "similar" band, as a multiple of the duplicate delta.
    #[serde(default = "default_similar_factor")]
    pub similar_centroid_factor: f64,
    /// Similarity score above which a duplicate pair is flagged as a mismatch.
    #[serde(default = "default_mismatch_threshold")]
    pub geometric_mismatch_threshold: f64,
    /// Max per-side orientation difference when aligning duplicates.
    #[serde(default = "default_misalignment_deg")]
    pub side_misalignment_deg: f64,
    /// Resampling count for the built-in side fitter.
    #[serde(default = "default_fit_samples")]
    pub fit_samples: usize,
    #[serde(default)]
    pub clustering: ClusteringMode,
    /// When set, dedupe fails unless exactly this many pieces survive.
    #[serde(default)]
    pub expected_piece_count: Option<usize>,
    /// Coordinate scale for the debug board rendering.
    #[serde(default = "default_svg_scale")]
    pub svg_scale: f64,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            robot_counts_per_pixel: default_counts_per_pixel(),
            duplicate_centroid_delta_px: default_duplicate_delta_px(),
            similar_centroid_factor: default_similar_factor(),
            geometric_mismatch_threshold: default_mismatch_threshold(),
            side_misalignment_deg: default_misalignment_deg(),
            fit_samples: default_fit_samples(),
            clustering: ClusteringMode::default(),
            expected_piece_count: None,
            svg_scale: default_svg_scale(),
        }
    }
}

impl AssemblyConfig {
    /// Load a JSON config from disk and validate it.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        let cfg: Self = serde_json::from_str(&raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("robot_counts_per_pixel", self.robot_counts_per_pixel),
            ("duplicate_centroid_delta_px", self.duplicate_centroid_delta_px),
            ("side_misalignment_deg", self.side_misalignment_deg),
            ("svg_scale", self.svg_scale),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        if !self.similar_centroid_factor.is_finite() || self.similar_centroid_factor < 1.0 {
            return Err(ConfigError::SimilarFactorTooSmall(
                self.similar_centroid_factor,
            ));
        }
        Ok(())
    }

    #[inline]
    pub fn mapper(&self) -> MotorSpaceMapper {
        MotorSpaceMapper::new(self.robot_counts_per_pixel)
    }
}
