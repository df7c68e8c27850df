//! Per-piece placement output consumed by the robot.

use crate::placer::PlacedPiece;
use jigsaw_core::{PieceId, RecordError, SideRecord};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Where a piece was picked up and where it goes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacementRecord {
    pub photo_space_origin: Option<[f64; 2]>,
    pub photo_space_incenter: Option<[f64; 2]>,
    pub robot_state: Option<serde_json::Value>,
    pub dest_photo_space_incenter: [f64; 2],
    /// Radians, applied about the incenter.
    pub dest_rotation: f64,
    pub solution_x: usize,
    pub solution_y: usize,
    /// Set when dedupe saw this piece's duplicates disagree geometrically.
    #[serde(default)]
    pub geometry_mismatch: bool,
}

impl PlacementRecord {
    /// Combine a placed pose with the pick data of the piece's first side
    /// record.
    pub fn new(placed: &PlacedPiece, source: &SideRecord, geometry_mismatch: bool) -> Self {
        Self {
            photo_space_origin: source.photo_space_origin,
            photo_space_incenter: source.photo_space_incenter,
            robot_state: source.robot_state.clone(),
            dest_photo_space_incenter: [placed.incenter.x, placed.incenter.y],
            dest_rotation: placed.rotation,
            solution_x: placed.x,
            solution_y: placed.y,
            geometry_mismatch,
        }
    }

    /// `{piece_id}.json`
    pub fn file_name(piece_id: PieceId) -> String {
        format!("{piece_id}.json")
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, RecordError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| RecordError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| RecordError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), RecordError> {
        jigsaw_core::write_json(path.as_ref(), self, false)
    }
}
