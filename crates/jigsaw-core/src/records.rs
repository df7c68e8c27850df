//! On-disk record formats exchanged with the vision stages upstream and the
//! robot downstream.
//!
//! Pieces are stored as four JSON files `side_{piece}_{side}.json` plus one
//! vector outline `{piece}_*.svg`. Photo metadata for a batch lives in a
//! single `batch.json`.

use crate::piece::{PhotoFootprint, Piece, PieceId};
use crate::side::Side;
use nalgebra::Point2;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

#[derive(thiserror::Error, Debug)]
pub enum RecordError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("piece {piece_id} side {side} has {count} vertices (need at least 2)")]
    DegenerateSide {
        piece_id: PieceId,
        side: usize,
        count: usize,
    },
    #[error("photo {file_name} has a camera position with {len} components (need at least 2)")]
    InvalidCameraPosition { file_name: String, len: usize },
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, RecordError> {
    let raw = fs::read_to_string(path).map_err(|source| RecordError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| RecordError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize `value` as JSON into `path`.
pub fn write_json<T: Serialize>(path: &Path, value: &T, pretty: bool) -> Result<(), RecordError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|source| RecordError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| RecordError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[inline]
fn point(p: [f64; 2]) -> Point2<f64> {
    Point2::new(p[0], p[1])
}

/// Persisted data for one side of one piece.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SideRecord {
    pub vertices: Vec<[f64; 2]>,
    pub incenter: [f64; 2],
    #[serde(default)]
    pub piece_center: Option<[f64; 2]>,
    #[serde(default)]
    pub is_edge: bool,
    pub original_photo_name: String,
    pub photo_width: f64,
    pub photo_height: f64,
    pub photo_space_centroid: [f64; 2],
    /// Top-left of the piece crop in the source photo.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_space_origin: Option<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_space_incenter: Option<[f64; 2]>,
    /// Robot state when the source photo was taken, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub robot_state: Option<serde_json::Value>,
}

impl SideRecord {
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, RecordError> {
        read_json(path.as_ref())
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), RecordError> {
        write_json(path.as_ref(), self, false)
    }

    pub fn to_side(&self, piece_id: PieceId, index: usize) -> Result<Side, RecordError> {
        Side::new(
            piece_id,
            index,
            self.vertices.iter().copied().map(point).collect(),
            point(self.incenter),
            self.is_edge,
        )
    }
}

/// File name of the record for side `side` of piece `piece_id`.
pub fn side_record_file_name(piece_id: PieceId, side: usize) -> String {
    format!("side_{piece_id}_{side}.json")
}

/// All four side records of one piece.
#[derive(Clone, Debug, PartialEq)]
pub struct PieceRecord {
    pub id: PieceId,
    pub sides: [SideRecord; 4],
}

impl PieceRecord {
    /// Load `side_{id}_{0..4}.json` from `dir`.
    pub fn load(dir: &Path, id: PieceId) -> Result<Self, RecordError> {
        let [s0, s1, s2, s3] = [0, 1, 2, 3]
            .map(|side| SideRecord::load_json(dir.join(side_record_file_name(id, side))));
        Ok(Self {
            id,
            sides: [s0?, s1?, s2?, s3?],
        })
    }

    /// Write the four side records into `dir`.
    pub fn write(&self, dir: &Path) -> Result<(), RecordError> {
        for (i, side) in self.sides.iter().enumerate() {
            side.write_json(dir.join(side_record_file_name(self.id, i)))?;
        }
        Ok(())
    }

    /// Photo footprint, taken from the first side record.
    pub fn footprint(&self) -> PhotoFootprint {
        let s = &self.sides[0];
        PhotoFootprint {
            filename: s.original_photo_name.clone(),
            centroid: point(s.photo_space_centroid),
            width: s.photo_width,
            height: s.photo_height,
        }
    }

    pub fn to_piece(&self) -> Result<Piece, RecordError> {
        let [s0, s1, s2, s3] = [0, 1, 2, 3].map(|i| self.sides[i].to_side(self.id, i));
        Ok(Piece::new(self.id, [s0?, s1?, s2?, s3?], self.footprint()))
    }
}

/// Piece ids present in `dir`, found via their `side_{id}_0.json` files,
/// in ascending order.
pub fn discover_piece_ids(dir: &Path) -> Result<Vec<PieceId>, RecordError> {
    let entries = fs::read_dir(dir).map_err(|source| RecordError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut ids = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| RecordError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if let Some(id) = name
            .strip_prefix("side_")
            .and_then(|rest| rest.strip_suffix("_0.json"))
            .and_then(|id| id.parse::<PieceId>().ok())
        {
            ids.push(id);
        }
    }
    ids.sort_unstable();
    Ok(ids)
}

/// Load every piece stored in `dir`, ordered by id.
pub fn load_piece_records(dir: &Path) -> Result<Vec<PieceRecord>, RecordError> {
    discover_piece_ids(dir)?
        .into_iter()
        .map(|id| PieceRecord::load(dir, id))
        .collect()
}

/// Vector outline file `{id}_*.svg` for a piece; the lexicographically first
/// match when several exist.
pub fn find_outline_file(dir: &Path, id: PieceId) -> Result<Option<PathBuf>, RecordError> {
    let prefix = format!("{id}_");
    let entries = fs::read_dir(dir).map_err(|source| RecordError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut matches = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| RecordError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let name = entry.file_name();
        if let Some(name) = name.to_str() {
            if name.starts_with(&prefix) && name.ends_with(".svg") {
                matches.push(entry.path());
            }
        }
    }
    matches.sort();
    Ok(matches.into_iter().next())
}

/// One photo entry in `batch.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatchPhotoEntry {
    pub file_name: String,
    /// Motor-space camera position; extra axes beyond x/y are ignored.
    pub position: Vec<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct BatchFile {
    photos: Vec<BatchPhotoEntry>,
}

/// Camera position (motor space) for every photo in a batch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchPhotoMetadata {
    positions: HashMap<String, Point2<f64>>,
}

impl BatchPhotoMetadata {
    pub fn from_positions(positions: impl IntoIterator<Item = (String, Point2<f64>)>) -> Self {
        Self {
            positions: positions.into_iter().collect(),
        }
    }

    pub fn from_entries(entries: Vec<BatchPhotoEntry>) -> Result<Self, RecordError> {
        let mut positions = HashMap::with_capacity(entries.len());
        for e in entries {
            let [x, y, ..] = e.position[..] else {
                return Err(RecordError::InvalidCameraPosition {
                    len: e.position.len(),
                    file_name: e.file_name,
                });
            };
            positions.insert(e.file_name, Point2::new(x, y));
        }
        Ok(Self { positions })
    }

    /// Load `batch.json` (`{"photos": [{"file_name", "position"}]}`).
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, RecordError> {
        let file: BatchFile = read_json(path.as_ref())?;
        Self::from_entries(file.photos)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), RecordError> {
        let mut photos: Vec<BatchPhotoEntry> = self
            .positions
            .iter()
            .map(|(name, p)| BatchPhotoEntry {
                file_name: name.clone(),
                position: vec![p.x, p.y],
            })
            .collect();
        photos.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        write_json(path.as_ref(), &BatchFile { photos }, true)
    }

    #[inline]
    pub fn camera_position(&self, file_name: &str) -> Option<Point2<f64>> {
        self.positions.get(file_name).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(photo: &str) -> SideRecord {
        SideRecord {
            vertices: vec![[0.0, 0.0], [10.0, 0.0]],
            incenter: [5.0, 5.0],
            piece_center: None,
            is_edge: false,
            original_photo_name: photo.to_string(),
            photo_width: 800.0,
            photo_height: 600.0,
            photo_space_centroid: [400.0, 300.0],
            photo_space_origin: Some([390.0, 290.0]),
            photo_space_incenter: None,
            robot_state: None,
        }
    }

    #[test]
    fn parses_upstream_side_json() {
        let raw = r#"{
            "vertices": [[1, 2], [3, 4], [5, 6]],
            "incenter": [2, 2],
            "piece_center": [2.5, 2.5],
            "is_edge": true,
            "original_photo_name": "7.jpeg",
            "photo_width": 1500,
            "photo_height": 1000,
            "photo_space_centroid": [700.5, 400.25],
            "robot_state": {"position": [10, 20]}
        }"#;
        let rec: SideRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(rec.vertices.len(), 3);
        assert!(rec.is_edge);
        assert!(rec.photo_space_origin.is_none());
        let side = rec.to_side(4, 1).unwrap();
        assert_eq!(side.piece_id, 4);
        assert_eq!(side.index, 1);
        assert_eq!(side.last(), Point2::new(5.0, 6.0));
    }

    #[test]
    fn discovers_pieces_and_outlines() {
        let dir = tempfile::tempdir().unwrap();
        for id in [12u32, 3] {
            let piece = PieceRecord {
                id,
                sides: [record("a"), record("a"), record("a"), record("a")],
            };
            piece.write(dir.path()).unwrap();
        }
        fs::write(dir.path().join("3_(10,20).svg"), "<svg/>").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        assert_eq!(discover_piece_ids(dir.path()).unwrap(), vec![3, 12]);
        let loaded = load_piece_records(dir.path()).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].sides[0], record("a"));

        let outline = find_outline_file(dir.path(), 3).unwrap().unwrap();
        assert!(outline.ends_with("3_(10,20).svg"));
        assert!(find_outline_file(dir.path(), 12).unwrap().is_none());
    }

    #[test]
    fn missing_side_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        record("a")
            .write_json(dir.path().join(side_record_file_name(5, 0)))
            .unwrap();
        let err = PieceRecord::load(dir.path(), 5).unwrap_err();
        assert!(matches!(err, RecordError::Io { .. }));
    }

    #[test]
    fn batch_metadata_accepts_extra_axes() {
        let raw = r#"{"photos": [
            {"file_name": "1.jpeg", "position": [100, 200, 5]},
            {"file_name": "2.jpeg", "position": [300.5, 400]}
        ]}"#;
        let file: BatchFile = serde_json::from_str(raw).unwrap();
        let meta = BatchPhotoMetadata::from_entries(file.photos).unwrap();
        assert_eq!(meta.len(), 2);
        assert_eq!(meta.camera_position("1.jpeg"), Some(Point2::new(100.0, 200.0)));
        assert!(meta.camera_position("3.jpeg").is_none());
    }

    #[test]
    fn batch_metadata_rejects_short_position() {
        let err = BatchPhotoMetadata::from_entries(vec![BatchPhotoEntry {
            file_name: "1.jpeg".into(),
            position: vec![1.0],
        }])
        .unwrap_err();
        assert!(matches!(
            err,
            RecordError::InvalidCameraPosition { len: 1, .. }
        ));
    }
}
