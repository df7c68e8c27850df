use jigsaw_core::{PieceId, RecordError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// A non-anchor member of a duplicate cluster, compared against the anchor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DuplicateMember {
    pub piece_id: PieceId,
    /// Centroid distance to the anchor, in pixels.
    pub pixel_distance: f64,
    /// Geometric similarity score against the anchor (lower is closer).
    pub similarity: f64,
    /// Set when `similarity` exceeds the mismatch threshold.
    pub geometry_mismatch: bool,
}

/// Pieces judged to be repeated extractions of one physical piece.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DuplicateCluster {
    pub anchor: PieceId,
    pub representative: PieceId,
    pub members: Vec<DuplicateMember>,
}

impl DuplicateCluster {
    /// All ids in the cluster, anchor first.
    pub fn piece_ids(&self) -> impl Iterator<Item = PieceId> + '_ {
        std::iter::once(self.anchor).chain(self.members.iter().map(|m| m.piece_id))
    }

    /// Ids dropped in favour of the representative.
    pub fn removed(&self) -> impl Iterator<Item = PieceId> + '_ {
        self.piece_ids().filter(move |&id| id != self.representative)
    }

    pub fn has_mismatch(&self) -> bool {
        self.members.iter().any(|m| m.geometry_mismatch)
    }
}

/// A pair close enough to be worth a log line but not a duplicate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimilarPair {
    pub a: PieceId,
    pub b: PieceId,
    pub pixel_distance: f64,
}

/// Output of one detection pass.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DedupReport {
    pub input_count: usize,
    /// Surviving piece ids, ascending.
    pub survivors: Vec<PieceId>,
    pub clusters: Vec<DuplicateCluster>,
    #[serde(default)]
    pub similar: Vec<SimilarPair>,
}

impl DedupReport {
    #[inline]
    pub fn unique_count(&self) -> usize {
        self.survivors.len()
    }

    #[inline]
    pub fn removed_count(&self) -> usize {
        self.input_count.saturating_sub(self.survivors.len())
    }

    /// Every piece that belongs to a cluster with a geometry mismatch.
    pub fn mismatched_pieces(&self) -> BTreeSet<PieceId> {
        self.clusters
            .iter()
            .filter(|c| c.has_mismatch())
            .flat_map(|c| c.piece_ids())
            .collect()
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
        jigsaw_core::write_json(path.as_ref(), self, true)
    }
}
