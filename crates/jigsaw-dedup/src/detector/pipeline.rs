use super::{DedupError, DedupParams, DedupReport, DuplicateCluster, DuplicateMember, SimilarPair};
use crate::cluster::{cluster_anchor_order, cluster_transitive, Clustering};
use crate::similarity::geometric_similarity;
use jigsaw_core::{BatchPhotoMetadata, ChordFrameFit, ClusteringMode, Piece, SideFit};
use kiddo::{KdTree, SquaredEuclidean};
use log::{debug, info, warn};
use nalgebra::Point2;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Duplicate detector over one batch of pieces.
///
/// Generic over the side fitter so callers with a richer shape comparison
/// can plug it in; [`ChordFrameFit`] is used by default.
#[derive(Clone, Debug)]
pub struct DuplicateDetector<F = ChordFrameFit> {
    params: DedupParams,
    fit: F,
}

impl DuplicateDetector<ChordFrameFit> {
    pub fn new(params: DedupParams) -> Self {
        let fit = ChordFrameFit::new(params.fit_samples);
        Self { params, fit }
    }
}

impl<F: SideFit> DuplicateDetector<F> {
    /// Replace the side fitter used for the geometric cross-check.
    pub fn with_fit<G: SideFit>(self, fit: G) -> DuplicateDetector<G> {
        DuplicateDetector {
            params: self.params,
            fit,
        }
    }

    #[inline]
    pub fn params(&self) -> &DedupParams {
        &self.params
    }

    /// Run one detection pass.
    ///
    /// Pieces are processed in ascending id order regardless of the order of
    /// `pieces`. Geometry mismatches are reported, never fatal.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip_all, fields(pieces = pieces.len()))
    )]
    pub fn detect(
        &self,
        pieces: &[Piece],
        batch: &BatchPhotoMetadata,
    ) -> Result<DedupReport, DedupError> {
        let mut sorted: Vec<&Piece> = pieces.iter().collect();
        sorted.sort_unstable_by_key(|p| p.id);
        if let Some(w) = sorted.windows(2).find(|w| w[0].id == w[1].id) {
            return Err(DedupError::DuplicatePieceId(w[0].id));
        }
        if sorted.is_empty() {
            return Ok(DedupReport::default());
        }

        let motor = self.motor_centroids(&sorted, batch)?;
        let (neighbors, similar) = self.proximity(&sorted, &motor);
        let center_distance: Vec<f64> = sorted
            .iter()
            .map(|p| p.photo.distance_to_frame_center())
            .collect();

        let clustering = match self.params.clustering {
            ClusteringMode::AnchorOrder => cluster_anchor_order(&neighbors, &center_distance),
            ClusteringMode::Transitive => cluster_transitive(&neighbors, &center_distance),
        };

        let report = self.build_report(&sorted, &motor, clustering, similar);
        info!(
            "started with {}; found {} duplicate pieces; resulting in {} unique pieces",
            report.input_count,
            report.removed_count(),
            report.unique_count()
        );
        Ok(report)
    }

    fn motor_centroids(
        &self,
        sorted: &[&Piece],
        batch: &BatchPhotoMetadata,
    ) -> Result<Vec<Point2<f64>>, DedupError> {
        sorted
            .iter()
            .map(|p| {
                let camera = batch.camera_position(&p.photo.filename).ok_or_else(|| {
                    DedupError::UnknownPhoto {
                        piece_id: p.id,
                        file_name: p.photo.filename.clone(),
                    }
                })?;
                Ok(self.params.mapper.photo_to_motor(camera, p.photo.centroid))
            })
            .collect()
    }

    /// Within-threshold neighbor lists (ascending index) plus the pairs that
    /// only fall in the "similar" band.
    fn proximity(
        &self,
        sorted: &[&Piece],
        motor: &[Point2<f64>],
    ) -> (Vec<Vec<usize>>, Vec<SimilarPair>) {
        let coords: Vec<[f64; 2]> = motor.iter().map(|p| [p.x, p.y]).collect();
        let tree: KdTree<f64, 2> = (&coords).into();

        let mapper = &self.params.mapper;
        let threshold = self.params.duplicate_delta_px;
        let similar_px = self.params.similar_radius_px();
        let radius = similar_px * mapper.counts_per_pixel;

        let mut neighbors = vec![Vec::new(); sorted.len()];
        let mut similar = Vec::new();
        for (i, q) in coords.iter().enumerate() {
            let mut found: Vec<usize> = tree
                .within::<SquaredEuclidean>(q, radius * radius)
                .into_iter()
                .map(|nn| nn.item as usize)
                .filter(|&j| j != i)
                .collect();
            found.sort_unstable();

            for j in found {
                let d = mapper.pixel_distance(motor[i], motor[j]);
                if d < threshold {
                    neighbors[i].push(j);
                } else if d < similar_px && i < j {
                    debug!(
                        "[{}] is similar to {} (centroid distance {:.2}px)",
                        sorted[i].id, sorted[j].id, d
                    );
                    similar.push(SimilarPair {
                        a: sorted[i].id,
                        b: sorted[j].id,
                        pixel_distance: d,
                    });
                }
            }
        }
        (neighbors, similar)
    }

    fn build_report(
        &self,
        sorted: &[&Piece],
        motor: &[Point2<f64>],
        clustering: Clustering,
        similar: Vec<SimilarPair>,
    ) -> DedupReport {
        let mapper = &self.params.mapper;
        let clusters = clustering
            .clusters
            .into_iter()
            .map(|raw| {
                let anchor = sorted[raw.anchor];
                let members = raw
                    .members
                    .iter()
                    .filter(|&&m| m != raw.anchor)
                    .map(|&m| {
                        let other = sorted[m];
                        let pixel_distance = mapper.pixel_distance(motor[raw.anchor], motor[m]);
                        info!(
                            "[{}] is duplicated by {} (centroid distance {:.2}px)",
                            anchor.id, other.id, pixel_distance
                        );
                        let similarity = geometric_similarity(
                            &anchor.sides,
                            &other.sides,
                            &self.fit,
                            self.params.max_side_misalignment,
                        );
                        let geometry_mismatch = similarity > self.params.mismatch_threshold;
                        if geometry_mismatch {
                            warn!(
                                "[{}] shares a position with {} but their outlines differ (similarity {:.3})",
                                anchor.id, other.id, similarity
                            );
                        }
                        DuplicateMember {
                            piece_id: other.id,
                            pixel_distance,
                            similarity,
                            geometry_mismatch,
                        }
                    })
                    .collect();
                DuplicateCluster {
                    anchor: anchor.id,
                    representative: sorted[raw.representative].id,
                    members,
                }
            })
            .collect();

        DedupReport {
            input_count: sorted.len(),
            survivors: clustering.survivors.iter().map(|&i| sorted[i].id).collect(),
            clusters,
            similar,
        }
    }
}
