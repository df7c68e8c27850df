use crate::geometry::{angle_between, resample_polyline, rotate_polyline, Polyline};
use crate::piece::PieceId;
use crate::records::RecordError;
use nalgebra::{Point2, Vector2};

/// One of the four sides of a piece outline.
///
/// Vertices run from the start corner to the end corner, clockwise around the
/// piece, so for an upright piece the top side points right and the left side
/// points up.
#[derive(Clone, Debug, PartialEq)]
pub struct Side {
    pub piece_id: PieceId,
    /// Native side index (0..4) within the owning piece.
    pub index: usize,
    pub vertices: Polyline,
    pub incenter: Point2<f64>,
    /// True when this side lies on the puzzle border (flat edge).
    pub is_edge: bool,
}

impl Side {
    pub fn new(
        piece_id: PieceId,
        index: usize,
        vertices: Polyline,
        incenter: Point2<f64>,
        is_edge: bool,
    ) -> Result<Self, RecordError> {
        if vertices.len() < 2 {
            return Err(RecordError::DegenerateSide {
                piece_id,
                side: index,
                count: vertices.len(),
            });
        }
        Ok(Self {
            piece_id,
            index,
            vertices,
            incenter,
            is_edge,
        })
    }

    #[inline]
    pub fn first(&self) -> Point2<f64> {
        self.vertices[0]
    }

    #[inline]
    pub fn last(&self) -> Point2<f64> {
        self.vertices[self.vertices.len() - 1]
    }

    /// Direction from the first to the last vertex, in `(-π, π]`.
    #[inline]
    pub fn angle(&self) -> f64 {
        angle_between(self.first(), self.last())
    }

    #[inline]
    pub fn chord(&self) -> Vector2<f64> {
        self.last() - self.first()
    }
}

/// Shape comparison between two sides.
///
/// Implementations return a non-negative deviation: `0` for identical shapes,
/// larger for worse fits. The vision stack may supply its own implementation;
/// [`ChordFrameFit`] is the built-in one.
pub trait SideFit {
    fn error_when_fit_with(&self, side: &Side, other: &Side) -> f64;
}

/// Compares sides after moving both into their own chord frame.
///
/// Each polyline is translated so its first vertex sits at the origin,
/// rotated so its chord points along +x, then resampled by arc length. The
/// error is the mean distance between corresponding samples, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChordFrameFit {
    pub samples: usize,
}

impl Default for ChordFrameFit {
    fn default() -> Self {
        Self { samples: 32 }
    }
}

impl ChordFrameFit {
    pub fn new(samples: usize) -> Self {
        Self {
            samples: samples.max(2),
        }
    }

    fn canonical(&self, side: &Side) -> Polyline {
        let origin = side.first();
        let shifted: Polyline = side
            .vertices
            .iter()
            .map(|p| Point2::from(p - origin))
            .collect();
        let aligned = rotate_polyline(&shifted, Point2::origin(), -side.angle());
        resample_polyline(&aligned, self.samples)
    }
}

impl SideFit for ChordFrameFit {
    fn error_when_fit_with(&self, side: &Side, other: &Side) -> f64 {
        let a = self.canonical(side);
        let b = self.canonical(other);
        let n = a.len().min(b.len());
        if n == 0 {
            return 0.0;
        }
        a.iter()
            .zip(b.iter())
            .map(|(p, q)| (p - q).norm())
            .sum::<f64>()
            / n as f64
    }
}
