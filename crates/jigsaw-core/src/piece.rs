use crate::side::Side;
use nalgebra::Point2;

pub type PieceId = u32;

/// Where a piece was seen: source photo, centroid and frame size, all in
/// photo pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct PhotoFootprint {
    pub filename: String,
    pub centroid: Point2<f64>,
    pub width: f64,
    pub height: f64,
}

impl PhotoFootprint {
    #[inline]
    pub fn frame_center(&self) -> Point2<f64> {
        Point2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Distance from the piece centroid to the center of its own photo.
    ///
    /// Optical quality is best near the frame center, so lower is better
    /// when choosing among duplicate extractions.
    #[inline]
    pub fn distance_to_frame_center(&self) -> f64 {
        (self.centroid - self.frame_center()).norm()
    }
}

/// A digitized puzzle piece: four sides in native clockwise order
/// (top, right, bottom, left for orientation 0) plus its photo footprint.
#[derive(Clone, Debug, PartialEq)]
pub struct Piece {
    pub id: PieceId,
    pub sides: [Side; 4],
    pub incenter: Point2<f64>,
    pub photo: PhotoFootprint,
}

impl Piece {
    pub fn new(id: PieceId, sides: [Side; 4], photo: PhotoFootprint) -> Self {
        let incenter = sides[0].incenter;
        Self {
            id,
            sides,
            incenter,
            photo,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn footprint(cx: f64, cy: f64) -> PhotoFootprint {
        PhotoFootprint {
            filename: "1.jpeg".to_string(),
            centroid: Point2::new(cx, cy),
            width: 800.0,
            height: 600.0,
        }
    }

    #[test]
    fn centered_piece_has_zero_distance() {
        assert_abs_diff_eq!(footprint(400.0, 300.0).distance_to_frame_center(), 0.0);
    }

    #[test]
    fn off_center_distance_matches_euclid() {
        let d = footprint(100.0, 500.0).distance_to_frame_center();
        assert_abs_diff_eq!(d, (300.0f64.powi(2) + 200.0f64.powi(2)).sqrt(), epsilon = 1e-9);
        assert!((d - 360.555).abs() < 1e-3);
    }
}
