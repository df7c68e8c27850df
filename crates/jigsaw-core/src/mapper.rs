use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Photo-space to motor-space conversion.
///
/// A pixel offset `(px, py)` measured in a photo taken with the camera at
/// motor position `(cx, cy)` maps to `(cx + px * s, cy - py * s)`, where `s`
/// is the calibrated number of robot counts per pixel. The y axis flips
/// because image rows grow downward.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotorSpaceMapper {
    pub counts_per_pixel: f64,
}

impl MotorSpaceMapper {
    pub fn new(counts_per_pixel: f64) -> Self {
        Self { counts_per_pixel }
    }

    #[inline]
    pub fn photo_to_motor(&self, camera: Point2<f64>, photo: Point2<f64>) -> Point2<f64> {
        Point2::new(
            camera.x + photo.x * self.counts_per_pixel,
            camera.y - photo.y * self.counts_per_pixel,
        )
    }

    /// Distance between two motor-space points, expressed back in pixels.
    #[inline]
    pub fn pixel_distance(&self, a: Point2<f64>, b: Point2<f64>) -> f64 {
        (a - b).norm() / self.counts_per_pixel
    }
}
