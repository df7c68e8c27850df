//! Planar helpers shared by the dedupe and placement stages.
//!
//! Everything here works in image-style coordinates (x to the right, y down),
//! so an angle of `0` points right and `π/2` points down.

use nalgebra::{Point2, Rotation2, Vector2};
use std::f64::consts::{PI, TAU};

/// Ordered vertex list from a start endpoint to an end endpoint.
pub type Polyline = Vec<Point2<f64>>;

/// Direction of the segment `from -> to`, in `(-π, π]`.
#[inline]
pub fn angle_between(from: Point2<f64>, to: Point2<f64>) -> f64 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Wrap an angle to `[0, 2π)`.
#[inline]
pub fn wrap_angle_2pi(theta: f64) -> f64 {
    theta.rem_euclid(TAU)
}

/// Wrap an angle to `(-π, π]`.
#[inline]
pub fn wrap_angle_pi(theta: f64) -> f64 {
    let t = theta.rem_euclid(TAU);
    if t > PI {
        t - TAU
    } else {
        t
    }
}

/// Absolute angular distance between two directions, in `[0, π]`.
#[inline]
pub fn angle_diff_abs(a: f64, b: f64) -> f64 {
    wrap_angle_pi(a - b).abs()
}

/// Rotate a single point about `pivot` by `angle` radians.
#[inline]
pub fn rotate_about(p: Point2<f64>, pivot: Point2<f64>, angle: f64) -> Point2<f64> {
    pivot + Rotation2::new(angle) * (p - pivot)
}

pub fn rotate_polyline(points: &[Point2<f64>], pivot: Point2<f64>, angle: f64) -> Polyline {
    let rot = Rotation2::new(angle);
    points.iter().map(|p| pivot + rot * (p - pivot)).collect()
}

pub fn translate_polyline(points: &[Point2<f64>], t: Vector2<f64>) -> Polyline {
    points.iter().map(|p| p + t).collect()
}

/// Arithmetic mean of a set of vectors; `None` for an empty set.
pub fn mean_vector(samples: &[Vector2<f64>]) -> Option<Vector2<f64>> {
    if samples.is_empty() {
        return None;
    }
    let sum = samples.iter().fold(Vector2::zeros(), |acc, v| acc + v);
    Some(sum / samples.len() as f64)
}

pub fn polyline_length(points: &[Point2<f64>]) -> f64 {
    points.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
}

/// Resample a polyline to `n` points spaced evenly by arc length.
///
/// Endpoints are preserved. A zero-length polyline collapses onto its first
/// vertex; an empty input yields an empty output.
pub fn resample_polyline(points: &[Point2<f64>], n: usize) -> Polyline {
    let Some(&first) = points.first() else {
        return Vec::new();
    };
    let n = n.max(2);
    let total = polyline_length(points);
    if total <= f64::EPSILON {
        return vec![first; n];
    }

    let mut out = Vec::with_capacity(n);
    let mut seg = 0usize;
    let mut seg_start = 0.0f64;
    for k in 0..n {
        let target = total * k as f64 / (n - 1) as f64;
        while seg + 2 < points.len() {
            let len = (points[seg + 1] - points[seg]).norm();
            if seg_start + len >= target {
                break;
            }
            seg_start += len;
            seg += 1;
        }
        let a = points[seg];
        let b = points[(seg + 1).min(points.len() - 1)];
        let len = (b - a).norm();
        let t = if len > f64::EPSILON {
            ((target - seg_start) / len).clamp(0.0, 1.0)
        } else {
            0.0
        };
        out.push(a + (b - a) * t);
    }
    out
}
