#![allow(dead_code)]

use jigsaw_core::{rotate_polyline, PhotoFootprint, Piece, PieceId, Polyline, Side};
use jigsaw_place::BoardGrid;
use nalgebra::{Point2, Vector2};

/// A board of rectangular pieces: column `x` is `widths[x]` wide and row `y`
/// is `heights[y]` tall, so every piece fits its neighbors exactly.
pub struct SyntheticBoard {
    pub widths: Vec<f64>,
    pub heights: Vec<f64>,
}

impl SyntheticBoard {
    pub fn new(widths: &[f64], heights: &[f64]) -> Self {
        Self {
            widths: widths.to_vec(),
            heights: heights.to_vec(),
        }
    }

    pub fn width(&self) -> usize {
        self.widths.len()
    }

    pub fn height(&self) -> usize {
        self.heights.len()
    }

    pub fn piece_id(&self, x: usize, y: usize) -> PieceId {
        (y * self.width() + x + 1) as PieceId
    }

    pub fn orientation(&self, x: usize, y: usize) -> u8 {
        ((3 * x + y) % 4) as u8
    }

    /// Photo pose of the piece at `(x, y)`: an arbitrary rotation and shift.
    pub fn photo_pose(&self, x: usize, y: usize) -> (f64, Vector2<f64>) {
        let id = self.piece_id(x, y) as f64;
        (0.37 * id - 1.0, Vector2::new(1000.0 + 250.0 * id, 300.0 - 70.0 * id))
    }

    /// Top-left corner of cell `(x, y)` on the assembled board.
    pub fn origin(&self, x: usize, y: usize) -> Point2<f64> {
        Point2::new(
            self.widths[..x].iter().sum(),
            self.heights[..y].iter().sum(),
        )
    }

    pub fn total_width(&self) -> f64 {
        self.widths.iter().sum()
    }

    pub fn total_height(&self) -> f64 {
        self.heights.iter().sum()
    }

    /// Sides of the piece at `(x, y)` in placed order, at their final pose.
    pub fn target_sides(&self, x: usize, y: usize) -> [Polyline; 4] {
        let o = self.origin(x, y);
        let (w, h) = (self.widths[x], self.heights[y]);
        let tl = o;
        let tr = o + Vector2::new(w, 0.0);
        let br = o + Vector2::new(w, h);
        let bl = o + Vector2::new(0.0, h);
        [
            vec![tl, o + Vector2::new(w / 2.0, -8.0), tr],
            vec![tr, o + Vector2::new(w + 6.0, h / 2.0), br],
            vec![br, o + Vector2::new(w / 2.0, h - 7.0), bl],
            vec![bl, tl],
        ]
    }

    pub fn target_center(&self, x: usize, y: usize) -> Point2<f64> {
        self.origin(x, y) + Vector2::new(self.widths[x] / 2.0, self.heights[y] / 2.0)
    }

    /// The piece as it was photographed: sides renumbered for its
    /// orientation, then rotated and shifted.
    pub fn piece(&self, x: usize, y: usize) -> Piece {
        let id = self.piece_id(x, y);
        let k = self.orientation(x, y) as usize;
        let (theta, shift) = self.photo_pose(x, y);
        let center = self.target_center(x, y);
        let placed = self.target_sides(x, y);

        let mut native: [Polyline; 4] = Default::default();
        for (slot, verts) in placed.into_iter().enumerate() {
            native[(slot + k) % 4] = rotate_polyline(&verts, center, theta)
                .into_iter()
                .map(|p| p + shift)
                .collect();
        }
        let incenter = center + shift;
        let mut i = 0;
        let sides = native.map(|v| {
            let s = Side::new(id, i, v, incenter, false).unwrap();
            i += 1;
            s
        });
        Piece::new(
            id,
            sides,
            PhotoFootprint {
                filename: "board.jpeg".into(),
                centroid: incenter,
                width: 4000.0,
                height: 3000.0,
            },
        )
    }

    pub fn pieces(&self) -> Vec<Piece> {
        let mut out = Vec::new();
        for y in 0..self.height() {
            for x in 0..self.width() {
                out.push(self.piece(x, y));
            }
        }
        out
    }

    pub fn grid(&self) -> BoardGrid {
        let rows: Vec<Vec<(PieceId, u8)>> = (0..self.height())
            .map(|y| {
                (0..self.width())
                    .map(|x| (self.piece_id(x, y), self.orientation(x, y)))
                    .collect()
            })
            .collect();
        BoardGrid::from_rows(&rows).unwrap()
    }
}
