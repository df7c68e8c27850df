//! Turns a solved grid into exact piece poses.
//!
//! Cells are visited along the clockwise spiral. Each piece is rotated about
//! its incenter so that the side facing its reference neighbor runs opposite
//! to that neighbor's side, then translated by the mean of the endpoint
//! offsets to every neighbor placed so far. Pieces on the outer ring also see
//! synthetic sides just outside the board, which pin the assembled board to
//! `x = 0`, `y = 0` and a right/bottom edge fixed once at the top-right and
//! bottom-right corners, so errors never accumulate into a skewed outline.

use crate::grid::{BoardGrid, GridCell};
use crate::spiral::{Direction, SpiralStep, SpiralWalk};
use crate::PlaceError;
use jigsaw_core::{
    angle_between, mean_vector, rotate_polyline, translate_polyline, wrap_angle_2pi,
    wrap_angle_pi, Orientation, Piece, PieceId, Polyline, SideSlot,
};
use log::{debug, info};
use nalgebra::{Point2, Vector2};
use std::collections::HashMap;
use std::f64::consts::PI;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Length of the provisional virtual sides; only their direction matters
/// until the real board extent is known.
const PROVISIONAL_SIDE_LEN: f64 = 100.0;

type Cell = (isize, isize);

/// A piece in its final pose.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedPiece {
    pub piece_id: PieceId,
    pub x: usize,
    pub y: usize,
    pub orientation: Orientation,
    /// Heading of the spiral when this cell was entered.
    pub direction: Direction,
    /// Final sides in placed order: top, right, bottom, left.
    pub sides: [Polyline; 4],
    pub incenter: Point2<f64>,
    /// Rotation applied about the original incenter, in `(-π, π]`.
    pub rotation: f64,
    pub translation: Vector2<f64>,
}

impl PlacedPiece {
    #[inline]
    pub fn side(&self, slot: SideSlot) -> &Polyline {
        &self.sides[slot.index()]
    }
}

/// Synthetic mating side at a cell just outside the board.
#[derive(Clone, Debug, PartialEq)]
pub struct VirtualBorderSide {
    /// Cell the side belongs to; one coordinate is `-1`, `width` or `height`.
    pub cell: (isize, isize),
    /// Slot of the imaginary outside piece that faces the board.
    pub slot: SideSlot,
    pub vertices: [Point2<f64>; 2],
}

impl VirtualBorderSide {
    #[inline]
    pub fn first(&self) -> Point2<f64> {
        self.vertices[0]
    }

    #[inline]
    pub fn last(&self) -> Point2<f64> {
        self.vertices[1]
    }
}

/// Result of a full placement run.
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    pub width: usize,
    pub height: usize,
    /// Placed pieces in visiting order.
    pub pieces: Vec<PlacedPiece>,
    /// Final virtual sides around the board, after anchoring to the real
    /// piece extents.
    pub borders: Vec<VirtualBorderSide>,
    /// Right edge of the assembled board (`x` of the right border).
    pub board_width: f64,
    /// Bottom edge of the assembled board (`y` of the bottom border).
    pub board_height: f64,
}

impl Placement {
    pub fn get(&self, x: usize, y: usize) -> Option<&PlacedPiece> {
        self.pieces.iter().find(|p| p.x == x && p.y == y)
    }

    pub fn by_piece(&self, piece_id: PieceId) -> Option<&PlacedPiece> {
        self.pieces.iter().find(|p| p.piece_id == piece_id)
    }
}

/// Places every piece of a [`BoardGrid`].
pub struct PiecePlacer<'a> {
    grid: &'a BoardGrid,
    pieces: HashMap<PieceId, &'a Piece>,
}

impl<'a> PiecePlacer<'a> {
    /// Index `pieces` by id and check that every grid cell has a piece.
    pub fn new(grid: &'a BoardGrid, pieces: &'a [Piece]) -> Result<Self, PlaceError> {
        let mut by_id = HashMap::with_capacity(pieces.len());
        for p in pieces {
            if by_id.insert(p.id, p).is_some() {
                return Err(PlaceError::DuplicatePiece(p.id));
            }
        }
        if let Some(missing) = grid.piece_ids().find(|id| !by_id.contains_key(id)) {
            return Err(PlaceError::MissingPiece(missing));
        }
        Ok(Self {
            grid,
            pieces: by_id,
        })
    }

    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "info",
            skip(self),
            fields(width = self.grid.width(), height = self.grid.height())
        )
    )]
    pub fn place(&self) -> Result<Placement, PlaceError> {
        let mut board = BoardState::new(self.grid.width(), self.grid.height());
        let mut placed = Vec::with_capacity(self.grid.cell_count());

        for step in SpiralWalk::new(self.grid.width(), self.grid.height()) {
            let cell = self
                .grid
                .get(step.x, step.y)
                .ok_or(PlaceError::MissingCell {
                    x: step.x,
                    y: step.y,
                })?;
            let piece = self
                .pieces
                .get(&cell.piece_id)
                .ok_or(PlaceError::MissingPiece(cell.piece_id))?;
            let p = board.place(step, cell, piece)?;
            placed.push(p);
        }

        let mut borders: Vec<VirtualBorderSide> = board.virtual_sides.into_values().collect();
        borders.sort_by_key(|b| (b.cell.1, b.cell.0));
        Ok(Placement {
            width: self.grid.width(),
            height: self.grid.height(),
            pieces: placed,
            borders,
            board_width: board.board_width,
            board_height: board.board_height,
        })
    }
}

/// Mutable state of one placement run.
struct BoardState {
    width: isize,
    height: isize,
    placed: HashMap<Cell, [Polyline; 4]>,
    virtual_sides: HashMap<Cell, VirtualBorderSide>,
    board_width: f64,
    board_height: f64,
}

#[inline]
fn neighbor_cell((x, y): Cell, slot: SideSlot) -> Cell {
    match slot {
        SideSlot::Top => (x, y - 1),
        SideSlot::Right => (x + 1, y),
        SideSlot::Bottom => (x, y + 1),
        SideSlot::Left => (x - 1, y),
    }
}

#[inline]
fn span(side: &[Point2<f64>]) -> Vector2<f64> {
    side[side.len() - 1] - side[0]
}

impl BoardState {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width: width as isize,
            height: height as isize,
            placed: HashMap::new(),
            virtual_sides: HashMap::new(),
            board_width: 0.0,
            board_height: 0.0,
        }
    }

    fn set_virtual(&mut self, cell: Cell, slot: SideSlot, a: Point2<f64>, b: Point2<f64>) {
        self.virtual_sides.insert(
            cell,
            VirtualBorderSide {
                cell,
                slot,
                vertices: [a, b],
            },
        );
    }

    /// Provisional outside sides for a border cell. Each runs the way the
    /// mating side of a real piece would.
    fn seed_virtual_sides(&mut self, (x, y): Cell) {
        let len = PROVISIONAL_SIDE_LEN;
        if y == 0 {
            self.set_virtual(
                (x, -1),
                SideSlot::Bottom,
                Point2::new(len, 0.0),
                Point2::new(0.0, 0.0),
            );
        }
        if x == 0 {
            self.set_virtual(
                (-1, y),
                SideSlot::Right,
                Point2::new(0.0, 0.0),
                Point2::new(0.0, len),
            );
        }
        if x == self.width - 1 {
            let w = self.board_width;
            self.set_virtual(
                (self.width, y),
                SideSlot::Left,
                Point2::new(w, len),
                Point2::new(w, 0.0),
            );
        }
        if y == self.height - 1 {
            let h = self.board_height;
            self.set_virtual(
                (x, self.height),
                SideSlot::Top,
                Point2::new(0.0, h),
                Point2::new(len, h),
            );
        }
    }

    /// Mating side of the neighbor of `cell` in direction `slot`, if that
    /// neighbor is placed or virtual.
    fn neighbor_side(&self, cell: Cell, slot: SideSlot) -> Option<Polyline> {
        let n = neighbor_cell(cell, slot);
        let mate = slot.opposite();
        if let Some(sides) = self.placed.get(&n) {
            return Some(sides[mate.index()].clone());
        }
        self.virtual_sides
            .get(&n)
            .filter(|v| v.slot == mate)
            .map(|v| v.vertices.to_vec())
    }

    fn place(
        &mut self,
        step: SpiralStep,
        cell: &GridCell,
        piece: &Piece,
    ) -> Result<PlacedPiece, PlaceError> {
        let pos: Cell = (step.x as isize, step.y as isize);
        let (x, y) = pos;
        let (right_col, bottom_row) = (self.width - 1, self.height - 1);
        info!(
            "placing piece {} at [{}, {}] in orientation {}",
            piece.id,
            x,
            y,
            cell.orientation.quarter_turns()
        );

        self.seed_virtual_sides(pos);
        let mut neighbors: [Option<Polyline>; 4] =
            SideSlot::ALL.map(|slot| self.neighbor_side(pos, slot));

        let missing = |slot: SideSlot| PlaceError::MissingReference {
            piece_id: piece.id,
            x: step.x,
            y: step.y,
            slot,
        };

        // Rotation from the single reference neighbor for this heading.
        let slot_map = cell.orientation.slot_map();
        let reference = step.direction.reference_slot();
        let ref_side = neighbors[reference.index()]
            .as_deref()
            .ok_or_else(|| missing(reference))?;
        let ref_angle = wrap_angle_2pi(angle_between(ref_side[0], ref_side[ref_side.len() - 1]));
        let own_angle = wrap_angle_2pi(piece.sides[slot_map[reference.index()]].angle());
        let rotation = ref_angle - own_angle - PI;

        let rotated: [Polyline; 4] =
            slot_map.map(|native| rotate_polyline(&piece.sides[native].vertices, piece.incenter, rotation));
        let [top, right, bottom, left] = &rotated;

        // Pin border pieces to the exact board outline.
        if y == 0 {
            let origin_x = neighbors[SideSlot::Left.index()]
                .as_deref()
                .ok_or_else(|| missing(SideSlot::Left))?[0]
                .x;
            let w = span(top).x;
            let a = Point2::new(origin_x + w, 0.0);
            let b = Point2::new(origin_x, 0.0);
            self.set_virtual((x, -1), SideSlot::Bottom, a, b);
            neighbors[SideSlot::Top.index()] = Some(vec![a, b]);
        }
        if x == right_col {
            if y == 0 {
                let left_x = neighbors[SideSlot::Left.index()]
                    .as_deref()
                    .ok_or_else(|| missing(SideSlot::Left))?[0]
                    .x;
                self.board_width = left_x + span(top).x;
            }
            let origin_y = neighbors[SideSlot::Top.index()]
                .as_deref()
                .ok_or_else(|| missing(SideSlot::Top))?[0]
                .y;
            let h = span(right).y;
            let a = Point2::new(self.board_width, origin_y + h);
            let b = Point2::new(self.board_width, origin_y);
            self.set_virtual((self.width, y), SideSlot::Left, a, b);
            neighbors[SideSlot::Right.index()] = Some(vec![a, b]);
        }
        if y == bottom_row {
            if x == right_col {
                let top_y = neighbors[SideSlot::Top.index()]
                    .as_deref()
                    .ok_or_else(|| missing(SideSlot::Top))?[0]
                    .y;
                self.board_height = top_y + span(right).y;
            }
            // The bottom side runs right to left, so this span is negative.
            let w = span(bottom).x;
            let (origin_x, bottom_y) = match neighbors[SideSlot::Right.index()].as_deref() {
                Some(n) => (n[0].x, self.board_height),
                // Single row before the right end: the board height is not
                // fixed yet, so pin to this piece's own extent.
                None => {
                    let left = neighbors[SideSlot::Left.index()]
                        .as_deref()
                        .ok_or_else(|| missing(SideSlot::Left))?;
                    let top_y = neighbors[SideSlot::Top.index()]
                        .as_deref()
                        .ok_or_else(|| missing(SideSlot::Top))?[0]
                        .y;
                    (left[left.len() - 1].x - w, top_y + span(right).y)
                }
            };
            let a = Point2::new(origin_x + w, bottom_y);
            let b = Point2::new(origin_x, bottom_y);
            self.set_virtual((x, self.height), SideSlot::Top, a, b);
            neighbors[SideSlot::Bottom.index()] = Some(vec![a, b]);
        }
        if x == 0 && y != 0 {
            // Upward side: negative span.
            let h = span(left).y;
            let origin_y = if y == bottom_row {
                self.board_height
            } else if let Some(n) = neighbors[SideSlot::Bottom.index()].as_deref() {
                n[0].y
            } else {
                // Single column walked downwards: hang from the piece above.
                let top = neighbors[SideSlot::Top.index()]
                    .as_deref()
                    .ok_or_else(|| missing(SideSlot::Top))?;
                top[top.len() - 1].y - h
            };
            let a = Point2::new(0.0, origin_y + h);
            let b = Point2::new(0.0, origin_y);
            self.set_virtual((-1, y), SideSlot::Right, a, b);
            neighbors[SideSlot::Left.index()] = Some(vec![a, b]);
        }

        // Each available neighbor proposes the offset that joins its end
        // vertex to the start vertex of our facing side.
        let translation = if pos == (0, 0) {
            -top[0].coords
        } else {
            let samples: Vec<Vector2<f64>> = SideSlot::ALL
                .iter()
                .filter_map(|slot| {
                    let n = neighbors[slot.index()].as_deref()?;
                    Some(n[n.len() - 1] - rotated[slot.index()][0])
                })
                .collect();
            mean_vector(&samples).ok_or_else(|| missing(reference))?
        };

        let sides = rotated.map(|s| translate_polyline(&s, translation));
        let incenter = piece.incenter + translation;
        debug!(
            "piece {}: rotate by {:.1}° and translate by ({:.2}, {:.2})",
            piece.id,
            wrap_angle_pi(rotation).to_degrees(),
            translation.x,
            translation.y
        );

        self.placed.insert(pos, sides.clone());
        Ok(PlacedPiece {
            piece_id: piece.id,
            x: step.x,
            y: step.y,
            orientation: cell.orientation,
            direction: step.direction,
            sides,
            incenter,
            rotation: wrap_angle_pi(rotation),
            translation,
        })
    }
}
