//! Clockwise inward spiral over the board cells.

use jigsaw_core::SideSlot;
use serde::{Deserialize, Serialize};

/// Heading of the spiral walk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Right,
    Down,
    Left,
    Up,
}

impl Direction {
    #[inline]
    pub fn step(self) -> (isize, isize) {
        match self {
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Up => (0, -1),
        }
    }

    #[inline]
    pub fn turn_clockwise(self) -> Direction {
        match self {
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
            Direction::Up => Direction::Right,
        }
    }

    /// Slot of the already placed neighbor a piece entered this way is
    /// rotated against: the side on the outer, already completed ring.
    #[inline]
    pub fn reference_slot(self) -> SideSlot {
        match self {
            Direction::Right => SideSlot::Top,
            Direction::Down => SideSlot::Right,
            Direction::Left => SideSlot::Bottom,
            Direction::Up => SideSlot::Left,
        }
    }
}

/// One visited cell and the heading it was entered with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpiralStep {
    pub x: usize,
    pub y: usize,
    pub direction: Direction,
}

/// Iterator over a `width x height` grid: starts at `(0, 0)` heading right
/// and turns clockwise whenever the next cell is off the grid or already
/// visited. Yields every cell exactly once.
#[derive(Clone, Debug)]
pub struct SpiralWalk {
    width: usize,
    height: usize,
    visited: Vec<bool>,
    next: Option<SpiralStep>,
}

impl SpiralWalk {
    pub fn new(width: usize, height: usize) -> Self {
        let next = (width > 0 && height > 0).then_some(SpiralStep {
            x: 0,
            y: 0,
            direction: Direction::Right,
        });
        Self {
            width,
            height,
            visited: vec![false; width * height],
            next,
        }
    }

    fn open(&self, x: usize, y: usize, dir: Direction) -> Option<(usize, usize)> {
        let (dx, dy) = dir.step();
        let nx = x.checked_add_signed(dx)?;
        let ny = y.checked_add_signed(dy)?;
        (nx < self.width && ny < self.height && !self.visited[ny * self.width + nx])
            .then_some((nx, ny))
    }
}

impl Iterator for SpiralWalk {
    type Item = SpiralStep;

    fn next(&mut self) -> Option<SpiralStep> {
        let step = self.next.take()?;
        self.visited[step.y * self.width + step.x] = true;

        let mut dir = step.direction;
        for _ in 0..4 {
            if let Some((x, y)) = self.open(step.x, step.y, dir) {
                self.next = Some(SpiralStep {
                    x,
                    y,
                    direction: dir,
                });
                break;
            }
            dir = dir.turn_clockwise();
        }
        Some(step)
    }
}
