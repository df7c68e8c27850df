//! Solved board layout: which piece goes in which cell, in which orientation.

use jigsaw_core::{InvalidOrientation, Orientation, PieceId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::{fs, path::Path};

/// Board grid validation and loading errors.
#[derive(thiserror::Error, Debug)]
pub enum BoardGridError {
    #[error("board must be at least 1x1 (got {width}x{height})")]
    InvalidSize { width: usize, height: usize },
    #[error("board {width}x{height} needs {expected} cells, got {found}")]
    CellCount {
        width: usize,
        height: usize,
        expected: usize,
        found: usize,
    },
    #[error("piece {piece_id} is used at both {first:?} and {second:?}")]
    DuplicatePiece {
        piece_id: PieceId,
        first: [usize; 2],
        second: [usize; 2],
    },
    #[error(transparent)]
    Orientation(#[from] InvalidOrientation),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Assignment for one board cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    pub piece_id: PieceId,
    pub orientation: Orientation,
}

/// On-disk form of a board: cells in row-major order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BoardGridFile {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<GridCell>,
}

/// A validated `width x height` board assignment.
///
/// Every cell is filled and every piece id appears exactly once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BoardGridFile", into = "BoardGridFile")]
pub struct BoardGrid {
    width: usize,
    height: usize,
    cells: Vec<GridCell>,
}

impl TryFrom<BoardGridFile> for BoardGrid {
    type Error = BoardGridError;

    fn try_from(file: BoardGridFile) -> Result<Self, Self::Error> {
        BoardGrid::new(file.width, file.height, file.cells)
    }
}

impl From<BoardGrid> for BoardGridFile {
    fn from(grid: BoardGrid) -> Self {
        BoardGridFile {
            width: grid.width,
            height: grid.height,
            cells: grid.cells,
        }
    }
}

impl BoardGrid {
    /// Validate and create a grid from row-major cells.
    pub fn new(width: usize, height: usize, cells: Vec<GridCell>) -> Result<Self, BoardGridError> {
        if width == 0 || height == 0 {
            return Err(BoardGridError::InvalidSize { width, height });
        }
        let expected = width * height;
        if cells.len() != expected {
            return Err(BoardGridError::CellCount {
                width,
                height,
                expected,
                found: cells.len(),
            });
        }

        let mut seen: HashMap<PieceId, usize> = HashMap::with_capacity(cells.len());
        for (i, cell) in cells.iter().enumerate() {
            if let Some(first) = seen.insert(cell.piece_id, i) {
                return Err(BoardGridError::DuplicatePiece {
                    piece_id: cell.piece_id,
                    first: [first % width, first / width],
                    second: [i % width, i / width],
                });
            }
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Build a grid from rows of `(piece id, quarter turns)`.
    pub fn from_rows(rows: &[Vec<(PieceId, u8)>]) -> Result<Self, BoardGridError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let mut cells = Vec::with_capacity(width * height);
        for row in rows {
            if row.len() != width {
                return Err(BoardGridError::CellCount {
                    width,
                    height,
                    expected: width * height,
                    found: rows.iter().map(Vec::len).sum(),
                });
            }
            for &(piece_id, k) in row {
                cells.push(GridCell {
                    piece_id,
                    orientation: Orientation::new(k)?,
                });
            }
        }
        Self::new(width, height, cells)
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, BoardGridError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), BoardGridError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<&GridCell> {
        if x < self.width && y < self.height {
            self.cells.get(y * self.width + x)
        } else {
            None
        }
    }

    /// Piece ids in row-major order.
    pub fn piece_ids(&self) -> impl Iterator<Item = PieceId> + '_ {
        self.cells.iter().map(|c| c.piece_id)
    }
}
