//! Board placement for a solved jigsaw.
//!
//! Given the solved grid (piece id and quarter-turn orientation per cell)
//! and each piece's side geometry, computes the rotation and translation
//! that moves every piece from where it was photographed into its final
//! spot, visiting cells along a clockwise inward spiral and aligning each
//! piece only against neighbors already placed.
//!
//! ```no_run
//! use jigsaw_place::{BoardGrid, PiecePlacer};
//! # fn pieces() -> Vec<jigsaw_core::Piece> { Vec::new() }
//!
//! let grid = BoardGrid::from_rows(&[vec![(1, 0), (2, 1)]])?;
//! let pieces = pieces();
//! let placement = PiecePlacer::new(&grid, &pieces)?.place()?;
//! println!("board is {} wide", placement.board_width);
//! # Ok::<(), jigsaw_place::PlaceError>(())
//! ```

mod error;
mod grid;
mod io;
mod placer;
mod record;
mod render;
mod spiral;

use jigsaw_core::AssemblyConfig;
use serde::{Deserialize, Serialize};

pub use error::PlaceError;
pub use grid::{BoardGrid, BoardGridError, BoardGridFile, GridCell};
pub use io::{place_dir, BOARD_SVG_FILE};
pub use placer::{PiecePlacer, PlacedPiece, Placement, VirtualBorderSide};
pub use record::PlacementRecord;
pub use render::render_board_svg;
pub use spiral::{Direction, SpiralStep, SpiralWalk};

/// Output settings for a placement run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacementParams {
    /// Coordinate scale for `board.svg`.
    pub svg_scale: f64,
}

impl Default for PlacementParams {
    fn default() -> Self {
        Self::from_config(&AssemblyConfig::default())
    }
}

impl PlacementParams {
    pub fn from_config(cfg: &AssemblyConfig) -> Self {
        Self {
            svg_scale: cfg.svg_scale,
        }
    }
}
