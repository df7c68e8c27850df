//! Directory-level placement: load the board and records, place, write
//! outputs.

use crate::grid::BoardGrid;
use crate::placer::{PiecePlacer, Placement};
use crate::record::PlacementRecord;
use crate::render::render_board_svg;
use crate::{PlaceError, PlacementParams};
use jigsaw_core::{Piece, PieceId, PieceRecord, RecordError};
use log::info;
use std::collections::{BTreeSet, HashMap};
use std::{fs, path::Path};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Debug rendering written next to the placement records.
pub const BOARD_SVG_FILE: &str = "board.svg";

/// Place the pieces of `board_path` using the records in `pieces_dir` and
/// write `{piece_id}.json` for each piece plus `board.svg` into `output`.
///
/// Pieces listed in `mismatched` get `geometry_mismatch` set in their record.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(params, mismatched), fields(board = %board_path.display()))
)]
pub fn place_dir(
    board_path: &Path,
    pieces_dir: &Path,
    output: &Path,
    params: &PlacementParams,
    mismatched: &BTreeSet<PieceId>,
) -> Result<Placement, PlaceError> {
    let grid = BoardGrid::load_json(board_path)?;
    info!(
        "placing a {}x{} board from {}",
        grid.width(),
        grid.height(),
        pieces_dir.display()
    );

    let records: HashMap<PieceId, PieceRecord> = grid
        .piece_ids()
        .map(|id| PieceRecord::load(pieces_dir, id).map(|r| (id, r)))
        .collect::<Result<_, _>>()?;
    let pieces = records
        .values()
        .map(PieceRecord::to_piece)
        .collect::<Result<Vec<Piece>, _>>()?;

    let placement = PiecePlacer::new(&grid, &pieces)?.place()?;

    fs::create_dir_all(output).map_err(|source| RecordError::Io {
        path: output.to_path_buf(),
        source,
    })?;
    for placed in &placement.pieces {
        let record = records
            .get(&placed.piece_id)
            .ok_or(PlaceError::MissingPiece(placed.piece_id))?;
        PlacementRecord::new(
            placed,
            &record.sides[0],
            mismatched.contains(&placed.piece_id),
        )
        .write_json(output.join(PlacementRecord::file_name(placed.piece_id)))?;
    }

    let svg_path = output.join(BOARD_SVG_FILE);
    fs::write(&svg_path, render_board_svg(&placement, params.svg_scale)).map_err(|source| {
        RecordError::Io {
            path: svg_path.clone(),
            source,
        }
    })?;
    info!(
        "placed {} pieces; board is {:.1} x {:.1}",
        placement.pieces.len(),
        placement.board_width,
        placement.board_height
    );
    Ok(placement)
}
