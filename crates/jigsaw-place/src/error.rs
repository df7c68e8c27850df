use crate::grid::BoardGridError;
use jigsaw_core::{PieceId, RecordError, SideSlot};

/// Errors returned by the placer and the placement writers.
#[derive(thiserror::Error, Debug)]
pub enum PlaceError {
    #[error(transparent)]
    Grid(#[from] BoardGridError),
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error("piece {0} is on the board but was not provided")]
    MissingPiece(PieceId),
    #[error("piece {0} was provided more than once")]
    DuplicatePiece(PieceId),
    #[error("board has no cell at [{x}, {y}]")]
    MissingCell { x: usize, y: usize },
    #[error("piece {piece_id} at [{x}, {y}] has no {slot:?} neighbor to align against")]
    MissingReference {
        piece_id: PieceId,
        x: usize,
        y: usize,
        slot: SideSlot,
    },
}
