use jigsaw_core::{PieceId, RecordError};

/// Errors returned by duplicate detection and the directory-level dedupe.
#[derive(thiserror::Error, Debug)]
pub enum DedupError {
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error("piece {piece_id} comes from photo {file_name}, which has no batch metadata")]
    UnknownPhoto { piece_id: PieceId, file_name: String },
    #[error("piece id {0} appears more than once")]
    DuplicatePieceId(PieceId),
    #[error("piece {0} has no vector outline file")]
    MissingOutline(PieceId),
    #[error("expected {expected} unique pieces after dedupe, found {found}")]
    CountMismatch { expected: usize, found: usize },
}
