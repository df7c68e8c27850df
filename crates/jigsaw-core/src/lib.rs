//! Core types for robotic jigsaw assembly.
//!
//! Pieces, sides and their on-disk records, the photo-to-motor mapping,
//! quarter-turn orientations and run configuration. Purely geometric; the
//! vision front end and the robot driver live elsewhere.

mod config;
mod geometry;
mod logger;
mod mapper;
mod orientation;
mod piece;
mod records;
mod side;

pub use config::{AssemblyConfig, ClusteringMode, ConfigError};
pub use geometry::{
    angle_between, angle_diff_abs, mean_vector, polyline_length, resample_polyline,
    rotate_about, rotate_polyline, translate_polyline, wrap_angle_2pi, wrap_angle_pi, Polyline,
};
pub use mapper::MotorSpaceMapper;
pub use orientation::{cyclic_order, InvalidOrientation, Orientation, SideSlot};
pub use piece::{PhotoFootprint, Piece, PieceId};
pub use records::{
    discover_piece_ids, find_outline_file, load_piece_records, side_record_file_name, write_json,
    BatchPhotoEntry, BatchPhotoMetadata, PieceRecord, RecordError, SideRecord,
};
pub use side::{ChordFrameFit, Side, SideFit};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_with_level, level_for_verbosity};
