//! High-level facade for the `jigsaw-*` workspace.
//!
//! This crate provides:
//! - re-exports of the stage crates
//! - end-to-end helpers that run one pipeline stage from an
//!   [`AssemblyConfig`], enforcing the run-level checks (expected piece
//!   count, mismatch propagation into placement records)
//! - the `jigsaw` command-line tool (feature `cli`)
//!
//! ## Quickstart
//!
//! ```no_run
//! use jigsaw::{pipeline, AssemblyConfig};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), jigsaw::PipelineError> {
//! let cfg = AssemblyConfig {
//!     expected_piece_count: Some(1000),
//!     ..AssemblyConfig::default()
//! };
//! let report = pipeline::run_dedupe(
//!     Path::new("batch.json"),
//!     Path::new("vectors"),
//!     Path::new("deduped"),
//!     &cfg,
//! )?;
//! println!("{} unique pieces", report.unique_count());
//!
//! let placement = pipeline::run_place(
//!     Path::new("board.json"),
//!     Path::new("deduped"),
//!     Path::new("solution"),
//!     &cfg,
//!     None,
//! )?;
//! println!("board is {:.0} x {:.0}", placement.board_width, placement.board_height);
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `jigsaw::core`: geometry, pieces, records, configuration, logging.
//! - `jigsaw::dedup`: duplicate detection and directory dedupe.
//! - `jigsaw::place`: board grid, spiral traversal, placement and rendering.
//! - `jigsaw::pipeline`: one call per stage.

pub use jigsaw_core as core;
pub use jigsaw_dedup as dedup;
pub use jigsaw_place as place;

pub use jigsaw_core::{AssemblyConfig, ClusteringMode, ConfigError, Piece, PieceId, RecordError};
pub use jigsaw_dedup::{DedupError, DedupReport, DuplicateDetector};
pub use jigsaw_place::{BoardGrid, PiecePlacer, PlaceError, Placement};

pub mod pipeline;

pub use pipeline::PipelineError;
