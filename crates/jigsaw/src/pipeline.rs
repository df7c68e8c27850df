//! One call per pipeline stage, driven by an [`AssemblyConfig`].

use jigsaw_core::{AssemblyConfig, ConfigError, PieceId, RecordError};
use jigsaw_dedup::{
    deduplicate_dir, ensure_piece_count, DedupError, DedupParams, DedupReport, DEDUPE_REPORT_FILE,
};
use jigsaw_place::{place_dir, BoardGrid, BoardGridError, PlaceError, Placement, PlacementParams};
use log::{info, warn};
use std::collections::BTreeSet;
use std::path::Path;

#[cfg(feature = "tracing")]
use tracing::instrument;

#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error(transparent)]
    Dedup(#[from] DedupError),
    #[error(transparent)]
    Place(#[from] PlaceError),
    #[error(transparent)]
    Grid(#[from] BoardGridError),
}

/// Load a config file, or the defaults when `path` is `None`.
pub fn load_config(path: Option<&Path>) -> Result<AssemblyConfig, PipelineError> {
    match path {
        Some(p) => Ok(AssemblyConfig::load_json(p)?),
        None => Ok(AssemblyConfig::default()),
    }
}

/// Remove duplicate pieces from `input` into `output`.
///
/// Fails with [`DedupError::CountMismatch`] when the config names an
/// expected piece count and the survivors do not match it; the surviving
/// records are still written in that case.
#[cfg_attr(feature = "tracing", instrument(level = "info", skip(cfg)))]
pub fn run_dedupe(
    batch: &Path,
    input: &Path,
    output: &Path,
    cfg: &AssemblyConfig,
) -> Result<DedupReport, PipelineError> {
    let report = deduplicate_dir(batch, input, output, &DedupParams::from_config(cfg))?;
    let flagged = report.clusters.iter().filter(|c| c.has_mismatch()).count();
    if flagged > 0 {
        warn!("{flagged} duplicate clusters disagree geometrically; check the vision stage");
    }
    if let Some(expected) = cfg.expected_piece_count {
        ensure_piece_count(&report, expected)?;
        info!("piece count matches the expected {expected}");
    }
    Ok(report)
}

/// Pieces flagged by a dedupe report: the explicit `report` path if given,
/// otherwise `dedupe_report.json` in `pieces_dir` when present.
pub fn mismatched_pieces(
    pieces_dir: &Path,
    report: Option<&Path>,
) -> Result<BTreeSet<PieceId>, PipelineError> {
    let path = match report {
        Some(p) => p.to_path_buf(),
        None => {
            let p = pieces_dir.join(DEDUPE_REPORT_FILE);
            if !p.exists() {
                return Ok(BTreeSet::new());
            }
            p
        }
    };
    Ok(DedupReport::load_json(path)?.mismatched_pieces())
}

/// Place the solved board and write placement records plus `board.svg`.
#[cfg_attr(feature = "tracing", instrument(level = "info", skip(cfg)))]
pub fn run_place(
    board: &Path,
    pieces_dir: &Path,
    output: &Path,
    cfg: &AssemblyConfig,
    dedupe_report: Option<&Path>,
) -> Result<Placement, PipelineError> {
    let mismatched = mismatched_pieces(pieces_dir, dedupe_report)?;
    if !mismatched.is_empty() {
        info!("{} pieces carry a geometry mismatch flag", mismatched.len());
    }
    let placement = place_dir(
        board,
        pieces_dir,
        output,
        &PlacementParams::from_config(cfg),
        &mismatched,
    )?;
    Ok(placement)
}

/// Survivors land in `work/deduped`, placement output in `work/solution`.
pub const DEDUPED_DIR: &str = "deduped";
pub const SOLUTION_DIR: &str = "solution";

/// Dedupe `input`, then place the survivors on `board`.
///
/// Without an explicit `expected_piece_count` the board's cell count is
/// enforced, so a missed duplicate fails the run instead of leaving an
/// unplaced survivor behind.
#[cfg_attr(feature = "tracing", instrument(level = "info", skip(cfg)))]
pub fn run_assemble(
    batch: &Path,
    input: &Path,
    board: &Path,
    work: &Path,
    cfg: &AssemblyConfig,
) -> Result<(DedupReport, Placement), PipelineError> {
    let grid = BoardGrid::load_json(board)?;
    let mut cfg = cfg.clone();
    cfg.expected_piece_count = cfg.expected_piece_count.or(Some(grid.cell_count()));

    let deduped = work.join(DEDUPED_DIR);
    let report = run_dedupe(batch, input, &deduped, &cfg)?;
    let placement = run_place(board, &deduped, &work.join(SOLUTION_DIR), &cfg, None)?;
    Ok((report, placement))
}
