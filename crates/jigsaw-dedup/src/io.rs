//! Directory-level dedupe: load records, detect, copy survivors.

use crate::{DedupError, DedupParams, DedupReport, DuplicateDetector};
use jigsaw_core::{
    find_outline_file, load_piece_records, side_record_file_name, BatchPhotoMetadata, Piece,
    RecordError,
};
use log::{debug, info};
use std::{fs, path::Path};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Report written next to the surviving records.
pub const DEDUPE_REPORT_FILE: &str = "dedupe_report.json";

fn copy_file(from: &Path, to: &Path) -> Result<(), RecordError> {
    fs::copy(from, to).map_err(|source| RecordError::Io {
        path: from.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Load every piece from `input`, remove duplicates and copy the survivors'
/// side records and outline into `output`.
///
/// `dedupe_report.json` is written into `output` as well. The piece count
/// is not checked here; see [`ensure_piece_count`].
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(params), fields(batch = %batch_path.display()))
)]
pub fn deduplicate_dir(
    batch_path: &Path,
    input: &Path,
    output: &Path,
    params: &DedupParams,
) -> Result<DedupReport, DedupError> {
    info!("loading piece data from {}", input.display());
    let records = load_piece_records(input)?;
    let pieces = records
        .iter()
        .map(|r| r.to_piece())
        .collect::<Result<Vec<Piece>, _>>()?;
    let batch = BatchPhotoMetadata::load_json(batch_path)?;
    debug!("{} pieces, {} photos", pieces.len(), batch.len());

    let report = DuplicateDetector::new(params.clone()).detect(&pieces, &batch)?;

    fs::create_dir_all(output).map_err(|source| RecordError::Io {
        path: output.to_path_buf(),
        source,
    })?;
    for &id in &report.survivors {
        for side in 0..4 {
            let name = side_record_file_name(id, side);
            copy_file(&input.join(&name), &output.join(&name))?;
        }
        let outline = find_outline_file(input, id)?.ok_or(DedupError::MissingOutline(id))?;
        if let Some(name) = outline.file_name() {
            copy_file(&outline, &output.join(name))?;
        }
    }
    report.write_json(output.join(DEDUPE_REPORT_FILE))?;
    Ok(report)
}

/// Fail unless exactly `expected` pieces survived.
pub fn ensure_piece_count(report: &DedupReport, expected: usize) -> Result<(), DedupError> {
    let found = report.unique_count();
    if found != expected {
        return Err(DedupError::CountMismatch { expected, found });
    }
    Ok(())
}
