use assert_cmd::Command;
use jigsaw::core::{BatchPhotoMetadata, PieceId, PieceRecord, SideRecord};
use jigsaw::{AssemblyConfig, BoardGrid, DedupReport};
use nalgebra::Point2;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn side_record(verts: Vec<[f64; 2]>, photo: &str, centroid: [f64; 2]) -> SideRecord {
    SideRecord {
        vertices: verts,
        incenter: centroid,
        piece_center: Some(centroid),
        is_edge: false,
        original_photo_name: photo.to_string(),
        photo_width: 800.0,
        photo_height: 600.0,
        photo_space_centroid: centroid,
        photo_space_origin: None,
        photo_space_incenter: Some(centroid),
        robot_state: None,
    }
}

fn write_piece(dir: &Path, id: PieceId, photo: &str, centroid: [f64; 2]) {
    let [cx, cy] = centroid;
    let corners = [
        [cx - 50.0, cy - 50.0],
        [cx + 50.0, cy - 50.0],
        [cx + 50.0, cy + 50.0],
        [cx - 50.0, cy + 50.0],
    ];
    let sides =
        [0, 1, 2, 3].map(|i| side_record(vec![corners[i], corners[(i + 1) % 4]], photo, centroid));
    PieceRecord { id, sides }.write(dir).unwrap();
    fs::write(dir.join(format!("{id}_({cx},{cy}).svg")), "<svg/>").unwrap();
}

/// Three records of two physical pieces plus batch metadata and a 2x1 board.
fn write_inputs(dir: &Path) {
    BatchPhotoMetadata::from_positions([
        ("a.jpeg".to_string(), Point2::new(0.0, 0.0)),
        ("b.jpeg".to_string(), Point2::new(3_000.0, 2_000.0)),
    ])
    .write_json(dir.join("batch.json"))
    .unwrap();

    let vectors = dir.join("vectors");
    fs::create_dir_all(&vectors).unwrap();
    write_piece(&vectors, 1, "b.jpeg", [100.0, 500.0]);
    write_piece(&vectors, 2, "a.jpeg", [400.0, 300.0]);
    write_piece(&vectors, 3, "a.jpeg", [150.0, 100.0]);

    BoardGrid::from_rows(&[vec![(2, 0), (3, 0)]])
        .unwrap()
        .write_json(dir.join("board.json"))
        .unwrap();
}

fn jigsaw() -> Command {
    Command::cargo_bin("jigsaw").unwrap()
}

#[test]
fn config_prints_defaults() {
    let out = jigsaw().arg("config").assert().success();
    let stdout = String::from_utf8(out.get_output().stdout.clone()).unwrap();
    let cfg: AssemblyConfig = serde_json::from_str(&stdout).unwrap();
    assert_eq!(cfg, AssemblyConfig::default());
}

#[test]
fn config_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    jigsaw()
        .args(["config", "--out"])
        .arg(&path)
        .assert()
        .success();
    assert_eq!(
        AssemblyConfig::load_json(&path).unwrap(),
        AssemblyConfig::default()
    );
}

#[test]
fn dedupe_reports_counts() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());
    let deduped = dir.path().join("deduped");

    jigsaw()
        .arg("dedupe")
        .arg("--batch")
        .arg(dir.path().join("batch.json"))
        .arg("--input")
        .arg(dir.path().join("vectors"))
        .arg("--output")
        .arg(&deduped)
        .args(["--expected", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 pieces in, 2 unique, 1 removed"));

    let report = DedupReport::load_json(deduped.join("dedupe_report.json")).unwrap();
    assert_eq!(report.survivors, vec![2, 3]);
}

#[test]
fn dedupe_fails_on_count_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());

    jigsaw()
        .arg("dedupe")
        .arg("--batch")
        .arg(dir.path().join("batch.json"))
        .arg("--input")
        .arg(dir.path().join("vectors"))
        .arg("--output")
        .arg(dir.path().join("deduped"))
        .args(["--expected", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("CountMismatch"));
}

#[test]
fn assemble_runs_both_stages() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());
    let work = dir.path().join("work");

    jigsaw()
        .arg("assemble")
        .arg("--batch")
        .arg(dir.path().join("batch.json"))
        .arg("--input")
        .arg(dir.path().join("vectors"))
        .arg("--board")
        .arg(dir.path().join("board.json"))
        .arg("--work")
        .arg(&work)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 unique pieces"));

    let solution = work.join("solution");
    assert!(solution.join("board.svg").exists());
    assert!(solution.join("2.json").exists());
    assert!(solution.join("3.json").exists());
    assert!(!solution.join("1.json").exists());
}

#[test]
fn assemble_fails_when_survivors_exceed_board() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());
    // A fourth record nowhere near the others survives dedupe, leaving one
    // more piece than the board has cells.
    write_piece(&dir.path().join("vectors"), 4, "a.jpeg", [700.0, 120.0]);
    let work = dir.path().join("work");

    jigsaw()
        .arg("assemble")
        .arg("--batch")
        .arg(dir.path().join("batch.json"))
        .arg("--input")
        .arg(dir.path().join("vectors"))
        .arg("--board")
        .arg(dir.path().join("board.json"))
        .arg("--work")
        .arg(&work)
        .assert()
        .failure()
        .stderr(predicate::str::contains("CountMismatch"));

    assert!(!work.join("solution").join("board.svg").exists());
}

#[test]
fn place_rejects_missing_board() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());

    jigsaw()
        .arg("place")
        .arg("--board")
        .arg(dir.path().join("nope.json"))
        .arg("--pieces")
        .arg(dir.path().join("vectors"))
        .arg("--output")
        .arg(dir.path().join("solution"))
        .assert()
        .failure();
}
