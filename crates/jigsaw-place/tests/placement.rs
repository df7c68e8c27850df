mod common;

use approx::assert_abs_diff_eq;
use common::SyntheticBoard;
use jigsaw_core::{wrap_angle_pi, SideSlot};
use jigsaw_place::{BoardGrid, PlaceError, PiecePlacer, Placement, SpiralWalk};
use nalgebra::Vector2;

const EPS: f64 = 1e-6;

fn place(board: &SyntheticBoard) -> Placement {
    let grid = board.grid();
    let pieces = board.pieces();
    PiecePlacer::new(&grid, &pieces).unwrap().place().unwrap()
}

fn boards() -> Vec<SyntheticBoard> {
    vec![
        SyntheticBoard::new(&[100.0, 100.0, 100.0], &[100.0, 100.0, 100.0]),
        SyntheticBoard::new(&[90.0, 110.0, 104.0, 97.0], &[101.0, 95.0, 120.0]),
        SyntheticBoard::new(&[80.0, 120.0], &[100.0, 93.0, 111.0, 99.0, 105.0]),
        SyntheticBoard::new(&[100.0, 100.0], &[100.0, 100.0]),
        SyntheticBoard::new(&[100.0, 100.0], &[100.0]),
        SyntheticBoard::new(&[90.0, 110.0, 104.0], &[100.0]),
        SyntheticBoard::new(&[100.0], &[101.0, 95.0, 120.0]),
        SyntheticBoard::new(&[96.0], &[104.0]),
    ]
}

#[test]
fn every_piece_lands_in_its_cell() {
    for board in boards() {
        let placement = place(&board);
        assert_eq!(placement.pieces.len(), board.width() * board.height());
        for y in 0..board.height() {
            for x in 0..board.width() {
                let placed = placement.get(x, y).unwrap();
                assert_eq!(placed.piece_id, board.piece_id(x, y));
                let target = board.target_sides(x, y);
                for slot in SideSlot::ALL {
                    let got = placed.side(slot);
                    let want = &target[slot.index()];
                    assert_eq!(got.len(), want.len());
                    for (g, w) in got.iter().zip(want) {
                        assert_abs_diff_eq!(g.x, w.x, epsilon = EPS);
                        assert_abs_diff_eq!(g.y, w.y, epsilon = EPS);
                    }
                }
                let c = board.target_center(x, y);
                assert_abs_diff_eq!(placed.incenter.x, c.x, epsilon = EPS);
                assert_abs_diff_eq!(placed.incenter.y, c.y, epsilon = EPS);
            }
        }
    }
}

#[test]
fn rotation_undoes_photo_pose() {
    let board = SyntheticBoard::new(&[90.0, 110.0, 104.0], &[101.0, 95.0, 120.0]);
    let placement = place(&board);
    for placed in &placement.pieces {
        let (theta, _) = board.photo_pose(placed.x, placed.y);
        assert!(placed.rotation > -std::f64::consts::PI - EPS);
        assert!(placed.rotation <= std::f64::consts::PI + EPS);
        assert_abs_diff_eq!(
            wrap_angle_pi(placed.rotation + theta),
            0.0,
            epsilon = 1e-9
        );
    }
}

#[test]
fn board_outline_is_a_rectangle() {
    for board in boards() {
        let placement = place(&board);
        let (w, h) = (board.width(), board.height());
        assert_abs_diff_eq!(placement.board_width, board.total_width(), epsilon = EPS);
        assert_abs_diff_eq!(placement.board_height, board.total_height(), epsilon = EPS);

        for p in &placement.pieces {
            if p.x == 0 {
                for v in p.side(SideSlot::Left) {
                    assert_abs_diff_eq!(v.x, 0.0, epsilon = EPS);
                }
            }
            if p.y == 0 {
                let top = p.side(SideSlot::Top);
                assert_abs_diff_eq!(top[0].y, 0.0, epsilon = EPS);
                assert_abs_diff_eq!(top[top.len() - 1].y, 0.0, epsilon = EPS);
            }
            if p.x == w - 1 {
                let right = p.side(SideSlot::Right);
                assert_abs_diff_eq!(right[0].x, placement.board_width, epsilon = EPS);
                assert_abs_diff_eq!(right[right.len() - 1].x, placement.board_width, epsilon = EPS);
            }
            if p.y == h - 1 {
                let bottom = p.side(SideSlot::Bottom);
                assert_abs_diff_eq!(bottom[0].y, placement.board_height, epsilon = EPS);
                assert_abs_diff_eq!(
                    bottom[bottom.len() - 1].y,
                    placement.board_height,
                    epsilon = EPS
                );
            }
        }
    }
}

#[test]
fn reference_neighbor_endpoints_meet() {
    for board in boards() {
        let placement = place(&board);
        for step in SpiralWalk::new(board.width(), board.height()).skip(1) {
            let slot = step.direction.reference_slot();
            let (dx, dy): (isize, isize) = match slot {
                SideSlot::Top => (0, -1),
                SideSlot::Right => (1, 0),
                SideSlot::Bottom => (0, 1),
                SideSlot::Left => (-1, 0),
            };
            let (Some(nx), Some(ny)) = (
                step.x.checked_add_signed(dx),
                step.y.checked_add_signed(dy),
            ) else {
                continue;
            };
            let Some(neighbor) = placement.get(nx, ny) else {
                continue;
            };
            let here = placement.get(step.x, step.y).unwrap();
            let mate = neighbor.side(slot.opposite());
            let end = mate[mate.len() - 1];
            let start = here.side(slot)[0];
            assert_abs_diff_eq!(end.x, start.x, epsilon = EPS);
            assert_abs_diff_eq!(end.y, start.y, epsilon = EPS);
        }
    }
}

#[test]
fn first_piece_starts_at_origin() {
    let board = SyntheticBoard::new(&[90.0, 110.0], &[101.0, 95.0]);
    let placement = place(&board);
    let first = &placement.pieces[0];
    assert_eq!((first.x, first.y), (0, 0));
    let top = first.side(SideSlot::Top);
    assert_abs_diff_eq!(top[0].x, 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(top[0].y, 0.0, epsilon = 1e-12);
}

#[test]
fn virtual_borders_are_anchored() {
    let board = SyntheticBoard::new(&[90.0, 110.0, 104.0], &[101.0, 95.0]);
    let placement = place(&board);
    // Three top, three bottom, two left and two right outside cells.
    assert_eq!(placement.borders.len(), 10);
    for b in &placement.borders {
        match b.slot {
            SideSlot::Bottom => {
                assert_eq!(b.cell.1, -1);
                assert_abs_diff_eq!(b.first().y, 0.0, epsilon = EPS);
                assert_abs_diff_eq!(b.last().y, 0.0, epsilon = EPS);
            }
            SideSlot::Right => {
                assert_eq!(b.cell.0, -1);
                assert_abs_diff_eq!(b.last().x, 0.0, epsilon = EPS);
            }
            SideSlot::Left => {
                assert_eq!(b.cell.0, 3);
                assert_abs_diff_eq!(b.last().x, placement.board_width, epsilon = EPS);
            }
            SideSlot::Top => {
                assert_eq!(b.cell.1, 2);
                assert_abs_diff_eq!(b.last().y, placement.board_height, epsilon = EPS);
            }
        }
    }
}

#[test]
fn single_row_and_column_borders() {
    let row = place(&SyntheticBoard::new(&[90.0, 110.0, 104.0], &[100.0]));
    assert_eq!(row.pieces.len(), 3);
    // Three top, three bottom, one left and one right outside cell.
    assert_eq!(row.borders.len(), 8);
    for b in row.borders.iter().filter(|b| b.slot == SideSlot::Top) {
        assert_abs_diff_eq!(b.first().y, 100.0, epsilon = EPS);
        assert_abs_diff_eq!(b.last().y, 100.0, epsilon = EPS);
    }

    let column = place(&SyntheticBoard::new(&[100.0], &[101.0, 95.0, 120.0]));
    assert_eq!(column.pieces.len(), 3);
    assert_eq!(column.borders.len(), 8);
    for b in column.borders.iter().filter(|b| b.slot == SideSlot::Right) {
        assert_abs_diff_eq!(b.first().x, 0.0, epsilon = EPS);
        assert_abs_diff_eq!(b.last().x, 0.0, epsilon = EPS);
    }
}

#[test]
fn translation_matches_incenter_shift() {
    let board = SyntheticBoard::new(&[100.0, 100.0], &[100.0, 100.0]);
    let placement = place(&board);
    for p in &placement.pieces {
        let (_, shift) = board.photo_pose(p.x, p.y);
        let photographed = board.target_center(p.x, p.y) + shift;
        let expected: Vector2<f64> = board.target_center(p.x, p.y) - photographed;
        assert_abs_diff_eq!(p.translation.x, expected.x, epsilon = EPS);
        assert_abs_diff_eq!(p.translation.y, expected.y, epsilon = EPS);
    }
}

#[test]
fn missing_piece_is_rejected() {
    let board = SyntheticBoard::new(&[100.0, 100.0], &[100.0]);
    let grid = board.grid();
    let pieces = vec![board.piece(0, 0)];
    let err = PiecePlacer::new(&grid, &pieces).err().unwrap();
    assert!(matches!(err, PlaceError::MissingPiece(2)));
}

#[test]
fn repeated_piece_is_rejected() {
    let board = SyntheticBoard::new(&[100.0, 100.0], &[100.0]);
    let grid = BoardGrid::from_rows(&[vec![(1, 0), (2, 0)]]).unwrap();
    let pieces = vec![board.piece(0, 0), board.piece(0, 0), board.piece(1, 0)];
    let err = PiecePlacer::new(&grid, &pieces).err().unwrap();
    assert!(matches!(err, PlaceError::DuplicatePiece(1)));
}
