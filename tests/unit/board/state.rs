use super::*;
use crate::{foundation::core::Rect, session::controller::RecordingSounds};

fn board(rows: u32, columns: u32, seed: u64) -> (Board, Rng64) {
    let mut rng = Rng64::new(seed);
    let cfg = PuzzleConfig::new(rows, columns, Rect::new(100.0, 50.0, 400.0, 350.0)).unwrap();
    let board = Board::new(cfg, &mut rng).unwrap();
    (board, rng)
}

#[test]
fn fresh_board_is_complete_and_in_grid_order() {
    let (b, _) = board(3, 4, 1);
    assert_eq!(b.len(), 12);
    assert!(b.is_complete());
    assert_eq!(b.status(), BoardStatus::Complete);
    let order = b.z_order();
    for (idx, id) in order.iter().enumerate() {
        assert_eq!(*id, PieceId::new((idx / 4) as u32, (idx % 4) as u32));
    }
}

#[test]
fn scatter_unplaces_everything_inside_the_canvas() {
    let (mut b, mut rng) = board(3, 3, 2);
    b.scatter(Size::new(800.0, 600.0), &mut rng);
    assert!(!b.is_complete());
    assert_eq!(b.status(), BoardStatus::InProgress);
    for p in b.pieces() {
        assert!(!p.placed);
        assert!(p.current.x >= 0.0 && p.current.x <= 800.0 - p.width());
        assert!(p.current.y >= 0.0 && p.current.y <= 600.0 - p.height());
        assert_eq!(b.piece_state(p.id), Some(PieceState::Unplaced));
    }
}

#[test]
fn hit_test_prefers_the_topmost_piece() {
    let (mut b, _) = board(2, 2, 3);
    let a = PieceId::new(0, 0);
    let c = PieceId::new(1, 1);
    // Stack (1,1) exactly on top of (0,0).
    let target = b.piece(a).unwrap().current;
    // (1,1) spans [250,400] x [200,350].
    let grab = Point::new(310.0, 260.0);
    assert_eq!(b.pick_up(grab), Some(c));
    b.drag(target + (grab - b.piece(c).unwrap().current));
    let mut sounds = RecordingSounds::default();
    b.release(&mut sounds);

    let probe = target + kurbo::Vec2::new(10.0, 10.0);
    assert_eq!(b.hit_test(probe).map(|p| p.id), Some(c));
    b.bring_to_front(a);
    assert_eq!(b.hit_test(probe).map(|p| p.id), Some(a));
}

#[test]
fn hit_test_is_exclusive_on_edges_and_misses_outside() {
    let (b, _) = board(2, 2, 4);
    // (0,0) spans [100,250] x [50,200]; its corner is not inside anything.
    assert!(b.hit_test(Point::new(100.0, 50.0)).is_none());
    assert!(b.hit_test(Point::new(10.0, 10.0)).is_none());
    // The shared vertical edge x = 250 belongs to neither piece.
    assert!(b.hit_test(Point::new(250.0, 100.0)).is_none());
    assert_eq!(
        b.hit_test(Point::new(251.0, 100.0)).map(|p| p.id),
        Some(PieceId::new(0, 1))
    );
}

#[test]
fn bring_to_front_moves_exactly_one_piece() {
    let (mut b, _) = board(3, 3, 5);
    let before = b.z_order();
    let id = PieceId::new(1, 1);
    assert!(b.bring_to_front(id));
    let after = b.z_order();
    assert_eq!(after.last(), Some(&id));
    let rest: Vec<_> = before.into_iter().filter(|p| *p != id).collect();
    assert_eq!(&after[..8], rest.as_slice());
    assert!(!b.bring_to_front(PieceId::new(9, 9)));
}

#[test]
fn pick_up_drag_release_cycle() {
    let (mut b, mut rng) = board(3, 3, 6);
    b.scatter(Size::new(1000.0, 1000.0), &mut rng);
    let id = PieceId::new(2, 0);
    let start = b.piece(id).unwrap().current;
    let grab = start + kurbo::Vec2::new(5.0, 5.0);

    // Bring it to the top first so the grab point is guaranteed to hit it.
    b.bring_to_front(id);
    assert_eq!(b.pick_up(grab), Some(id));
    assert_eq!(b.piece_state(id), Some(PieceState::Held));
    assert_eq!(b.held().map(|p| p.id), Some(id));
    assert_eq!(b.position_of(id), Some(8));

    let correct = b.piece(id).unwrap().correct;
    assert!(b.drag(correct + kurbo::Vec2::new(5.0, 5.0)));
    let mut sounds = RecordingSounds::default();
    let rel = b.release(&mut sounds).unwrap();
    assert_eq!(rel, Release { piece: id, snapped: true });
    assert_eq!(b.piece_state(id), Some(PieceState::Placed));
    assert_eq!(sounds.snaps, 1);
    assert!(b.held().is_none());
    assert!(b.release(&mut sounds).is_none());
    assert!(!b.drag(Point::ZERO));
}

#[test]
fn pick_up_on_empty_space_holds_nothing() {
    let (mut b, _) = board(2, 2, 7);
    assert_eq!(b.pick_up(Point::new(5.0, 5.0)), None);
    assert!(b.held().is_none());
    assert!(b.is_complete());
}

#[test]
fn reinitialize_grid_rebuilds_with_same_rect() {
    let (mut b, mut rng) = board(3, 3, 8);
    b.scatter(Size::new(500.0, 500.0), &mut rng);
    b.reinitialize_grid(5, 4, &mut rng).unwrap();
    assert_eq!(b.len(), 20);
    assert!(b.is_complete());
    assert_eq!(b.config().board_rect(), Rect::new(100.0, 50.0, 400.0, 350.0));
    assert!(b.reinitialize_grid(0, 4, &mut rng).is_err());
    assert_eq!(b.len(), 20);
}
