use super::*;
use crate::{
    foundation::core::Vec2,
    render::source::{PendingSource, StillImageSource, VideoFrame},
};

fn video(width: u32, height: u32) -> StillImageSource {
    StillImageSource::from_frame(VideoFrame::solid(width, height, [10, 20, 30, 255]).unwrap())
}

fn session(seed: u64) -> Session<RecordingSounds> {
    let opts = SessionOpts {
        seed,
        ..SessionOpts::default()
    };
    Session::new(
        opts,
        Size::new(1000.0, 800.0),
        &video(640, 480),
        RecordingSounds::default(),
    )
    .unwrap()
}

/// Raise `id` to the top so its box centre is guaranteed to hit it.
fn grab_point(s: &mut Session<RecordingSounds>, id: PieceId) -> Point {
    s.board.bring_to_front(id);
    s.board().piece(id).unwrap().bounds().center()
}

fn carry_home(s: &mut Session<RecordingSounds>, id: PieceId, now_ms: u64) -> Outcome {
    let grab = grab_point(s, id);
    assert_eq!(
        s.handle(PointerEvent::Down(grab), now_ms, None),
        Outcome::PickedUp(id)
    );
    let piece = s.board().piece(id).unwrap();
    let home = piece.correct + piece.grab_offset();
    assert_eq!(
        s.handle(PointerEvent::Move(home), now_ms, None),
        Outcome::Moved(id)
    );
    s.handle(PointerEvent::Up, now_ms, None)
}

#[test]
fn new_session_fits_board_and_uses_difficulty() {
    let s = session(1);
    assert_eq!(s.board().len(), 9);
    let rect = s.board().config().board_rect();
    // 0.8 * min(1000/640, 800/480) = 1.25 -> 800x600, centred.
    assert!((rect.width() - 800.0).abs() < 1e-9);
    assert!((rect.height() - 600.0).abs() < 1e-9);
    assert!((rect.x0 - 100.0).abs() < 1e-9);
    assert!((rect.y0 - 100.0).abs() < 1e-9);
    assert!(s.board().is_complete());
    assert_eq!(s.tick(0), None);
}

#[test]
fn new_session_needs_video_dimensions() {
    let err = Session::new(
        SessionOpts::default(),
        Size::new(800.0, 600.0),
        &PendingSource,
        NullSounds,
    )
    .err()
    .unwrap();
    assert!(matches!(err, crate::foundation::error::JigsawError::Source(_)));
}

#[test]
fn solved_board_before_restart_snaps_without_completing() {
    let mut s = session(9);
    let id = PieceId::new(1, 1);
    let grab = grab_point(&mut s, id);

    assert_eq!(s.handle(PointerEvent::Down(grab), 5_000, None), Outcome::PickedUp(id));
    assert_eq!(s.handle(PointerEvent::Up, 6_000, None), Outcome::Snapped(id));
    assert!(s.board().is_complete());
    assert_eq!(s.sounds().snaps, 1);
    assert_eq!(s.sounds().completions, 0);
    assert_eq!(s.tick(6_000), None);
    assert!(!s.clock().is_finished());
}

#[test]
fn pointer_events_without_a_piece_are_ignored() {
    let mut s = session(2);
    s.restart(0);
    assert_eq!(s.handle(PointerEvent::Move(Point::new(5.0, 5.0)), 1, None), Outcome::Ignored);
    assert_eq!(s.handle(PointerEvent::Up, 2, None), Outcome::Ignored);
    assert_eq!(
        s.handle(PointerEvent::Down(Point::new(-50.0, -50.0)), 3, None),
        Outcome::Ignored
    );
    assert_eq!(s.sounds().snaps, 0);
}

struct Opaque(bool);

impl HitMask for Opaque {
    fn is_transparent(&self, _p: Point) -> bool {
        !self.0
    }
}

#[test]
fn transparent_mask_cancels_the_press() {
    let mut s = session(3);
    let center = s.board().pieces()[0].bounds().center();
    assert_eq!(
        s.handle(PointerEvent::Down(center), 0, Some(&Opaque(false))),
        Outcome::Ignored
    );
    assert!(s.board().held().is_none());
    assert!(matches!(
        s.handle(PointerEvent::Down(center), 0, Some(&Opaque(true))),
        Outcome::PickedUp(_)
    ));
}

#[test]
fn far_drop_is_not_a_snap() {
    let mut s = session(4);
    s.restart(0);
    let id = PieceId::new(0, 0);
    let grab = grab_point(&mut s, id);
    s.handle(PointerEvent::Down(grab), 10, None);
    let piece = s.board().piece(id).unwrap();
    let far = piece.correct + piece.grab_offset() + Vec2::new(piece.width(), 0.0);
    s.handle(PointerEvent::Move(far), 20, None);
    assert_eq!(s.handle(PointerEvent::Up, 30, None), Outcome::Dropped(id));
    assert_eq!(s.sounds().snaps, 0);
}

#[test]
fn solving_completes_once_and_freezes_the_clock() {
    let mut s = session(5);
    s.restart(1_000);
    assert_eq!(s.tick(4_000).as_deref(), Some("00:00:03"));

    let ids: Vec<PieceId> = s.board().z_order();
    let (last, rest) = ids.split_last().unwrap();
    for (n, id) in rest.iter().enumerate() {
        assert_eq!(carry_home(&mut s, *id, 2_000 + n as u64), Outcome::Snapped(*id));
    }
    assert_eq!(s.sounds().completions, 0);

    let outcome = carry_home(&mut s, *last, 62_500);
    assert_eq!(
        outcome,
        Outcome::Completed {
            piece: *last,
            elapsed_ms: 61_500
        }
    );
    assert_eq!(s.sounds().snaps, 9);
    assert_eq!(s.sounds().completions, 1);
    assert!(s.board().is_complete());
    assert_eq!(s.tick(999_999).as_deref(), Some("00:01:01"));

    // Lifting and re-dropping a piece on the finished board does not complete twice.
    assert_eq!(carry_home(&mut s, *last, 70_000), Outcome::Snapped(*last));
    assert_eq!(s.sounds().completions, 1);
}

#[test]
fn restart_scatters_and_clears_the_finish() {
    let mut s = session(6);
    s.restart(0);
    for id in s.board().z_order() {
        carry_home(&mut s, id, 10);
    }
    assert!(s.clock().is_finished());

    s.restart(20);
    assert!(!s.board().is_complete());
    assert!(s.clock().is_running());
    assert_eq!(s.tick(1_020).as_deref(), Some("00:00:01"));
}

#[test]
fn set_difficulty_rebuilds_the_grid() {
    let mut s = session(7);
    let rect = s.board().config().board_rect();
    s.set_difficulty(Difficulty::Insane).unwrap();
    assert_eq!(s.board().len(), 1000);
    assert_eq!(s.board().config().rows, 40);
    assert_eq!(s.board().config().columns, 25);
    assert_eq!(s.board().config().board_rect(), rect);
}

#[test]
fn touch_maps_onto_pointer_events() {
    let p = Point::new(3.0, 4.0);
    let q = Point::new(9.0, 9.0);
    assert_eq!(
        PointerEvent::from_touch(TouchPhase::Start, &[p, q]),
        Some(PointerEvent::Down(p))
    );
    assert_eq!(
        PointerEvent::from_touch(TouchPhase::Move, &[q]),
        Some(PointerEvent::Move(q))
    );
    assert_eq!(PointerEvent::from_touch(TouchPhase::Move, &[]), None);
    assert_eq!(
        PointerEvent::from_touch(TouchPhase::End, &[]),
        Some(PointerEvent::Up)
    );
}

#[test]
fn opts_fill_missing_fields_from_defaults() {
    let opts: SessionOpts = serde_json::from_str(r#"{"difficulty":"hard"}"#).unwrap();
    assert_eq!(opts.difficulty, Difficulty::Hard);
    assert_eq!(opts.scaler, DEFAULT_SCALER);
    assert_eq!(opts.seed, DEFAULT_SEED);
}

#[test]
fn options_parse_from_json_with_defaults() {
    let opts = SessionOpts::from_json(r#"{"difficulty": "hard", "seed": 4}"#).unwrap();
    assert_eq!(opts.difficulty, Difficulty::Hard);
    assert_eq!(opts.seed, 4);
    assert_eq!(opts.scaler, DEFAULT_SCALER);

    let err = SessionOpts::from_json(r#"{"seed": "four"}"#).unwrap_err();
    assert!(matches!(err, crate::foundation::error::JigsawError::Serde(_)));
    assert!(err.to_string().starts_with("serialization error: session options:"));
}
