use kurbo::{PathEl, Shape, Size};

use super::*;
use crate::{foundation::core::PieceId, puzzle::edges::Edges};

const EPS: f64 = 1e-9;

fn piece_at(x: f64, y: f64, edges: Edges) -> Piece {
    let mut p = Piece::new(PieceId::new(0, 0), Point::new(x, y), Size::new(100.0, 80.0));
    p.edges = edges;
    p
}

fn tab(v: f64) -> Option<Tab> {
    Some(Tab::new(v).unwrap())
}

fn knob_apexes(path: &BezPath) -> Vec<Point> {
    // The first of each pair of curves ends on the knob apex.
    path.elements()
        .iter()
        .filter_map(|el| match el {
            PathEl::CurveTo(_, _, p) => Some(*p),
            _ => None,
        })
        .step_by(2)
        .collect()
}

#[test]
fn flat_piece_is_its_bounding_box() {
    let p = piece_at(10.0, 20.0, Edges::default());
    let path = outline_path(&p);
    let els = path.elements();
    assert_eq!(els.len(), 6);
    assert!(matches!(els[0], PathEl::MoveTo(_)));
    assert!(matches!(els[5], PathEl::ClosePath));

    let bbox = path.bounding_box();
    assert!((bbox.x0 - 10.0).abs() < EPS);
    assert!((bbox.y0 - 20.0).abs() < EPS);
    assert!((bbox.x1 - 110.0).abs() < EPS);
    assert!((bbox.y1 - 100.0).abs() < EPS);
}

#[test]
fn each_tab_adds_a_neck_line_and_two_curves() {
    let edges = Edges {
        top: tab(0.5),
        right: tab(-0.4),
        bottom: None,
        left: tab(0.6),
    };
    let path = outline_path(&piece_at(0.0, 0.0, edges));
    let curves = path
        .elements()
        .iter()
        .filter(|el| matches!(el, PathEl::CurveTo(..)))
        .count();
    assert_eq!(curves, 6);
    // move + 4 corners + 3 neck lines + 6 curves + close
    assert_eq!(path.elements().len(), 1 + 4 + 3 + 6 + 1);
}

#[test]
fn outward_tab_protrudes_and_socket_recedes() {
    let p = piece_at(0.0, 0.0, Edges {
        top: tab(0.5),
        ..Edges::default()
    });
    let t = p.tab_size();
    assert!((t - 16.0).abs() < EPS);
    let bbox = outline_path(&p).bounding_box();
    assert!((bbox.y0 + t).abs() < 1e-6, "{bbox:?}");

    let p = piece_at(0.0, 0.0, Edges {
        top: tab(-0.5),
        ..Edges::default()
    });
    let path = outline_path(&p);
    let bbox = path.bounding_box();
    assert!(bbox.y0.abs() < 1e-6, "{bbox:?}");
    let apex = knob_apexes(&path)[0];
    assert!((apex.x - 50.0).abs() < EPS);
    assert!((apex.y - t).abs() < EPS);
}

#[test]
fn tab_position_follows_magnitude() {
    let p = piece_at(0.0, 0.0, Edges {
        top: tab(0.3),
        right: tab(0.7),
        bottom: tab(0.3),
        left: tab(0.7),
    });
    let t = p.tab_size();
    let apexes = knob_apexes(&outline_path(&p));
    assert_eq!(apexes.len(), 4);
    let expect = [
        Point::new(30.0, -t),
        Point::new(100.0 + t, 56.0),
        Point::new(30.0, 80.0 + t),
        Point::new(-t, 56.0),
    ];
    for (got, want) in apexes.iter().zip(expect) {
        assert!(got.distance(want) < 1e-9, "{got:?} != {want:?}");
    }
}

#[test]
fn neighbors_interlock_on_shared_edges() {
    // Horizontal neighbors: A.right = m, B.left = -m.
    let a = piece_at(0.0, 0.0, Edges {
        right: tab(0.42),
        ..Edges::default()
    });
    let b = piece_at(100.0, 0.0, Edges {
        left: tab(-0.42),
        ..Edges::default()
    });
    let a_apex = knob_apexes(&outline_path(&a))[0];
    let b_apex = knob_apexes(&outline_path(&b))[0];
    assert!(a_apex.distance(b_apex) < 1e-9, "{a_apex:?} vs {b_apex:?}");

    // Vertical neighbors: A.bottom = -m, B.top = m.
    let a = piece_at(0.0, 0.0, Edges {
        bottom: tab(-0.61),
        ..Edges::default()
    });
    let b = piece_at(0.0, 80.0, Edges {
        top: tab(0.61),
        ..Edges::default()
    });
    let a_apex = knob_apexes(&outline_path(&a))[0];
    let b_apex = knob_apexes(&outline_path(&b))[0];
    assert!(a_apex.distance(b_apex) < 1e-9, "{a_apex:?} vs {b_apex:?}");
}

#[test]
fn outline_tracks_current_position() {
    let mut p = piece_at(0.0, 0.0, Edges {
        top: tab(0.5),
        ..Edges::default()
    });
    let before = outline_path(&p).bounding_box();
    p.current = Point::new(300.0, -50.0);
    let after = outline_path(&p).bounding_box();
    assert!((after.x0 - before.x0 - 300.0).abs() < 1e-6);
    assert!((after.y0 - before.y0 + 50.0).abs() < 1e-6);
}
