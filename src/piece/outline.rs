use kurbo::{BezPath, Point, Vec2};

use crate::{
    piece::model::Piece,
    puzzle::edges::{Side, Tab},
};

/// Closed silhouette of `piece` at its current position.
///
/// Cosmetic only: used to clip the fill and stroke the border, never for hit testing.
pub fn outline_path(piece: &Piece) -> BezPath {
    outline_at(piece, piece.current)
}

/// Closed silhouette of `piece` with its top-left corner at `origin`.
///
/// Sides are traced clockwise: top, right, bottom, left. A flat side is a straight line; a tabbed
/// side gets two cubic segments forming a round knob centered `|tab|` along the side (measured
/// from the left for horizontal sides and from the top for vertical ones, so neighbors agree).
pub fn outline_at(piece: &Piece, origin: Point) -> BezPath {
    let w = piece.width();
    let h = piece.height();
    let profile = TabProfile {
        tab: piece.tab_size(),
        neck: piece.neck_size(),
    };

    let mut path = BezPath::new();
    path.move_to(origin);
    for side in Side::ALL {
        let frame = SideFrame::of(side, origin, w, h);
        if let Some(tab) = piece.edges.get(side) {
            profile.trace(&mut path, &frame, tab);
        }
        path.line_to(frame.end());
    }
    path.close_path();
    path
}

#[derive(Clone, Copy, Debug)]
struct TabProfile {
    tab: f64,
    neck: f64,
}

/// A side expressed as a start corner, a unit direction of travel and an outward normal.
#[derive(Clone, Copy, Debug)]
struct SideFrame {
    start: Point,
    along: Vec2,
    outward: Vec2,
    len: f64,
    // Bottom and left are walked backwards relative to where their tab fraction is measured.
    reversed: bool,
}

impl SideFrame {
    fn of(side: Side, origin: Point, w: f64, h: f64) -> Self {
        match side {
            Side::Top => Self {
                start: origin,
                along: Vec2::new(1.0, 0.0),
                outward: Vec2::new(0.0, -1.0),
                len: w,
                reversed: false,
            },
            Side::Right => Self {
                start: origin + Vec2::new(w, 0.0),
                along: Vec2::new(0.0, 1.0),
                outward: Vec2::new(1.0, 0.0),
                len: h,
                reversed: false,
            },
            Side::Bottom => Self {
                start: origin + Vec2::new(w, h),
                along: Vec2::new(-1.0, 0.0),
                outward: Vec2::new(0.0, 1.0),
                len: w,
                reversed: true,
            },
            Side::Left => Self {
                start: origin + Vec2::new(0.0, h),
                along: Vec2::new(0.0, -1.0),
                outward: Vec2::new(-1.0, 0.0),
                len: h,
                reversed: true,
            },
        }
    }

    fn end(&self) -> Point {
        self.start + self.along * self.len
    }

    fn center(&self, tab: Tab) -> Point {
        let t = if self.reversed {
            1.0 - tab.position()
        } else {
            tab.position()
        };
        self.start + self.along * (self.len * t)
    }
}

impl TabProfile {
    fn trace(&self, path: &mut BezPath, frame: &SideFrame, tab: Tab) {
        let c = frame.center(tab);
        let u = frame.along;
        let lift = frame.outward * (self.tab * tab.direction());

        path.line_to(c - u * self.neck);
        path.curve_to(
            c - u * self.neck + lift * 0.2,
            c - u * self.tab + lift,
            c + lift,
        );
        path.curve_to(
            c + u * self.tab + lift,
            c + u * self.neck + lift * 0.2,
            c + u * self.neck,
        );
    }
}

#[cfg(test)]
#[path = "../../tests/unit/piece/outline.rs"]
mod tests;
