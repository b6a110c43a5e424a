use crate::{
    foundation::core::{ColorTag, PieceId, Point, Rect, Size, Vec2},
    puzzle::edges::Edges,
    session::controller::SoundNotifier,
};

/// Tab height as a fraction of the piece's shorter dimension.
pub const TAB_SIZE_RATIO: f64 = 0.2;
/// Neck half-width as a fraction of the tab size.
pub const NECK_SIZE_RATIO: f64 = 0.25;
/// A release snaps when the piece is closer than `width / SNAP_WIDTH_DIVISOR` to its target.
pub const SNAP_WIDTH_DIVISOR: f64 = 3.0;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One grid cell of the puzzle.
///
/// `current` is the live top-left corner (mutated by drag and snap); `correct` is fixed at
/// partition time. Hit testing only ever looks at the axis-aligned box at `current`.
pub struct Piece {
    pub id: PieceId,
    pub current: Point,
    pub correct: Point,
    pub size: Size,
    pub edges: Edges,
    pub placed: bool,
    pub color: ColorTag,
    #[serde(skip)]
    grab_offset: Vec2,
}

impl Piece {
    /// A piece sitting on its correct position, with flat edges.
    pub fn new(id: PieceId, correct: Point, size: Size) -> Self {
        Self {
            id,
            current: correct,
            correct,
            size,
            edges: Edges::default(),
            placed: true,
            color: ColorTag::rgb(0, 0, 0),
            grab_offset: Vec2::ZERO,
        }
    }

    pub fn width(&self) -> f64 {
        self.size.width
    }

    pub fn height(&self) -> f64 {
        self.size.height
    }

    /// Unrotated bounding box at the current position (tabs excluded).
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.current, self.size)
    }

    /// Exclusive point-in-box test: points on the border do not count.
    pub fn contains(&self, p: Point) -> bool {
        p.x > self.current.x
            && p.x < self.current.x + self.size.width
            && p.y > self.current.y
            && p.y < self.current.y + self.size.height
    }

    pub fn tab_size(&self) -> f64 {
        TAB_SIZE_RATIO * self.size.width.min(self.size.height)
    }

    pub fn neck_size(&self) -> f64 {
        NECK_SIZE_RATIO * self.tab_size()
    }

    /// Bounding box grown by the tab size on every side; covers any outward tab.
    pub fn render_bounds(&self) -> Rect {
        self.bounds().inflate(self.tab_size(), self.tab_size())
    }

    pub fn grab_offset(&self) -> Vec2 {
        self.grab_offset
    }

    /// Start a drag from `pointer`. The piece is no longer placed.
    pub fn pick_up(&mut self, pointer: Point) {
        self.placed = false;
        self.grab_offset = pointer - self.current;
    }

    /// Follow the pointer, keeping the grab offset. No clamping: pieces may leave the canvas.
    pub fn drag(&mut self, pointer: Point) {
        self.current = pointer - self.grab_offset;
    }

    pub fn distance_to_target(&self) -> f64 {
        self.current.distance(self.correct)
    }

    /// Strictly closer than a third of the piece width. Height plays no part.
    pub fn is_near_target(&self) -> bool {
        self.distance_to_target() < self.size.width / SNAP_WIDTH_DIVISOR
    }

    /// Jump to the correct position and mark placed.
    pub fn snap(&mut self, sounds: &mut dyn SoundNotifier) {
        self.current = self.correct;
        self.placed = true;
        tracing::debug!(piece = %self.id, "snapped");
        sounds.on_snap();
    }

    /// End a drag: snap if near the target. Returns whether the piece snapped.
    pub fn release(&mut self, sounds: &mut dyn SoundNotifier) -> bool {
        if self.is_near_target() {
            self.snap(sounds);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/piece/model.rs"]
mod tests;
