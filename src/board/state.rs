use crate::{
    foundation::{
        core::{PieceId, Point, Size},
        error::JigsawResult,
        rng::Rng64,
    },
    piece::model::Piece,
    puzzle::{
        config::PuzzleConfig,
        edges::assign_edges,
        grid::{assign_color_tags, partition},
    },
    session::controller::SoundNotifier,
};

/// Lifecycle of a single piece as seen by the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum PieceState {
    /// On its correct position (initial, and after a snap).
    Placed,
    /// Currently being dragged.
    Held,
    /// Dropped away from its target; waits for the next pick-up.
    Unplaced,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum BoardStatus {
    InProgress,
    Complete,
}

/// Outcome of releasing the held piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Release {
    pub piece: PieceId,
    pub snapped: bool,
}

/// The ordered piece set of one puzzle.
///
/// Slice order is z-order: the last piece is drawn last and hit-tested first. At most one piece
/// is held at a time.
#[derive(Clone, Debug)]
pub struct Board {
    config: PuzzleConfig,
    pieces: Vec<Piece>,
    held: Option<PieceId>,
}

impl Board {
    pub fn new(config: PuzzleConfig, rng: &mut Rng64) -> JigsawResult<Self> {
        let mut board = Self {
            config,
            pieces: Vec::new(),
            held: None,
        };
        board.reinitialize(config, rng)?;
        Ok(board)
    }

    /// Discard every piece and rebuild from `config`; z-order becomes grid order.
    #[tracing::instrument(skip(self, config, rng), fields(rows = config.rows, columns = config.columns))]
    pub fn reinitialize(&mut self, config: PuzzleConfig, rng: &mut Rng64) -> JigsawResult<()> {
        let mut pieces = partition(&config)?;
        assign_edges(&mut pieces, &config, rng)?;
        assign_color_tags(&mut pieces, rng);

        self.config = config;
        self.pieces = pieces;
        self.held = None;
        tracing::debug!(pieces = self.pieces.len(), "board rebuilt");
        Ok(())
    }

    /// Rebuild with a new grid shape over the same board rectangle.
    pub fn reinitialize_grid(
        &mut self,
        rows: u32,
        columns: u32,
        rng: &mut Rng64,
    ) -> JigsawResult<()> {
        let config = PuzzleConfig::new(rows, columns, self.config.board_rect())?;
        self.reinitialize(config, rng)
    }

    pub fn config(&self) -> &PuzzleConfig {
        &self.config
    }

    /// Pieces in z-order (bottom first).
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.id == id)
    }

    /// Z-order slot of `id` (0 = bottom).
    pub fn position_of(&self, id: PieceId) -> Option<usize> {
        self.pieces.iter().position(|p| p.id == id)
    }

    pub fn z_order(&self) -> Vec<PieceId> {
        self.pieces.iter().map(|p| p.id).collect()
    }

    pub fn held(&self) -> Option<&Piece> {
        self.held.and_then(|id| self.piece(id))
    }

    pub fn piece_state(&self, id: PieceId) -> Option<PieceState> {
        let piece = self.piece(id)?;
        Some(if self.held == Some(id) {
            PieceState::Held
        } else if piece.placed {
            PieceState::Placed
        } else {
            PieceState::Unplaced
        })
    }

    /// Topmost piece whose bounding box strictly contains `p`.
    pub fn hit_test(&self, p: Point) -> Option<&Piece> {
        self.pieces.iter().rev().find(|piece| piece.contains(p))
    }

    /// Move `id` to the top of the z-order, keeping everyone else's relative order.
    pub fn bring_to_front(&mut self, id: PieceId) -> bool {
        let Some(idx) = self.position_of(id) else {
            return false;
        };
        let piece = self.pieces.remove(idx);
        self.pieces.push(piece);
        true
    }

    /// Throw every piece somewhere on the canvas (top-left in `[0, canvas - size]`).
    pub fn scatter(&mut self, canvas: Size, rng: &mut Rng64) {
        self.held = None;
        for piece in &mut self.pieces {
            piece.current = Point::new(
                rng.range(0.0, canvas.width - piece.width()),
                rng.range(0.0, canvas.height - piece.height()),
            );
            piece.placed = false;
        }
        tracing::debug!(pieces = self.pieces.len(), ?canvas, "scattered");
    }

    pub fn is_complete(&self) -> bool {
        self.pieces.iter().all(|p| p.placed)
    }

    pub fn status(&self) -> BoardStatus {
        if self.is_complete() {
            BoardStatus::Complete
        } else {
            BoardStatus::InProgress
        }
    }

    /// Hit-test `pointer` and start dragging the piece found there, raising it to the top.
    ///
    /// Any piece still held is dropped where it is, without a snap check.
    pub fn pick_up(&mut self, pointer: Point) -> Option<PieceId> {
        self.held = None;
        let id = self.hit_test(pointer)?.id;
        self.bring_to_front(id);
        let piece = self.pieces.last_mut()?;
        piece.pick_up(pointer);
        self.held = Some(id);
        tracing::debug!(piece = %id, "picked up");
        Some(id)
    }

    /// Move the held piece with the pointer. Returns `false` when nothing is held.
    pub fn drag(&mut self, pointer: Point) -> bool {
        let Some(id) = self.held else {
            return false;
        };
        match self.pieces.iter_mut().find(|p| p.id == id) {
            Some(piece) => {
                piece.drag(pointer);
                true
            }
            None => false,
        }
    }

    /// Drop the held piece, snapping it home when close enough.
    pub fn release(&mut self, sounds: &mut dyn SoundNotifier) -> Option<Release> {
        let id = self.held.take()?;
        let piece = self.pieces.iter_mut().find(|p| p.id == id)?;
        let snapped = piece.release(sounds);
        Some(Release { piece: id, snapped })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/board/state.rs"]
mod tests;
