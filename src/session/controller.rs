use crate::{
    board::state::{Board, Release},
    foundation::{
        core::{PieceId, Point, Size},
        error::{JigsawError, JigsawResult},
        rng::Rng64,
    },
    puzzle::config::{DEFAULT_SCALER, Difficulty, PuzzleConfig, fit_board},
    render::source::VideoSource,
    session::clock::SessionClock,
};

/// Seed used when the caller does not pick one.
pub const DEFAULT_SEED: u64 = 0x5EED_2520_4A16_5A00;

/// Fire-and-forget sinks for the placement chime and the completion melody.
pub trait SoundNotifier {
    fn on_snap(&mut self);
    fn on_complete(&mut self);
}

/// Discards every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSounds;

impl SoundNotifier for NullSounds {
    fn on_snap(&mut self) {}
    fn on_complete(&mut self) {}
}

/// Counts notifications; handy for headless hosts and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RecordingSounds {
    pub snaps: usize,
    pub completions: usize,
}

impl SoundNotifier for RecordingSounds {
    fn on_snap(&mut self) {
        self.snaps += 1;
    }

    fn on_complete(&mut self) {
        self.completions += 1;
    }
}

impl<S: SoundNotifier + ?Sized> SoundNotifier for &mut S {
    fn on_snap(&mut self) {
        (**self).on_snap();
    }

    fn on_complete(&mut self) {
        (**self).on_complete();
    }
}

/// Renderer-side check run before the bounding-box scan.
pub trait HitMask {
    /// `true` when nothing was drawn under `p` (the press is ignored).
    fn is_transparent(&self, p: Point) -> bool;
}

/// Normalized pointer stream; mouse and single-touch input both map onto it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Down(Point),
    Move(Point),
    Up,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchPhase {
    Start,
    Move,
    End,
}

impl PointerEvent {
    /// Map a touch event onto the pointer stream using its first touch point.
    ///
    /// A start or move without any touch point carries no position and yields `None`.
    pub fn from_touch(phase: TouchPhase, touches: &[Point]) -> Option<Self> {
        match phase {
            TouchPhase::Start => touches.first().map(|p| PointerEvent::Down(*p)),
            TouchPhase::Move => touches.first().map(|p| PointerEvent::Move(*p)),
            TouchPhase::End => Some(PointerEvent::Up),
        }
    }
}

/// What a pointer event did to the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing changed.
    Ignored,
    PickedUp(PieceId),
    Moved(PieceId),
    /// Released away from its target.
    Dropped(PieceId),
    Snapped(PieceId),
    /// The snap that finished the puzzle.
    Completed { piece: PieceId, elapsed_ms: u64 },
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SessionOpts {
    pub difficulty: Difficulty,
    /// Share of the viewport the board may cover.
    pub scaler: f64,
    pub seed: u64,
}

impl SessionOpts {
    /// Parse options from JSON. Missing fields keep their defaults.
    pub fn from_json(text: &str) -> JigsawResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| JigsawError::serde(format!("session options: {e}")))
    }
}

impl Default for SessionOpts {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            scaler: DEFAULT_SCALER,
            seed: DEFAULT_SEED,
        }
    }
}

/// One player's puzzle: the board, its random source, the clock and the sound sinks.
///
/// All mutation goes through [`Session::handle`] (input) and [`Session::restart`] /
/// [`Session::set_difficulty`] (menu actions). Rendering only reads [`Session::board`].
pub struct Session<S: SoundNotifier = NullSounds> {
    board: Board,
    rng: Rng64,
    clock: SessionClock,
    sounds: S,
    viewport: Size,
}

impl<S: SoundNotifier> Session<S> {
    /// Fit the board to the viewport and cut the first puzzle.
    ///
    /// Fails when the video source cannot report its dimensions.
    #[tracing::instrument(skip(opts, video, sounds), fields(difficulty = %opts.difficulty))]
    pub fn new(
        opts: SessionOpts,
        viewport: Size,
        video: &dyn VideoSource,
        sounds: S,
    ) -> JigsawResult<Self> {
        let video_size = video.size()?;
        let rect = fit_board(viewport, video_size, opts.scaler)?;
        let (rows, columns) = opts.difficulty.grid();
        let config = PuzzleConfig::new(rows, columns, rect)?;
        let mut rng = Rng64::new(opts.seed);
        let board = Board::new(config, &mut rng)?;
        Ok(Self {
            board,
            rng,
            clock: SessionClock::default(),
            sounds,
            viewport,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    pub fn sounds(&self) -> &S {
        &self.sounds
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Rebuild the puzzle with the preset's grid. Pieces return to their solved layout.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> JigsawResult<()> {
        let (rows, columns) = difficulty.grid();
        self.board.reinitialize_grid(rows, columns, &mut self.rng)
    }

    /// Start a new play-through: scatter the pieces and reset the clock.
    pub fn restart(&mut self, now_ms: u64) {
        self.board.scatter(self.viewport, &mut self.rng);
        self.clock.restart(now_ms);
    }

    /// Timer text for the current render tick.
    pub fn tick(&self, now_ms: u64) -> Option<String> {
        self.clock.display(now_ms)
    }

    /// Apply one pointer event.
    ///
    /// `mask` is the renderer's transparency check for the last drawn frame; a press on a
    /// transparent pixel picks nothing up.
    pub fn handle(
        &mut self,
        event: PointerEvent,
        now_ms: u64,
        mask: Option<&dyn HitMask>,
    ) -> Outcome {
        match event {
            PointerEvent::Down(p) => {
                if mask.is_some_and(|m| m.is_transparent(p)) {
                    return Outcome::Ignored;
                }
                self.board
                    .pick_up(p)
                    .map_or(Outcome::Ignored, Outcome::PickedUp)
            }
            PointerEvent::Move(p) => match self.board.held().map(|piece| piece.id) {
                Some(id) if self.board.drag(p) => Outcome::Moved(id),
                _ => Outcome::Ignored,
            },
            PointerEvent::Up => match self.board.release(&mut self.sounds) {
                None => Outcome::Ignored,
                Some(Release {
                    piece,
                    snapped: false,
                }) => Outcome::Dropped(piece),
                Some(Release {
                    piece,
                    snapped: true,
                }) => self.after_snap(piece, now_ms),
            },
        }
    }

    fn after_snap(&mut self, piece: PieceId, now_ms: u64) -> Outcome {
        if !self.board.is_complete() || !self.clock.finish(now_ms) {
            return Outcome::Snapped(piece);
        }
        let Some(elapsed_ms) = self.clock.elapsed_ms(now_ms) else {
            return Outcome::Snapped(piece);
        };
        tracing::info!(elapsed_ms, pieces = self.board.len(), "puzzle complete");
        self.sounds.on_complete();
        Outcome::Completed { piece, elapsed_ms }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/controller.rs"]
mod tests;
