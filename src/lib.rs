//! Jigsaw puzzle geometry and placement engine for live camera feeds.
//!
//! A video frame's rectangle is cut into a grid of interlocking pieces that the player drags back
//! into place. The crate owns the algorithmic core and leaves the outer surfaces to the host:
//!
//! 1. **Partition**: `PuzzleConfig -> Vec<Piece>` in grid order, each on its correct position
//! 2. **Edges**: one random signed tab per interior boundary, mirrored onto both neighbours
//! 3. **Outline**: `Piece -> BezPath` with tabs and sockets traced clockwise
//! 4. **Placement**: a [`Session`] turns pointer events into pick-up, drag, snap and completion
//!
//! The host supplies video frames ([`VideoSource`]), timestamps, pointer input and a
//! [`SoundNotifier`]; it calls [`CpuRenderer::render`] (or its own renderer) once per tick.
//!
//! Randomness comes from a seeded [`Rng64`], so a session is reproducible for a given seed.
#![forbid(unsafe_code)]

mod board;
mod foundation;
mod piece;
mod puzzle;
mod render;
mod scores;
mod session;

pub use crate::board::state::{Board, BoardStatus, PieceState, Release};
pub use crate::foundation::core::{
    Affine, BezPath, Canvas, ColorTag, PieceId, Point, Rect, Size, Vec2,
};
pub use crate::foundation::error::{JigsawError, JigsawResult};
pub use crate::foundation::rng::Rng64;
pub use crate::piece::model::{NECK_SIZE_RATIO, Piece, SNAP_WIDTH_DIVISOR, TAB_SIZE_RATIO};
pub use crate::piece::outline::{outline_at, outline_path};
pub use crate::puzzle::config::{DEFAULT_SCALER, Difficulty, PuzzleConfig, fit_board};
pub use crate::puzzle::edges::{
    Edges, Side, TAB_POSITION_MAX, TAB_POSITION_MIN, Tab, assign_edges,
};
pub use crate::puzzle::grid::{assign_color_tags, partition};
pub use crate::render::cpu::{
    CpuRenderer, FADED_VIDEO_OPACITY, FrameRGBA, OUTLINE_WIDTH, RenderSettings,
};
pub use crate::render::source::{
    PendingSource, RenderSource, StillImageSource, VideoFrame, VideoSource, decode_image,
    source_rect,
};
pub use crate::scores::table::{
    JsonFileScores, ScoreBackend, ScoreBoard, ScoreEntry, StaticScores, format_scores,
    parse_scores,
};
pub use crate::session::clock::{SessionClock, format_elapsed, score_seconds};
pub use crate::session::controller::{
    DEFAULT_SEED, HitMask, NullSounds, Outcome, PointerEvent, RecordingSounds, Session,
    SessionOpts, SoundNotifier, TouchPhase,
};
