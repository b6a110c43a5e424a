use crate::foundation::{
    core::{Point, Rect, Size},
    error::{JigsawError, JigsawResult},
};

/// Share of the viewport the fitted board may occupy.
pub const DEFAULT_SCALER: f64 = 0.8;

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Grid shape plus the target rectangle the solved puzzle occupies.
///
/// Construct with [`PuzzleConfig::new`] (validated) or deserialize and call
/// [`PuzzleConfig::validate`] before partitioning.
pub struct PuzzleConfig {
    pub rows: u32,
    pub columns: u32,
    pub board_x: f64,
    pub board_y: f64,
    pub board_width: f64,
    pub board_height: f64,
}

impl PuzzleConfig {
    pub fn new(rows: u32, columns: u32, board: Rect) -> JigsawResult<Self> {
        let cfg = Self {
            rows,
            columns,
            board_x: board.x0,
            board_y: board.y0,
            board_width: board.width(),
            board_height: board.height(),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> JigsawResult<()> {
        if self.rows == 0 || self.columns == 0 {
            return Err(JigsawError::validation(format!(
                "puzzle grid must be at least 1x1, got {}x{}",
                self.rows, self.columns
            )));
        }
        if !(self.board_width.is_finite() && self.board_width > 0.0) {
            return Err(JigsawError::validation("board width must be finite and > 0"));
        }
        if !(self.board_height.is_finite() && self.board_height > 0.0) {
            return Err(JigsawError::validation(
                "board height must be finite and > 0",
            ));
        }
        if !(self.board_x.is_finite() && self.board_y.is_finite()) {
            return Err(JigsawError::validation("board origin must be finite"));
        }
        Ok(())
    }

    pub fn board_rect(&self) -> Rect {
        Rect::from_origin_size(
            Point::new(self.board_x, self.board_y),
            Size::new(self.board_width, self.board_height),
        )
    }

    /// Size shared by every piece.
    pub fn piece_size(&self) -> Size {
        Size::new(
            self.board_width / f64::from(self.columns),
            self.board_height / f64::from(self.rows),
        )
    }

    pub fn piece_count(&self) -> usize {
        self.rows as usize * self.columns as usize
    }
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
/// Preset grid shapes offered to the player.
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
    Insane,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Insane,
    ];

    /// `(rows, columns)` for this preset.
    pub fn grid(self) -> (u32, u32) {
        match self {
            Difficulty::Easy => (3, 3),
            Difficulty::Medium => (5, 5),
            Difficulty::Hard => (10, 10),
            Difficulty::Insane => (40, 25),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Insane => "insane",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = JigsawError;

    fn from_str(s: &str) -> JigsawResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "insane" => Ok(Difficulty::Insane),
            other => Err(JigsawError::validation(format!(
                "unknown difficulty '{other}'"
            ))),
        }
    }
}

/// Fit a video frame into the viewport, scaled by `scaler` and centered.
///
/// The returned rectangle keeps the video's aspect ratio. Unknown (zero or non-finite) video
/// dimensions are a source failure: no piece set can be built without them.
pub fn fit_board(viewport: Size, video: Size, scaler: f64) -> JigsawResult<Rect> {
    if !(video.width.is_finite() && video.height.is_finite())
        || video.width <= 0.0
        || video.height <= 0.0
    {
        return Err(JigsawError::source(format!(
            "video dimensions unavailable ({}x{})",
            video.width, video.height
        )));
    }
    if viewport.width <= 0.0 || viewport.height <= 0.0 {
        return Err(JigsawError::validation("viewport dimensions must be > 0"));
    }
    if !(scaler.is_finite() && scaler > 0.0) {
        return Err(JigsawError::validation("board scaler must be > 0"));
    }

    let resizer = scaler * (viewport.width / video.width).min(viewport.height / video.height);
    let size = Size::new(resizer * video.width, resizer * video.height);
    let origin = Point::new(
        viewport.width / 2.0 - size.width / 2.0,
        viewport.height / 2.0 - size.height / 2.0,
    );
    Ok(Rect::from_origin_size(origin, size))
}

#[cfg(test)]
#[path = "../../tests/unit/puzzle/config.rs"]
mod tests;
