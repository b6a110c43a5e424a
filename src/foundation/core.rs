use crate::foundation::error::{JigsawError, JigsawResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Size, Vec2};

/// Grid coordinates of a piece: `row` in `[0, rows)`, `col` in `[0, columns)`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct PieceId {
    /// Grid row (top to bottom).
    pub row: u32,
    /// Grid column (left to right).
    pub col: u32,
}

impl PieceId {
    /// Build an id from grid coordinates.
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for PieceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// Pixel dimensions of a render target or video frame.
///
/// Both dimensions are non-zero; deserialization goes through [`Canvas::new`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "CanvasDims")]
pub struct Canvas {
    width: u32,
    height: u32,
}

#[derive(serde::Deserialize)]
struct CanvasDims {
    width: u32,
    height: u32,
}

impl TryFrom<CanvasDims> for Canvas {
    type Error = JigsawError;

    fn try_from(dims: CanvasDims) -> JigsawResult<Self> {
        Self::new(dims.width, dims.height)
    }
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> JigsawResult<Self> {
        if width == 0 || height == 0 {
            return Err(JigsawError::validation("canvas dimensions must be > 0"));
        }
        Ok(Self { width, height })
    }

    pub fn width(self) -> u32 {
        self.width
    }

    pub fn height(self) -> u32 {
        self.height
    }

    pub fn size(self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }
}

impl std::str::FromStr for Canvas {
    type Err = JigsawError;

    /// Parse `WIDTHxHEIGHT`, e.g. `1280x720`.
    fn from_str(s: &str) -> JigsawResult<Self> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| JigsawError::validation(format!("expected WxH, got '{s}'")))?;
        let width = w
            .trim()
            .parse::<u32>()
            .map_err(|e| JigsawError::validation(format!("bad width '{w}': {e}")))?;
        let height = h
            .trim()
            .parse::<u32>()
            .map_err(|e| JigsawError::validation(format!("bad height '{h}': {e}")))?;
        Self::new(width, height)
    }
}

/// Opaque per-piece colour, used only by the solid-fill render path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ColorTag {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorTag {
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl std::fmt::Display for ColorTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
