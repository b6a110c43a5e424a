use std::{path::Path, sync::Arc};

use anyhow::Context;

use crate::{
    foundation::{
        core::{Rect, Size},
        error::{JigsawError, JigsawResult},
    },
    piece::model::Piece,
    puzzle::config::PuzzleConfig,
};

/// One decoded frame, premultiplied RGBA8, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl VideoFrame {
    pub fn new(width: u32, height: u32, rgba8_premul: Vec<u8>) -> JigsawResult<Self> {
        if width == 0 || height == 0 {
            return Err(JigsawError::source("video frame has zero dimensions"));
        }
        if rgba8_premul.len() != width as usize * height as usize * 4 {
            return Err(JigsawError::source(format!(
                "video frame byte length mismatch: expected {}, got {}",
                width as usize * height as usize * 4,
                rgba8_premul.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// A frame filled with one straight-alpha colour.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> JigsawResult<Self> {
        let mut px = rgba;
        premultiply_rgba8_in_place(&mut px);
        let data = px.repeat(width as usize * height as usize);
        Self::new(width, height, data)
    }

    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }
}

/// Live (or still) frame provider the board is cut from.
///
/// `size` must be known before a session can be built; `frame` is read once per render tick.
pub trait VideoSource {
    fn size(&self) -> JigsawResult<Size>;
    fn frame(&self) -> JigsawResult<&VideoFrame>;
}

/// A single image standing in for the camera.
#[derive(Clone, Debug)]
pub struct StillImageSource {
    frame: VideoFrame,
}

impl StillImageSource {
    pub fn from_frame(frame: VideoFrame) -> Self {
        Self { frame }
    }

    pub fn from_bytes(bytes: &[u8]) -> JigsawResult<Self> {
        decode_image(bytes).map(Self::from_frame)
    }

    pub fn from_path(path: impl AsRef<Path>) -> JigsawResult<Self> {
        let path = path.as_ref();
        let bytes =
            std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
        Self::from_bytes(&bytes)
    }
}

impl VideoSource for StillImageSource {
    fn size(&self) -> JigsawResult<Size> {
        Ok(self.frame.size())
    }

    fn frame(&self) -> JigsawResult<&VideoFrame> {
        Ok(&self.frame)
    }
}

/// A source whose dimensions are not known yet (camera still warming up).
#[derive(Clone, Copy, Debug, Default)]
pub struct PendingSource;

impl VideoSource for PendingSource {
    fn size(&self) -> JigsawResult<Size> {
        Err(JigsawError::source("video dimensions not available yet"))
    }

    fn frame(&self) -> JigsawResult<&VideoFrame> {
        Err(JigsawError::source("no video frame available yet"))
    }
}

/// How piece interiors are filled.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RenderSource {
    /// The matching region of the video frame.
    #[default]
    CameraFill,
    /// Each piece's colour tag.
    SolidFill,
}

/// Video sub-rectangle sampled for `piece`, in video pixels.
///
/// The cell is grown by the tab margin scaled into video space, so the sampled region lines up
/// with [`Piece::render_bounds`] on screen.
pub fn source_rect(piece: &Piece, config: &PuzzleConfig, video: Size) -> Rect {
    let cell = Size::new(
        video.width / f64::from(config.columns),
        video.height / f64::from(config.rows),
    );
    let margin =
        cell.width.min(cell.height) * piece.tab_size() / piece.width().min(piece.height());
    let x = f64::from(piece.id.col) * cell.width - margin;
    let y = f64::from(piece.id.row) * cell.height - margin;
    Rect::new(
        x,
        y,
        x + cell.width + 2.0 * margin,
        y + cell.height + 2.0 * margin,
    )
}

pub fn decode_image(bytes: &[u8]) -> JigsawResult<VideoFrame> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);
    VideoFrame::new(width, height, rgba8_premul)
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/source.rs"]
mod tests;
