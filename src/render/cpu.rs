use std::sync::Arc;

use crate::{
    board::state::Board,
    foundation::{
        core::{Affine, BezPath, Canvas, Point, Rect, Vec2},
        error::{JigsawError, JigsawResult},
    },
    piece::{model::Piece, outline::outline_path},
    render::source::{RenderSource, VideoFrame, source_rect},
    session::controller::HitMask,
};

/// Opacity of the full video drawn under the board in camera mode.
pub const FADED_VIDEO_OPACITY: f32 = 0.5;
/// Width of the black outline stroked around every piece.
pub const OUTLINE_WIDTH: f64 = 1.0;

#[derive(Clone, Debug, Default)]
pub struct RenderSettings {
    /// Straight-alpha background; transparent when `None`.
    pub clear_rgba: Option<[u8; 4]>,
}

/// Rendered frame, row-major RGBA8.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// RGBA at pixel `(x, y)`, `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Write the frame as a PNG, un-premultiplying first.
    pub fn save_png(&self, path: &std::path::Path) -> JigsawResult<()> {
        use anyhow::Context as _;

        let mut rgba = self.data.clone();
        if self.premultiplied {
            unpremultiply_rgba8_in_place(&mut rgba);
        }
        image::save_buffer_with_format(
            path,
            &rgba,
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

impl HitMask for FrameRGBA {
    fn is_transparent(&self, p: Point) -> bool {
        if !(p.x >= 0.0 && p.y >= 0.0) {
            return true;
        }
        self.pixel(p.x.floor() as u32, p.y.floor() as u32)
            .is_none_or(|px| px[3] == 0)
    }
}

/// Reference rasterizer for a [`Board`], built on `vello_cpu`.
///
/// Camera mode keeps the last video frame's paint around and only rebuilds it when the frame
/// buffer changes.
pub struct CpuRenderer {
    settings: RenderSettings,
    video_cache: Option<(Arc<Vec<u8>>, vello_cpu::Image)>,
}

impl CpuRenderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            video_cache: None,
        }
    }

    /// Draw one render tick.
    ///
    /// Camera fill needs `video`; solid fill ignores it. Pieces are painted bottom to top.
    #[tracing::instrument(skip(self, board, video), fields(pieces = board.len()))]
    pub fn render(
        &mut self,
        board: &Board,
        canvas: Canvas,
        source: RenderSource,
        video: Option<&VideoFrame>,
    ) -> JigsawResult<FrameRGBA> {
        let width: u16 = canvas
            .width()
            .try_into()
            .map_err(|_| JigsawError::render("canvas width exceeds u16"))?;
        let height: u16 = canvas
            .height()
            .try_into()
            .map_err(|_| JigsawError::render("canvas height exceeds u16"))?;

        let mut ctx = vello_cpu::RenderContext::new(width, height);
        if let Some([r, g, b, a]) = self.settings.clear_rgba {
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(width),
                f64::from(height),
            ));
        }

        match source {
            RenderSource::CameraFill => {
                let frame = video.ok_or_else(|| {
                    JigsawError::render("camera fill requires a video frame")
                })?;
                let paint = self.video_paint_for(frame)?;
                draw_faded_video(&mut ctx, &paint, frame, board.config().board_rect());
                for piece in board.pieces() {
                    let outline = bezpath_to_cpu(&outline_path(piece));
                    fill_from_video(&mut ctx, &paint, frame, board, piece, &outline);
                    stroke_outline(&mut ctx, &outline);
                }
            }
            RenderSource::SolidFill => {
                for piece in board.pieces() {
                    let outline = bezpath_to_cpu(&outline_path(piece));
                    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
                    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                        piece.color.r,
                        piece.color.g,
                        piece.color.b,
                        255,
                    ));
                    ctx.fill_path(&outline);
                    stroke_outline(&mut ctx, &outline);
                }
            }
        }

        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        Ok(FrameRGBA {
            width: canvas.width(),
            height: canvas.height(),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn video_paint_for(&mut self, frame: &VideoFrame) -> JigsawResult<vello_cpu::Image> {
        if let Some((bytes, paint)) = &self.video_cache
            && Arc::ptr_eq(bytes, &frame.rgba8_premul)
        {
            return Ok(paint.clone());
        }

        let pixmap =
            image_premul_bytes_to_pixmap(frame.rgba8_premul.as_slice(), frame.width, frame.height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.video_cache = Some((frame.rgba8_premul.clone(), paint.clone()));
        Ok(paint)
    }
}

fn draw_faded_video(
    ctx: &mut vello_cpu::RenderContext,
    paint: &vello_cpu::Image,
    frame: &VideoFrame,
    board: Rect,
) {
    let size = frame.size();
    let transform = Affine::translate(Vec2::new(board.x0, board.y0))
        * Affine::scale_non_uniform(board.width() / size.width, board.height() / size.height);
    ctx.set_transform(affine_to_cpu(transform));
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(paint.clone());
    ctx.push_opacity_layer(FADED_VIDEO_OPACITY);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        size.width,
        size.height,
    ));
    ctx.pop_layer();
}

fn fill_from_video(
    ctx: &mut vello_cpu::RenderContext,
    paint: &vello_cpu::Image,
    frame: &VideoFrame,
    board: &Board,
    piece: &Piece,
    outline: &vello_cpu::kurbo::BezPath,
) {
    let src = source_rect(piece, board.config(), frame.size());
    let dst = piece.render_bounds();
    let paint_transform = Affine::translate(Vec2::new(dst.x0, dst.y0))
        * Affine::scale_non_uniform(dst.width() / src.width(), dst.height() / src.height())
        * Affine::translate(Vec2::new(-src.x0, -src.y0));

    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint_transform(affine_to_cpu(paint_transform));
    ctx.set_paint(paint.clone());
    ctx.fill_path(outline);
}

fn stroke_outline(ctx: &mut vello_cpu::RenderContext, outline: &vello_cpu::kurbo::BezPath) {
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_stroke(vello_cpu::kurbo::Stroke::new(OUTLINE_WIDTH));
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(0, 0, 0, 255));
    ctx.stroke_path(outline);
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> JigsawResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| JigsawError::render("video width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| JigsawError::render("video height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(JigsawError::render("video frame byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u16 * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
