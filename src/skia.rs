//! tiny-skia backed implementation of the drawing surface.
//!
//! Shapes go through tiny-skia paths and shaders; glyphs are rasterized with
//! fontdue and alpha-blended straight into the pixmap, with a per-run glyph
//! cache. The finished canvas encodes to PNG via the image crate.

use std::collections::HashMap;
use std::io::Cursor;

use anyhow::{anyhow, Context, Result};
use fontdue::layout::{
    CoordinateSystem, GlyphRasterConfig, HorizontalAlign, Layout, LayoutSettings, TextStyle,
    VerticalAlign, WrapStyle,
};
use image::{ImageFormat, RgbaImage};
use tiny_skia::{
    Color as SkiaColor, FillRule, GradientStop, LinearGradient, Paint, PathBuilder, Pixmap, Point,
    Rect, SpreadMode, Transform,
};

use crate::ansi::{Color, FontWeight};
use crate::fonts::FontStore;
use crate::surface::{Fill, Surface};

#[derive(Debug, Clone)]
struct GlyphBitmap {
    width: usize,
    coverage: Vec<u8>,
}

pub struct SkiaSurface<'a> {
    pixmap: Pixmap,
    fonts: &'a FontStore,
    glyph_cache: HashMap<GlyphRasterConfig, GlyphBitmap>,
}

impl<'a> SkiaSurface<'a> {
    pub fn new(width: u32, height: u32, fonts: &'a FontStore) -> Result<Self> {
        let pixmap = Pixmap::new(width, height)
            .ok_or_else(|| anyhow!("cannot create a {width}x{height} canvas"))?;
        Ok(Self {
            pixmap,
            fonts,
            glyph_cache: HashMap::new(),
        })
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut rgba = Vec::with_capacity(self.pixmap.data().len());
        for pixel in self.pixmap.pixels() {
            let color = pixel.demultiply();
            rgba.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
        }

        let img = RgbaImage::from_raw(self.pixmap.width(), self.pixmap.height(), rgba)
            .ok_or_else(|| anyhow!("canvas buffer size mismatch during encode"))?;

        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .context("failed to encode PNG")?;
        Ok(bytes)
    }
}

impl Surface for SkiaSurface<'_> {
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, fill: Fill) {
        let Some(rect) = Rect::from_xywh(x, y, width, height) else {
            return;
        };
        let paint = make_paint(fill);
        self.pixmap
            .fill_rect(rect, &paint, Transform::identity(), None);
    }

    fn fill_rounded_rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
        fill: Fill,
    ) {
        let Some(path) = rounded_rect_path(x, y, width, height, radius) else {
            return;
        };
        let paint = make_paint(fill);
        self.pixmap
            .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }

    fn draw_text(&mut self, x: f32, y: f32, text: &str, weight: FontWeight, color: Color) {
        let font = self.fonts.font(weight);

        let mut layout = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings {
            x,
            y,
            max_width: None,
            max_height: None,
            horizontal_align: HorizontalAlign::Left,
            vertical_align: VerticalAlign::Top,
            line_height: 1.0,
            wrap_style: WrapStyle::Letter,
            wrap_hard_breaks: true,
        });
        layout.append(&[font], &TextStyle::new(text, self.fonts.size(), 0));

        let rgba = color.rgba();
        let frame_width = self.pixmap.width();
        let frame_height = self.pixmap.height();

        for glyph in layout.glyphs() {
            if glyph.width == 0 || glyph.height == 0 {
                continue;
            }
            let bitmap = self.glyph_cache.entry(glyph.key).or_insert_with(|| {
                let (_, coverage) = font.rasterize_config(glyph.key);
                GlyphBitmap {
                    width: glyph.width,
                    coverage,
                }
            });

            blend_glyph(
                self.pixmap.data_mut(),
                frame_width,
                frame_height,
                glyph.x.round() as i32,
                glyph.y.round() as i32,
                bitmap,
                rgba,
            );
        }
    }
}

fn make_paint(fill: Fill) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.anti_alias = true;

    match fill {
        Fill::Solid([r, g, b, a]) => paint.set_color_rgba8(r, g, b, a),
        Fill::Linear {
            from,
            to,
            start,
            end,
        } => {
            let shader = LinearGradient::new(
                Point::from_xy(from.0, from.1),
                Point::from_xy(to.0, to.1),
                vec![
                    GradientStop::new(0.0, skia_color(start)),
                    GradientStop::new(1.0, skia_color(end)),
                ],
                SpreadMode::Pad,
                Transform::identity(),
            );
            match shader {
                Some(shader) => paint.shader = shader,
                // Degenerate gradient geometry falls back to the start color.
                None => paint.set_color_rgba8(start[0], start[1], start[2], start[3]),
            }
        }
    }

    paint
}

fn skia_color([r, g, b, a]: [u8; 4]) -> SkiaColor {
    SkiaColor::from_rgba8(r, g, b, a)
}

/// Rounded rectangle built the way the original drew it: straight edges with
/// one quadratic curve per corner.
fn rounded_rect_path(x: f32, y: f32, width: f32, height: f32, radius: f32) -> Option<tiny_skia::Path> {
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    let radius = radius.min(width / 2.0).min(height / 2.0).max(0.0);

    let mut pb = PathBuilder::new();
    pb.move_to(x + radius, y);
    pb.line_to(x + width - radius, y);
    pb.quad_to(x + width, y, x + width, y + radius);
    pb.line_to(x + width, y + height - radius);
    pb.quad_to(x + width, y + height, x + width - radius, y + height);
    pb.line_to(x + radius, y + height);
    pb.quad_to(x, y + height, x, y + height - radius);
    pb.line_to(x, y + radius);
    pb.quad_to(x, y, x + radius, y);
    pb.close();
    pb.finish()
}

/// Blends a glyph's coverage bitmap into the frame at `(x, y)`, clipping
/// rows and columns that fall outside the canvas.
fn blend_glyph(
    frame: &mut [u8],
    frame_width: u32,
    frame_height: u32,
    x: i32,
    y: i32,
    glyph: &GlyphBitmap,
    color: [u8; 4],
) {
    for (row, line) in glyph.coverage.chunks_exact(glyph.width).enumerate() {
        let py = y + row as i32;
        if py < 0 || py >= frame_height as i32 {
            continue;
        }

        for (col, &coverage) in line.iter().enumerate() {
            let px = x + col as i32;
            if coverage == 0 || px < 0 || px >= frame_width as i32 {
                continue;
            }

            let idx = ((py as u32 * frame_width + px as u32) * 4) as usize;
            blend_pixel(frame, idx, color, coverage);
        }
    }
}

// Source-over with the glyph's coverage folded into the text alpha. The
// canvas below text is always opaque, so writing straight values into the
// premultiplied pixmap stays consistent.
fn blend_pixel(frame: &mut [u8], idx: usize, color: [u8; 4], coverage: u8) {
    let alpha = u32::from(coverage) * u32::from(color[3]) / 255;
    if alpha == 0 {
        return;
    }
    let inv_alpha = 255 - alpha;

    let (rgb, tail) = frame[idx..idx + 4].split_at_mut(3);
    for (channel, slot) in rgb.iter_mut().enumerate() {
        let dst = u32::from(*slot);
        *slot = ((u32::from(color[channel]) * alpha + dst * inv_alpha + 127) / 255) as u8;
    }
    tail[0] = 255;
}
