//! Drawing capability set consumed by the compositor.
//!
//! Keeping this a trait means the compositor can be exercised against a
//! recording surface in tests while production rendering goes through the
//! tiny-skia implementation.

use crate::ansi::{Color, FontWeight};

/// Paint for a filled shape: either a flat color or a two-stop linear
/// gradient between two canvas points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fill {
    Solid([u8; 4]),
    Linear {
        from: (f32, f32),
        to: (f32, f32),
        start: [u8; 4],
        end: [u8; 4],
    },
}

pub trait Surface {
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, fill: Fill);

    fn fill_rounded_rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
        fill: Fill,
    );

    /// Draws `text` with its top-left corner at `(x, y)`.
    fn draw_text(&mut self, x: f32, y: f32, text: &str, weight: FontWeight, color: Color);
}
