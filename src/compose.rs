//! Composites a layout onto a canvas: gradient backdrop, terminal window,
//! then the layout's draw operations in order.

use crate::layout::{DrawOp, Layout};
use crate::surface::{Fill, Surface};

/// Padding between the text block and the terminal window edge.
pub const TERMINAL_MARGIN: f32 = 30.0;
/// Corner radius of the terminal window.
pub const TERMINAL_RADIUS: f32 = 20.0;
/// Padding between the terminal window and the canvas edge.
pub const BACKGROUND_MARGIN: f32 = 90.0;

const GRADIENT_START: [u8; 4] = [63, 94, 251, 255];
const GRADIENT_END: [u8; 4] = [252, 70, 107, 255];
const SHADOW_OFFSET: f32 = 8.0;
const SHADOW_COLOR: [u8; 4] = [0, 0, 0, 120];
const TERMINAL_TINT: [u8; 4] = [0, 0, 0, 200];

/// Full canvas dimensions for a layout: content box plus both margin rings.
/// Empty content still yields the margin-only minimum canvas.
pub fn canvas_size(layout: &Layout) -> (u32, u32) {
    let padding = 2.0 * (TERMINAL_MARGIN + BACKGROUND_MARGIN);
    (
        (layout.content_width + padding).ceil() as u32,
        (layout.content_height + padding).ceil() as u32,
    )
}

pub fn composite(surface: &mut dyn Surface, layout: &Layout) {
    let (canvas_width, canvas_height) = canvas_size(layout);
    let canvas_width = canvas_width as f32;
    let canvas_height = canvas_height as f32;

    let gradient = Fill::Linear {
        from: (0.0, 0.0),
        to: (canvas_width, canvas_height),
        start: GRADIENT_START,
        end: GRADIENT_END,
    };

    surface.fill_rect(0.0, 0.0, canvas_width, canvas_height, gradient);

    let terminal_width = layout.content_width + 2.0 * TERMINAL_MARGIN;
    let terminal_height = layout.content_height + 2.0 * TERMINAL_MARGIN;

    surface.fill_rounded_rect(
        BACKGROUND_MARGIN + SHADOW_OFFSET,
        BACKGROUND_MARGIN + SHADOW_OFFSET,
        terminal_width,
        terminal_height,
        TERMINAL_RADIUS,
        Fill::Solid(SHADOW_COLOR),
    );

    // Two-pass window fill: the backdrop gradient again, darkened by a
    // translucent overlay, reads as frosted glass over the background.
    surface.fill_rounded_rect(
        BACKGROUND_MARGIN,
        BACKGROUND_MARGIN,
        terminal_width,
        terminal_height,
        TERMINAL_RADIUS,
        gradient,
    );
    surface.fill_rounded_rect(
        BACKGROUND_MARGIN,
        BACKGROUND_MARGIN,
        terminal_width,
        terminal_height,
        TERMINAL_RADIUS,
        Fill::Solid(TERMINAL_TINT),
    );

    let offset = BACKGROUND_MARGIN + TERMINAL_MARGIN;
    for op in &layout.ops {
        match op {
            DrawOp::BackgroundRect {
                x,
                y,
                width,
                height,
                color,
            } => {
                let fill = Fill::Solid(color.rgba());
                surface.fill_rect(x + offset, y + offset, *width, *height, fill);
            }
            DrawOp::TextRun { x, y, text, style } => {
                surface.draw_text(x + offset, y + offset, text, style.weight, style.foreground);
            }
        }
    }
}
