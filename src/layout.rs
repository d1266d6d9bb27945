//! Turns tokenized text into positioned draw operations.
//!
//! The engine folds an explicit [`StyleState`] over the token stream while a
//! cursor tracks where the next run lands. Measurement goes through the
//! [`TextMeasurer`] seam so the whole algorithm runs under test with a
//! fixed-advance mock instead of a real font.

use crate::ansi::{self, Color, FontWeight, StyleState, Token};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub width: f32,
    pub ascent: f32,
    pub descent: f32,
}

/// Text measurement capability. `text` may span multiple lines; `width` is
/// the widest line and `ascent + descent` the height of the whole block.
pub trait TextMeasurer {
    fn measure(&self, weight: FontWeight, text: &str) -> TextMetrics;
}

/// One compositor instruction. Background rects are emitted before the text
/// run they sit under, and replay order is significant.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    TextRun {
        x: f32,
        y: f32,
        text: String,
        style: StyleState,
    },
    BackgroundRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub ops: Vec<DrawOp>,
    pub content_width: f32,
    pub content_height: f32,
}

/// Lays out `text` starting at `(left, top)`.
///
/// Line height is fixed for the whole block: the de-escaped text is measured
/// once and its height divided by its line count. That deliberately assumes
/// uniform metrics across regular and bold faces, matching the original
/// renderer rather than true per-line terminal metrics.
pub fn layout_text(text: &str, measurer: &dyn TextMeasurer, left: f32, top: f32) -> Layout {
    let tokens = ansi::tokenize(text);

    let plain = de_escaped(&tokens);
    let line_count = plain.split('\n').count();
    let line_height = if plain.is_empty() {
        0.0
    } else {
        let block = measurer.measure(FontWeight::Regular, &plain);
        (block.ascent + block.descent) / line_count as f32
    };

    let mut ops = Vec::new();
    let mut state = StyleState::default();
    let mut active_background = None;
    let mut x = left;
    let mut y = top;

    for token in &tokens {
        match token {
            Token::Escape(codes) => {
                active_background = ansi::apply_sgr(codes, &mut state);
            }
            Token::Literal(chunk) => {
                let sublines: Vec<&str> = chunk.split('\n').collect();
                let last = sublines.len() - 1;

                for (index, subline) in sublines.iter().enumerate() {
                    if index > 0 {
                        x = left;
                        y += line_height;
                    }

                    let width = measurer.measure(state.weight, subline).width;
                    if !subline.is_empty() {
                        if let Some(background) = active_background {
                            ops.push(DrawOp::BackgroundRect {
                                x,
                                y: y.round(),
                                width,
                                height: line_height.round(),
                                color: background,
                            });
                        }
                        ops.push(DrawOp::TextRun {
                            x,
                            y,
                            text: (*subline).to_owned(),
                            style: state,
                        });
                    }

                    if index == last {
                        x += width;
                    }
                }
            }
        }
    }

    let content_width = if plain.is_empty() {
        0.0
    } else {
        measurer.measure(FontWeight::Regular, &plain).width
    };

    Layout {
        ops,
        content_width,
        content_height: line_count as f32 * line_height,
    }
}

/// The literal text with every escape token removed.
fn de_escaped(tokens: &[Token]) -> String {
    let mut plain = String::new();
    for token in tokens {
        if let Token::Literal(chunk) = token {
            plain.push_str(chunk);
        }
    }
    plain
}

#[cfg(test)]
mod tests {
    use super::{layout_text, DrawOp, FontWeight, TextMeasurer, TextMetrics};
    use crate::ansi::{Color, StyleState};

    /// Every character advances 10px; every block line is 20px tall.
    struct FixedMeasurer;

    impl TextMeasurer for FixedMeasurer {
        fn measure(&self, _weight: FontWeight, text: &str) -> TextMetrics {
            let widest = text
                .split('\n')
                .map(|line| line.chars().count())
                .max()
                .unwrap_or(0);
            let lines = text.split('\n').count();
            TextMetrics {
                width: widest as f32 * 10.0,
                ascent: lines as f32 * 16.0,
                descent: lines as f32 * 4.0,
            }
        }
    }

    fn text_runs(ops: &[DrawOp]) -> Vec<&DrawOp> {
        ops.iter()
            .filter(|op| matches!(op, DrawOp::TextRun { .. }))
            .collect()
    }

    #[test]
    fn plain_text_is_one_default_styled_run() {
        let layout = layout_text("hello", &FixedMeasurer, 0.0, 0.0);
        assert_eq!(
            layout.ops,
            vec![DrawOp::TextRun {
                x: 0.0,
                y: 0.0,
                text: "hello".to_owned(),
                style: StyleState::default(),
            }]
        );
        assert_eq!(layout.content_width, 50.0);
        assert_eq!(layout.content_height, 20.0);
    }

    #[test]
    fn foreground_escape_styles_the_following_run() {
        let layout = layout_text("\x1b[31mhi\x1b[0m", &FixedMeasurer, 0.0, 0.0);
        let runs = text_runs(&layout.ops);
        assert_eq!(runs.len(), 1);
        let DrawOp::TextRun { text, style, .. } = runs[0] else {
            unreachable!()
        };
        assert_eq!(text, "hi");
        assert_eq!(style.foreground, Color::Red);
        assert!(layout
            .ops
            .iter()
            .all(|op| !matches!(op, DrawOp::BackgroundRect { .. })));
    }

    #[test]
    fn background_rect_precedes_its_text_run() {
        let layout = layout_text("\x1b[41mhi", &FixedMeasurer, 0.0, 0.0);
        assert_eq!(layout.ops.len(), 2);
        assert_eq!(
            layout.ops[0],
            DrawOp::BackgroundRect {
                x: 0.0,
                y: 0.0,
                width: 20.0,
                height: 20.0,
                color: Color::Red,
            }
        );
        let DrawOp::TextRun { x, y, text, .. } = &layout.ops[1] else {
            unreachable!()
        };
        assert_eq!((*x, *y), (0.0, 0.0));
        assert_eq!(text, "hi");
    }

    #[test]
    fn reset_keeps_background_active() {
        // The original renderer never clears background on SGR 0.
        let layout = layout_text("\x1b[41m\x1b[0mhi", &FixedMeasurer, 0.0, 0.0);
        assert!(matches!(
            layout.ops[0],
            DrawOp::BackgroundRect {
                color: Color::Red,
                ..
            }
        ));
    }

    #[test]
    fn newline_resets_x_and_advances_y() {
        let layout = layout_text("a\nb", &FixedMeasurer, 5.0, 7.0);
        let runs = text_runs(&layout.ops);
        assert_eq!(runs.len(), 2);
        let DrawOp::TextRun { x, y, .. } = runs[0] else {
            unreachable!()
        };
        assert_eq!((*x, *y), (5.0, 7.0));
        let DrawOp::TextRun { x, y, .. } = runs[1] else {
            unreachable!()
        };
        assert_eq!((*x, *y), (5.0, 27.0));
        assert_eq!(layout.content_height, 40.0);
    }

    #[test]
    fn styled_chunks_continue_on_the_same_line() {
        let layout = layout_text("ab\x1b[32mcd", &FixedMeasurer, 0.0, 0.0);
        let runs = text_runs(&layout.ops);
        assert_eq!(runs.len(), 2);
        let DrawOp::TextRun { x, y, .. } = runs[1] else {
            unreachable!()
        };
        assert_eq!((*x, *y), (20.0, 0.0));
    }

    #[test]
    fn trailing_newline_advances_without_emitting() {
        let layout = layout_text("a\n", &FixedMeasurer, 0.0, 0.0);
        assert_eq!(text_runs(&layout.ops).len(), 1);
        assert_eq!(layout.content_height, 40.0);
    }

    #[test]
    fn empty_input_has_no_ops_and_no_size() {
        let layout = layout_text("", &FixedMeasurer, 0.0, 0.0);
        assert!(layout.ops.is_empty());
        assert_eq!(layout.content_width, 0.0);
        assert_eq!(layout.content_height, 0.0);
    }

    #[test]
    fn bold_escape_switches_run_weight() {
        let layout = layout_text("\x1b[1mloud", &FixedMeasurer, 0.0, 0.0);
        let DrawOp::TextRun { style, .. } = &layout.ops[0] else {
            unreachable!()
        };
        assert_eq!(style.weight, FontWeight::Bold);
    }
}
