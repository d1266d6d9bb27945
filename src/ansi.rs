//! SGR escape-sequence tokenizer and interpreter.
//!
//! Input text is split into literal chunks and `ESC…m` escape tokens. Escape
//! tokens carry the numeric SGR parameters found inside them; everything else
//! about the sequence is discarded. Only the classic 8-color palette plus the
//! bold attribute are modeled — unknown codes are ignored, not errors.

use std::sync::OnceLock;

use regex::Regex;

/// The fixed 8-entry palette. No truecolor, no 256-color extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl Color {
    const PALETTE: [Color; 8] = [
        Color::Black,
        Color::Red,
        Color::Green,
        Color::Yellow,
        Color::Blue,
        Color::Magenta,
        Color::Cyan,
        Color::White,
    ];

    pub fn rgba(self) -> [u8; 4] {
        match self {
            Color::Black => [40, 42, 46, 255],
            Color::Red => [204, 102, 102, 255],
            Color::Green => [181, 189, 104, 255],
            Color::Yellow => [240, 198, 116, 255],
            Color::Blue => [129, 162, 190, 255],
            Color::Magenta => [178, 148, 187, 255],
            Color::Cyan => [138, 190, 183, 255],
            Color::White => [220, 223, 228, 255],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

/// Active text attributes at one cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleState {
    pub weight: FontWeight,
    pub foreground: Color,
    pub background: Option<Color>,
}

impl Default for StyleState {
    fn default() -> Self {
        Self {
            weight: FontWeight::Regular,
            foreground: Color::White,
            background: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Literal(String),
    Escape(Vec<u16>),
}

fn escape_regex() -> &'static Regex {
    static ESCAPE_RE: OnceLock<Regex> = OnceLock::new();
    ESCAPE_RE.get_or_init(|| Regex::new("\x1b.+?m").expect("escape regex should compile"))
}

fn params_regex() -> &'static Regex {
    static PARAMS_RE: OnceLock<Regex> = OnceLock::new();
    PARAMS_RE.get_or_init(|| Regex::new(r"(\d+;?)+").expect("params regex should compile"))
}

/// Splits `raw` into alternating literal and escape tokens. Literals between
/// adjacent escapes come out empty and are kept; they just draw nothing.
pub fn tokenize(raw: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut cursor = 0;

    for found in escape_regex().find_iter(raw) {
        tokens.push(Token::Literal(raw[cursor..found.start()].to_owned()));
        tokens.push(Token::Escape(parse_params(found.as_str())));
        cursor = found.end();
    }
    tokens.push(Token::Literal(raw[cursor..].to_owned()));

    tokens
}

/// Pulls the numeric parameter list out of one escape sequence. A sequence
/// with no digits yields an empty list, which later applies as a no-op.
fn parse_params(escape: &str) -> Vec<u16> {
    let Some(found) = params_regex().find(escape) else {
        return Vec::new();
    };

    found
        .as_str()
        .split(';')
        .filter_map(|code| code.parse::<u16>().ok())
        .collect()
}

/// Folds one escape token's codes into `state`, left to right, and reports
/// the background that is active afterwards.
///
/// Code 0 resets weight and foreground only. The original tool never cleared
/// the background on reset, and that asymmetry is kept: once set, a
/// background persists until another 40-47 code replaces it.
pub fn apply_sgr(codes: &[u16], state: &mut StyleState) -> Option<Color> {
    for &code in codes {
        match code {
            0 => {
                state.weight = FontWeight::Regular;
                state.foreground = Color::White;
            }
            1 => state.weight = FontWeight::Bold,
            30..=37 => state.foreground = Color::PALETTE[usize::from(code - 30)],
            40..=47 => state.background = Some(Color::PALETTE[usize::from(code - 40)]),
            _ => {}
        }
    }
    state.background
}
