//! End-to-end run: stdin → normalized text → layout → composite → PNG file.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::compose::{canvas_size, composite};
use crate::fonts::FontStore;
use crate::layout::layout_text;
use crate::skia::SkiaSurface;

#[derive(Debug, Clone)]
pub struct RenderArgs {
    pub output: PathBuf,
    pub command: Option<String>,
    pub font: Option<PathBuf>,
    pub bold_font: Option<PathBuf>,
    pub font_size: f32,
}

pub fn run(args: &RenderArgs) -> Result<()> {
    let mut raw = String::new();
    std::io::stdin()
        .read_to_string(&mut raw)
        .context("failed to read text from stdin")?;

    let text = prepare_input(&raw, args.command.as_deref());
    render_to_file(&text, args)
}

pub fn render_to_file(text: &str, args: &RenderArgs) -> Result<()> {
    let fonts = FontStore::load(
        args.font.as_deref(),
        args.bold_font.as_deref(),
        args.font_size,
    )?;

    let layout = layout_text(text, &fonts, 0.0, 0.0);
    let (width, height) = canvas_size(&layout);
    eprintln!("rendering {width}x{height} canvas ({} ops)", layout.ops.len());

    let mut surface = SkiaSurface::new(width, height, &fonts)?;
    composite(&mut surface, &layout);

    let bytes = surface.encode_png()?;
    write_output(&args.output, &bytes)?;

    println!("Wrote {}", args.output.display());
    Ok(())
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).with_context(|| format!("failed to write '{}'", path.display()))
}

/// Optional `$ command` prompt line, then one leading newline stripped and
/// all trailing whitespace trimmed.
pub fn prepare_input(raw: &str, command: Option<&str>) -> String {
    let mut text = match command {
        Some(command) => format!("$ {command}\n\n{raw}"),
        None => raw.to_owned(),
    };

    if text.starts_with('\n') {
        text.remove(0);
    }
    let trimmed = text.trim_end().len();
    text.truncate(trimmed);
    text
}

#[cfg(test)]
mod tests {
    use super::prepare_input;

    #[test]
    fn command_prefix_becomes_a_prompt_line() {
        assert_eq!(
            prepare_input("output\n", Some("ls -la")),
            "$ ls -la\n\noutput"
        );
    }

    #[test]
    fn only_one_leading_newline_is_stripped() {
        assert_eq!(prepare_input("\n\nhello", None), "\nhello");
    }

    #[test]
    fn trailing_whitespace_is_trimmed() {
        assert_eq!(prepare_input("hello  \n\t\n", None), "hello");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(prepare_input("", None), "");
        assert_eq!(prepare_input("\n", None), "");
    }
}
