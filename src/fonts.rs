//! Monospace font loading and fontdue-backed text measurement.
//!
//! Explicit `--font`/`--bold-font` paths win; otherwise a fixed list of
//! common system font locations is probed. Bold falls back to the regular
//! face when no bold file is available.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use fontdue::{Font, FontSettings};

use crate::ansi::FontWeight;
use crate::layout::{TextMeasurer, TextMetrics};

const REGULAR_CANDIDATES: [&str; 7] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/dejavu-sans-mono-fonts/DejaVuSansMono.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
    "/usr/share/fonts/liberation-mono/LiberationMono-Regular.ttf",
    "/usr/share/fonts/truetype/ubuntu/UbuntuMono-R.ttf",
    "/usr/share/fonts/gnu-free/FreeMono.otf",
];

const BOLD_CANDIDATES: [&str; 7] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono-Bold.ttf",
    "/usr/share/fonts/dejavu-sans-mono-fonts/DejaVuSansMono-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationMono-Bold.ttf",
    "/usr/share/fonts/liberation-mono/LiberationMono-Bold.ttf",
    "/usr/share/fonts/truetype/ubuntu/UbuntuMono-B.ttf",
    "/usr/share/fonts/gnu-free/FreeMonoBold.otf",
];

#[derive(Debug)]
pub struct FontStore {
    regular: Font,
    bold: Option<Font>,
    size: f32,
}

impl FontStore {
    pub fn load(regular: Option<&Path>, bold: Option<&Path>, size: f32) -> Result<Self> {
        if !size.is_finite() || size <= 0.0 {
            bail!("font size must be a positive number, got {size}");
        }

        let regular_path = resolve_path(regular, &REGULAR_CANDIDATES)?.ok_or_else(|| {
            anyhow!("no monospace font found in the usual locations; pass --font <path>")
        })?;
        let regular = load_font(&regular_path)?;

        let bold = match resolve_path(bold, &BOLD_CANDIDATES)? {
            Some(path) => Some(load_font(&path)?),
            None => None,
        };

        Ok(Self {
            regular,
            bold,
            size,
        })
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn font(&self, weight: FontWeight) -> &Font {
        match weight {
            FontWeight::Regular => &self.regular,
            FontWeight::Bold => self.bold.as_ref().unwrap_or(&self.regular),
        }
    }
}

impl TextMeasurer for FontStore {
    fn measure(&self, weight: FontWeight, text: &str) -> TextMetrics {
        let font = self.font(weight);

        let mut width = 0.0_f32;
        for line in text.split('\n') {
            let advance: f32 = line
                .chars()
                .map(|ch| font.metrics(ch, self.size).advance_width)
                .sum();
            width = width.max(advance);
        }

        let line_count = text.split('\n').count() as f32;
        let (ascent, descent, new_line_size) = match font.horizontal_line_metrics(self.size) {
            Some(metrics) => (metrics.ascent, -metrics.descent, metrics.new_line_size),
            None => (self.size * 0.8, self.size * 0.2, self.size * 1.2),
        };

        TextMetrics {
            width,
            ascent: ascent + (line_count - 1.0) * new_line_size,
            descent,
        }
    }
}

fn resolve_path(explicit: Option<&Path>, candidates: &[&str]) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.is_file() {
            bail!("font file '{}' does not exist", path.display());
        }
        return Ok(Some(path.to_path_buf()));
    }

    Ok(candidates
        .iter()
        .map(Path::new)
        .find(|path| path.is_file())
        .map(Path::to_path_buf))
}

fn load_font(path: &Path) -> Result<Font> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read font file '{}'", path.display()))?;
    Font::from_bytes(bytes, FontSettings::default())
        .map_err(|error| anyhow!("failed to parse font '{}': {error}", path.display()))
}
