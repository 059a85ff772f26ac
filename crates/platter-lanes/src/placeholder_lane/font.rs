// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Typefaces and the ordered chain used to pick one.

use ab_glyph::{point, Font, FontVec, PxScale, ScaleFont};
use font8x8::{UnicodeFonts, BASIC_FONTS};
use std::fmt;
use std::path::PathBuf;

/// Something that can measure and rasterize a single line of text.
///
/// Coordinates are in canvas pixels; `(x, y)` is the top-left corner of the
/// line box returned by [`Typeface::measure`].
pub trait Typeface: Send + Sync {
    /// A human-readable name, for logs.
    fn name(&self) -> &str;

    /// Width and height of `text` rendered at `px` pixels.
    fn measure(&self, text: &str, px: f32) -> (u32, u32);

    /// Rasterizes `text`, calling `plot(x, y, coverage)` for every touched pixel.
    ///
    /// Coverage is in `[0, 1]`. Pixels may fall outside the canvas; the caller clips.
    fn draw(&self, text: &str, px: f32, x: i32, y: i32, plot: &mut dyn FnMut(i32, i32, f32));
}

/// An outline font loaded from TrueType or OpenType data.
pub struct ScalableTypeface {
    name: String,
    font: FontVec,
}

impl ScalableTypeface {
    /// Parses font data. Returns `None` if the bytes are not a usable font.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Option<Self> {
        let font = FontVec::try_from_vec(bytes).ok()?;
        Some(Self {
            name: name.into(),
            font,
        })
    }
}

impl Typeface for ScalableTypeface {
    fn name(&self) -> &str {
        &self.name
    }

    fn measure(&self, text: &str, px: f32) -> (u32, u32) {
        let scaled = self.font.as_scaled(PxScale::from(px));
        let mut width = 0.0f32;
        let mut previous = None;
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(prev) = previous {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            previous = Some(id);
        }
        let height = scaled.ascent() - scaled.descent();
        (width.max(0.0).ceil() as u32, height.max(0.0).ceil() as u32)
    }

    fn draw(&self, text: &str, px: f32, x: i32, y: i32, plot: &mut dyn FnMut(i32, i32, f32)) {
        let scale = PxScale::from(px);
        let scaled = self.font.as_scaled(scale);
        let baseline = y as f32 + scaled.ascent();
        let mut caret = x as f32;
        let mut previous = None;

        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(scale, point(caret, baseline));
            caret += scaled.h_advance(id);
            previous = Some(id);

            if let Some(outlined) = self.font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                let (left, top) = (bounds.min.x as i32, bounds.min.y as i32);
                outlined.draw(|gx, gy, coverage| {
                    plot(left + gx as i32, top + gy as i32, coverage);
                });
            }
        }
    }
}

impl fmt::Debug for ScalableTypeface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScalableTypeface")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// The built-in 8x8 bitmap font, scaled by a whole-number factor.
///
/// Always available. Characters outside the basic Latin block are drawn as `?`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitmapTypeface;

impl BitmapTypeface {
    const CELL: u32 = 8;

    fn factor(px: f32) -> u32 {
        ((px / Self::CELL as f32).round() as u32).max(1)
    }

    fn glyph(c: char) -> [u8; 8] {
        BASIC_FONTS
            .get(c)
            .or_else(|| BASIC_FONTS.get('?'))
            .unwrap_or([0; 8])
    }
}

impl Typeface for BitmapTypeface {
    fn name(&self) -> &str {
        "builtin 8x8 bitmap"
    }

    fn measure(&self, text: &str, px: f32) -> (u32, u32) {
        let cell = Self::CELL * Self::factor(px);
        (text.chars().count() as u32 * cell, cell)
    }

    fn draw(&self, text: &str, px: f32, x: i32, y: i32, plot: &mut dyn FnMut(i32, i32, f32)) {
        let k = Self::factor(px) as i32;
        let cell = Self::CELL as i32 * k;

        for (index, c) in text.chars().enumerate() {
            let origin_x = x + index as i32 * cell;
            for (row, bits) in Self::glyph(c).iter().enumerate() {
                for col in 0..Self::CELL as i32 {
                    // Bit 0 is the leftmost pixel of the row.
                    if bits & (1 << col) == 0 {
                        continue;
                    }
                    for dy in 0..k {
                        for dx in 0..k {
                            plot(origin_x + col * k + dx, y + row as i32 * k + dy, 1.0);
                        }
                    }
                }
            }
        }
    }
}

/// One attempt in a [`FontChain`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    /// A font file on disk.
    File(PathBuf),
    /// Font data already in memory.
    Bytes {
        /// Name reported in logs.
        name: String,
        /// Raw TrueType or OpenType data.
        data: Vec<u8>,
    },
}

impl FontSource {
    /// Tries to load this source. A missing file or unparsable data yields `None`.
    pub fn load(&self) -> Option<Box<dyn Typeface>> {
        let typeface = match self {
            FontSource::File(path) => {
                let bytes = std::fs::read(path).ok()?;
                ScalableTypeface::from_bytes(path.display().to_string(), bytes)?
            }
            FontSource::Bytes { name, data } => {
                ScalableTypeface::from_bytes(name.clone(), data.clone())?
            }
        };
        Some(Box::new(typeface))
    }
}

const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    // macOS
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Bold.ttf",
    // Windows
    "C:\\Windows\\Fonts\\arialbd.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// An ordered list of font sources, tried first to last.
///
/// Resolution never fails: when no source loads, the [`BitmapTypeface`] is used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontChain {
    sources: Vec<FontSource>,
}

impl FontChain {
    /// A chain over exactly these sources.
    pub fn new(sources: Vec<FontSource>) -> Self {
        Self { sources }
    }

    /// The OS-bundled fonts commonly present on macOS, Linux and Windows.
    pub fn system_defaults() -> Self {
        Self::new(
            SYSTEM_FONT_CANDIDATES
                .iter()
                .map(|path| FontSource::File(PathBuf::from(path)))
                .collect(),
        )
    }

    /// A chain with no sources, which always resolves to the bitmap font.
    pub fn bitmap_only() -> Self {
        Self::default()
    }

    /// Puts `path` in front of every other source.
    pub fn with_preferred(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.insert(0, FontSource::File(path.into()));
        self
    }

    /// Appends a source after the existing ones.
    pub fn push(&mut self, source: FontSource) {
        self.sources.push(source);
    }

    /// The sources in attempt order.
    pub fn sources(&self) -> &[FontSource] {
        &self.sources
    }

    /// Returns the first source that loads, or the bitmap font.
    pub fn resolve(&self) -> Box<dyn Typeface> {
        for source in &self.sources {
            if let Some(typeface) = source.load() {
                log::debug!("Using font '{}'", typeface.name());
                return typeface;
            }
            log::trace!("Font source '{}' unavailable", source_label(source));
        }
        log::debug!("No scalable font available, using the built-in bitmap font");
        Box::new(BitmapTypeface)
    }
}

fn source_label(source: &FontSource) -> String {
    match source {
        FontSource::File(path) => path.display().to_string(),
        FontSource::Bytes { name, .. } => name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitmap_measure_scales_by_whole_factor() {
        let font = BitmapTypeface;
        assert_eq!(font.measure("abc", 8.0), (24, 8));
        assert_eq!(font.measure("abc", 16.0), (48, 16));
        assert_eq!(font.measure("abc", 3.0), (24, 8));
        assert_eq!(font.measure("", 16.0), (0, 16));
    }

    #[test]
    fn test_bitmap_draw_stays_inside_measured_box() {
        let font = BitmapTypeface;
        let (w, h) = font.measure("Hi?é", 16.0);
        let mut plotted = 0;
        font.draw("Hi?é", 16.0, 10, 20, &mut |x: i32, y: i32, _: f32| {
            assert!(x >= 10 && x < 10 + w as i32);
            assert!(y >= 20 && y < 20 + h as i32);
            plotted += 1;
        });
        assert!(plotted > 0);
    }

    #[test]
    fn test_scalable_glyphs_stay_near_measured_box() {
        // Needs an installed font; machines without one only exercise the bitmap path.
        let Some(font) = SYSTEM_FONT_CANDIDATES
            .iter()
            .filter_map(|path| std::fs::read(path).ok().map(|bytes| (path, bytes)))
            .find_map(|(path, bytes)| ScalableTypeface::from_bytes(*path, bytes))
        else {
            return;
        };

        // Antialiased edges may spill a pixel past the advance box.
        const SLACK: i32 = 2;
        for px in [8.0, 28.0, 64.0] {
            let (w, h) = font.measure("Greek Salad", px);
            assert!(w > 0 && h as f32 >= px * 0.8, "{px}px measured {w}x{h}");

            let mut plotted = 0;
            font.draw("Greek Salad", px, 50, 40, &mut |x: i32, y: i32, coverage: f32| {
                assert!(coverage >= 0.0);
                assert!(x >= 50 - SLACK && x < 50 + w as i32 + SLACK, "x {x} at {px}px");
                assert!(y >= 40 - SLACK && y < 40 + h as i32 + SLACK, "y {y} at {px}px");
                plotted += 1;
            });
            assert!(plotted > 0);
        }
    }

    #[test]
    fn test_unusable_sources_fall_back_to_bitmap() {
        let dir = tempfile::tempdir().unwrap();
        let garbage = dir.path().join("broken.ttf");
        std::fs::write(&garbage, b"not a font").unwrap();

        let chain = FontChain::bitmap_only()
            .with_preferred(dir.path().join("missing.ttf"))
            .with_preferred(&garbage);
        assert_eq!(chain.sources().len(), 2);
        assert_eq!(chain.sources()[0], FontSource::File(garbage));

        let typeface = chain.resolve();
        assert_eq!(typeface.name(), BitmapTypeface.name());
    }

    #[test]
    fn test_invalid_bytes_do_not_load() {
        let source = FontSource::Bytes {
            name: "empty".to_string(),
            data: Vec::new(),
        };
        assert!(source.load().is_none());
    }
}
