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

//! Synthetic stand-in art for identifiers without a photograph.
//!
//! A placeholder is a solid or gradient background, optionally a translucent
//! card, and the entry's title (and description) centred on top with a drop
//! shadow. Output is always exactly the requested size; text that does not fit
//! is clipped at the canvas edge rather than rejected.
//!
//! The same text drawing captions photographs: a dark band fades in along the
//! bottom edge with the title and description on top.

mod canvas;
mod font;

pub use font::{BitmapTypeface, FontChain, FontSource, ScalableTypeface, Typeface};

use crate::source_lane::{from_rgba, to_rgba};
use canvas::Canvas;
use platter_core::{
    AssetIdentifier, CatalogEntry, ColorPolicy, PipelineError, PixelSize, PlaceholderBackground,
    PlaceholderStyle, Rgb, SourceImage,
};
use thiserror::Error;

const REFERENCE_SIDE: f32 = 360.0;
const TITLE_PX: f32 = 28.0;
const DESCRIPTION_PX: f32 = 16.0;
const MIN_TEXT_PX: f32 = 8.0;
const LINE_GAP: f32 = 20.0;
const CARD_PADDING: f32 = 20.0;
const CARD_SHADOW_OFFSET: f32 = 4.0;
const TEXT_SHADOW_OFFSET: f32 = 2.0;
const GRADIENT_DARKEN: u8 = 50;

const TEXT: Rgb = Rgb(255, 255, 255);
const SHADOW: Rgb = Rgb(0, 0, 0);
const TEXT_SHADOW_ALPHA: f32 = 180.0 / 255.0;
const CARD_ALPHA: f32 = 80.0 / 255.0;
const CARD_SHADOW_ALPHA: f32 = 40.0 / 255.0;

const CAPTION_BAND: f32 = 80.0;
const CAPTION_BAND_ALPHA: f32 = 180.0 / 255.0;
const CAPTION_TITLE_PX: f32 = 24.0;
const CAPTION_DESCRIPTION_PX: f32 = 14.0;
// Baselines measured up from the bottom edge.
const CAPTION_TITLE_RISE: f32 = 60.0;
const CAPTION_DESCRIPTION_RISE: f32 = 30.0;
const CAPTION_TITLE_ALPHA: f32 = 230.0 / 255.0;
const CAPTION_DESCRIPTION_ALPHA: f32 = 200.0 / 255.0;

/// An error raised while synthesizing placeholder art.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The requested canvas has no pixels.
    #[error("cannot render a placeholder of size {0}")]
    ZeroSize(PixelSize),
    /// The photograph to caption has a pixel buffer that does not match its size.
    #[error("cannot caption a photograph whose buffer does not match its {0} dimensions")]
    InvalidPhoto(PixelSize),
}

impl RenderError {
    /// Attaches the item's identifier, turning this into a per-item render failure.
    pub fn into_pipeline_error(self, identifier: &AssetIdentifier) -> PipelineError {
        PipelineError::Render {
            identifier: identifier.clone(),
            source: Box::new(self),
        }
    }
}

/// Renders placeholder images with a typeface resolved once at construction.
pub struct PlaceholderRenderer {
    typeface: Box<dyn Typeface>,
}

impl PlaceholderRenderer {
    /// Resolves `fonts` and keeps the winning typeface for every render.
    pub fn new(fonts: &FontChain) -> Self {
        Self::with_typeface(fonts.resolve())
    }

    /// Uses `typeface` directly, bypassing font resolution.
    pub fn with_typeface(typeface: Box<dyn Typeface>) -> Self {
        Self { typeface }
    }

    /// Name of the typeface in use.
    pub fn typeface_name(&self) -> &str {
        self.typeface.name()
    }

    /// Renders the placeholder for a catalog entry at `size`.
    pub fn render_entry(
        &self,
        entry: &CatalogEntry,
        size: PixelSize,
    ) -> Result<SourceImage, RenderError> {
        let policy = entry
            .color
            .map(ColorPolicy::Fixed)
            .unwrap_or(ColorPolicy::Seeded);
        self.render(
            &entry.id,
            &entry.display_title(),
            entry.description.as_deref(),
            size,
            policy,
            entry.style,
        )
    }

    /// Renders a placeholder image.
    ///
    /// # Errors
    /// Returns [`RenderError::ZeroSize`] if either dimension is zero. Long text
    /// never causes an error.
    pub fn render(
        &self,
        identifier: &AssetIdentifier,
        title: &str,
        description: Option<&str>,
        size: PixelSize,
        color: ColorPolicy,
        style: PlaceholderStyle,
    ) -> Result<SourceImage, RenderError> {
        if size.width == 0 || size.height == 0 {
            return Err(RenderError::ZeroSize(size));
        }

        let base = color.resolve(identifier);
        let mut canvas = Canvas::new(size.width, size.height);
        match style.background {
            PlaceholderBackground::Solid => canvas.fill(base),
            PlaceholderBackground::Gradient => {
                canvas.vertical_gradient(base, base.darken(GRADIENT_DARKEN))
            }
        }

        let layout = Layout::compute(self.typeface.as_ref(), size, title, description);
        if style.card {
            self.draw_card(&mut canvas, &layout);
        }
        let shadow = Some(layout.shadow);
        self.draw_text(&mut canvas, title, layout.title_px, layout.title, shadow, 1.0);
        if let (Some(text), Some(origin)) = (description, layout.description) {
            self.draw_text(&mut canvas, text, layout.description_px, origin, shadow, 1.0);
        }

        log::trace!(
            "Rendered {} placeholder for '{}' with '{}'",
            size,
            identifier,
            self.typeface.name()
        );
        from_rgba(canvas.into_image()).ok_or(RenderError::ZeroSize(size))
    }

    /// Draws the entry's title and description over the bottom of `photo`.
    ///
    /// Sizes follow the shorter side like placeholder text does. Call this on
    /// the largest variant so every smaller one carries the same caption.
    ///
    /// # Errors
    /// Returns [`RenderError::InvalidPhoto`] if the photo's buffer is malformed.
    pub fn caption(
        &self,
        entry: &CatalogEntry,
        photo: &SourceImage,
    ) -> Result<SourceImage, RenderError> {
        let size = photo.size();
        let image = to_rgba(photo).ok_or(RenderError::InvalidPhoto(size))?;
        let mut canvas = Canvas::from_image(image);

        let unit = size.width.min(size.height) as f32 / REFERENCE_SIDE;
        let (canvas_w, canvas_h) = (size.width as i32, size.height as i32);

        let band = ((CAPTION_BAND * unit).round() as i32).clamp(1, canvas_h);
        for i in 0..band {
            let alpha = CAPTION_BAND_ALPHA * i as f32 / band as f32;
            canvas.fill_rect(0, canvas_h - band + i, size.width, 1, SHADOW, alpha);
        }

        let shadow = (TEXT_SHADOW_OFFSET * unit).round().max(1.0) as i32;
        let title = entry.display_title();
        let title_px = (CAPTION_TITLE_PX * unit).max(MIN_TEXT_PX);
        let (title_w, _) = self.typeface.measure(&title, title_px);
        let title_origin = (
            (canvas_w - title_w as i32) / 2,
            canvas_h - (CAPTION_TITLE_RISE * unit).round() as i32,
        );
        self.draw_text(&mut canvas, &title, title_px, title_origin, Some(shadow), CAPTION_TITLE_ALPHA);

        if let Some(text) = entry.description.as_deref() {
            let px = (CAPTION_DESCRIPTION_PX * unit).max(MIN_TEXT_PX);
            let (w, _) = self.typeface.measure(text, px);
            let origin = (
                (canvas_w - w as i32) / 2,
                canvas_h - (CAPTION_DESCRIPTION_RISE * unit).round() as i32,
            );
            self.draw_text(&mut canvas, text, px, origin, None, CAPTION_DESCRIPTION_ALPHA);
        }

        log::trace!("Captioned {} photograph for '{}'", size, entry.id);
        from_rgba(canvas.into_image()).ok_or(RenderError::InvalidPhoto(size))
    }

    fn draw_card(&self, canvas: &mut Canvas, layout: &Layout) {
        let (x, y, w, h) = layout.card;
        let offset = layout.card_shadow;
        canvas.fill_rect(x + offset, y + offset, w, h, SHADOW, CARD_SHADOW_ALPHA);
        canvas.fill_rect(x, y, w, h, SHADOW, CARD_ALPHA);
    }

    fn draw_text(
        &self,
        canvas: &mut Canvas,
        text: &str,
        px: f32,
        origin: (i32, i32),
        shadow: Option<i32>,
        alpha: f32,
    ) {
        let (x, y) = origin;
        if let Some(offset) = shadow {
            self.typeface.draw(text, px, x + offset, y + offset, &mut |cx, cy, coverage| {
                canvas.blend(cx, cy, SHADOW, coverage * TEXT_SHADOW_ALPHA)
            });
        }
        self.typeface.draw(text, px, x, y, &mut |cx, cy, coverage| {
            canvas.blend(cx, cy, TEXT, coverage * alpha)
        });
    }
}

/// Pixel positions of every element, derived from the canvas size and the text.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Layout {
    title_px: f32,
    description_px: f32,
    title: (i32, i32),
    description: Option<(i32, i32)>,
    card: (i32, i32, u32, u32),
    card_shadow: i32,
    shadow: i32,
}

impl Layout {
    fn compute(
        typeface: &dyn Typeface,
        size: PixelSize,
        title: &str,
        description: Option<&str>,
    ) -> Self {
        let unit = size.width.min(size.height) as f32 / REFERENCE_SIDE;
        let title_px = (TITLE_PX * unit).max(MIN_TEXT_PX);
        let description_px = (DESCRIPTION_PX * unit).max(MIN_TEXT_PX);
        let gap = (LINE_GAP * unit).round() as i32;
        let padding = (CARD_PADDING * unit).round().max(1.0) as i32;

        let (canvas_w, canvas_h) = (size.width as i32, size.height as i32);
        let (title_w, title_h) = typeface.measure(title, title_px);
        let title_origin = ((canvas_w - title_w as i32) / 2, canvas_h / 2 - title_h as i32);

        let mut block_w = title_w as i32;
        let mut block_h = title_h as i32;
        let description_origin = description.map(|text| {
            let (w, h) = typeface.measure(text, description_px);
            let y = title_origin.1 + title_h as i32 + gap;
            block_w = block_w.max(w as i32);
            block_h += gap + h as i32;
            ((canvas_w - w as i32) / 2, y)
        });

        let card = (
            (canvas_w - block_w) / 2 - padding,
            title_origin.1 - padding,
            (block_w + 2 * padding) as u32,
            (block_h + 2 * padding) as u32,
        );

        Self {
            title_px,
            description_px,
            title: title_origin,
            description: description_origin,
            card,
            card_shadow: (CARD_SHADOW_OFFSET * unit).round().max(1.0) as i32,
            shadow: (TEXT_SHADOW_OFFSET * unit).round().max(1.0) as i32,
        }
    }
}
