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

use image::{Rgba, RgbaImage};
use platter_core::Rgb;

/// An opaque RGBA raster with clipped, alpha-blended drawing.
pub(crate) struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    /// Draws over an existing image. Its pixels are treated as opaque.
    pub(crate) fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub(crate) fn width(&self) -> u32 {
        self.image.width()
    }

    pub(crate) fn height(&self) -> u32 {
        self.image.height()
    }

    pub(crate) fn fill(&mut self, color: Rgb) {
        for pixel in self.image.pixels_mut() {
            *pixel = opaque(color);
        }
    }

    /// Fills row by row, interpolating from `top` on the first row to `bottom` on the last.
    pub(crate) fn vertical_gradient(&mut self, top: Rgb, bottom: Rgb) {
        let span = self.height().saturating_sub(1).max(1) as f32;
        for (y, row) in self.image.enumerate_rows_mut() {
            let color = opaque(top.lerp(bottom, y as f32 / span));
            for (_, _, pixel) in row {
                *pixel = color;
            }
        }
    }

    /// Blends `color` over one pixel. Out-of-bounds coordinates are ignored.
    pub(crate) fn blend(&mut self, x: i32, y: i32, color: Rgb, alpha: f32) {
        if x < 0 || y < 0 || x as u32 >= self.width() || y as u32 >= self.height() {
            return;
        }
        let alpha = alpha.clamp(0.0, 1.0);
        let pixel = self.image.get_pixel_mut(x as u32, y as u32);
        let mix = |dst: u8, src: u8| (src as f32 * alpha + dst as f32 * (1.0 - alpha)).round() as u8;
        let Rgba([r, g, b, _]) = *pixel;
        *pixel = Rgba([mix(r, color.0), mix(g, color.1), mix(b, color.2), 255]);
    }

    /// Blends a rectangle, clipped to the canvas.
    pub(crate) fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: Rgb, alpha: f32) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + width as i32).min(self.width() as i32);
        let y1 = (y + height as i32).min(self.height() as i32);
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend(px, py, color, alpha);
            }
        }
    }

    pub(crate) fn into_image(self) -> RgbaImage {
        self.image
    }
}

fn opaque(color: Rgb) -> Rgba<u8> {
    Rgba([color.0, color.1, color.2, 255])
}
