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

//! Encoding of finished variants into file bytes.

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, ImageResult, RgbaImage};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

/// The file format every variant of a pass is written in.
///
/// In TOML this is either `"png"` or `{ jpeg = { quality = 90 } }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossless PNG with alpha.
    #[default]
    Png,
    /// Baseline JPEG. Alpha is dropped.
    Jpeg {
        /// Encoder quality, clamped to `1..=100`.
        quality: u8,
    },
}

impl OutputFormat {
    /// File extension used in variant file names.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg { .. } => "jpg",
        }
    }

    /// Encodes `image` into bytes of this format.
    pub fn encode(self, image: &RgbaImage) -> ImageResult<Vec<u8>> {
        let mut bytes = Vec::new();
        match self {
            OutputFormat::Png => {
                image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
            }
            OutputFormat::Jpeg { quality } => {
                let rgb = DynamicImage::ImageRgba8(image.clone()).into_rgb8();
                let mut encoder = JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100));
                encoder.encode_image(&rgb)?;
            }
        }
        Ok(bytes)
    }
}
