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

//! Reading and decoding source photographs.

mod image_decode_lane;

pub use image_decode_lane::ImageDecodeLane;

use image::RgbaImage;
use platter_core::SourceImage;
use std::error::Error;
use std::path::Path;

/// Extensions (lower case) of the raster formats accepted as input.
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Returns `true` if the path has one of the [`SUPPORTED_EXTENSIONS`], ignoring case.
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
        .unwrap_or(false)
}

/// A trait for lanes that turn raw file bytes into a decoded [`SourceImage`].
///
/// Implementors do the CPU-heavy parsing and decoding; reading the bytes from
/// disk is left to the caller.
pub trait SourceLoaderLane {
    /// Parses a byte slice and decodes it into a source image.
    ///
    /// # Returns
    /// The decoded image on success, or a boxed, thread-safe error on failure.
    fn load(&self, bytes: &[u8]) -> Result<SourceImage, Box<dyn Error + Send + Sync>>;
}

/// Copies a decoded image into an `image` buffer.
///
/// Returns `None` only if the source violates its own length invariant.
pub(crate) fn to_rgba(source: &SourceImage) -> Option<RgbaImage> {
    RgbaImage::from_raw(source.width(), source.height(), source.pixels().to_vec())
}

/// Moves an `image` buffer into a [`SourceImage`]. `None` for an empty buffer.
pub(crate) fn from_rgba(image: RgbaImage) -> Option<SourceImage> {
    let (width, height) = image.dimensions();
    SourceImage::new(width, height, image.into_raw())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_allow_list() {
        assert!(is_supported(Path::new("Greek_Salad.JPG")));
        assert!(is_supported(Path::new("tuna_steak.jpeg")));
        assert!(is_supported(Path::new("a/b/protein_rich.png")));
        assert!(!is_supported(Path::new("notes.txt")));
        assert!(!is_supported(Path::new("greek_salad")));
    }
}
