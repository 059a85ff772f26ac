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

//! Photograph decoding with the `image` crate.

use super::{from_rgba, SourceLoaderLane};
use anyhow::{Context, Result};
use platter_core::{PipelineError, SourceImage};
use std::path::Path;

/// A lane dedicated to loading and decoding source photographs on the CPU.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageDecodeLane;

impl SourceLoaderLane for ImageDecodeLane {
    fn load(
        &self,
        bytes: &[u8],
    ) -> Result<SourceImage, Box<dyn std::error::Error + Send + Sync + 'static>> {
        // Format is sniffed from the content, not the extension.
        let img = image::load_from_memory(bytes).context("Failed to decode image from memory")?;

        let rgba_img = img.to_rgba8();
        let source = from_rgba(rgba_img).context("Decoded image has no pixels")?;
        Ok(source)
    }
}

impl ImageDecodeLane {
    /// Reads and decodes the file at `path`.
    ///
    /// # Errors
    /// Returns [`PipelineError::SourceRead`] if the file cannot be read or decoded.
    pub fn load_path(&self, path: &Path) -> Result<SourceImage, PipelineError> {
        let bytes = std::fs::read(path).map_err(|e| PipelineError::SourceRead {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;
        self.load(&bytes).map_err(|source| PipelineError::SourceRead {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    #[test]
    fn test_decodes_png_bytes() {
        let img = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();

        let source = ImageDecodeLane.load(&bytes).unwrap();
        assert_eq!((source.width(), source.height()), (3, 2));
        assert_eq!(&source.pixels()[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_garbage_is_a_source_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("greek_salad.jpg");
        std::fs::write(&path, b"definitely not a jpeg").unwrap();

        let err = ImageDecodeLane.load_path(&path).unwrap_err();
        assert_eq!(err.kind(), "source_read");

        let missing = ImageDecodeLane.load_path(&dir.path().join("missing.png"));
        assert!(matches!(missing, Err(PipelineError::SourceRead { .. })));
    }
}
