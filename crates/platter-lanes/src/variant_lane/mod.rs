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

//! Derives the full set of scale variants for one catalog entry.

mod encode;

pub use encode::OutputFormat;

use crate::source_lane::{from_rgba, to_rgba};
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};
use platter_core::{
    AssetIdentifier, CatalogEntry, PipelineError, PixelSize, SourceImage, VariantArtifact,
    VariantPlan,
};
use thiserror::Error;

/// An error raised while producing variants from a source image.
#[derive(Debug, Error)]
pub enum VariantError {
    /// The source pixel buffer does not match its dimensions.
    #[error("source image buffer does not match its {0} dimensions")]
    InvalidSource(PixelSize),
    /// A resized variant could not be encoded.
    #[error("failed to encode '{filename}': {source}")]
    Encode {
        /// The variant file being produced.
        filename: String,
        /// The codec error.
        #[source]
        source: image::ImageError,
    },
}

impl VariantError {
    /// Attaches the item's identifier, turning this into a per-item render failure.
    pub fn into_pipeline_error(self, identifier: &AssetIdentifier) -> PipelineError {
        PipelineError::Render {
            identifier: identifier.clone(),
            source: Box::new(self),
        }
    }
}

/// What the resolver could do for an entry.
#[derive(Debug)]
pub enum Resolution {
    /// Every required variant was produced, ascending by scale.
    Ready(Vec<VariantArtifact>),
    /// No source was available; these variants, largest first, must be synthesized.
    NeedsSynthesis(Vec<VariantPlan>),
}

/// Plans and produces the scale variants of catalog entries.
///
/// The largest declared scale is produced first by a centred cover-crop of the
/// source. Every smaller scale is downsampled from that largest image, never
/// from the original, so all variants show the same framing.
#[derive(Debug, Clone, Copy)]
pub struct VariantResolver {
    format: OutputFormat,
    filter: FilterType,
}

impl Default for VariantResolver {
    fn default() -> Self {
        Self::new(OutputFormat::default())
    }
}

impl VariantResolver {
    /// Creates a resolver writing `format` and resampling with Lanczos3.
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            filter: FilterType::Lanczos3,
        }
    }

    /// The output format of produced variants.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// The variants `entry` requires, largest scale first.
    pub fn plan(&self, entry: &CatalogEntry) -> Vec<VariantPlan> {
        let mut scales = entry.scales.clone();
        scales.sort_unstable_by(|a, b| b.cmp(a));
        scales.dedup();
        scales
            .into_iter()
            .map(|scale| VariantPlan {
                scale,
                filename: entry.variant_filename(scale, self.format.extension()),
                size: entry.size.scaled(scale),
            })
            .collect()
    }

    /// Produces every variant of `entry` from `source`, or reports that the
    /// entry needs placeholder synthesis when there is no source.
    pub fn resolve(
        &self,
        entry: &CatalogEntry,
        source: Option<&SourceImage>,
    ) -> Result<Resolution, VariantError> {
        match source {
            Some(source) => self.derive(entry, source).map(Resolution::Ready),
            None => Ok(Resolution::NeedsSynthesis(self.plan(entry))),
        }
    }

    /// Cover-crops `source` to the size of the entry's largest variant.
    ///
    /// [`derive`](Self::derive) uses an image of exactly that size as-is, so
    /// anything drawn on the result survives into every variant.
    pub fn fit(
        &self,
        entry: &CatalogEntry,
        source: &SourceImage,
    ) -> Result<SourceImage, VariantError> {
        let Some(largest) = self.plan(entry).into_iter().next() else {
            return Ok(source.clone());
        };
        let rgba = to_rgba(source).ok_or(VariantError::InvalidSource(source.size()))?;
        from_rgba(self.cover(rgba, largest.size)).ok_or(VariantError::InvalidSource(largest.size))
    }

    /// Produces every variant of `entry` from `source`, ascending by scale.
    ///
    /// A source already at the largest variant's size (such as rendered
    /// placeholder art) is used as-is for that variant.
    pub fn derive(
        &self,
        entry: &CatalogEntry,
        source: &SourceImage,
    ) -> Result<Vec<VariantArtifact>, VariantError> {
        let plans = self.plan(entry);
        let Some(largest_plan) = plans.first() else {
            return Ok(Vec::new());
        };

        let rgba = to_rgba(source).ok_or(VariantError::InvalidSource(source.size()))?;
        let largest = self.cover(rgba, largest_plan.size);

        let mut artifacts = Vec::with_capacity(plans.len());
        for plan in &plans {
            let image = if plan.scale == largest_plan.scale {
                largest.clone()
            } else {
                imageops::resize(&largest, plan.size.width, plan.size.height, self.filter)
            };
            artifacts.push(self.encode(&entry.id, plan, &image)?);
        }

        artifacts.reverse();
        log::trace!(
            "Derived {} variant(s) for '{}' from a {} source",
            artifacts.len(),
            entry.id,
            source.size()
        );
        Ok(artifacts)
    }

    /// Scales `image` to cover `size` and crops the overflow around the centre.
    fn cover(&self, image: RgbaImage, size: PixelSize) -> RgbaImage {
        if image.dimensions() == (size.width, size.height) {
            return image;
        }
        DynamicImage::ImageRgba8(image)
            .resize_to_fill(size.width, size.height, self.filter)
            .into_rgba8()
    }

    fn encode(
        &self,
        identifier: &AssetIdentifier,
        plan: &VariantPlan,
        image: &RgbaImage,
    ) -> Result<VariantArtifact, VariantError> {
        let bytes = self
            .format
            .encode(image)
            .map_err(|source| VariantError::Encode {
                filename: plan.filename.clone(),
                source,
            })?;
        Ok(VariantArtifact {
            identifier: identifier.clone(),
            scale: plan.scale,
            filename: plan.filename.clone(),
            size: plan.size,
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platter_core::{CatalogRegistry, ScaleVariant};

    fn greek_salad() -> CatalogEntry {
        CatalogRegistry::builtin()
            .get(&"greek_salad".into())
            .cloned()
            .unwrap()
    }

    fn solid_source(width: u32, height: u32) -> SourceImage {
        let pixels = [90u8, 160, 60, 255].repeat((width * height) as usize);
        SourceImage::new(width, height, pixels).unwrap()
    }

    #[test]
    fn test_plan_is_largest_first_with_suffixes() {
        let plans = VariantResolver::default().plan(&greek_salad());
        let names: Vec<_> = plans.iter().map(|p| p.filename.as_str()).collect();
        assert_eq!(
            names,
            ["greek_salad@3x.png", "greek_salad@2x.png", "greek_salad.png"]
        );
        assert_eq!(plans[0].size, PixelSize::new(900, 600));
    }

    #[test]
    fn test_jpeg_plan_uses_jpg_extension() {
        let resolver = VariantResolver::new(OutputFormat::Jpeg { quality: 90 });
        let plans = resolver.plan(&greek_salad());
        assert_eq!(plans[2].filename, "greek_salad.jpg");
    }

    #[test]
    fn test_missing_source_defers_to_synthesis() {
        let resolution = VariantResolver::default()
            .resolve(&greek_salad(), None)
            .unwrap();
        match resolution {
            Resolution::NeedsSynthesis(plans) => assert_eq!(plans.len(), 3),
            Resolution::Ready(_) => panic!("expected synthesis"),
        }
    }

    #[test]
    fn test_variants_have_declared_dimensions() {
        let entry = greek_salad();
        let artifacts = VariantResolver::default()
            .derive(&entry, &solid_source(64, 64))
            .unwrap();

        let scales: Vec<_> = artifacts.iter().map(|a| a.scale).collect();
        assert_eq!(
            scales,
            vec![ScaleVariant::X1, ScaleVariant::X2, ScaleVariant::X3]
        );
        for artifact in &artifacts {
            let decoded = image::load_from_memory(&artifact.bytes).unwrap();
            assert_eq!(
                (decoded.width(), decoded.height()),
                (artifact.size.width, artifact.size.height)
            );
            assert_eq!(artifact.size, entry.size.scaled(artifact.scale));
        }
    }

    #[test]
    fn test_fit_crops_to_largest_variant() {
        let entry = greek_salad();
        let resolver = VariantResolver::default();
        let fitted = resolver.fit(&entry, &solid_source(64, 64)).unwrap();
        assert_eq!(fitted.size(), PixelSize::new(900, 600));

        let again = resolver.fit(&entry, &fitted).unwrap();
        assert_eq!(again, fitted);
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let entry = greek_salad();
        let resolver = VariantResolver::default();
        let source = solid_source(50, 40);
        let first = resolver.derive(&entry, &source).unwrap();
        let second = resolver.derive(&entry, &source).unwrap();
        assert_eq!(first, second);
    }
}
