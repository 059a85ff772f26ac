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

//! # Platter Lanes
//!
//! The hot-path stages of the asset pipeline. Each lane does one job on plain
//! data handed to it by the pipeline agent and has no knowledge of the batch it
//! is part of:
//!
//! - [`matching_lane`]: file name to canonical identifier.
//! - [`source_lane`]: raw bytes to a decoded [`SourceImage`](platter_core::SourceImage).
//! - [`variant_lane`]: source image to the full set of encoded scale variants.
//! - [`placeholder_lane`]: synthetic art when no photograph exists.
//! - [`manifest_lane`]: variant set to the asset-catalog manifest.
//! - [`output_lane`]: the filesystem-backed artifact store.

#![warn(missing_docs)]

pub mod manifest_lane;
pub mod matching_lane;
pub mod output_lane;
pub mod placeholder_lane;
pub mod source_lane;
pub mod variant_lane;

pub use manifest_lane::{ManifestError, ManifestWriter};
pub use matching_lane::{MatchResult, NameMatcher};
pub use output_lane::FileSystemStore;
pub use placeholder_lane::{
    BitmapTypeface, FontChain, FontSource, PlaceholderRenderer, RenderError, ScalableTypeface,
    Typeface,
};
pub use source_lane::{is_supported, ImageDecodeLane, SourceLoaderLane, SUPPORTED_EXTENSIONS};
pub use variant_lane::{OutputFormat, Resolution, VariantError, VariantResolver};
