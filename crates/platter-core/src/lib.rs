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

//! # Platter Core
//!
//! Foundational crate containing the catalog, the plain data types exchanged
//! between pipeline stages, and the interface contracts the lanes implement.
//!
//! Nothing in here decodes, resizes, or writes an image. Those concerns live in
//! `platter-lanes`; this crate only describes *what* an asset is and *where*
//! its variants belong.

#![warn(missing_docs)]

pub mod artifact;
pub mod catalog;
pub mod color;
pub mod error;
pub mod image;
pub mod manifest;
pub mod store;

pub use artifact::{VariantArtifact, VariantPlan};
pub use catalog::{
    normalize_key, AssetIdentifier, CatalogEntry, CatalogRegistry, Idiom, PixelSize,
    PlaceholderBackground, PlaceholderStyle, ScaleVariant, MAX_VARIANT_SIDE, SEPARATOR,
};
pub use color::{ColorPolicy, Rgb, PALETTE};
pub use error::{BoxError, CatalogError, PipelineError};
pub use image::SourceImage;
pub use manifest::{
    Manifest, ManifestImage, ManifestInfo, MANIFEST_AUTHOR, MANIFEST_FILENAME, MANIFEST_VERSION,
};
pub use store::ArtifactStore;
