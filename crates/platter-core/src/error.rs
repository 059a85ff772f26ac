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

//! Defines the error hierarchy shared by the pipeline crates.
//!
//! None of these errors is fatal to a batch. The orchestrator attaches them to
//! the outcome of the single item they concern and moves on.

use crate::catalog::{AssetIdentifier, PixelSize, ScaleVariant};
use std::error::Error;
use std::path::PathBuf;
use thiserror::Error;

/// A boxed, thread-safe error used as the `source` of pipeline errors.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// An error raised while building a [`CatalogRegistry`](crate::CatalogRegistry).
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog has no entries.
    #[error("catalog has no entries")]
    Empty,
    /// Two entries share a key.
    #[error("catalog key '{key}' is declared more than once")]
    DuplicateKey {
        /// The repeated key.
        key: String,
    },
    /// A key differs from its own normalization and could never be matched.
    #[error("catalog key '{key}' is not in normal form (expected '{normalized}')")]
    NotNormalized {
        /// The offending key.
        key: String,
        /// What the key normalizes to.
        normalized: String,
    },
    /// An entry requires no variants.
    #[error("catalog entry '{key}' declares no scale variants")]
    NoScales {
        /// The offending key.
        key: String,
    },
    /// An entry lists the same scale twice.
    #[error("catalog entry '{key}' declares scale {scale} more than once")]
    DuplicateScale {
        /// The offending key.
        key: String,
        /// The repeated scale.
        scale: ScaleVariant,
    },
    /// An entry has a zero width or height.
    #[error("catalog entry '{key}' has a zero-sized 1x variant")]
    ZeroSize {
        /// The offending key.
        key: String,
    },
    /// The largest variant of an entry exceeds the per-side pixel limit.
    #[error("catalog entry '{key}' needs a {size} variant; sides are limited to {limit} px")]
    TooLarge {
        /// The offending key.
        key: String,
        /// Size of the entry's largest variant.
        size: PixelSize,
        /// The per-side limit.
        limit: u32,
    },
}

/// An error attached to a single pipeline item.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The file name normalizes to no catalog key.
    #[error("'{filename}' does not match any catalog identifier (normalized to '{normalized}')")]
    NoMatch {
        /// The file name as discovered.
        filename: String,
        /// Its normalized form.
        normalized: String,
    },
    /// The source file could not be read or decoded.
    #[error("failed to read source image '{}': {source}", .path.display())]
    SourceRead {
        /// The unreadable file.
        path: PathBuf,
        /// The underlying I/O or decode error.
        #[source]
        source: BoxError,
    },
    /// A variant or placeholder could not be produced or encoded.
    #[error("failed to produce variants for '{identifier}': {source}")]
    Render {
        /// The identifier being produced.
        identifier: AssetIdentifier,
        /// The underlying render or encode error.
        #[source]
        source: BoxError,
    },
    /// A variant file or manifest could not be written.
    #[error("failed to write '{}': {source}", .path.display())]
    Write {
        /// Path relative to the output root.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Another input file already supplies the source for this identifier.
    #[error(
        "'{}' also matches '{identifier}', which is sourced from '{}'",
        .path.display(),
        .chosen.display()
    )]
    DuplicateSource {
        /// The file that was skipped.
        path: PathBuf,
        /// The identifier both files match.
        identifier: AssetIdentifier,
        /// The file used as the source.
        chosen: PathBuf,
    },
    /// The variant set does not cover every required scale, so no manifest is written.
    #[error("refusing to write a partial manifest for '{identifier}' (missing {})", scale_list(.missing))]
    IncompleteVariants {
        /// The identifier whose manifest was refused.
        identifier: AssetIdentifier,
        /// Required scales with no artifact.
        missing: Vec<ScaleVariant>,
    },
}

impl PipelineError {
    /// A short, stable label for reports and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::NoMatch { .. } => "no_match",
            PipelineError::SourceRead { .. } => "source_read",
            PipelineError::Render { .. } => "render",
            PipelineError::Write { .. } => "write",
            PipelineError::DuplicateSource { .. } => "duplicate_source",
            PipelineError::IncompleteVariants { .. } => "incomplete_variants",
        }
    }
}

fn scale_list(scales: &[ScaleVariant]) -> String {
    scales
        .iter()
        .map(|scale| scale.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
