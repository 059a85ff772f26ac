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

//! Planned and produced scale variants.

use crate::catalog::{AssetIdentifier, PixelSize, ScaleVariant};
use std::path::{Path, PathBuf};

/// A variant that still has to be produced: where it goes and how big it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantPlan {
    /// The variant's scale.
    pub scale: ScaleVariant,
    /// File name inside the identifier's namespace.
    pub filename: String,
    /// Target pixel dimensions.
    pub size: PixelSize,
}

/// A produced variant: a `(identifier, scale)` pair bound to a file and its bytes.
///
/// Artifacts are created during a pass, persisted by the orchestrator, and
/// overwritten by a later pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantArtifact {
    /// The identifier this variant belongs to.
    pub identifier: AssetIdentifier,
    /// The variant's scale.
    pub scale: ScaleVariant,
    /// File name inside the identifier's namespace.
    pub filename: String,
    /// Pixel dimensions of the encoded image.
    pub size: PixelSize,
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
}

impl VariantArtifact {
    /// Path of this artifact relative to the output root.
    pub fn relative_path(&self, namespace: &Path) -> PathBuf {
        namespace.join(&self.filename)
    }
}
