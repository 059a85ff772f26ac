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

//! The per-identifier record consumed by the asset-catalog system.

use crate::catalog::{Idiom, ScaleVariant};
use serde::{Deserialize, Serialize};

/// Name of the manifest file inside an identifier's namespace.
pub const MANIFEST_FILENAME: &str = "Contents.json";

/// Provenance tag written into every manifest.
pub const MANIFEST_AUTHOR: &str = "xcode";

/// Schema version written into every manifest.
pub const MANIFEST_VERSION: u32 = 1;

/// One variant descriptor of a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestImage {
    /// File name inside the namespace.
    pub filename: String,
    /// Device family.
    pub idiom: Idiom,
    /// Display density.
    pub scale: ScaleVariant,
}

/// Static provenance fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestInfo {
    /// Authoring tool tag.
    pub author: String,
    /// Schema version.
    pub version: u32,
}

impl Default for ManifestInfo {
    fn default() -> Self {
        Self {
            author: MANIFEST_AUTHOR.to_string(),
            version: MANIFEST_VERSION,
        }
    }
}

/// The full record for one identifier.
///
/// A manifest is always regenerated as a whole; it is never merged with a
/// previous version on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Variant descriptors ordered by ascending scale.
    pub images: Vec<ManifestImage>,
    /// Provenance.
    pub info: ManifestInfo,
}

impl Manifest {
    /// Serializes to pretty-printed JSON with a trailing newline.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// The scales listed, in manifest order.
    pub fn scales(&self) -> Vec<ScaleVariant> {
        self.images.iter().map(|image| image.scale).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_json_shape() {
        let manifest = Manifest {
            images: vec![ManifestImage {
                filename: "protein_rich.png".to_string(),
                idiom: Idiom::Universal,
                scale: ScaleVariant::X1,
            }],
            info: ManifestInfo::default(),
        };

        let json = manifest.to_json().unwrap();
        assert!(json.ends_with("}\n"));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "images": [
                    { "filename": "protein_rich.png", "idiom": "universal", "scale": "1x" }
                ],
                "info": { "author": "xcode", "version": 1 }
            })
        );
    }
}
