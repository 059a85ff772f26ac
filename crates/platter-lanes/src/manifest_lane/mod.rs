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

//! Builds and writes the per-identifier `Contents.json` manifest.

use platter_core::{
    ArtifactStore, AssetIdentifier, CatalogEntry, Manifest, ManifestImage, ManifestInfo,
    PipelineError, ScaleVariant, VariantArtifact, MANIFEST_FILENAME,
};
use std::path::PathBuf;
use thiserror::Error;

/// An error raised while building or writing a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Some required scale has no artifact. Nothing is written.
    #[error("'{identifier}' is missing {} of its required variants", missing.len())]
    IncompleteVariants {
        /// The identifier whose manifest was refused.
        identifier: AssetIdentifier,
        /// Required scales with no artifact.
        missing: Vec<ScaleVariant>,
    },
    /// An artifact of another identifier was handed in.
    #[error("artifact '{filename}' belongs to '{found}', not '{expected}'")]
    ForeignArtifact {
        /// The identifier whose manifest is being built.
        expected: AssetIdentifier,
        /// The identifier the artifact belongs to.
        found: AssetIdentifier,
        /// The artifact's file name.
        filename: String,
    },
    /// The manifest could not be serialized.
    #[error("failed to serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),
    /// The store refused the manifest.
    #[error("failed to write '{}': {source}", .path.display())]
    Write {
        /// Manifest path relative to the output root.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl ManifestError {
    /// Maps this error onto the pipeline taxonomy for the item `identifier`.
    pub fn into_pipeline_error(self, identifier: &AssetIdentifier) -> PipelineError {
        match self {
            ManifestError::IncompleteVariants {
                identifier,
                missing,
            } => PipelineError::IncompleteVariants {
                identifier,
                missing,
            },
            ManifestError::Write { path, source } => PipelineError::Write { path, source },
            other => PipelineError::Render {
                identifier: identifier.clone(),
                source: Box::new(other),
            },
        }
    }
}

/// Serializes an entry's variant set into its manifest.
///
/// The manifest is regenerated from scratch on every call and lists exactly
/// the scales the catalog entry declares, ascending, one image each.
#[derive(Debug, Clone, Default)]
pub struct ManifestWriter {
    info: ManifestInfo,
}

impl ManifestWriter {
    /// Creates a writer stamping the default provenance block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the manifest for `entry` from `artifacts`.
    ///
    /// Artifacts for scales the entry does not declare are ignored. If more
    /// than one artifact has the same scale, the first wins.
    pub fn build(
        &self,
        entry: &CatalogEntry,
        artifacts: &[VariantArtifact],
    ) -> Result<Manifest, ManifestError> {
        if let Some(foreign) = artifacts.iter().find(|a| a.identifier != entry.id) {
            return Err(ManifestError::ForeignArtifact {
                expected: entry.id.clone(),
                found: foreign.identifier.clone(),
                filename: foreign.filename.clone(),
            });
        }

        let mut scales = entry.scales.clone();
        scales.sort();
        scales.dedup();

        let mut images = Vec::with_capacity(scales.len());
        let mut missing = Vec::new();
        for scale in scales {
            match artifacts.iter().find(|a| a.scale == scale) {
                Some(artifact) => images.push(ManifestImage {
                    filename: artifact.filename.clone(),
                    idiom: entry.idiom,
                    scale,
                }),
                None => missing.push(scale),
            }
        }

        if !missing.is_empty() {
            return Err(ManifestError::IncompleteVariants {
                identifier: entry.id.clone(),
                missing,
            });
        }

        Ok(Manifest {
            images,
            info: self.info.clone(),
        })
    }

    /// Builds the manifest and writes it to `<namespace>/Contents.json` in `store`.
    ///
    /// Returns the manifest's path relative to the store root.
    pub fn write(
        &self,
        entry: &CatalogEntry,
        artifacts: &[VariantArtifact],
        store: &dyn ArtifactStore,
    ) -> Result<PathBuf, ManifestError> {
        let manifest = self.build(entry, artifacts)?;
        let json = manifest.to_json()?;
        let path = entry.namespace().join(MANIFEST_FILENAME);
        store
            .write(&path, json.as_bytes())
            .map_err(|source| ManifestError::Write {
                path: path.clone(),
                source,
            })?;
        log::debug!("Wrote manifest '{}'", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platter_core::{CatalogRegistry, PixelSize};

    fn artifact(entry: &CatalogEntry, scale: ScaleVariant) -> VariantArtifact {
        VariantArtifact {
            identifier: entry.id.clone(),
            scale,
            filename: entry.variant_filename(scale, "png"),
            size: entry.size.scaled(scale),
            bytes: vec![1, 2, 3],
        }
    }

    fn entry(id: &str) -> CatalogEntry {
        CatalogRegistry::builtin().get(&id.into()).cloned().unwrap()
    }

    #[test]
    fn test_manifest_lists_declared_scales_in_order() {
        let entry = entry("greek_salad");
        let artifacts: Vec<_> = [ScaleVariant::X3, ScaleVariant::X1, ScaleVariant::X2]
            .into_iter()
            .map(|s| artifact(&entry, s))
            .collect();

        let manifest = ManifestWriter::new().build(&entry, &artifacts).unwrap();
        assert_eq!(
            manifest.scales(),
            vec![ScaleVariant::X1, ScaleVariant::X2, ScaleVariant::X3]
        );
        assert_eq!(manifest.images[0].filename, "greek_salad.png");
        assert_eq!(manifest.images[2].filename, "greek_salad@3x.png");
    }

    #[test]
    fn test_partial_variant_set_is_refused() {
        let entry = entry("greek_salad");
        let artifacts = vec![artifact(&entry, ScaleVariant::X1)];

        let err = ManifestWriter::new().build(&entry, &artifacts).unwrap_err();
        match err {
            ManifestError::IncompleteVariants { missing, .. } => {
                assert_eq!(missing, vec![ScaleVariant::X2, ScaleVariant::X3])
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_undeclared_scales_are_omitted() {
        let entry = entry("protein_rich");
        let artifacts = vec![
            artifact(&entry, ScaleVariant::X1),
            artifact(&entry, ScaleVariant::X2),
        ];
        let manifest = ManifestWriter::new().build(&entry, &artifacts).unwrap();
        assert_eq!(manifest.scales(), vec![ScaleVariant::X1]);
    }

    #[test]
    fn test_foreign_artifacts_are_rejected() {
        let salad = entry("greek_salad");
        let other = CatalogEntry::new(
            "tuna_steak",
            "FeaturedMeals",
            vec![ScaleVariant::X1],
            PixelSize::new(1, 1),
        );
        let err = ManifestWriter::new()
            .build(&salad, &[artifact(&other, ScaleVariant::X1)])
            .unwrap_err();
        assert!(matches!(err, ManifestError::ForeignArtifact { .. }));
        assert_eq!(err.into_pipeline_error(&salad.id).kind(), "render");
    }
}
