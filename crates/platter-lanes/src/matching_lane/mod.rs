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

//! Resolves loosely named input files to canonical identifiers.

use platter_core::{normalize_key, AssetIdentifier, CatalogRegistry};
use std::path::Path;
use std::sync::Arc;

/// The outcome of matching one file name against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    /// The name normalizes to this catalog key.
    Matched(AssetIdentifier),
    /// No catalog key equals the normalized name.
    NoMatch {
        /// What the file name normalized to.
        normalized: String,
    },
}

/// Matches file names against the catalog by exact equality of normalized forms.
///
/// Matching is a pure function of the file name and the catalog: there is no
/// fuzzy or edit-distance fallback, and the same input always gives the same
/// result.
#[derive(Debug, Clone)]
pub struct NameMatcher {
    catalog: Arc<CatalogRegistry>,
}

impl NameMatcher {
    /// Creates a matcher over `catalog`.
    pub fn new(catalog: Arc<CatalogRegistry>) -> Self {
        Self { catalog }
    }

    /// Strips directories and the extension, then normalizes what is left.
    pub fn normalize(filename: &str) -> String {
        let path = Path::new(filename);
        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy())
            .unwrap_or_else(|| filename.into());
        normalize_key(&stem)
    }

    /// Resolves `filename` to a canonical identifier.
    pub fn match_name(&self, filename: &str) -> MatchResult {
        let normalized = Self::normalize(filename);
        match self.catalog.find(&normalized) {
            Some(entry) => MatchResult::Matched(entry.id.clone()),
            None => MatchResult::NoMatch { normalized },
        }
    }

    /// The valid identifiers, in catalog order, to show when a name does not match.
    pub fn guidance(&self) -> Vec<&AssetIdentifier> {
        self.catalog.identifiers()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> NameMatcher {
        NameMatcher::new(Arc::new(CatalogRegistry::builtin()))
    }

    #[test]
    fn test_mixed_case_name_matches() {
        assert_eq!(
            matcher().match_name("Greek_Salad.JPG"),
            MatchResult::Matched("greek_salad".into())
        );
    }

    #[test]
    fn test_whitespace_runs_collapse_to_separator() {
        assert_eq!(
            matcher().match_name("Protein   Rich.png"),
            MatchResult::Matched("protein_rich".into())
        );
        assert_eq!(
            matcher().match_name("incoming/Tuna Steak.jpeg"),
            MatchResult::Matched("tuna_steak".into())
        );
    }

    #[test]
    fn test_unknown_name_reports_normalized_form() {
        assert_eq!(
            matcher().match_name("banana_split.jpg"),
            MatchResult::NoMatch {
                normalized: "banana_split".to_string()
            }
        );
    }

    #[test]
    fn test_no_fuzzy_matching() {
        assert!(matches!(
            matcher().match_name("greek-salad.jpg"),
            MatchResult::NoMatch { .. }
        ));
        assert!(matches!(
            matcher().match_name("greek_salads.jpg"),
            MatchResult::NoMatch { .. }
        ));
    }

    #[test]
    fn test_guidance_lists_catalog_ids() {
        let matcher = matcher();
        let guidance = matcher.guidance();
        assert!(guidance.iter().any(|id| id.as_str() == "greek_salad"));
        assert_eq!(guidance.len(), 33);
    }
}
