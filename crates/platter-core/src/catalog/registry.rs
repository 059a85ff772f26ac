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

use super::{builtin, AssetIdentifier, CatalogEntry, MAX_VARIANT_SIDE, SEPARATOR};
use crate::error::CatalogError;
use std::collections::HashMap;

/// Reduces a file stem to the catalog's key form.
///
/// Lower-cases the input, trims surrounding whitespace and collapses every
/// interior whitespace run into a single [`SEPARATOR`]. The result is compared
/// with catalog keys by exact equality only.
pub fn normalize_key(stem: &str) -> String {
    let lowered = stem.trim().to_lowercase();
    let mut normalized = String::with_capacity(lowered.len());
    let mut in_whitespace = false;
    for c in lowered.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                normalized.push(SEPARATOR);
            }
            in_whitespace = true;
        } else {
            normalized.push(c);
            in_whitespace = false;
        }
    }
    normalized
}

/// The read-only registry of canonical identifiers.
///
/// Entries keep their declaration order, which is also the order the name
/// matcher scans and the order identifiers are listed as guidance. Keys are
/// unique after normalization, so a lookup can never be ambiguous.
#[derive(Debug, Clone)]
pub struct CatalogRegistry {
    entries: Vec<CatalogEntry>,
    index: HashMap<AssetIdentifier, usize>,
}

impl CatalogRegistry {
    /// Validates the entries and builds the registry.
    ///
    /// # Errors
    /// Returns a [`CatalogError`] if the list is empty, a key is not in normal
    /// form, two keys collide, or an entry declares no scales, a repeated
    /// scale, a zero size, or a largest variant with a side over
    /// [`MAX_VARIANT_SIDE`].
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut index = HashMap::with_capacity(entries.len());
        let mut validated = Vec::with_capacity(entries.len());

        for (position, mut entry) in entries.into_iter().enumerate() {
            let key = entry.id.as_str().to_string();
            let normalized = normalize_key(&key);
            if key.is_empty() || normalized != key {
                return Err(CatalogError::NotNormalized { key, normalized });
            }
            if entry.scales.is_empty() {
                return Err(CatalogError::NoScales { key });
            }
            if entry.size.width == 0 || entry.size.height == 0 {
                return Err(CatalogError::ZeroSize { key });
            }
            let largest = entry.size.scaled(entry.largest_scale());
            if largest.longest_side() > MAX_VARIANT_SIDE {
                return Err(CatalogError::TooLarge {
                    key,
                    size: largest,
                    limit: MAX_VARIANT_SIDE,
                });
            }

            entry.scales.sort();
            if let Some(pair) = entry.scales.windows(2).find(|pair| pair[0] == pair[1]) {
                return Err(CatalogError::DuplicateScale {
                    key,
                    scale: pair[0],
                });
            }

            if index.insert(entry.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateKey { key });
            }
            validated.push(entry);
        }

        log::debug!("Catalog registry built with {} entries", validated.len());
        Ok(Self {
            entries: validated,
            index,
        })
    }

    /// The built-in catalog: the featured meals and the category cards.
    pub fn builtin() -> Self {
        Self::new(builtin::entries()).expect("built-in catalog entries are valid")
    }

    /// Returns the entry for an identifier.
    pub fn get(&self, id: &AssetIdentifier) -> Option<&CatalogEntry> {
        self.index.get(id).map(|&position| &self.entries[position])
    }

    /// Scans the catalog in declaration order for a key equal to `normalized`.
    pub fn find(&self, normalized: &str) -> Option<&CatalogEntry> {
        self.entries
            .iter()
            .find(|entry| entry.id.as_str() == normalized)
    }

    /// All entries in declaration order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Iterates over the entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    /// All identifiers in declaration order.
    pub fn identifiers(&self) -> Vec<&AssetIdentifier> {
        self.entries.iter().map(|entry| &entry.id).collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false` for a constructed registry; kept for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{PixelSize, ScaleVariant};

    fn entry(id: &str, scales: Vec<ScaleVariant>) -> CatalogEntry {
        CatalogEntry::new(id, "Test", scales, PixelSize::new(4, 4))
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("Greek_Salad"), "greek_salad");
        assert_eq!(normalize_key("Greek   Salad"), "greek_salad");
        assert_eq!(normalize_key("  Greek \t Salad "), "greek_salad");
        assert_eq!(normalize_key("PROTEIN rich"), "protein_rich");
    }

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = CatalogRegistry::builtin();
        assert_eq!(catalog.len(), 33);
        let salad = catalog.get(&"greek_salad".into()).unwrap();
        assert_eq!(salad.scales, ScaleVariant::ALL.to_vec());
        let protein = catalog.get(&"protein_rich".into()).unwrap();
        assert_eq!(protein.scales, vec![ScaleVariant::X1]);
        assert_eq!(protein.display_title(), "Protein-Rich Meals");
        assert!(protein.caption);
        assert!(!salad.caption);
    }

    #[test]
    fn test_rejects_duplicate_keys() {
        let result = CatalogRegistry::new(vec![
            entry("tabbouleh", vec![ScaleVariant::X1]),
            entry("tabbouleh", vec![ScaleVariant::X2]),
        ]);
        assert!(matches!(result, Err(CatalogError::DuplicateKey { .. })));
    }

    #[test]
    fn test_rejects_keys_not_in_normal_form() {
        let result = CatalogRegistry::new(vec![entry("Greek Salad", vec![ScaleVariant::X1])]);
        match result {
            Err(CatalogError::NotNormalized { normalized, .. }) => {
                assert_eq!(normalized, "greek_salad")
            }
            other => panic!("expected NotNormalized, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_bad_scale_lists() {
        let none = CatalogRegistry::new(vec![entry("shakshuka", vec![])]);
        assert!(matches!(none, Err(CatalogError::NoScales { .. })));

        let repeated = CatalogRegistry::new(vec![entry(
            "shakshuka",
            vec![ScaleVariant::X2, ScaleVariant::X1, ScaleVariant::X2],
        )]);
        assert!(matches!(
            repeated,
            Err(CatalogError::DuplicateScale {
                scale: ScaleVariant::X2,
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_oversized_variants() {
        let huge = CatalogEntry::new(
            "huge",
            "Test",
            ScaleVariant::ALL.to_vec(),
            PixelSize::new(2_000_000_000, 10),
        );
        match CatalogRegistry::new(vec![huge]) {
            Err(CatalogError::TooLarge { size, limit, .. }) => {
                assert_eq!(size.width, u32::MAX);
                assert_eq!(limit, MAX_VARIANT_SIDE);
            }
            other => panic!("expected TooLarge, got {other:?}"),
        }

        // 3000 fits at 1x and 2x but its 3x variant is 9000 px wide.
        let wide = CatalogEntry::new(
            "wide",
            "Test",
            ScaleVariant::ALL.to_vec(),
            PixelSize::new(3000, 10),
        );
        assert!(matches!(
            CatalogRegistry::new(vec![wide]),
            Err(CatalogError::TooLarge { .. })
        ));

        let edge = CatalogEntry::new(
            "edge",
            "Test",
            vec![ScaleVariant::X1],
            PixelSize::new(MAX_VARIANT_SIDE, 1),
        );
        assert!(CatalogRegistry::new(vec![edge]).is_ok());
    }

    #[test]
    fn test_scaling_saturates_instead_of_overflowing() {
        let size = PixelSize::new(2_000_000_000, 10).scaled(ScaleVariant::X3);
        assert_eq!(size, PixelSize::new(u32::MAX, 30));
    }

    #[test]
    fn test_scales_are_sorted_and_order_is_kept() {
        let catalog = CatalogRegistry::new(vec![
            entry("b_item", vec![ScaleVariant::X3, ScaleVariant::X1]),
            entry("a_item", vec![ScaleVariant::X1]),
        ])
        .unwrap();
        let ids: Vec<&str> = catalog.identifiers().iter().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["b_item", "a_item"]);
        assert_eq!(
            catalog.find("b_item").unwrap().scales,
            vec![ScaleVariant::X1, ScaleVariant::X3]
        );
        assert!(catalog.find("c_item").is_none());
    }
}
