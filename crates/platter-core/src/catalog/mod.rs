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

//! The closed set of canonical visual assets and the variants each one requires.
//!
//! A catalog is supplied by configuration, never discovered at runtime. Every
//! other stage of the pipeline treats it as read-only: the name matcher looks
//! keys up in it, the variant resolver reads the declared scales and sizes, and
//! the manifest writer reads the idiom.

mod builtin;
mod registry;

pub use registry::{normalize_key, CatalogRegistry};

use crate::color::Rgb;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// The single character separating words in a canonical identifier.
pub const SEPARATOR: char = '_';

/// Longest side, in pixels, any variant may have.
pub const MAX_VARIANT_SIDE: u32 = 8192;

/// An immutable key naming one asset of the catalog (e.g. `greek_salad`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetIdentifier(String);

impl AssetIdentifier {
    /// Wraps a raw key. Whether it is a valid catalog key is decided by the registry.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetIdentifier {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// A display-density multiplier.
///
/// The ordering follows the multiplier, so sorting a list of variants puts the
/// reference scale (`1x`) first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ScaleVariant {
    /// Reference density. Its file carries no suffix.
    #[serde(rename = "1x")]
    X1,
    /// Double density.
    #[serde(rename = "2x")]
    X2,
    /// Triple density.
    #[serde(rename = "3x")]
    X3,
}

impl ScaleVariant {
    /// Every known variant, smallest first.
    pub const ALL: [ScaleVariant; 3] = [ScaleVariant::X1, ScaleVariant::X2, ScaleVariant::X3];

    /// The integer pixel multiplier applied to the catalog's 1x size.
    pub fn multiplier(self) -> u32 {
        match self {
            ScaleVariant::X1 => 1,
            ScaleVariant::X2 => 2,
            ScaleVariant::X3 => 3,
        }
    }

    /// The label used in manifests (`"1x"`, `"2x"`, `"3x"`).
    pub fn as_str(self) -> &'static str {
        match self {
            ScaleVariant::X1 => "1x",
            ScaleVariant::X2 => "2x",
            ScaleVariant::X3 => "3x",
        }
    }

    /// The filename suffix for this variant. Empty for the reference scale.
    pub fn filename_suffix(self) -> &'static str {
        match self {
            ScaleVariant::X1 => "",
            ScaleVariant::X2 => "@2x",
            ScaleVariant::X3 => "@3x",
        }
    }
}

impl fmt::Display for ScaleVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The device family a manifest entry targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Idiom {
    /// Any device.
    #[default]
    Universal,
    /// Phones only.
    Iphone,
    /// Tablets only.
    Ipad,
    /// Desktop only.
    Mac,
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelSize {
    /// Creates a new size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Multiplies both dimensions by the variant's multiplier, saturating at `u32::MAX`.
    pub fn scaled(self, scale: ScaleVariant) -> Self {
        let m = scale.multiplier();
        Self::new(self.width.saturating_mul(m), self.height.saturating_mul(m))
    }

    /// The longer of the two sides.
    pub fn longest_side(self) -> u32 {
        self.width.max(self.height)
    }
}

impl fmt::Display for PixelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// How the background of a placeholder is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderBackground {
    /// A single flat colour.
    #[default]
    Solid,
    /// A vertical two-stop gradient from the colour to a darker shade.
    Gradient,
}

/// Visual policy for the placeholder synthesized when no photograph exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderStyle {
    /// Background fill.
    #[serde(default)]
    pub background: PlaceholderBackground,
    /// Whether a translucent card panel is drawn behind the text.
    #[serde(default = "default_card")]
    pub card: bool,
}

fn default_card() -> bool {
    true
}

impl Default for PlaceholderStyle {
    fn default() -> Self {
        Self {
            background: PlaceholderBackground::Solid,
            card: true,
        }
    }
}

/// One entry of the catalog: an identifier and everything needed to produce it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// The canonical key, already in normal form.
    pub id: AssetIdentifier,
    /// The asset-catalog folder the identifier's namespace lives in.
    pub group: String,
    /// Display title used by placeholder art. Derived from the id when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Optional secondary line drawn under the title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Required scale variants. Sorted ascending by the registry.
    pub scales: Vec<ScaleVariant>,
    /// Manifest idiom for every variant of this entry.
    #[serde(default)]
    pub idiom: Idiom,
    /// Size of the 1x variant in pixels.
    pub size: PixelSize,
    /// Fixed placeholder colour. When absent the colour is seeded from the id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
    /// Placeholder look.
    #[serde(default)]
    pub style: PlaceholderStyle,
    /// Whether supplied photographs get the title and description drawn over a
    /// dark band along their bottom edge.
    #[serde(default)]
    pub caption: bool,
}

impl CatalogEntry {
    /// Creates an entry with a derived title, universal idiom and default style.
    pub fn new(
        id: impl Into<String>,
        group: impl Into<String>,
        scales: Vec<ScaleVariant>,
        size: PixelSize,
    ) -> Self {
        Self {
            id: AssetIdentifier::new(id),
            group: group.into(),
            title: None,
            description: None,
            scales,
            idiom: Idiom::Universal,
            size,
            color: None,
            style: PlaceholderStyle::default(),
            caption: false,
        }
    }

    /// Sets the display title and description.
    pub fn with_text(mut self, title: impl Into<String>, description: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self.description = Some(description.into());
        self
    }

    /// Pins the placeholder colour.
    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }

    /// Captions supplied photographs with the entry's text.
    pub fn with_caption(mut self) -> Self {
        self.caption = true;
        self
    }

    /// Overrides the placeholder style.
    pub fn with_style(mut self, style: PlaceholderStyle) -> Self {
        self.style = style;
        self
    }

    /// The title drawn on placeholder art.
    ///
    /// Falls back to the identifier with separators turned into spaces and each
    /// word capitalised (`greek_salad` becomes `Greek Salad`).
    pub fn display_title(&self) -> String {
        match &self.title {
            Some(title) => title.clone(),
            None => self
                .id
                .as_str()
                .split(SEPARATOR)
                .filter(|word| !word.is_empty())
                .map(|word| {
                    let mut chars = word.chars();
                    match chars.next() {
                        Some(first) => first.to_uppercase().chain(chars).collect(),
                        None => String::new(),
                    }
                })
                .collect::<Vec<String>>()
                .join(" "),
        }
    }

    /// The largest declared variant. Every smaller variant is derived from it.
    pub fn largest_scale(&self) -> ScaleVariant {
        self.scales
            .iter()
            .copied()
            .max()
            .unwrap_or(ScaleVariant::X1)
    }

    /// Directory, relative to the output root, holding this identifier's files.
    pub fn namespace(&self) -> PathBuf {
        PathBuf::from(&self.group).join(format!("{}.imageset", self.id))
    }

    /// The file name of one variant, e.g. `greek_salad@2x.png`.
    pub fn variant_filename(&self, scale: ScaleVariant, extension: &str) -> String {
        format!("{}{}.{}", self.id, scale.filename_suffix(), extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_title_is_derived_from_id() {
        let entry = CatalogEntry::new(
            "egg_white_omelette",
            "FeaturedMeals",
            vec![ScaleVariant::X1],
            PixelSize::new(10, 10),
        );
        assert_eq!(entry.display_title(), "Egg White Omelette");

        let entry = entry.with_text("Omelette", "Light and fluffy");
        assert_eq!(entry.display_title(), "Omelette");
    }

    #[test]
    fn test_variant_filenames_follow_suffix_policy() {
        let entry = CatalogEntry::new(
            "greek_salad",
            "FeaturedMeals",
            ScaleVariant::ALL.to_vec(),
            PixelSize::new(10, 10),
        );
        assert_eq!(entry.variant_filename(ScaleVariant::X1, "png"), "greek_salad.png");
        assert_eq!(entry.variant_filename(ScaleVariant::X2, "png"), "greek_salad@2x.png");
        assert_eq!(entry.variant_filename(ScaleVariant::X3, "jpg"), "greek_salad@3x.jpg");
        assert_eq!(
            entry.namespace(),
            PathBuf::from("FeaturedMeals").join("greek_salad.imageset")
        );
    }

    #[test]
    fn test_scale_serializes_as_label() {
        let json = serde_json::to_string(&ScaleVariant::X2).unwrap();
        assert_eq!(json, "\"2x\"");
        let parsed: ScaleVariant = serde_json::from_str("\"3x\"").unwrap();
        assert_eq!(parsed, ScaleVariant::X3);
        assert_eq!(PixelSize::new(300, 200).scaled(parsed), PixelSize::new(900, 600));
    }
}
