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

//! The catalog shipped with the tool.

use super::{CatalogEntry, PixelSize, PlaceholderBackground, PlaceholderStyle, ScaleVariant};
use crate::color::Rgb;

const MEALS_GROUP: &str = "FeaturedMeals";
const CATEGORIES_GROUP: &str = "Categories";

const MEAL_SIZE: PixelSize = PixelSize::new(300, 200);
const CATEGORY_SIZE: PixelSize = PixelSize::new(360, 360);

const MEALS: [&str; 30] = [
    "greek_yogurt_parfait",
    "avocado_toast",
    "oatmeal_bowl",
    "smoothie_bowl",
    "protein_pancakes",
    "veggie_frittata",
    "chia_pudding",
    "breakfast_burrito",
    "quinoa_breakfast",
    "cottage_cheese_toast",
    "greek_salad",
    "grilled_fish",
    "hummus_plate",
    "ratatouille",
    "mediterranean_pasta",
    "falafel_wrap",
    "seafood_paella",
    "tabbouleh",
    "stuffed_peppers",
    "shakshuka",
    "grilled_chicken",
    "salmon_bowl",
    "turkey_meatballs",
    "lentil_curry",
    "tuna_steak",
    "protein_bowl",
    "tofu_stirfry",
    "yogurt_bowl",
    "egg_white_omelette",
    "shrimp_skewers",
];

// (id, title, description, colour)
const CATEGORIES: [(&str, &str, &str, Rgb); 3] = [
    (
        "healthy_breakfast",
        "Healthy Breakfast",
        "Start your day with nutritious and energizing meals",
        Rgb(76, 175, 80),
    ),
    (
        "mediterranean_diet",
        "Mediterranean Diet",
        "Heart-healthy choices inspired by Mediterranean cuisine",
        Rgb(63, 81, 181),
    ),
    (
        "protein_rich",
        "Protein-Rich Meals",
        "High-protein meals for muscle building and recovery",
        Rgb(233, 30, 99),
    ),
];

pub(super) fn entries() -> Vec<CatalogEntry> {
    let meals = MEALS.iter().map(|id| {
        CatalogEntry::new(*id, MEALS_GROUP, ScaleVariant::ALL.to_vec(), MEAL_SIZE)
    });

    let categories = CATEGORIES.iter().map(|(id, title, description, color)| {
        CatalogEntry::new(*id, CATEGORIES_GROUP, vec![ScaleVariant::X1], CATEGORY_SIZE)
            .with_text(*title, *description)
            .with_color(*color)
            .with_style(PlaceholderStyle {
                background: PlaceholderBackground::Gradient,
                card: true,
            })
            .with_caption()
    });

    meals.chain(categories).collect()
}
