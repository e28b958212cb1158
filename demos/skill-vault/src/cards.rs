//! Category summary cards shown in two columns beside the bowl.

use askama::Template;
use serde::Serialize;

use crate::catalog::{IconName, SkillCatalog};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCard {
    pub key: String,
    pub title: String,
    pub icon_name: IconName,
    pub glow: String,
    pub glow_color: String,
    pub tags: Vec<String>,
}

/// Cards split into the column left of the bowl and the one right of it.
/// Renders to HTML through `templates/cards.html`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Template)]
#[template(path = "cards.html")]
pub struct CardColumns {
    pub left: Vec<CategoryCard>,
    pub right: Vec<CategoryCard>,
}

impl CardColumns {
    /// First half of the catalog on the left, the rest on the right.
    /// An odd category count puts the extra card on the left.
    pub fn from_catalog(catalog: &SkillCatalog) -> Self {
        let mut cards: Vec<CategoryCard> = catalog
            .categories()
            .iter()
            .map(|(key, category)| CategoryCard {
                key: key.clone(),
                title: category.title.clone(),
                icon_name: category.icon_name,
                glow: category.glow.clone(),
                glow_color: category.glow_color.clone(),
                tags: category.items.iter().map(|i| i.name.clone()).collect(),
            })
            .collect();
        let right = cards.split_off(cards.len().div_ceil(2));
        Self { left: cards, right }
    }
}
