use askama::Template;
use wasm_bindgen::prelude::*;

pub mod bowl;
pub mod bubble;
pub mod cards;
pub mod catalog;
pub mod config;
pub mod repulsor;
pub mod sim;
pub mod spawner;

use cards::CardColumns;
use catalog::SkillCatalog;
use sim::SkillBowl;

vault_web::export_simulation!(SkillBowl, "skill-vault");

/// The catalog the page falls back to when no content source is configured.
#[wasm_bindgen]
pub fn skill_vault_default_catalog() -> Result<String, JsValue> {
    SkillCatalog::builtin()
        .to_json()
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Render the two card columns for a catalog, or the built-in one when
/// `data_json` is absent.
#[wasm_bindgen]
pub fn skill_vault_cards_html(data_json: Option<String>) -> Result<String, JsValue> {
    let catalog = match data_json {
        Some(json) => SkillCatalog::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?,
        None => SkillCatalog::builtin(),
    };
    CardColumns::from_catalog(&catalog)
        .render()
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
