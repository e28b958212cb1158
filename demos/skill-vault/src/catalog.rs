//! The skill catalog: ordered categories of labeled, coloured items.
//!
//! Parsing is lenient. A category without `items` contributes no bubbles, an
//! item without a name is skipped, and only a top level that is not a JSON
//! object is rejected.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillItem {
    pub name: String,
    /// CSS colour of the bubble ring.
    #[serde(default)]
    pub color: String,
}

impl SkillItem {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }
}

/// Icon shown on a category card. Unknown names map to `Generic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IconName {
    Terminal,
    Server,
    Layout,
    Cpu,
    #[default]
    #[serde(other)]
    Generic,
}

impl IconName {
    pub fn as_str(&self) -> &'static str {
        match self {
            IconName::Terminal => "Terminal",
            IconName::Server => "Server",
            IconName::Layout => "Layout",
            IconName::Cpu => "Cpu",
            IconName::Generic => "Generic",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillCategory {
    pub title: String,
    pub icon_name: IconName,
    /// Gradient token used for the card glow, e.g. `from-cyan-400/20 to-blue-500/20`.
    pub glow: String,
    pub glow_color: String,
    pub items: Vec<SkillItem>,
}

/// Category header fields; items are validated one by one.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct RawCategory {
    title: String,
    icon_name: IconName,
    glow: String,
    glow_color: String,
    items: Option<Vec<Value>>,
}

/// Categories in the order the content source listed them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SkillCatalog {
    categories: Vec<(String, SkillCategory)>,
}

impl SkillCatalog {
    pub fn new(categories: Vec<(String, SkillCategory)>) -> Self {
        Self { categories }
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, CatalogError> {
        let map = match value {
            Value::Object(map) => map,
            other => return Err(CatalogError::NotAnObject(json_kind(&other))),
        };

        let mut categories = Vec::with_capacity(map.len());
        for (key, raw) in map {
            let raw: RawCategory = match serde_json::from_value(raw) {
                Ok(raw) => raw,
                Err(e) => {
                    log::warn!("Skipping malformed category {:?}: {}", key, e);
                    continue;
                }
            };
            let items = raw
                .items
                .unwrap_or_default()
                .into_iter()
                .filter_map(|item| parse_item(&key, item))
                .collect();
            categories.push((
                key,
                SkillCategory {
                    title: raw.title,
                    icon_name: raw.icon_name,
                    glow: raw.glow,
                    glow_color: raw.glow_color,
                    items,
                },
            ));
        }
        Ok(Self { categories })
    }

    /// The four-category catalog the portfolio ships with.
    pub fn builtin() -> Self {
        fn category(
            title: &str,
            icon_name: IconName,
            glow: &str,
            glow_color: &str,
            items: &[(&str, &str)],
        ) -> SkillCategory {
            SkillCategory {
                title: title.to_string(),
                icon_name,
                glow: glow.to_string(),
                glow_color: glow_color.to_string(),
                items: items.iter().map(|(n, c)| SkillItem::new(*n, *c)).collect(),
            }
        }

        Self::new(vec![
            (
                "languages".to_string(),
                category(
                    "Languages",
                    IconName::Terminal,
                    "from-yellow-400/20 to-orange-500/20",
                    "rgba(234, 179, 8, 0.5)",
                    &[("C", "#64748b"), ("C++", "#00599C"), ("Java", "#f89820"), ("JS", "#F7DF1E")],
                ),
            ),
            (
                "backend".to_string(),
                category(
                    "Backend",
                    IconName::Server,
                    "from-blue-400/20 to-indigo-500/20",
                    "rgba(59, 130, 246, 0.5)",
                    &[("Node.js", "#68A063"), ("Express", "#828282"), ("Firebase", "#ffa000")],
                ),
            ),
            (
                "frontend".to_string(),
                category(
                    "Frontend",
                    IconName::Layout,
                    "from-cyan-400/20 to-blue-500/20",
                    "rgba(34, 211, 238, 0.5)",
                    &[("React", "#61DAFB"), ("Next.js", "#ffffff"), ("Tailwind", "#38bdf8")],
                ),
            ),
            (
                "intelligence".to_string(),
                category(
                    "Data & ML",
                    IconName::Cpu,
                    "from-purple-400/20 to-pink-500/20",
                    "rgba(168, 85, 247, 0.5)",
                    &[("ML", "#a855f7"), ("MongoDB", "#47A248"), ("Git", "#F05032"), ("GitHub", "#71717a")],
                ),
            ),
        ])
    }

    /// Serialize back to the content-source shape, keys in catalog order.
    pub fn to_json(&self) -> Result<String, CatalogError> {
        let mut map = Map::with_capacity(self.categories.len());
        for (key, category) in &self.categories {
            map.insert(key.clone(), serde_json::to_value(category)?);
        }
        Ok(serde_json::to_string(&Value::Object(map))?)
    }

    pub fn categories(&self) -> &[(String, SkillCategory)] {
        &self.categories
    }

    /// Every item, category by category, in catalog order.
    pub fn items(&self) -> impl Iterator<Item = &SkillItem> {
        self.categories.iter().flat_map(|(_, c)| c.items.iter())
    }

    pub fn item_count(&self) -> usize {
        self.categories.iter().map(|(_, c)| c.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

fn parse_item(category: &str, value: Value) -> Option<SkillItem> {
    match serde_json::from_value::<SkillItem>(value) {
        Ok(item) if item.name.trim().is_empty() => {
            log::warn!("Skipping unnamed item in category {:?}", category);
            None
        }
        Ok(item) => Some(item),
        Err(e) => {
            log::warn!("Skipping malformed item in category {:?}: {}", category, e);
            None
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
