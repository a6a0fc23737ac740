// CRUNCHBOX Rule Catalog — per-category rule tables and cross-category lookup maps
//
// The catalog is external data: it loads from CRUNCHBOX_DATA_DIR (default `data/`)
// when override files exist there, otherwise from the JSON shipped inside the
// binary. Loaded once per process, read-only afterwards.

use std::collections::BTreeMap;
use std::path::Path;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::StylerError;

const DEFAULT_CATEGORIES: &str = include_str!("data/categories.json");
const DEFAULT_MAPS: &str = include_str!("data/transformation_maps.json");
const DEFAULT_TEMPLATES: &str = include_str!("data/templates.json");

static CATALOG: OnceCell<Catalog> = OnceCell::new();

/// How one subject type is re-drawn under a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectRule {
    pub treatment: String,
    pub features: Vec<String>,
    pub attributes: Vec<String>,
}

/// How one energy tier is staged under a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRule {
    pub treatment: String,
    pub features: Vec<String>,
    pub effects: Vec<String>,
}

/// How one setting bucket is re-dressed under a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingRule {
    pub treatment: String,
    pub elements: String,
    pub background: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorRules {
    pub mappings: BTreeMap<String, String>,
    #[serde(default)]
    pub always_add: Option<String>,
    pub saturation: String,
    #[serde(default = "default_true")]
    pub gradients: bool,
    #[serde(default)]
    pub max_colors: Option<u32>,
    pub default_palette: String,
}

fn default_true() -> bool {
    true
}

/// One aesthetic category: identity, matching hints, and the full rule tables
/// the transformer consumes. Never mutated after load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRules {
    pub name: String,
    pub description: String,
    pub visual_dna: Vec<String>,
    pub ideal_subjects: Vec<String>,
    pub compatible_moods: Vec<String>,
    pub trigger_keywords: Vec<String>,
    pub commercial_promise: String,
    pub core_intention: String,
    pub composition_principle: String,
    /// Substitute locations through the fantasy lookup map during the
    /// setting transformation.
    #[serde(default)]
    pub fantasy_locations: bool,
    pub subject_rules: BTreeMap<String, SubjectRule>,
    pub action_rules: BTreeMap<String, ActionRule>,
    pub setting_rules: BTreeMap<String, SettingRule>,
    pub color_rules: ColorRules,
    pub mandatory_markers: Vec<String>,
    pub negative_prompts: Vec<String>,
}

/// Cross-category lookup tables shared by every transformation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformationMaps {
    pub profession_to_icon_props: BTreeMap<String, String>,
    pub emotion_to_mascot_face: BTreeMap<String, String>,
    pub location_to_fantasy: BTreeMap<String, String>,
}

/// Per-category assembly template: the emphasis order drives section layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub emphasis_order: Vec<String>,
    pub structure: String,
}

/// Compact category listing entry returned by the categories operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummary {
    pub description: String,
    pub visual_dna: Vec<String>,
    pub ideal_for: Vec<String>,
    pub mood_match: Vec<String>,
    pub core_intention: String,
    pub commercial_promise: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogMetadata {
    pub name: &'static str,
    pub version: &'static str,
    pub categories_loaded: Vec<String>,
    pub total_categories: usize,
}

#[derive(Debug)]
pub struct Catalog {
    categories: Vec<CategoryRules>,
    maps: TransformationMaps,
    templates: BTreeMap<String, Template>,
}

impl Catalog {
    /// Load rule tables, preferring override files in the data directory and
    /// falling back to the embedded defaults per file.
    pub fn load() -> Result<Self, StylerError> {
        let data_dir = std::env::var("CRUNCHBOX_DATA_DIR").unwrap_or_else(|_| "data".to_string());

        let categories: Vec<CategoryRules> =
            read_table(&data_dir, "categories.json", DEFAULT_CATEGORIES)?;
        let maps: TransformationMaps =
            read_table(&data_dir, "transformation_maps.json", DEFAULT_MAPS)?;
        let templates: BTreeMap<String, Template> =
            read_table(&data_dir, "templates.json", DEFAULT_TEMPLATES)?;

        // Every category must have an assembly template; a half-loaded
        // catalog is a startup failure, not a per-request one.
        for cat in &categories {
            if !templates.contains_key(&cat.name) {
                return Err(StylerError::MissingRuleData(format!(
                    "category '{}' has no template entry",
                    cat.name
                )));
            }
        }

        info!("[CATALOG] Loaded {} categories", categories.len());

        Ok(Self {
            categories,
            maps,
            templates,
        })
    }

    /// Process-wide catalog: loaded on first access, immutable afterwards.
    pub fn global() -> Result<&'static Catalog, StylerError> {
        CATALOG.get_or_try_init(Catalog::load)
    }

    /// Categories in catalog order. This order is the tiebreak for suggestion
    /// ranking, so it is part of the observable contract.
    pub fn categories(&self) -> &[CategoryRules] {
        &self.categories
    }

    pub fn names(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.name.clone()).collect()
    }

    pub fn get(&self, name: &str) -> Result<&CategoryRules, StylerError> {
        self.categories
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| StylerError::UnknownCategory {
                name: name.to_string(),
                available: self.names(),
            })
    }

    pub fn template(&self, name: &str) -> Result<&Template, StylerError> {
        self.templates
            .get(name)
            .ok_or_else(|| StylerError::UnknownCategory {
                name: name.to_string(),
                available: self.names(),
            })
    }

    pub fn maps(&self) -> &TransformationMaps {
        &self.maps
    }

    pub fn summaries(&self) -> BTreeMap<String, CategorySummary> {
        self.categories
            .iter()
            .map(|cat| {
                (
                    cat.name.clone(),
                    CategorySummary {
                        description: cat.description.clone(),
                        visual_dna: cat.visual_dna.clone(),
                        ideal_for: cat.ideal_subjects.clone(),
                        mood_match: cat.compatible_moods.clone(),
                        core_intention: cat.core_intention.clone(),
                        commercial_promise: cat.commercial_promise.clone(),
                    },
                )
            })
            .collect()
    }

    pub fn metadata(&self) -> CatalogMetadata {
        CatalogMetadata {
            name: "crunchbox aesthetic catalog",
            version: env!("CARGO_PKG_VERSION"),
            categories_loaded: self.names(),
            total_categories: self.categories.len(),
        }
    }
}

fn read_table<T: serde::de::DeserializeOwned>(
    data_dir: &str,
    file: &str,
    fallback: &str,
) -> Result<T, StylerError> {
    let path = Path::new(data_dir).join(file);
    let raw = match std::fs::read_to_string(&path) {
        Ok(content) => {
            info!("[CATALOG] Using override table {}", path.display());
            content
        }
        Err(_) => fallback.to_string(),
    };

    serde_json::from_str(&raw)
        .map_err(|e| StylerError::MissingRuleData(format!("{}: {}", file, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_defaults_load() {
        let catalog = Catalog::load().expect("embedded tables must parse");
        assert_eq!(catalog.categories().len(), 7);
    }

    #[test]
    fn every_category_has_a_template() {
        let catalog = Catalog::load().unwrap();
        for cat in catalog.categories() {
            assert!(catalog.template(&cat.name).is_ok(), "{} lacks template", cat.name);
        }
    }

    #[test]
    fn unknown_category_lists_alternatives() {
        let catalog = Catalog::load().unwrap();
        match catalog.get("vaporwave") {
            Err(StylerError::UnknownCategory { name, available }) => {
                assert_eq!(name, "vaporwave");
                assert_eq!(available.len(), 7);
            }
            other => panic!("expected UnknownCategory, got {:?}", other.map(|c| &c.name)),
        }
    }
}
