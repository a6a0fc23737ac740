// CRUNCHBOX Styler — the full prompt-structuring pipeline
// Copyright (c) 2026 Lushy | CRUNCHBOX

pub mod assembler;
pub mod parser;
pub mod transformer;
pub mod weights;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::{Catalog, CategoryRules};
use crate::error::StylerError;
use crate::styler::assembler::{build_skeleton, variant_presets, PromptSkeleton, Variant};
use crate::styler::parser::{ComponentSet, EnergyLevel};
use crate::styler::transformer::{
    apply_category_transformation, StyleParams, TransformedComponents,
};
use crate::styler::weights::{semantic_weights, SemanticWeights};

/// Parse result crossing the boundary: the components plus their derived
/// weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedPrompt {
    #[serde(flatten)]
    pub components: ComponentSet,
    pub semantic_weights: SemanticWeights,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySuggestion {
    pub primary: String,
    pub alternatives: Vec<String>,
    pub scores: BTreeMap<String, i32>,
    pub reasoning: String,
}

/// Categories that reward high-energy actions in suggestion scoring, and the
/// minimalist ones that reward stillness.
const HIGH_ENERGY_CATEGORIES: &[&str] = &["kid_chaos", "mascot_theater"];
const LOW_ENERGY_CATEGORIES: &[&str] = &["health_halo", "premium_disruptor"];

/// Facade over the parse → transform → assemble pipeline. Cheap to construct;
/// all instances share the process-wide catalog.
pub struct StyleEngine {
    catalog: &'static Catalog,
}

impl StyleEngine {
    pub fn new() -> Result<Self, StylerError> {
        Ok(Self {
            catalog: Catalog::global()?,
        })
    }

    pub fn catalog(&self) -> &'static Catalog {
        self.catalog
    }

    /// Parse raw text into components plus derived weights. Total; never
    /// fails.
    pub fn parse(&self, text: &str) -> ParsedPrompt {
        let components = parser::parse_prompt(text, self.catalog.maps());
        let semantic_weights = semantic_weights(&components);
        ParsedPrompt {
            components,
            semantic_weights,
        }
    }

    /// Score every category against the parsed components and rank them.
    /// Ties keep catalog order.
    pub fn suggest_category(&self, components: &ComponentSet) -> CategorySuggestion {
        let stringified = serde_json::to_string(components)
            .unwrap_or_default()
            .to_lowercase();

        let mut ranked: Vec<(&CategoryRules, i32, Vec<String>)> = self
            .catalog
            .categories()
            .iter()
            .map(|rules| {
                let (score, reasons) = score_category(rules, components, &stringified);
                (rules, score, reasons)
            })
            .collect();

        // Stable sort: equal scores keep catalog order.
        ranked.sort_by_key(|(_, score, _)| std::cmp::Reverse(*score));

        let scores = ranked
            .iter()
            .map(|(rules, score, _)| (rules.name.clone(), *score))
            .collect();

        let reasoning = if ranked[0].2.is_empty() {
            "General compatibility".to_string()
        } else {
            ranked[0].2.join("; ")
        };

        CategorySuggestion {
            primary: ranked[0].0.name.clone(),
            alternatives: ranked
                .iter()
                .skip(1)
                .take(2)
                .map(|(rules, _, _)| rules.name.clone())
                .collect(),
            scores,
            reasoning,
        }
    }

    pub fn rules(&self, category: &str) -> Result<&CategoryRules, StylerError> {
        self.catalog.get(category)
    }

    /// Apply one category's rules to the components.
    pub fn transform(
        &self,
        components: &ComponentSet,
        category: &str,
        params: Option<StyleParams>,
    ) -> Result<TransformedComponents, StylerError> {
        let rules = self.catalog.get(category)?;
        Ok(apply_category_transformation(
            components,
            rules,
            self.catalog.maps(),
            &params.unwrap_or_default(),
        ))
    }

    /// Assemble transformed fragments into the final skeleton.
    pub fn assemble(
        &self,
        transformed: &TransformedComponents,
        category: &str,
        weights: &SemanticWeights,
    ) -> Result<PromptSkeleton, StylerError> {
        let rules = self.catalog.get(category)?;
        let template = self.catalog.template(category)?;
        Ok(build_skeleton(transformed, rules, template, weights))
    }

    /// Run the pipeline once per preset, in preset order.
    pub fn generate_variants(
        &self,
        components: &ComponentSet,
        category: &str,
        count: u32,
    ) -> Result<Vec<Variant>, StylerError> {
        if !(1..=5).contains(&count) {
            return Err(StylerError::InvalidCount(count));
        }

        let weights = semantic_weights(components);
        let mut variants = Vec::with_capacity(count as usize);

        for (i, (preset, params)) in variant_presets().into_iter().take(count as usize).enumerate() {
            let transformed = self.transform(components, category, Some(params.clone()))?;
            let skeleton = self.assemble(&transformed, category, &weights)?;
            variants.push(Variant {
                name: format!("Variant {} ({})", i + 1, preset),
                preset: preset.to_string(),
                style_params: params,
                skeleton,
            });
        }

        info!("[STYLER] Generated {} variants for '{}'", variants.len(), category);
        Ok(variants)
    }
}

fn score_category(
    rules: &CategoryRules,
    components: &ComponentSet,
    stringified: &str,
) -> (i32, Vec<String>) {
    let mut score = 0;
    let mut reasons = Vec::new();

    let subject_type = components.subject.kind.as_str();
    if rules.ideal_subjects.iter().any(|s| s == subject_type) {
        score += 3;
        reasons.push(format!(
            "Subject type '{}' is ideal for this category",
            subject_type
        ));
    }

    if let Some(emotion) = components.mood.emotion.as_deref() {
        if rules.compatible_moods.iter().any(|m| m == emotion) {
            score += 2;
            reasons.push(format!("Mood '{}' aligns with category aesthetic", emotion));
        }
    }

    let energy = components.action.energy_level;
    if HIGH_ENERGY_CATEGORIES.contains(&rules.name.as_str()) && energy == EnergyLevel::High {
        score += 2;
        reasons.push("High energy matches dynamic category".to_string());
    } else if LOW_ENERGY_CATEGORIES.contains(&rules.name.as_str()) && energy == EnergyLevel::Low {
        score += 2;
        reasons.push("Low energy suits minimalist aesthetic".to_string());
    }

    for keyword in &rules.trigger_keywords {
        if stringified.contains(keyword.as_str()) {
            score += 1;
        }
    }

    (score, reasons)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> StyleEngine {
        StyleEngine::new().unwrap()
    }

    #[test]
    fn parse_attaches_weights() {
        let parsed = engine().parse("a happy chef cooking soup");
        assert_eq!(parsed.components.subject.name.as_deref(), Some("chef"));
        assert!(parsed.semantic_weights["subject"] > 0);
    }

    #[test]
    fn suggestion_ranks_playful_prompt_toward_mascot() {
        let engine = engine();
        let parsed = engine.parse("a happy cartoon dog playing in a fun park");
        let suggestion = engine.suggest_category(&parsed.components);

        assert_eq!(suggestion.primary, "mascot_theater");
        assert_eq!(suggestion.alternatives.len(), 2);
        assert_eq!(suggestion.scores.len(), 7);
        assert!(!suggestion.reasoning.is_empty());
    }

    #[test]
    fn suggestion_without_signals_reports_general_compatibility() {
        let engine = engine();
        // Medium energy, abstract subject, no mood, no trigger words: every
        // category scores zero and catalog order breaks the tie.
        let parsed = engine.parse("swimming");
        let suggestion = engine.suggest_category(&parsed.components);
        assert_eq!(suggestion.primary, "mascot_theater");
        assert_eq!(suggestion.reasoning, "General compatibility");
    }

    #[test]
    fn default_low_energy_favors_minimalist_categories() {
        let engine = engine();
        // An empty prompt defaults to low energy, which the minimalist
        // categories reward.
        let parsed = engine.parse("");
        let suggestion = engine.suggest_category(&parsed.components);
        assert_eq!(suggestion.primary, "health_halo");
        assert_eq!(suggestion.reasoning, "Low energy suits minimalist aesthetic");
        assert_eq!(suggestion.scores["premium_disruptor"], 2);
    }

    #[test]
    fn variant_count_bounds() {
        let engine = engine();
        let parsed = engine.parse("a happy chef cooking soup");

        for bad in [0u32, 6] {
            match engine.generate_variants(&parsed.components, "mascot_theater", bad) {
                Err(StylerError::InvalidCount(count)) => assert_eq!(count, bad),
                other => panic!("expected InvalidCount, got {:?}", other.map(|v| v.len())),
            }
        }

        let variants = engine
            .generate_variants(&parsed.components, "mascot_theater", 3)
            .unwrap();
        let presets: Vec<&str> = variants.iter().map(|v| v.preset.as_str()).collect();
        assert_eq!(presets, vec!["Subtle", "Balanced", "Intense"]);
        assert_eq!(variants[0].name, "Variant 1 (Subtle)");
    }

    #[test]
    fn transform_rejects_unknown_category() {
        let engine = engine();
        let parsed = engine.parse("a dog");
        match engine.transform(&parsed.components, "brutalism", None) {
            Err(StylerError::UnknownCategory { name, available }) => {
                assert_eq!(name, "brutalism");
                assert_eq!(available.len(), 7);
            }
            other => panic!("expected UnknownCategory, got {:?}", other.is_ok()),
        }
    }
}
