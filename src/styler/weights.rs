// CRUNCHBOX Importance Weighter — salience scores, emphasis tiers, and the
// negative prompt.

use std::collections::BTreeMap;

use crate::catalog::CategoryRules;
use crate::styler::parser::{ComponentSet, EnergyLevel};

/// Component name → normalized importance (0–100). Truncating normalization
/// means the total can land just under 100.
pub type SemanticWeights = BTreeMap<String, u32>;

/// Terms excluded regardless of category.
pub const UNIVERSAL_NEGATIVES: &[&str] = &[
    "blurry",
    "low quality",
    "distorted",
    "deformed",
    "watermark",
    "text overlay",
    "signature",
    "cropped",
    "out of frame",
];

/// Score each component by presence, then by specificity, then normalize.
pub fn semantic_weights(components: &ComponentSet) -> SemanticWeights {
    let mut weights: BTreeMap<String, u32> = [
        ("subject", 0u32),
        ("action", 0),
        ("setting", 0),
        ("objects", 0),
        ("colors", 0),
        ("mood", 0),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();

    if components.subject.name.is_some() {
        weights.insert("subject".to_string(), 40);
    }
    if components.action.verb.is_some() {
        weights.insert("action".to_string(), 30);
    }
    if components.setting.location.is_some() {
        weights.insert("setting".to_string(), 15);
    }
    if !components.objects.is_empty() {
        weights.insert("objects".to_string(), 10);
    }
    if components.mood.emotion.is_some() {
        weights.insert("mood".to_string(), 5);
    }

    // Specificity bonuses.
    if components.subject.attributes.len() > 1 || components.subject.profession.is_some() {
        weights.entry("subject".to_string()).and_modify(|w| *w += 10);
    }
    if components.action.energy_level == EnergyLevel::High {
        weights.entry("action".to_string()).and_modify(|w| *w += 10);
    }
    if components.setting.kind.is_specific() {
        weights.entry("setting".to_string()).and_modify(|w| *w += 10);
    }

    let total: u32 = weights.values().sum();
    if total > 0 {
        for value in weights.values_mut() {
            *value = *value * 100 / total;
        }
    }

    weights
}

/// Emphasis tier for a weight. Boundaries are strict greater-than: exactly 60
/// lands in the 1.0 tier, not 1.3.
pub fn emphasis_multiplier(weight: u32) -> f64 {
    if weight > 60 {
        1.3
    } else if weight > 40 {
        1.15
    } else if weight > 20 {
        1.0
    } else {
        0.85
    }
}

/// Universal negatives followed by the category's own, comma-joined, no
/// deduplication.
pub fn negative_prompt(rules: &CategoryRules) -> String {
    UNIVERSAL_NEGATIVES
        .iter()
        .map(|s| s.to_string())
        .chain(rules.negative_prompts.iter().cloned())
        .collect::<Vec<_>>()
        .join(", ")
}
