// CRUNCHBOX Prompt Assembler — ordered skeleton, emphasis, refinement, and
// the variant preset table.
// Copyright (c) 2026 Lushy | CRUNCHBOX

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{CategoryRules, Template};
use crate::error::StylerError;
use crate::styler::transformer::{StyleParams, TransformedComponents};
use crate::styler::weights::{emphasis_multiplier, negative_prompt, SemanticWeights};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptSection {
    pub name: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkeletonMetadata {
    pub category: String,
    pub estimated_tokens: usize,
    pub ready_for_synthesis: bool,
    #[serde(default)]
    pub user_modifications: Vec<String>,
}

/// The deliverable: ordered fragments with emphasis multipliers, template
/// metadata, and the negative prompt. Mutable only through [`refine`].
///
/// [`refine`]: PromptSkeleton::refine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptSkeleton {
    pub sections: Vec<PromptSection>,
    pub emphasis: BTreeMap<String, f64>,
    pub template: Template,
    pub negative_prompt: String,
    pub metadata: SkeletonMetadata,
}

/// One stylistic variation: the preset applied plus the resulting skeleton.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variant {
    pub name: String,
    pub preset: String,
    pub style_params: StyleParams,
    pub skeleton: PromptSkeleton,
}

/// Assemble transformed fragments into the final skeleton.
pub fn build_skeleton(
    transformed: &TransformedComponents,
    rules: &CategoryRules,
    template: &Template,
    weights: &SemanticWeights,
) -> PromptSkeleton {
    let sections = order_sections(transformed, &template.emphasis_order);

    let emphasis = weights
        .iter()
        .map(|(name, weight)| (name.clone(), emphasis_multiplier(*weight)))
        .collect();

    let estimated_tokens = estimate_tokens(&sections);

    PromptSkeleton {
        sections,
        emphasis,
        template: template.clone(),
        negative_prompt: negative_prompt(rules),
        metadata: SkeletonMetadata {
            category: rules.name.clone(),
            estimated_tokens,
            ready_for_synthesis: true,
            user_modifications: Vec::new(),
        },
    }
}

/// Category emphasis order first, then any remaining non-empty components in
/// their natural insertion order.
fn order_sections(
    transformed: &TransformedComponents,
    emphasis_order: &[String],
) -> Vec<PromptSection> {
    let fields = transformed.fields();
    let mut sections: Vec<PromptSection> = Vec::new();

    for key in emphasis_order {
        if let Some((name, text)) = fields.iter().find(|(name, _)| name == key) {
            if !text.is_empty() {
                sections.push(PromptSection {
                    name: name.to_string(),
                    text: text.to_string(),
                });
            }
        }
    }

    for (name, text) in &fields {
        if !text.is_empty() && !sections.iter().any(|s| s.name == *name) {
            sections.push(PromptSection {
                name: name.to_string(),
                text: text.to_string(),
            });
        }
    }

    sections
}

/// Character-length ÷ 4 heuristic over current section contents.
fn estimate_tokens(sections: &[PromptSection]) -> usize {
    sections.iter().map(|s| s.text.chars().count()).sum::<usize>() / 4
}

impl PromptSkeleton {
    /// Replace one section's text in place. The token estimate is re-derived
    /// and the edit is appended to the modification history. Unknown names
    /// leave the skeleton untouched.
    pub fn refine(&mut self, component: &str, value: &str) -> Result<(), StylerError> {
        let Some(section) = self.sections.iter_mut().find(|s| s.name == component) else {
            return Err(StylerError::UnknownComponent {
                name: component.to_string(),
                available: self.sections.iter().map(|s| s.name.clone()).collect(),
            });
        };

        section.text = value.to_string();
        self.metadata.user_modifications.push(component.to_string());
        self.metadata.estimated_tokens = estimate_tokens(&self.sections);
        Ok(())
    }

    /// Flatten the skeleton into a single weighted prompt string, using the
    /// conventional `(fragment:1.15)` emphasis syntax. Neutral sections
    /// render bare.
    pub fn render(&self) -> String {
        self.sections
            .iter()
            .map(|section| {
                match self.emphasis.get(&section.name) {
                    Some(mult) if *mult != 1.0 => format!("({}:{})", section.text, mult),
                    _ => section.text.clone(),
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Fixed variant presets, applied in this order.
pub fn variant_presets() -> Vec<(&'static str, StyleParams)> {
    vec![
        (
            "Subtle",
            StyleParams {
                energy_level: 0.5,
                color_saturation: Some("pastel".to_string()),
                composition_density: 0.4,
                era: None,
            },
        ),
        (
            "Balanced",
            StyleParams {
                energy_level: 0.75,
                color_saturation: Some("bright".to_string()),
                composition_density: 0.7,
                era: None,
            },
        ),
        (
            "Intense",
            StyleParams {
                energy_level: 1.0,
                color_saturation: Some("neon".to_string()),
                composition_density: 1.0,
                era: None,
            },
        ),
        (
            "Vintage",
            StyleParams {
                energy_level: 0.6,
                color_saturation: Some("muted".to_string()),
                composition_density: 0.5,
                era: Some("1970s".to_string()),
            },
        ),
        (
            "Dramatic",
            StyleParams {
                energy_level: 0.9,
                color_saturation: Some("bold".to_string()),
                composition_density: 0.8,
                era: None,
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::styler::{parser, transformer, weights};

    fn skeleton_for(prompt: &str, category: &str) -> PromptSkeleton {
        let catalog = Box::leak(Box::new(Catalog::load().unwrap()));
        let components = parser::parse_prompt(prompt, catalog.maps());
        let rules = catalog.get(category).unwrap();
        let transformed = transformer::apply_category_transformation(
            &components,
            rules,
            catalog.maps(),
            &transformer::StyleParams::default(),
        );
        let weights = weights::semantic_weights(&components);
        build_skeleton(&transformed, rules, catalog.template(category).unwrap(), &weights)
    }

    #[test]
    fn sections_follow_emphasis_order() {
        let skeleton = skeleton_for("a happy chef cooking soup", "mascot_theater");
        let names: Vec<&str> = skeleton.sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["subject", "action", "effects", "setting", "colors", "typography", "style_markers"]
        );
    }

    #[test]
    fn token_estimate_is_quarter_of_char_total() {
        let skeleton = skeleton_for("a happy chef cooking soup", "mascot_theater");
        let chars: usize = skeleton.sections.iter().map(|s| s.text.chars().count()).sum();
        assert_eq!(skeleton.metadata.estimated_tokens, chars / 4);
    }

    #[test]
    fn refine_replaces_and_tracks() {
        let mut skeleton = skeleton_for("a happy chef cooking soup", "mascot_theater");

        skeleton.refine("subject", "grinning cartoon chef").unwrap();
        assert_eq!(skeleton.sections[0].text, "grinning cartoon chef");
        assert_eq!(skeleton.metadata.user_modifications, vec!["subject"]);

        let chars: usize = skeleton.sections.iter().map(|s| s.text.chars().count()).sum();
        assert_eq!(skeleton.metadata.estimated_tokens, chars / 4);
    }

    #[test]
    fn refine_unknown_component_leaves_skeleton_untouched() {
        let mut skeleton = skeleton_for("a happy chef cooking soup", "mascot_theater");
        let before = skeleton.clone();

        match skeleton.refine("soundtrack", "jazz") {
            Err(StylerError::UnknownComponent { name, available }) => {
                assert_eq!(name, "soundtrack");
                assert!(available.contains(&"subject".to_string()));
            }
            other => panic!("expected UnknownComponent, got {:?}", other),
        }
        assert_eq!(skeleton, before);
    }

    #[test]
    fn render_applies_emphasis_syntax() {
        let skeleton = skeleton_for("a happy chef cooking soup", "mascot_theater");
        let rendered = skeleton.render();
        // subject weight 58 → 1.15 multiplier.
        assert!(rendered.starts_with("(cartoon mascot, chef"));
        assert!(rendered.contains(":1.15)"));
    }

    #[test]
    fn preset_table_order() {
        let names: Vec<&str> = variant_presets().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["Subtle", "Balanced", "Intense", "Vintage", "Dramatic"]);
    }
}
