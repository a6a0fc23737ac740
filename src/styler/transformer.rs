// CRUNCHBOX Category Transformer — re-render parsed components through one
// category's rule tables. Total for every ComponentSet × category pair:
// missing rule entries degrade to generic phrasing, never to an error.

use serde::{Deserialize, Serialize};

use crate::catalog::{CategoryRules, TransformationMaps};
use crate::styler::parser::{ComponentSet, Subject};

/// Style parameter bundle. Defaults mirror an unmodified transformation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleParams {
    /// Energy multiplier; above 1.0 every action effect gets intensified.
    #[serde(default = "default_energy")]
    pub energy_level: f64,
    /// Overrides the category's saturation keyword when set.
    #[serde(default)]
    pub color_saturation: Option<String>,
    /// Caps how many effect phrases survive: <0.5 keeps 2, ≤0.8 keeps 3.
    #[serde(default = "default_density")]
    pub composition_density: f64,
    #[serde(default)]
    pub era: Option<String>,
}

fn default_energy() -> f64 {
    1.0
}

fn default_density() -> f64 {
    0.7
}

impl Default for StyleParams {
    fn default() -> Self {
        Self {
            energy_level: default_energy(),
            color_saturation: None,
            composition_density: default_density(),
            era: None,
        }
    }
}

/// One text fragment per logical component, ready for assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformedComponents {
    pub subject: String,
    pub action: String,
    pub setting: String,
    pub colors: String,
    pub effects: String,
    pub style_markers: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typography: Option<String>,
}

impl TransformedComponents {
    /// Component fragments in their natural insertion order. Assembly skips
    /// the empty ones.
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        let mut fields = vec![
            ("subject", self.subject.as_str()),
            ("action", self.action.as_str()),
            ("setting", self.setting.as_str()),
            ("colors", self.colors.as_str()),
            ("effects", self.effects.as_str()),
            ("style_markers", self.style_markers.as_str()),
        ];
        if let Some(typography) = &self.typography {
            fields.push(("typography", typography.as_str()));
        }
        fields
    }
}

/// Categories that blow action objects up to comic scale.
const EXAGGERATION_CATEGORIES: &[&str] = &["mascot", "kid_chaos"];

/// Categories that put lettering on the box.
const TYPOGRAPHY_CATEGORIES: &[&str] = &["mascot_theater", "kid_chaos", "nostalgia_revival"];

/// Apply one category's rule set to every extracted component.
pub fn apply_category_transformation(
    components: &ComponentSet,
    rules: &CategoryRules,
    maps: &TransformationMaps,
    params: &StyleParams,
) -> TransformedComponents {
    TransformedComponents {
        subject: transform_subject(&components.subject, rules, maps),
        action: transform_action(components, rules, params),
        setting: transform_setting(components, rules, maps),
        colors: transform_colors(components, rules, params),
        effects: transform_effects(&rules.name, params),
        style_markers: rules.mandatory_markers.join(", "),
        typography: if TYPOGRAPHY_CATEGORIES.contains(&rules.name.as_str()) {
            transform_typography(&components.subject, &rules.name, params)
        } else {
            None
        },
    }
}

fn transform_subject(subject: &Subject, rules: &CategoryRules, maps: &TransformationMaps) -> String {
    let name = subject.name.as_deref().unwrap_or("character");

    let Some(rule) = rules.subject_rules.get(subject.kind.as_str()) else {
        return name.to_string();
    };

    let mut parts = vec![rule.treatment.replace('_', " "), name.to_string()];

    if let Some(profession) = &subject.profession {
        if let Some(prop) = maps.profession_to_icon_props.get(profession) {
            parts.push(format!("with {}", prop));
        }
    }

    parts.extend(rule.features.iter().cloned());
    parts.extend(rule.attributes.iter().cloned());

    // Emotion attributes become mascot faces; everything else stays literal.
    for attr in &subject.attributes {
        match maps.emotion_to_mascot_face.get(attr) {
            Some(face) => parts.push(face.clone()),
            None => parts.push(format!("{} appearance", attr)),
        }
    }

    parts.join(", ")
}

fn transform_action(components: &ComponentSet, rules: &CategoryRules, params: &StyleParams) -> String {
    let action = &components.action;
    let Some(verb) = action.verb.as_deref() else {
        return "in neutral pose".to_string();
    };

    let key = format!("{}_energy", action.energy_level.as_str());
    let Some(rule) = rules
        .action_rules
        .get(&key)
        .or_else(|| rules.action_rules.get("low_energy"))
    else {
        return verb.to_string();
    };

    let mut effects: Vec<String> = rule.effects.clone();
    if params.energy_level > 1.0 && !effects.is_empty() {
        effects = effects.iter().map(|e| format!("{} intensified", e)).collect();
    }

    let mut parts = vec![format!("{} with {}", verb, rule.treatment)];
    parts.extend(rule.features.iter().cloned());

    if let Some(object) = action.object.as_deref() {
        if EXAGGERATION_CATEGORIES.iter().any(|c| rules.name.contains(c)) {
            parts.push(format!("with comically oversized {}", object));
        } else {
            parts.push(format!("with {}", object));
        }
    }

    if !effects.is_empty() {
        parts.push(effects.join(", "));
    }

    parts.join(", ")
}

fn transform_setting(
    components: &ComponentSet,
    rules: &CategoryRules,
    maps: &TransformationMaps,
) -> String {
    let setting = &components.setting;
    let raw_location = setting.location.as_deref().unwrap_or("background");

    // Fantasy-flavored categories swap real locations for their mythic
    // equivalents before dressing the scene.
    let location = if rules.fantasy_locations {
        maps.location_to_fantasy
            .get(&raw_location.to_lowercase())
            .map(String::as_str)
            .unwrap_or(raw_location)
    } else {
        raw_location
    };

    let kind = setting.kind.as_str();
    let rule_key = if rules.setting_rules.contains_key(kind) {
        kind
    } else if kind.contains("indoor") {
        "indoor"
    } else if kind.contains("outdoor") {
        "outdoor"
    } else {
        "abstract"
    };

    let Some(rule) = rules.setting_rules.get(rule_key) else {
        return format!("{} background", location);
    };

    let mut parts = vec![format!("{} {}", location, rule.treatment)];
    if !rule.elements.is_empty() {
        parts.push(format!("with {}", rule.elements));
    }
    if !rule.background.is_empty() {
        parts.push(rule.background.clone());
    }
    if let Some(time) = &setting.time {
        parts.push(format!("at {}", time));
    }

    parts.join(", ")
}

fn transform_colors(components: &ComponentSet, rules: &CategoryRules, params: &StyleParams) -> String {
    let color_rules = &rules.color_rules;
    let saturation = params
        .color_saturation
        .as_deref()
        .unwrap_or(&color_rules.saturation);

    if components.colors.is_empty() {
        return format!("{}, {} saturation", color_rules.default_palette, saturation);
    }

    let mut transformed: Vec<String> = components
        .colors
        .iter()
        .map(|c| color_rules.mappings.get(c).cloned().unwrap_or_else(|| c.clone()))
        .collect();

    // Accent joins the list before the cap, so it competes for a slot.
    if color_rules.always_add.as_deref() == Some("complementary accent color") {
        transformed.push("with complementary accent".to_string());
    }

    let palette_desc = transformed
        .iter()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");

    let mut result = vec![
        format!("color palette of {}", palette_desc),
        format!("{} saturation", saturation),
    ];

    if !color_rules.gradients {
        result.push("flat colors with no gradients".to_string());
    }
    if let Some(max) = color_rules.max_colors {
        result.push(format!("limited to {} colors maximum", max));
    }

    result.join(", ")
}

/// Category finishing touches. Fixed phrase lists, truncated by the
/// composition density parameter.
fn transform_effects(category: &str, params: &StyleParams) -> String {
    let effects: &[&str] = match category {
        "mascot_theater" => &[
            "white starburst highlights on curved surfaces",
            "radial sunburst background lines",
            "scattered floating sparkle effects",
            "thick drop shadows for depth",
        ],
        "health_halo" => &[
            "soft lens bokeh in background",
            "natural dust particles visible in light beam",
            "subtle vignette framing",
            "shallow depth of field",
        ],
        "nostalgia_revival" => &[
            "visible halftone dot pattern",
            "slight paper texture and grain",
            "intentional registration offset for vintage print feel",
            "limited spot color separation",
        ],
        "premium_disruptor" => &[
            "gold foil catching single light source",
            "extreme rim lighting creating halo",
            "selective focus with razor-thin depth of field",
            "dramatic shadows in 90% of composition",
        ],
        "kid_chaos" => &[
            "speed lines radiating from all edges",
            "explosive starburst effects in multiple neon colors",
            "lightning bolts and electricity crackling",
            "holographic rainbow gradient overlays",
            "motion blur trails showing energy",
        ],
        "transparent_honest" => &[
            "crisp sharp focus throughout with no artistic blur",
            "even clinical lighting eliminating shadows",
            "grid overlay with measurements visible",
            "labeled components and specifications",
        ],
        "adventure_fantasy" => &[
            "volumetric god rays breaking through atmosphere",
            "magical particle effects floating in air",
            "dramatic rim lighting with colored gels",
            "ethereal glow on mystical elements",
            "cinematic lens flare",
        ],
        _ => &[],
    };

    let kept = if params.composition_density < 0.5 {
        &effects[..effects.len().min(2)]
    } else if params.composition_density > 0.8 {
        effects
    } else {
        &effects[..effects.len().min(3)]
    };

    kept.join(", ")
}

fn transform_typography(subject: &Subject, category: &str, params: &StyleParams) -> Option<String> {
    let base = subject
        .profession
        .as_deref()
        .or(subject.name.as_deref())
        .unwrap_or("AWESOME");

    match category {
        "mascot_theater" => Some(format!(
            "bubbly curved typography spelling '{} CRUNCH' arcing over scene, thick inline and outline effects",
            base.to_uppercase()
        )),
        "kid_chaos" => Some(format!(
            "chrome metallic text spelling '{} BLAST' with lightning bolt letters, extreme 3D extrusion, neon glow",
            base.to_uppercase()
        )),
        "nostalgia_revival" => {
            let era = params.era.as_deref().unwrap_or("1970s");
            let era_year: String = era.chars().take(4).collect();
            Some(format!(
                "hand-lettered {} typography reading '{} - SINCE {}', distressed letterpress texture, slab serif style",
                era,
                base.to_uppercase(),
                era_year
            ))
        }
        _ => None,
    }
}
