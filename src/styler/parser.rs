// CRUNCHBOX Lexical Extractor — semantic components from natural language
// Copyright (c) 2026 Lushy | CRUNCHBOX

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::catalog::TransformationMaps;

/// Parsed representation of one prompt. Extraction is total: every field
/// falls back to its default record when no pattern matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSet {
    pub subject: Subject,
    pub action: Action,
    pub setting: Setting,
    pub objects: Vec<String>,
    pub colors: Vec<String>,
    pub mood: Mood,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectType {
    Human,
    Animal,
    Object,
    Food,
    Abstract,
}

impl SubjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectType::Human => "human",
            SubjectType::Animal => "animal",
            SubjectType::Object => "object",
            SubjectType::Food => "food",
            SubjectType::Abstract => "abstract",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    #[serde(rename = "type")]
    pub kind: SubjectType,
    pub name: Option<String>,
    pub attributes: Vec<String>,
    pub profession: Option<String>,
    pub count: u32,
}

impl Default for Subject {
    fn default() -> Self {
        Self {
            kind: SubjectType::Abstract,
            name: None,
            attributes: Vec::new(),
            profession: None,
            count: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyLevel {
    Low,
    Medium,
    High,
}

impl EnergyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnergyLevel::Low => "low",
            EnergyLevel::Medium => "medium",
            EnergyLevel::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub verb: Option<String>,
    pub energy_level: EnergyLevel,
    pub object: Option<String>,
    pub modifier: Option<String>,
    pub progressive: bool,
}

impl Default for Action {
    fn default() -> Self {
        Self {
            verb: None,
            energy_level: EnergyLevel::Low,
            object: None,
            modifier: None,
            progressive: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingType {
    IndoorSpecific,
    IndoorGeneric,
    OutdoorNatural,
    OutdoorUrban,
    Fantasy,
    Abstract,
}

impl SettingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingType::IndoorSpecific => "indoor_specific",
            SettingType::IndoorGeneric => "indoor_generic",
            SettingType::OutdoorNatural => "outdoor_natural",
            SettingType::OutdoorUrban => "outdoor_urban",
            SettingType::Fantasy => "fantasy",
            SettingType::Abstract => "abstract",
        }
    }

    /// Specific indoor locations get an importance bonus.
    pub fn is_specific(&self) -> bool {
        self.as_str().ends_with("_specific")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setting {
    #[serde(rename = "type")]
    pub kind: SettingType,
    pub location: Option<String>,
    pub attributes: Vec<String>,
    pub time: Option<String>,
}

impl Default for Setting {
    fn default() -> Self {
        Self {
            kind: SettingType::Abstract,
            location: None,
            attributes: Vec::new(),
            time: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Valence {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mood {
    pub emotion: Option<String>,
    pub valence: Valence,
    pub intensity: Intensity,
}

impl Default for Mood {
    fn default() -> Self {
        Self {
            emotion: None,
            valence: Valence::Neutral,
            intensity: Intensity::Medium,
        }
    }
}

// ─── Pattern tables ───────────────────────────────────────────────────────────
// Tier order is part of the contract: first match wins, later tiers are never
// consulted once an earlier one hits.

static SUBJECT_PATTERNS: Lazy<Vec<(SubjectType, Regex)>> = Lazy::new(|| {
    vec![
        (
            SubjectType::Human,
            Regex::new(r"(?i)\b(person|people|man|woman|child|kid|adult|teenager|boy|girl|chef|doctor|firefighter|teacher|artist|musician|pilot|detective|scientist|astronaut|athlete|dancer|singer|wizard|warrior|knight|pirate|ninja|superhero)\b").unwrap(),
        ),
        (
            SubjectType::Animal,
            Regex::new(r"(?i)\b(cat|dog|bird|fish|horse|lion|tiger|bear|elephant|dragon|phoenix|unicorn|griffin|kitten|puppy)\b").unwrap(),
        ),
        (
            SubjectType::Object,
            Regex::new(r"(?i)\b(car|boat|plane|bicycle|train|rocket|sword|hammer|book|computer|phone|camera|chair|table)\b").unwrap(),
        ),
        (
            SubjectType::Food,
            Regex::new(r"(?i)\b(pizza|burger|sandwich|taco|pasta|apple|banana|strawberry|cake|cookie|donut)\b").unwrap(),
        ),
    ]
});

const HIGH_ENERGY_VERBS: &[&str] = &[
    "running", "jumping", "flying", "racing", "sprinting", "leaping", "dashing",
];
const MEDIUM_ENERGY_VERBS: &[&str] = &[
    "walking", "swimming", "climbing", "dancing", "playing", "working", "cooking",
];
const LOW_ENERGY_VERBS: &[&str] = &[
    "sitting", "standing", "lying", "resting", "reading", "thinking", "meditating",
];

const INTENSITY_MODIFIERS: &[&str] = &[
    "violently", "intensely", "quickly", "slowly", "gently", "carefully",
];

static SETTING_PATTERNS: Lazy<Vec<(SettingType, Regex)>> = Lazy::new(|| {
    vec![
        (
            SettingType::IndoorSpecific,
            Regex::new(r"(?i)\b(kitchen|bedroom|office|classroom|library|lab|studio|garage|bathroom|hallway)\b").unwrap(),
        ),
        (
            SettingType::IndoorGeneric,
            Regex::new(r"(?i)\b(inside|indoors|room|building|house)\b").unwrap(),
        ),
        (
            SettingType::OutdoorNatural,
            Regex::new(r"(?i)\b(forest|mountain|beach|desert|jungle|field|river|lake|ocean|park|garden)\b").unwrap(),
        ),
        (
            SettingType::OutdoorUrban,
            Regex::new(r"(?i)\b(street|city|downtown|alley|plaza|rooftop|sidewalk)\b").unwrap(),
        ),
        (
            SettingType::Fantasy,
            Regex::new(r"(?i)\b(castle|dungeon|spaceship|alien planet|magical realm|dimension)\b").unwrap(),
        ),
    ]
});

const ATMOSPHERE_WORDS: &[&str] = &[
    "busy", "quiet", "dark", "bright", "crowded", "empty", "chaotic", "peaceful",
];

static TIME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(dawn|sunrise|morning|noon|afternoon|sunset|dusk|evening|night|midnight)\b")
        .unwrap()
});

static PROP_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(with|holding|carrying|near|beside)\s+(a|an|the)?\s*(\w+)\b").unwrap()
});

const COLOR_PALETTE: &[&str] = &[
    "red", "blue", "green", "yellow", "orange", "purple", "pink", "black", "white", "brown",
    "gray", "cyan", "magenta", "teal", "gold", "silver",
];

const POSITIVE_EMOTIONS: &[&str] = &[
    "happy", "joyful", "excited", "proud", "confident", "cheerful", "delighted",
];
const NEGATIVE_EMOTIONS: &[&str] = &[
    "sad", "angry", "afraid", "worried", "frustrated", "tired", "exhausted", "lonely",
];
const NEUTRAL_EMOTIONS: &[&str] = &["calm", "peaceful", "focused", "curious", "contemplative"];

// ─── Extraction ───────────────────────────────────────────────────────────────

/// Parse a raw prompt into structured components. Pure function of the text
/// and the profession table; never fails.
pub fn parse_prompt(text: &str, maps: &TransformationMaps) -> ComponentSet {
    ComponentSet {
        subject: extract_subject(text, maps),
        action: extract_action(text),
        setting: extract_setting(text),
        objects: extract_objects(text),
        colors: extract_colors(text),
        mood: extract_mood(text),
    }
}

/// Identify the primary subject with attributes, profession, and count.
pub fn extract_subject(text: &str, maps: &TransformationMaps) -> Subject {
    for (kind, pattern) in SUBJECT_PATTERNS.iter() {
        let Some(m) = pattern.find(text) else {
            continue;
        };
        let name = m.as_str().to_string();

        // Word immediately preceding the subject doubles as its attribute.
        let attributes = Regex::new(&format!(r"(?i)\b(\w+)\s+{}\b", regex::escape(&name)))
            .ok()
            .and_then(|re| re.captures(text))
            .and_then(|c| c.get(1))
            .map(|m| vec![m.as_str().to_string()])
            .unwrap_or_default();

        let profession = if *kind == SubjectType::Human
            && maps
                .profession_to_icon_props
                .contains_key(&name.to_lowercase())
        {
            Some(name.to_lowercase())
        } else {
            None
        };

        let count = Regex::new(&format!(
            r"(?i)\b(two|three|four|five|six|2|3|4|5|6)\s+{}",
            regex::escape(&name)
        ))
        .ok()
        .and_then(|re| re.captures(text))
        .and_then(|c| c.get(1))
        .map(|m| match m.as_str().to_lowercase().as_str() {
            "two" => 2,
            "three" => 3,
            "four" => 4,
            "five" => 5,
            "six" => 6,
            digit => digit.parse().unwrap_or(1),
        })
        .unwrap_or(1);

        return Subject {
            kind: *kind,
            name: Some(name),
            attributes,
            profession,
            count,
        };
    }

    Subject::default()
}

/// Identify the action verb and its energy tier. Tiers are scanned
/// high → medium → low and the first verb present anywhere in the text wins,
/// even when a different tier's verb appears earlier in the sentence.
pub fn extract_action(text: &str) -> Action {
    let lower = text.to_lowercase();
    let tiers = [
        (EnergyLevel::High, HIGH_ENERGY_VERBS),
        (EnergyLevel::Medium, MEDIUM_ENERGY_VERBS),
        (EnergyLevel::Low, LOW_ENERGY_VERBS),
    ];

    for (energy, verbs) in tiers {
        for verb in verbs {
            if !lower.contains(verb) {
                continue;
            }

            let object = Regex::new(&format!(r"(?i){}\s+(a|an|the)?\s*(\w+)", verb))
                .ok()
                .and_then(|re| re.captures(text))
                .and_then(|c| c.get(2))
                .map(|m| m.as_str().to_string());

            let modifier = INTENSITY_MODIFIERS
                .iter()
                .find(|m| lower.contains(*m))
                .map(|m| m.to_string());

            return Action {
                verb: Some(verb.to_string()),
                energy_level: energy,
                object,
                modifier,
                // Coarse progressive-tense proxy, not a grammatical check.
                progressive: lower.contains("ing"),
            };
        }
    }

    Action::default()
}

/// Identify the setting, collecting every atmosphere adjective present and
/// one time-of-day token.
pub fn extract_setting(text: &str) -> Setting {
    let lower = text.to_lowercase();

    for (kind, pattern) in SETTING_PATTERNS.iter() {
        let Some(m) = pattern.find(text) else {
            continue;
        };

        let attributes = ATMOSPHERE_WORDS
            .iter()
            .filter(|w| lower.contains(*w))
            .map(|w| w.to_string())
            .collect();

        let time = TIME_PATTERN
            .find(text)
            .map(|t| t.as_str().to_string());

        return Setting {
            kind: *kind,
            location: Some(m.as_str().to_string()),
            attributes,
            time,
        };
    }

    Setting::default()
}

/// Secondary props: every preposition + optional article + noun occurrence,
/// in order of appearance, duplicates kept.
pub fn extract_objects(text: &str) -> Vec<String> {
    PROP_PATTERN
        .captures_iter(text)
        .filter_map(|c| c.get(3).map(|m| m.as_str().to_string()))
        .collect()
}

/// Every palette color present as a substring, in palette order.
pub fn extract_colors(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    COLOR_PALETTE
        .iter()
        .filter(|c| lower.contains(*c))
        .map(|c| c.to_string())
        .collect()
}

/// Identify emotional tone; valence tiers scanned positive → negative →
/// neutral, first emotion found wins.
pub fn extract_mood(text: &str) -> Mood {
    let lower = text.to_lowercase();
    let tiers = [
        (Valence::Positive, POSITIVE_EMOTIONS),
        (Valence::Negative, NEGATIVE_EMOTIONS),
        (Valence::Neutral, NEUTRAL_EMOTIONS),
    ];

    for (valence, emotions) in tiers {
        for emotion in emotions {
            if !lower.contains(emotion) {
                continue;
            }

            let intensity = if lower.contains("very") || lower.contains("extremely") {
                Intensity::High
            } else if lower.contains("slightly") || lower.contains("a bit") {
                Intensity::Low
            } else {
                Intensity::Medium
            };

            return Mood {
                emotion: Some(emotion.to_string()),
                valence,
                intensity,
            };
        }
    }

    Mood::default()
}
