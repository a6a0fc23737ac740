use thiserror::Error;

/// Boundary errors reported to callers. Parsing and transformation are total
/// and never produce these; they only arise from bad caller input or a broken
/// catalog at startup.
#[derive(Debug, Error)]
pub enum StylerError {
    #[error("unknown category '{name}', available: {available:?}")]
    UnknownCategory {
        name: String,
        available: Vec<String>,
    },

    #[error("unknown component '{name}', available: {available:?}")]
    UnknownComponent {
        name: String,
        available: Vec<String>,
    },

    #[error("variant count must be between 1 and 5, got {0}")]
    InvalidCount(u32),

    /// Catalog load failure. Fatal at startup, never raised per-request.
    #[error("rule catalog failed to load: {0}")]
    MissingRuleData(String),
}
