//! TriggerConfig - Per-trigger configuration for the mention widget
//!
//! One config per trigger character. Built once at startup and never
//! mutated afterwards; matchers and sessions take it by value.

use serde::{Deserialize, Serialize};

// =============================================================================
// Defaults
// =============================================================================

pub const DEFAULT_HEADER_TPL: &str =
    "<div class=\"atwho-header\">Contributors<small>&nbsp;↑&nbsp;↓&nbsp;</small></div>";
pub const DEFAULT_DISPLAY_TPL: &str = "<li>${fullName}</li>";
pub const DEFAULT_SEARCH_KEY: &str = "fullName";
pub const DEFAULT_LIMIT: usize = 6;

// =============================================================================
// Types
// =============================================================================

/// How the typed token is compared against a candidate's search key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterPolicy {
    /// Token occurs anywhere in the key (case-insensitive)
    #[default]
    Contains,
    /// Key starts with the token (case-insensitive)
    Prefix,
}

/// Immutable configuration for a single trigger character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "TriggerConfigInput")]
pub struct TriggerConfig {
    /// Trigger character, e.g. `@` or `+`
    pub at: String,
    /// Trigger must sit at start of text or right after whitespace
    pub start_with_space: bool,
    /// Allow a literal space inside the token
    pub accept_space_bar: bool,
    /// Maximum number of candidates surfaced
    pub limit: usize,
    /// Candidate field used for searching and display
    pub search_key: String,
    pub header_tpl: String,
    pub display_tpl: String,
    pub insert_tpl: String,
    pub filter: FilterPolicy,
}

/// Wire form of `TriggerConfig`: every field optional.
///
/// Templates left out are derived from the parsed trigger and search key,
/// so `{"at": "+"}` inserts `+${fullName}` rather than the `@` preset's.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TriggerConfigInput {
    at: Option<String>,
    start_with_space: Option<bool>,
    accept_space_bar: Option<bool>,
    limit: Option<usize>,
    search_key: Option<String>,
    header_tpl: Option<String>,
    display_tpl: Option<String>,
    insert_tpl: Option<String>,
    filter: Option<FilterPolicy>,
}

impl From<TriggerConfigInput> for TriggerConfig {
    fn from(input: TriggerConfigInput) -> Self {
        let preset = Self::for_trigger(input.at.as_deref().unwrap_or("@"));
        let search_key = input.search_key.unwrap_or(preset.search_key);
        let display_tpl = input
            .display_tpl
            .unwrap_or_else(|| format!("<li>${{{}}}</li>", search_key));
        let insert_tpl = input
            .insert_tpl
            .unwrap_or_else(|| format!("{}${{{}}}", preset.at, search_key));

        Self {
            start_with_space: input.start_with_space.unwrap_or(preset.start_with_space),
            accept_space_bar: input.accept_space_bar.unwrap_or(preset.accept_space_bar),
            limit: input.limit.unwrap_or(preset.limit),
            header_tpl: input.header_tpl.unwrap_or(preset.header_tpl),
            filter: input.filter.unwrap_or(preset.filter),
            at: preset.at,
            search_key,
            display_tpl,
            insert_tpl,
        }
    }
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self::at()
    }
}

impl TriggerConfig {
    /// Contributor mentions: `@Jane Doe`
    pub fn at() -> Self {
        Self::for_trigger("@")
    }

    /// Contributor mentions with the alternate trigger: `+Jane Doe`
    pub fn plus() -> Self {
        Self::for_trigger("+")
    }

    /// Contributor preset for an arbitrary trigger
    pub fn for_trigger(at: &str) -> Self {
        Self {
            at: at.to_string(),
            start_with_space: true,
            accept_space_bar: true,
            limit: DEFAULT_LIMIT,
            search_key: DEFAULT_SEARCH_KEY.to_string(),
            header_tpl: DEFAULT_HEADER_TPL.to_string(),
            display_tpl: DEFAULT_DISPLAY_TPL.to_string(),
            insert_tpl: format!("{}${{{}}}", at, DEFAULT_SEARCH_KEY),
            filter: FilterPolicy::Contains,
        }
    }

    /// Parse a config from JSON. Missing fields fall back to the preset for
    /// the given trigger (`@` when none is given).
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.at.is_empty() {
            return Err(ConfigError::EmptyTrigger);
        }
        if self.limit == 0 {
            return Err(ConfigError::ZeroLimit);
        }
        if self.search_key.is_empty() {
            return Err(ConfigError::EmptySearchKey);
        }
        Ok(())
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Config errors
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    EmptyTrigger,
    ZeroLimit,
    EmptySearchKey,
    Parse(String),
    Pattern(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTrigger => write!(f, "Trigger character must not be empty"),
            Self::ZeroLimit => write!(f, "Result limit must be at least 1"),
            Self::EmptySearchKey => write!(f, "Search key must not be empty"),
            Self::Parse(e) => write!(f, "Failed to parse config: {}", e),
            Self::Pattern(e) => write!(f, "Failed to build trigger pattern: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}
