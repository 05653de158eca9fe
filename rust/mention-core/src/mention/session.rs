//! MentionSession - Stateful facade driven by the autocomplete widget
//!
//! The widget calls `update` with the text before the caret on every
//! keystroke and `select` when the user picks a candidate. The only state
//! kept between calls is the roster and the suggestion currently showing.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use super::candidate::{select_candidates, Candidate};
use super::config::{ConfigError, TriggerConfig};
use super::highlight::Highlighter;
use super::matcher::{MatchResult, MentionMatcher};
use super::template::{TemplateConfig, TemplateError};

/// Attribute tagging an inserted mention node with the candidate id
pub const GUID_ATTRIBUTE: &str = "data-atwho-guid";

// ==================== TYPE DEFINITIONS ====================

/// One row of the suggestion list
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SuggestionItem {
    pub id: String,
    /// Display markup with the token highlighted
    pub html: String,
}

/// What the widget should show for the current caret position
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SuggestionView {
    pub token: String,
    pub header: String,
    pub items: Vec<SuggestionItem>,
}

/// Text to insert for a picked candidate and how to tag it
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Insertion {
    pub text: String,
    pub guid_attribute: String,
    pub guid: String,
    /// Token the insertion replaces (without the trigger)
    pub replaces: String,
}

/// The suggestion list last shown to the user
#[derive(Clone, Debug, PartialEq)]
struct ActiveSuggestion {
    token: String,
    ids: Vec<String>,
}

// ==================== MAIN IMPLEMENTATION ====================

#[wasm_bindgen]
pub struct MentionSession {
    config: TriggerConfig,
    matcher: MentionMatcher,
    templates: TemplateConfig,
    candidates: Vec<Candidate>,
    active: Option<ActiveSuggestion>,
}

impl MentionSession {
    pub fn new(config: TriggerConfig) -> Result<Self, SessionError> {
        let matcher = MentionMatcher::new(&config)?;
        let templates = TemplateConfig::from_trigger(&config)?;
        Ok(Self {
            config,
            matcher,
            templates,
            candidates: Vec::new(),
            active: None,
        })
    }

    pub fn config(&self) -> &TriggerConfig {
        &self.config
    }

    /// Replace the roster
    pub fn load_candidates(&mut self, candidates: Vec<Candidate>) {
        console_log!(
            "[MentionSession] Loaded {} candidates for '{}'",
            candidates.len(),
            self.config.at
        );
        self.candidates = candidates;
    }

    /// Recompute suggestions for the text before the caret
    ///
    /// Returns `Ok(None)` when the caret is not in a mention. A mention with
    /// no matching candidates yields a view with an empty item list. On error
    /// no suggestion is left active.
    pub fn update(&mut self, text_before_caret: &str) -> Result<Option<SuggestionView>, SessionError> {
        self.active = None;
        let token = match self.matcher.match_text(text_before_caret) {
            MatchResult::NoMatch => return Ok(None),
            MatchResult::Partial(token) => token,
        };

        let highlighter = Highlighter::new(&token);
        let items = select_candidates(&self.candidates, &token, &self.config)
            .into_iter()
            .map(|c| -> Result<SuggestionItem, TemplateError> {
                let markup = self.templates.display(c)?;
                Ok(SuggestionItem {
                    id: c.id.clone(),
                    html: highlighter.highlight_markup(&markup),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.active = Some(ActiveSuggestion {
            token: token.clone(),
            ids: items.iter().map(|item| item.id.clone()).collect(),
        });

        Ok(Some(SuggestionView {
            token,
            header: self.templates.header.clone(),
            items,
        }))
    }

    /// Build the insertion for a picked candidate and close the suggestion
    ///
    /// Only candidates in the list last returned by `update` can be picked.
    pub fn select(&mut self, candidate_id: &str) -> Result<Insertion, SessionError> {
        let active = self.active.as_ref().ok_or(SessionError::NoActiveSuggestion)?;
        let candidate = active
            .ids
            .iter()
            .any(|id| id == candidate_id)
            .then(|| self.candidates.iter().find(|c| c.id == candidate_id))
            .flatten()
            .ok_or_else(|| SessionError::UnknownCandidate(candidate_id.to_string()))?;

        let insertion = Insertion {
            text: self.templates.insert(candidate)?,
            guid_attribute: GUID_ATTRIBUTE.to_string(),
            guid: candidate.id.clone(),
            replaces: active.token.clone(),
        };
        self.active = None;
        Ok(insertion)
    }

    pub fn dismiss(&mut self) {
        self.active = None;
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }
}

#[wasm_bindgen]
impl MentionSession {
    /// Create a session from a config object (missing fields use the `@` preset)
    #[wasm_bindgen(constructor)]
    pub fn js_new(config: JsValue) -> Result<MentionSession, JsValue> {
        let config: TriggerConfig = if config.is_undefined() || config.is_null() {
            TriggerConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Failed to parse config: {}", e)))?
        };
        Self::new(config).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = atPreset)]
    pub fn js_at_preset() -> Result<MentionSession, JsValue> {
        Self::new(TriggerConfig::at()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = plusPreset)]
    pub fn js_plus_preset() -> Result<MentionSession, JsValue> {
        Self::new(TriggerConfig::plus()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = loadCandidates)]
    pub fn js_load_candidates(&mut self, candidates: JsValue) -> Result<(), JsValue> {
        let candidates: Vec<Candidate> = serde_wasm_bindgen::from_value(candidates)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse candidates: {}", e)))?;
        self.load_candidates(candidates);
        Ok(())
    }

    #[wasm_bindgen(js_name = loadCandidatesJson)]
    pub fn js_load_candidates_json(&mut self, json: &str) -> Result<(), JsValue> {
        let candidates = Candidate::list_from_json(json)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse candidates: {}", e)))?;
        self.load_candidates(candidates);
        Ok(())
    }

    /// Returns a SuggestionView object, or `null` when not in a mention
    #[wasm_bindgen(js_name = update)]
    pub fn js_update(&mut self, text_before_caret: &str) -> Result<JsValue, JsValue> {
        match self.update(text_before_caret) {
            Ok(Some(view)) => serde_wasm_bindgen::to_value(&view)
                .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e))),
            Ok(None) => Ok(JsValue::NULL),
            Err(e) => Err(JsValue::from_str(&e.to_string())),
        }
    }

    #[wasm_bindgen(js_name = select)]
    pub fn js_select(&mut self, candidate_id: &str) -> Result<JsValue, JsValue> {
        let insertion = self
            .select(candidate_id)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        serde_wasm_bindgen::to_value(&insertion)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    #[wasm_bindgen(js_name = dismiss)]
    pub fn js_dismiss(&mut self) {
        self.dismiss();
    }

    #[wasm_bindgen(js_name = isActive)]
    pub fn js_is_active(&self) -> bool {
        self.is_active()
    }

    #[wasm_bindgen(js_name = candidateCount)]
    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }
}

// ==================== ERRORS ====================

/// Session errors
#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    NoActiveSuggestion,
    UnknownCandidate(String),
    Config(ConfigError),
    Template(TemplateError),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoActiveSuggestion => write!(f, "No mention suggestion is active"),
            Self::UnknownCandidate(id) => write!(f, "Unknown candidate: {}", id),
            Self::Config(e) => write!(f, "{}", e),
            Self::Template(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<ConfigError> for SessionError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<TemplateError> for SessionError {
    fn from(e: TemplateError) -> Self {
        Self::Template(e)
    }
}
