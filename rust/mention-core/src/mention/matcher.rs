//! MentionMatcher - Caret-anchored mention detection via Regex
//!
//! Looks at the text before the caret and decides whether the user is in
//! the middle of typing a mention, and if so what they have typed so far.
//!
//! The token is the longest run after the trigger that reaches the caret
//! and belongs to one of two classes:
//! - Latin: `A-Z a-z`, `U+00C0..=U+00FF`, digits, `_`, `' . + -` and
//!   optionally a space
//! - Non-Latin: any characters above `U+00FF`
//!
//! Only the trigger adjacent to the caret can match; earlier triggers are
//! cut off by whatever non-token character follows them.

use regex::Regex;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use super::config::{ConfigError, TriggerConfig};

// ==================== TYPE DEFINITIONS ====================

/// Outcome of scanning the text before the caret
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "kind", content = "token", rename_all = "lowercase")]
pub enum MatchResult {
    NoMatch,
    /// In-progress token after the trigger (may be empty)
    Partial(String),
}

impl MatchResult {
    pub fn token(&self) -> Option<&str> {
        match self {
            MatchResult::NoMatch => None,
            MatchResult::Partial(token) => Some(token),
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, MatchResult::Partial(_))
    }
}

fn is_line_break(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Whitespace as the matcher sees it: always a plain space
pub(crate) fn normalize_whitespace(c: char) -> char {
    if c.is_whitespace() {
        ' '
    } else {
        c
    }
}

/// Text on the caret's line with every whitespace char turned into a space
fn normalize_caret_line(text_before_caret: &str) -> String {
    let line = text_before_caret
        .rsplit(is_line_break)
        .next()
        .unwrap_or_default();
    line.chars().map(normalize_whitespace).collect()
}

/// Build the combined two-alternative pattern for a trigger
fn build_pattern(at: &str, start_with_space: bool, accept_space_bar: bool) -> String {
    let mut flag = regex::escape(at);
    if start_with_space {
        flag = format!(r"(?:^|\s){}", flag);
    }
    let space = if accept_space_bar { " " } else { "" };

    // Group 1: Latin-1 token, Group 2: non-Latin fallback
    format!(
        r"(?i:{flag}([A-Za-z\x{{C0}}-\x{{FF}}0-9_{space}'.+\-]*))$|{flag}([^\x00-\xFF]*)$",
        flag = flag,
        space = space,
    )
}

// ==================== MAIN IMPLEMENTATION ====================

/// MentionMatcher - compiled trigger pattern for one trigger character
#[wasm_bindgen]
#[derive(Clone, Debug)]
pub struct MentionMatcher {
    pattern: Regex,
}

impl MentionMatcher {
    /// Compile the matcher for a trigger config
    pub fn new(config: &TriggerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Self::from_parts(&config.at, config.start_with_space, config.accept_space_bar)
    }

    pub fn from_parts(
        at: &str,
        start_with_space: bool,
        accept_space_bar: bool,
    ) -> Result<Self, ConfigError> {
        if at.is_empty() {
            return Err(ConfigError::EmptyTrigger);
        }
        let pattern = Regex::new(&build_pattern(at, start_with_space, accept_space_bar))
            .map_err(|e| ConfigError::Pattern(e.to_string()))?;
        Ok(Self { pattern })
    }

    /// Scan the text before the caret for an in-progress mention
    pub fn match_text(&self, text_before_caret: &str) -> MatchResult {
        let line = normalize_caret_line(text_before_caret);

        let Some(caps) = self.pattern.captures(&line) else {
            return MatchResult::NoMatch;
        };

        let token = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();

        MatchResult::Partial(token)
    }
}

#[wasm_bindgen]
impl MentionMatcher {
    #[wasm_bindgen(constructor)]
    pub fn js_new(
        at: &str,
        start_with_space: bool,
        accept_space_bar: bool,
    ) -> Result<MentionMatcher, JsValue> {
        Self::from_parts(at, start_with_space, accept_space_bar)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Returns the partial token, or `undefined` when not typing a mention
    #[wasm_bindgen(js_name = matchText)]
    pub fn js_match_text(&self, text_before_caret: &str) -> Option<String> {
        match self.match_text(text_before_caret) {
            MatchResult::NoMatch => None,
            MatchResult::Partial(token) => Some(token),
        }
    }
}

// ==================== TESTS ====================

#[cfg(test)]
mod tests {
    use super::*;

    fn at() -> MentionMatcher {
        MentionMatcher::new(&TriggerConfig::at()).unwrap()
    }

    fn plus() -> MentionMatcher {
        MentionMatcher::new(&TriggerConfig::plus()).unwrap()
    }

    fn partial(token: &str) -> MatchResult {
        MatchResult::Partial(token.to_string())
    }

    #[test]
    fn test_partial_token() {
        assert_eq!(at().match_text("hello @wor"), partial("wor"));
    }

    #[test]
    fn test_trigger_just_typed() {
        assert_eq!(at().match_text("hello @"), partial(""));
        assert_eq!(at().match_text("@"), partial(""));
    }

    #[test]
    fn test_requires_preceding_space() {
        assert_eq!(at().match_text("hello@"), MatchResult::NoMatch);
        assert_eq!(at().match_text("mail me@example"), MatchResult::NoMatch);
    }

    #[test]
    fn test_no_preceding_space_required() {
        let matcher = MentionMatcher::from_parts("@", false, true).unwrap();
        assert_eq!(matcher.match_text("hello@"), partial(""));
        assert_eq!(matcher.match_text("me@example"), partial("example"));
    }

    #[test]
    fn test_plus_trigger_escaped() {
        assert_eq!(plus().match_text("team +Jane.Doe"), partial("Jane.Doe"));
        // `+` is also allowed inside the token
        assert_eq!(plus().match_text("+a+b"), partial("a+b"));
    }

    #[test]
    fn test_allowed_punctuation() {
        assert_eq!(at().match_text("cc @o'brien-smith_2"), partial("o'brien-smith_2"));
    }

    #[test]
    fn test_space_inside_token() {
        assert_eq!(at().match_text("thanks @jane do"), partial("jane do"));

        let no_space = MentionMatcher::from_parts("@", true, false).unwrap();
        assert_eq!(no_space.match_text("thanks @jane do"), MatchResult::NoMatch);
        assert_eq!(no_space.match_text("thanks @jane"), partial("jane"));
    }

    #[test]
    fn test_latin1_letters() {
        assert_eq!(at().match_text("hi @Jöhn Müller"), partial("Jöhn Müller"));
        assert_eq!(at().match_text("hi @ÿ"), partial("ÿ"));
    }

    #[test]
    fn test_non_latin_fallback() {
        assert_eq!(at().match_text("こんにちは @山田"), partial("山田"));
        assert_eq!(at().match_text("@Дмитрий"), partial("Дмитрий"));
    }

    #[test]
    fn test_mixed_classes_do_not_match() {
        // Latin class can't swallow CJK and fallback can't swallow ASCII
        assert_eq!(at().match_text("@ab山"), MatchResult::NoMatch);
    }

    #[test]
    fn test_only_caret_adjacent_trigger() {
        assert_eq!(at().match_text("@alice, and then @bo"), partial("bo"));
        // Comma breaks the run from the first trigger to the caret
        assert_eq!(at().match_text("@alice, done"), MatchResult::NoMatch);
    }

    #[test]
    fn test_line_break_ends_token() {
        assert_eq!(at().match_text("@jane\ndoe"), MatchResult::NoMatch);
        assert_eq!(at().match_text("first line\n@jo"), partial("jo"));
        assert_eq!(at().match_text("first line\r\n@jo"), partial("jo"));
    }

    #[test]
    fn test_whitespace_normalized() {
        assert_eq!(at().match_text("hi\t@jo"), partial("jo"));
        assert_eq!(at().match_text("hi\u{00A0}@jane\u{00A0}d"), partial("jane d"));
    }

    #[test]
    fn test_no_trigger_never_matches() {
        let samples = ["", "hello", "hello world", "a.b+c-d", "山田 太郎", "tab\there"];
        for text in samples {
            assert_eq!(at().match_text(text), MatchResult::NoMatch, "text: {:?}", text);
            assert_eq!(plus().match_text(text), MatchResult::NoMatch, "text: {:?}", text);
        }
    }

    #[test]
    fn test_regex_metacharacter_triggers() {
        for trigger in ["$", ".", "*", "?", "(", "[", "|", "\\", "::"] {
            let matcher = MentionMatcher::from_parts(trigger, true, true).unwrap();
            let text = format!("see {}tok", trigger);
            assert_eq!(matcher.match_text(&text), partial("tok"), "trigger: {:?}", trigger);
            assert_eq!(matcher.match_text("see tok"), MatchResult::NoMatch);
        }
    }

    #[test]
    fn test_idempotent() {
        let matcher = at();
        let text = "ping @jan";
        let first = matcher.match_text(text);
        let second = matcher.match_text(text);
        assert_eq!(first, second);
        assert_eq!(first.token(), Some("jan"));
    }

    #[test]
    fn test_empty_trigger_rejected() {
        assert!(matches!(
            MentionMatcher::from_parts("", true, true),
            Err(ConfigError::EmptyTrigger)
        ));
    }
}
