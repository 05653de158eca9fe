//! Property-style checks for the matcher and highlighter

use crate::mention::config::TriggerConfig;
use crate::mention::highlight::{highlight, EMPHASIS_CLOSE, EMPHASIS_OPEN};
use crate::mention::matcher::{MatchResult, MentionMatcher};

const TEXTS: &[&str] = &[
    "",
    " ",
    "hello",
    "hello world",
    "line one\nline two",
    "tabs\tand  spaces",
    "o'brien-smith.jr",
    "Ünïcödé ÀÿÐ",
    "山田 太郎",
    "Дмитрий",
    "emoji 🎉 party",
];

const TRIGGERS: &[&str] = &["@", "+", "#", "$", "::"];

#[test]
fn test_no_trigger_no_match() {
    for trigger in TRIGGERS {
        for anchored in [true, false] {
            let matcher = MentionMatcher::from_parts(trigger, anchored, true).unwrap();
            for text in TEXTS {
                assert_eq!(
                    matcher.match_text(text),
                    MatchResult::NoMatch,
                    "trigger {:?} text {:?}",
                    trigger,
                    text
                );
            }
        }
    }
}

#[test]
fn test_trigger_then_text_is_partial() {
    let matcher = MentionMatcher::new(&TriggerConfig::at()).unwrap();
    for text in TEXTS {
        let input = format!("{} @", text);
        assert_eq!(matcher.match_text(&input), MatchResult::Partial(String::new()), "{:?}", input);
    }
}

#[test]
fn test_match_is_deterministic() {
    let matcher = MentionMatcher::new(&TriggerConfig::at()).unwrap();
    for text in TEXTS {
        let input = format!("x @{}", text);
        assert_eq!(matcher.match_text(&input), matcher.match_text(&input));
    }
}

#[test]
fn test_token_never_contains_line_break() {
    let matcher = MentionMatcher::new(&TriggerConfig::at()).unwrap();
    for text in TEXTS {
        let input = format!("@{}", text);
        if let MatchResult::Partial(token) = matcher.match_text(&input) {
            assert!(!token.contains('\n'), "{:?}", input);
        }
    }
}

#[test]
fn test_highlight_preserves_text() {
    for label in TEXTS {
        for token in ["", "o", "L", "山", "zzz", "+1"] {
            let out = highlight(label, token);
            let stripped = out.replacen(EMPHASIS_OPEN, "", 1).replacen(EMPHASIS_CLOSE, "", 1);
            assert_eq!(&stripped, label, "label {:?} token {:?}", label, token);
        }
    }
}
