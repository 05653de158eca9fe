//! Highlighter - Emphasis of the typed token inside candidate labels
//!
//! Two forms:
//! - `highlight` wraps the first case-insensitive occurrence of the token in
//!   a bare label, leaving everything else byte-for-byte intact.
//! - `highlight_markup` rewrites rendered list markup (`<li>Jane Doe</li>`),
//!   emphasizing the token in every `>…<` text segment it occurs in.
//!
//! The token is always regex-escaped, so `+`, `.` and friends are literal.
//! In the markup form it is HTML-escaped first, the same way display
//! templates escape field values, so `o'n` finds `O&#39;Neil`.
//! A token that does not occur is not an error; the input comes back as-is.

use regex::{Captures, Regex, RegexBuilder};
use wasm_bindgen::prelude::*;

use super::template::escape_html;

pub const EMPHASIS_OPEN: &str = "<strong>";
pub const EMPHASIS_CLOSE: &str = "</strong>";

/// Compiled highlighter for one token, reused across a candidate list
#[derive(Clone, Debug)]
pub struct Highlighter {
    plain: Option<Regex>,
    markup: Option<Regex>,
}

fn case_insensitive(pattern: &str) -> Option<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .ok()
}

impl Highlighter {
    pub fn new(token: &str) -> Self {
        if token.is_empty() {
            return Self {
                plain: None,
                markup: None,
            };
        }

        let escaped = regex::escape(token);
        let escaped_markup = regex::escape(&escape_html(token));

        // Group 1: text before the token, Group 2: token, Group 3: text after
        let markup = case_insensitive(&format!(
            r">\s*([\w\s]*?)({})([\w\s]*)\s*<",
            escaped_markup
        ));

        Self {
            plain: case_insensitive(&escaped),
            markup,
        }
    }

    /// Wrap the first occurrence of the token in a bare label
    pub fn highlight(&self, label: &str) -> String {
        let Some(m) = self.plain.as_ref().and_then(|re| re.find(label)) else {
            return label.to_string();
        };

        let mut out = String::with_capacity(label.len() + EMPHASIS_OPEN.len() + EMPHASIS_CLOSE.len());
        out.push_str(&label[..m.start()]);
        out.push_str(EMPHASIS_OPEN);
        out.push_str(m.as_str());
        out.push_str(EMPHASIS_CLOSE);
        out.push_str(&label[m.end()..]);
        out
    }

    /// Emphasize the token in every `>…<` segment of rendered item markup
    pub fn highlight_markup(&self, item: &str) -> String {
        let Some(re) = self.markup.as_ref() else {
            return item.to_string();
        };

        re.replace_all(item, |caps: &Captures| {
            format!(
                "> {}{}{}{}{} <",
                &caps[1], EMPHASIS_OPEN, &caps[2], EMPHASIS_CLOSE, &caps[3]
            )
        })
        .into_owned()
    }
}

/// Highlight the token in a bare label
pub fn highlight(label: &str, token: &str) -> String {
    Highlighter::new(token).highlight(label)
}

/// Highlight the token in rendered item markup
pub fn highlight_markup(item: &str, token: &str) -> String {
    Highlighter::new(token).highlight_markup(item)
}

// ==================== WASM BINDINGS ====================

#[wasm_bindgen(js_name = highlight)]
pub fn js_highlight(label: &str, token: &str) -> String {
    highlight(label, token)
}

#[wasm_bindgen(js_name = highlightMarkup)]
pub fn js_highlight_markup(item: &str, token: &str) -> String {
    highlight_markup(item, token)
}

/// Highlight a whole list of rendered items with one compiled pattern.
/// Non-string entries are passed through untouched.
#[wasm_bindgen(js_name = highlightAll)]
pub fn js_highlight_all(items: js_sys::Array, token: &str) -> js_sys::Array {
    let highlighter = Highlighter::new(token);
    items
        .iter()
        .map(|item| match item.as_string() {
            Some(markup) => JsValue::from_str(&highlighter.highlight_markup(&markup)),
            None => item,
        })
        .collect()
}

// ==================== TESTS ====================
