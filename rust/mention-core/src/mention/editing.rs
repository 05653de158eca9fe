//! EditSurface - Line breaks, paste and trailing-break handling
//!
//! Hosts differ in how a line break gets into an editable region: some do
//! it natively, some need the selection replaced by hand, old ones need a
//! legacy paste. `insert_line_break` asks the surface which it supports and
//! uses the first one, in that order.
//!
//! `EditBuffer` is the in-memory surface: text plus a selection, with line
//! breaks stored as `\n`. It also feeds the matcher (`text_before_caret`)
//! and applies picked mentions.

use super::matcher::normalize_whitespace;
use super::session::Insertion;

/// Ways a host can insert a line break, in preference order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineBreakCapability {
    /// Host inserts the break itself; the key's default action must run
    Native,
    /// Replace the selection with a break and collapse after it
    Selection,
    /// Paste a break at the caret and step over it
    Legacy,
}

impl LineBreakCapability {
    pub const PREFERENCE: [LineBreakCapability; 3] = [
        LineBreakCapability::Native,
        LineBreakCapability::Selection,
        LineBreakCapability::Legacy,
    ];
}

/// What the host should do with the Return key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Let the default action run
    Default,
    /// Prevent the default action; the break is already in
    Suppress,
}

pub trait EditSurface {
    fn supports(&self, capability: LineBreakCapability) -> bool;
    fn apply_line_break(&mut self, capability: LineBreakCapability) -> Result<(), EditError>;
}

/// Insert a line break at the caret using the best capability available
pub fn insert_line_break<S: EditSurface + ?Sized>(surface: &mut S) -> Result<KeyAction, EditError> {
    let capability = LineBreakCapability::PREFERENCE
        .into_iter()
        .find(|c| surface.supports(*c))
        .ok_or(EditError::Unsupported)?;

    surface.apply_line_break(capability)?;

    Ok(match capability {
        LineBreakCapability::Native => KeyAction::Default,
        LineBreakCapability::Selection | LineBreakCapability::Legacy => KeyAction::Suppress,
    })
}

// =============================================================================
// EditBuffer
// =============================================================================

/// In-memory editable region with a selection (byte offsets)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditBuffer {
    text: String,
    start: usize,
    end: usize,
    capabilities: Vec<LineBreakCapability>,
}

impl EditBuffer {
    /// Empty buffer that handles line breaks through its selection
    pub fn new() -> Self {
        Self::with_capabilities(&[LineBreakCapability::Selection])
    }

    pub fn with_capabilities(capabilities: &[LineBreakCapability]) -> Self {
        Self {
            text: String::new(),
            start: 0,
            end: 0,
            capabilities: capabilities.to_vec(),
        }
    }

    /// Replace the whole text and put the caret at the end
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.start = self.text.len();
        self.end = self.text.len();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn selection(&self) -> (usize, usize) {
        (self.start, self.end)
    }

    pub fn select(&mut self, start: usize, end: usize) -> Result<(), EditError> {
        if start > end
            || end > self.text.len()
            || !self.text.is_char_boundary(start)
            || !self.text.is_char_boundary(end)
        {
            return Err(EditError::InvalidSelection { start, end });
        }
        self.start = start;
        self.end = end;
        Ok(())
    }

    pub fn text_before_caret(&self) -> &str {
        &self.text[..self.start]
    }

    /// Replace the selection with `text` and collapse the caret after it
    fn replace_selection(&mut self, text: &str) {
        self.text.replace_range(self.start..self.end, text);
        self.start += text.len();
        self.end = self.start;
    }

    /// Paste the plain-text clipboard flavour, dropping any formatting
    pub fn paste_plain(&mut self, clipboard_text: &str) {
        let normalized = clipboard_text.replace("\r\n", "\n").replace('\r', "\n");
        self.replace_selection(&normalized);
    }

    /// Empty the buffer if it only holds whitespace and breaks
    pub fn clear_if_blank(&mut self) -> bool {
        if self.text.is_empty() || !self.text.trim().is_empty() {
            return false;
        }
        self.text.clear();
        self.start = 0;
        self.end = 0;
        true
    }

    /// Keep a break as the last thing in the buffer so Return behaves
    pub fn ensure_trailing_break(&mut self) -> bool {
        if self.text.ends_with('\n') {
            return false;
        }
        self.text.push('\n');
        true
    }

    /// Replace `trigger` + typed token before the caret with a picked mention.
    ///
    /// The token is compared the way the matcher produced it, so a
    /// non-breaking or other Unicode space in the buffer still lines up with
    /// the plain space in `insertion.replaces`.
    ///
    /// Returns the byte range of the inserted mention text. A single space
    /// follows the mention so typing can continue.
    pub fn apply_insertion(
        &mut self,
        trigger: &str,
        insertion: &Insertion,
    ) -> Result<std::ops::Range<usize>, EditError> {
        let typed = format!("{}{}", trigger, insertion.replaces);
        let from = self
            .typed_start(&typed)
            .ok_or_else(|| EditError::TokenNotAtCaret(typed.clone()))?;

        self.start = from;
        self.replace_selection(&format!("{} ", insertion.text));
        Ok(from..from + insertion.text.len())
    }
}

impl EditBuffer {
    /// Byte offset where `typed` starts if it ends right at the caret
    fn typed_start(&self, typed: &str) -> Option<usize> {
        let mut before = self.text_before_caret().char_indices().rev();
        let mut from = self.start;
        for expected in typed.chars().rev() {
            let (i, c) = before.next()?;
            if normalize_whitespace(c) != normalize_whitespace(expected) {
                return None;
            }
            from = i;
        }
        Some(from)
    }
}

impl EditSurface for EditBuffer {
    fn supports(&self, capability: LineBreakCapability) -> bool {
        self.capabilities.contains(&capability)
    }

    fn apply_line_break(&mut self, capability: LineBreakCapability) -> Result<(), EditError> {
        if !self.supports(capability) {
            return Err(EditError::Unsupported);
        }
        // All three strategies end up in the same place for an in-memory buffer
        self.replace_selection("\n");
        Ok(())
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Editing errors
#[derive(Debug, Clone, PartialEq)]
pub enum EditError {
    Unsupported,
    InvalidSelection { start: usize, end: usize },
    TokenNotAtCaret(String),
}

impl std::fmt::Display for EditError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unsupported => write!(f, "Surface has no way to insert a line break"),
            Self::InvalidSelection { start, end } => {
                write!(f, "Invalid selection {}..{}", start, end)
            }
            Self::TokenNotAtCaret(typed) => write!(f, "'{}' is not right before the caret", typed),
        }
    }
}

impl std::error::Error for EditError {}
