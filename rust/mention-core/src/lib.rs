//! MentionCore: @mention autocomplete logic for rich-text editors
//!
//! A Rust/WASM implementation of the contributor-mention widget logic.
//!
//! # Architecture
//!
//! ## Mention Components
//! - `config.rs` - TriggerConfig: trigger character, anchoring, limit, templates
//! - `matcher.rs` - MentionMatcher: caret-anchored trigger/token detection
//! - `highlight.rs` - Highlighter: emphasis of the typed token in candidate labels
//! - `template.rs` - `${key}` template interpolation for display/insert text
//! - `candidate.rs` - Candidate roster, filtering, ordering and capping
//! - `session.rs` - MentionSession: stateful facade consumed by the widget
//! - `editing.rs` - EditSurface: line-break, paste and trailing-break handling
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { MentionSession } from 'mention-core';
//!
//! await init();
//!
//! const session = MentionSession.atPreset();
//! session.loadCandidates([{ id: 'u1', fullName: 'Jane Doe' }]);
//!
//! // On every keystroke, pass the text before the caret
//! const view = session.update("Thanks @ja");
//! console.log(view.token);   // "ja"
//! console.log(view.items);   // [{ id: 'u1', html: '<li> <strong>Ja</strong>ne Doe </li>' }]
//!
//! // On selection
//! const insertion = session.select('u1');
//! console.log(insertion.text); // "@Jane Doe"
//! ```

/// Log to the browser console (no-op off wasm32).
macro_rules! console_log {
    ($($t:tt)*) => {{
        #[cfg(target_arch = "wasm32")]
        web_sys::console::log_1(&wasm_bindgen::JsValue::from_str(&format!($($t)*)));
        #[cfg(not(target_arch = "wasm32"))]
        let _ = format!($($t)*);
    }};
}

pub mod mention;

pub use mention::*;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("mention-core v{}", env!("CARGO_PKG_VERSION"))
}
