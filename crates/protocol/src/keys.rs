//! Code points for special keys in `element/{id}/value` payloads.
//!
//! See <https://www.w3.org/TR/webdriver2/#keyboard-actions>

pub const ENTER: &str = "\u{E007}";
