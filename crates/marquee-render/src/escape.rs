#![forbid(unsafe_code)]

//! Entity escaping for user-entered text.
//!
//! Comment text and drafts pass through here before landing in markup, so a
//! comment reading `<b>hi</b>` displays literally instead of becoming
//! structure.

/// Escape the five markup-significant characters.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}
