//! Escaping of untrusted text for embedding into HTML documents.

/// Replaces the characters `&`, `<`, `>`, `"` and `'` with their HTML entities.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            c => out.push(c),
        }
    }
    out
}

/// Replaces every `\n` with a `<br>` element.
///
/// The input is expected to be escaped already.
pub fn line_breaks(text: &str) -> String {
    text.replace('\n', "<br>")
}
