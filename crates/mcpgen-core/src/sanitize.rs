/// Escape template braces in user free text: every `{` becomes `{{` and
/// every `}` becomes `}}`.
///
/// Applied exactly once per field. Running it twice doubles the escaping
/// again, so `"{{x}}"` maps to `"{{{{x}}}}"`.
pub fn sanitize_description(text: &str) -> String {
    let extra = text.chars().filter(|c| matches!(c, '{' | '}')).count();
    if extra == 0 {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() + extra);
    for ch in text.chars() {
        match ch {
            '{' => out.push_str("{{"),
            '}' => out.push_str("}}"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape a value for a TOML basic string or a double-quoted Python literal.
pub(crate) fn escape_quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(ch),
        }
    }
    out
}

/// Lowercase slug: runs of anything but ASCII alphanumerics become one `-`.
pub fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_dash = false;
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    out
}
