//! Cleanup and parsing of model replies that should be JSON.

use serde::de::DeserializeOwned;

/// Strips a surrounding Markdown code fence (```json ... ```) if present.
pub fn extract_json(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json", "JSON", ...) on the opening fence line.
    let body = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest,
    };
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

/// Deserializes a model reply, tolerating code fences, trailing commas and
/// single-quoted strings.
///
/// The reply is parsed as-is first; the relaxed form is only tried when that
/// fails, and the original error is kept.
pub fn parse_reply<T: DeserializeOwned>(reply: &str) -> Result<T, serde_json::Error> {
    let body = extract_json(reply);
    serde_json::from_str(body).or_else(|e| serde_json::from_str(&relax(body)).map_err(|_| e))
}

/// Rewrites single-quoted strings as double-quoted ones and drops commas that
/// directly precede `}` or `]`. Text inside strings is left alone.
fn relax(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    // Delimiter of the string being copied, if any.
    let mut quote: Option<char> = None;
    let mut chars = body.char_indices();

    while let Some((pos, ch)) = chars.next() {
        match (quote, ch) {
            (Some(_), '\\') => {
                out.push(ch);
                if let Some((_, escaped)) = chars.next() {
                    out.push(escaped);
                }
            }
            (Some(q), _) if ch == q => {
                out.push('"');
                quote = None;
            }
            (Some('\''), '"') => out.push_str("\\\""),
            (Some(_), _) => out.push(ch),
            (None, '"' | '\'') => {
                out.push('"');
                quote = Some(ch);
            }
            (None, ',') if body[pos + 1..].trim_start().starts_with(['}', ']']) => {}
            (None, _) => out.push(ch),
        }
    }
    out
}
