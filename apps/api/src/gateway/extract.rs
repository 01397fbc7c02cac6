//! Pre-pass that locates the JSON object inside a backend reply.
//!
//! Handles both reply conventions: strictly schema-constrained JSON (the span
//! is the whole body) and free text that wraps JSON in prose or code fences.

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));
    match inner {
        Some(stripped) => stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start()),
        None => text,
    }
}

/// Returns the first balanced `{...}` span in `text`.
///
/// Braces inside JSON string literals (including escaped quotes) do not count.
/// An opening brace that is never closed is skipped and the scan resumes at the
/// next one. Returns `None` if no brace opens a balanced span.
pub fn first_json_object(text: &str) -> Option<&str> {
    let mut from = 0;
    while let Some(found) = text[from..].find('{') {
        let start = from + found;
        if let Some(len) = balanced_len(&text[start..]) {
            return Some(&text[start..start + len]);
        }
        from = start + 1;
    }
    None
}

/// Byte length of the balanced object opening at `text[0]`, if it closes.
fn balanced_len(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(offset + ch.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}

/// Fence stripping followed by span extraction.
pub fn extract_json_payload(text: &str) -> Option<&str> {
    first_json_object(strip_json_fences(text))
}
