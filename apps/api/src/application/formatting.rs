//! Copy-ready renderings of a generated package.
//!
//! The backend marks key phrases with Markdown `**bold**`. Clients get each
//! field as plain text (markers removed) and as minimal HTML for rich-text paste.

use serde::Serialize;

use crate::application::models::GenerationResult;

/// A run of text, bold or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub bold: bool,
}

/// Splits `**bold**` runs out of `text`. An unmatched `**` is kept literally.
pub fn bold_segments(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find("**") {
        let after = &rest[open + 2..];
        let Some(close) = after.find("**") else {
            break;
        };
        if open > 0 {
            segments.push(Segment {
                text: &rest[..open],
                bold: false,
            });
        }
        segments.push(Segment {
            text: &after[..close],
            bold: true,
        });
        rest = &after[close + 2..];
    }
    if !rest.is_empty() {
        segments.push(Segment {
            text: rest,
            bold: false,
        });
    }
    segments
}

pub fn to_plain_text(text: &str) -> String {
    bold_segments(text).iter().map(|s| s.text).collect()
}

/// Escapes HTML, wraps bold runs in `<strong>` and line breaks in `<br>`.
pub fn to_html(text: &str) -> String {
    bold_segments(text)
        .iter()
        .map(|s| {
            let escaped = escape_html(s.text).replace('\n', "<br>");
            if s.bold {
                format!("<strong>{escaped}</strong>")
            } else {
                escaped
            }
        })
        .collect()
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Cover letter followed by the salary note, as copied together.
pub fn cover_letter_with_salary(result: &GenerationResult) -> String {
    match result.salary_note.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(note) => format!("{}\n\n{}", result.cover_letter, note),
        None => result.cover_letter.clone(),
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CopyText {
    pub plain: String,
    pub html: String,
}

impl CopyText {
    fn from_markdown(text: &str) -> Self {
        Self {
            plain: to_plain_text(text),
            html: to_html(text),
        }
    }
}

/// Clipboard payloads for every copyable field of a result.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CopyBundle {
    pub subject: CopyText,
    pub email_body: CopyText,
    pub cover_letter: CopyText,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cv_analysis: Option<CopyText>,
}

impl CopyBundle {
    pub fn from_result(result: &GenerationResult) -> Self {
        Self {
            subject: CopyText::from_markdown(&result.subject),
            email_body: CopyText::from_markdown(&result.email_body),
            cover_letter: CopyText::from_markdown(&cover_letter_with_salary(result)),
            cv_analysis: result.cv_analysis.as_deref().map(CopyText::from_markdown),
        }
    }
}
