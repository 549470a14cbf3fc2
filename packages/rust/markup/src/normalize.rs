//! Text normalization passes for scraped catalog text.
//!
//! Each pass is a total `&str -> String` (or list) function. The semester
//! parser applies them as footnote strip, exception strip, then
//! Credit-Hours split; see [`clean_block_text`] and [`split_credit_hours`].

use unicode_normalization::UnicodeNormalization;

/// Start of an inline footnote reference, e.g. `(See footnote 2 below)`.
pub const FOOTNOTE_MARKER: &str = "(See footnote";

/// Characters removed from the start of each footnote marker.
pub const FOOTNOTE_SPAN: usize = 22;

/// Scheduling caveat that precedes the real content of architecture terms.
pub const EXCEPTION_MARKER: &str = "ExceptionProcess.";

/// Delimiter between elective descriptions in term content.
pub const CREDIT_HOURS_MARKER: &str = "Credit Hours";

/// Characters after the marker kept with the preceding segment (`: 4` and friends).
pub const CREDIT_SUFFIX_CHARS: usize = 4;

/// Unicode compatibility decomposition (NFKD), then trim.
///
/// Folds non-breaking spaces and similar catalog artifacts into plain text.
pub fn normalize(text: &str) -> String {
    text.nfkd().collect::<String>().trim().to_string()
}

/// Collapse every whitespace run to a single space and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove every footnote marker and the rest of its fixed-width span.
///
/// The footnote number is not parsed; the span is cut by character count.
pub fn strip_footnotes(text: &str) -> String {
    let mut out = text.to_string();
    while let Some(start) = out.find(FOOTNOTE_MARKER) {
        let end = byte_offset_after(&out, start, FOOTNOTE_SPAN);
        out.replace_range(start..end, "");
    }
    out
}

/// Drop everything up to and including the exception-process caveat.
pub fn strip_exception(text: &str) -> String {
    match text.rfind(EXCEPTION_MARKER) {
        Some(idx) => text[idx + EXCEPTION_MARKER.len()..].to_string(),
        None => text.to_string(),
    }
}

/// Footnote strip followed by exception strip.
pub fn clean_block_text(text: &str) -> String {
    strip_exception(&strip_footnotes(text))
}

/// Split content after every `Credit Hours` marker plus its short suffix.
///
/// Each marker ends a segment. Text after the last marker is not a course
/// line and is dropped, so content without a marker yields nothing.
pub fn split_credit_hours(text: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut rest = text;

    while let Some(pos) = rest.find(CREDIT_HOURS_MARKER) {
        let end = byte_offset_after(rest, pos + CREDIT_HOURS_MARKER.len(), CREDIT_SUFFIX_CHARS);
        segments.push(normalize(&rest[..end]));
        rest = &rest[end..];
    }

    remove_empty(segments)
}

/// Remove empty entries from a list.
pub fn remove_empty(items: Vec<String>) -> Vec<String> {
    items.into_iter().filter(|s| !s.is_empty()).collect()
}

/// Byte index `chars` characters past `start`, clamped to the end of `text`.
fn byte_offset_after(text: &str, start: usize, chars: usize) -> usize {
    text[start..]
        .char_indices()
        .nth(chars)
        .map(|(i, _)| start + i)
        .unwrap_or(text.len())
}
