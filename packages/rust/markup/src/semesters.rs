//! Semester-block parsing.
//!
//! A program's curriculum arrives as year blocks (`cores/core`), each holding
//! one `children/core` block per semester. Term blocks are reduced to lists of
//! raw course strings; anything that is not a term becomes free-form text.

use scraper::ElementRef;
use tracing::trace;

use degreemap_shared::{DegreeMapError, Result, SemesterEntry};

use crate::normalize::{clean_block_text, normalize, split_credit_hours};
use crate::{child_elements, children_at, first_child, text_content};

/// Title fragments that mark a block as an actual academic term.
const TERM_MARKERS: [&str; 3] = ["Fall", "Spring", "Arch"];

/// Parse every semester block of one year block, in document order.
///
/// `program` is only used to give errors some context.
pub fn parse_year(year: ElementRef<'_>, program: &str) -> Result<Vec<SemesterEntry>> {
    children_at(year, "children/core")
        .into_iter()
        .map(|block| parse_block(block, program))
        .filter_map(Result::transpose)
        .collect()
}

/// Parse one semester block.
///
/// Returns `Ok(None)` for a term that ends up with no course strings.
pub fn parse_block(block: ElementRef<'_>, program: &str) -> Result<Option<SemesterEntry>> {
    let title = first_child(block, "title")
        .map(text_content)
        .ok_or_else(|| {
            DegreeMapError::parse(format!(
                "program '{program}' has a semester block without a title"
            ))
        })?;

    if !is_term_title(&title) {
        let text = first_child(block, "content")
            .map(|content| normalize(&text_content(content)))
            .unwrap_or_default();
        return Ok(Some(SemesterEntry::FreeForm {
            title: normalize(&title),
            text,
        }));
    }

    let mut tokens: Vec<String> = child_elements(block, "content")
        .flat_map(|content| split_credit_hours(&clean_block_text(&text_content(content))))
        .collect();

    for courses in child_elements(block, "courses") {
        tokens.extend(course_strings(courses));
    }

    if tokens.is_empty() {
        trace!(program, title = %title.trim(), "term block without courses dropped");
        return Ok(None);
    }

    Ok(Some(SemesterEntry::Courses(tokens)))
}

fn is_term_title(title: &str) -> bool {
    TERM_MARKERS.iter().any(|marker| title.contains(marker))
}

/// Course strings of one `courses` node.
///
/// Ad-hoc notes (like `(Fall only)`) qualify every include in the same node,
/// so they are appended to each of them.
fn course_strings(courses: ElementRef<'_>) -> Vec<String> {
    let adhoc: String = children_at(courses, "adhoc/content")
        .into_iter()
        .map(|content| clean_block_text(&text_content(content)))
        .filter(|text| !text.is_empty())
        .collect();

    child_elements(courses, "include")
        .map(|include| normalize(&text_content(include)))
        .filter(|include| !include.is_empty())
        .map(|include| {
            if adhoc.is_empty() {
                include
            } else if adhoc.starts_with(char::is_whitespace) {
                format!("{include}{adhoc}")
            } else {
                format!("{include} {adhoc}")
            }
        })
        .collect()
}
