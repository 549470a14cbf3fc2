//! Semester template: ordered slots → labelled terms plus "Extra".

use degreemap_shared::{SemesterEntry, Template};

/// Term labels for each year of the four-year plan, two slots per year.
const YEAR_TERMS: [[&str; 2]; 4] = [
    ["Fall", "Spring"],
    ["Fall", "Spring"],
    ["Summer", "Fall or Spring"],
    ["Fall", "Spring"],
];

/// Label the first eight slots `<year>-<term>` and flatten the rest into "Extra".
///
/// Nothing is truncated: overflow free-form slots keep both title and text.
pub fn build_template(slots: &[SemesterEntry]) -> Template {
    let mut template = Template::default();

    for (idx, entry) in slots.iter().enumerate() {
        match term_label(idx) {
            Some(label) => {
                template.terms.insert(label, entry.clone());
            }
            None => template.extra.extend(entry.flatten()),
        }
    }

    template
}

/// `1-Fall`, `1-Spring`, ... for slot positions inside the four-year plan.
fn term_label(idx: usize) -> Option<String> {
    let year = idx / 2;
    let term = YEAR_TERMS.get(year)?[idx % 2];
    Some(format!("{}-{term}", year + 1))
}
