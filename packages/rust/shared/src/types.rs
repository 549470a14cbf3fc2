//! Core domain types for degreemap program records.

use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};

/// Label of the overflow bucket that collects every term past the core years.
pub const EXTRA_LABEL: &str = "Extra";

/// Insertion-ordered map. Terms, requirements and programs serialize in the
/// order they were discovered.
pub type OrderedMap<K, V> = IndexMap<K, V>;

// ---------------------------------------------------------------------------
// Semester entries and templates
// ---------------------------------------------------------------------------

/// One semester slot as scraped from a program's year blocks.
///
/// Serialized as `[title, text]` for free-form content and as a plain list of
/// raw course strings for term content, the shape consumers of the output
/// file already expect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemesterEntry {
    /// Non-term content such as a capstone note.
    FreeForm { title: String, text: String },
    /// Raw course-description strings for one term. Never empty.
    Courses(Vec<String>),
}

impl SemesterEntry {
    /// Raw course tokens of this slot; free-form content has none.
    pub fn tokens(&self) -> &[String] {
        match self {
            Self::FreeForm { .. } => &[],
            Self::Courses(tokens) => tokens,
        }
    }

    /// Flatten into plain strings, the way overflow terms are stored under "Extra".
    pub fn flatten(&self) -> Vec<String> {
        match self {
            Self::FreeForm { title, text } => vec![title.clone(), text.clone()],
            Self::Courses(tokens) => tokens.clone(),
        }
    }
}

impl Serialize for SemesterEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::FreeForm { title, text } => {
                let mut seq = serializer.serialize_seq(Some(2))?;
                seq.serialize_element(title)?;
                seq.serialize_element(text)?;
                seq.end()
            }
            Self::Courses(tokens) => tokens.serialize(serializer),
        }
    }
}

/// Semester label → slot content, with overflow terms flattened under "Extra".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    /// Labelled terms in curriculum order (`1-Fall`, `1-Spring`, ...).
    pub terms: OrderedMap<String, SemesterEntry>,
    /// Everything past the last labelled year.
    pub extra: Vec<String>,
}

impl Serialize for Template {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.terms.len() + 1))?;
        for (label, entry) in self.terms.iter() {
            map.serialize_entry(label, entry)?;
        }
        map.serialize_entry(EXTRA_LABEL, &self.extra)?;
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Program records
// ---------------------------------------------------------------------------

/// Canonical requirement key (course name or elective-group label) → credits.
pub type RequirementMap = OrderedMap<String, u32>;

/// The normalized record written for one program in one catalog year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgramRecord {
    pub name: String,
    /// First paragraph of the program description, whitespace-collapsed.
    pub description: String,
    /// Sum of all requirement credits.
    pub credits: u32,
    pub requirements: RequirementMap,
    pub template: Template,
}

/// Program name → record, for one catalog year.
pub type ProgramSet = OrderedMap<String, ProgramRecord>;

/// Catalog year → programs. This is the whole output document.
pub type CatalogOutput = OrderedMap<String, ProgramSet>;

/// A catalog published by the content API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRef {
    /// Academic year label, e.g. `2023-2024`.
    pub year: String,
    /// Numeric catalog id as the API spells it.
    pub id: String,
}
