//! Reference data: known subject codes and the course → credits table.
//!
//! Both files are produced by a separate maintenance process and are read
//! once at start-up. The loaded [`ReferenceData`] is immutable and passed by
//! reference into the parser and resolver.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{DegreeMapError, Result};

/// Subjects file layout: a plain list, or an object keyed by subject code.
#[derive(Deserialize)]
#[serde(untagged)]
enum SubjectsFile {
    List(Vec<String>),
    Keyed(HashMap<String, serde_json::Value>),
}

/// One course entry. The table has been published both as a bare credit list
/// and as a record with a `credits` field.
#[derive(Deserialize)]
#[serde(untagged)]
enum CourseEntry {
    Single(u32),
    List(Vec<u32>),
    Record { credits: CourseCredits },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CourseCredits {
    Single(u32),
    List(Vec<u32>),
}

impl CourseEntry {
    fn into_credits(self) -> Vec<u32> {
        match self {
            Self::Single(n) | Self::Record { credits: CourseCredits::Single(n) } => vec![n],
            Self::List(list) | Self::Record { credits: CourseCredits::List(list) } => list,
        }
    }
}

/// Read-only subject and course reference for one run.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    /// Subject codes in file order; lookups honour this order.
    subjects: Vec<String>,
    /// Course key → one (fixed) or two (min, max) credit values.
    courses: HashMap<String, Vec<u32>>,
}

impl ReferenceData {
    /// Build reference data from already-loaded parts.
    pub fn new(subjects: Vec<String>, courses: HashMap<String, Vec<u32>>) -> Self {
        Self { subjects, courses }
    }

    /// Load both reference files from disk.
    pub fn load(subjects_path: &Path, courses_path: &Path) -> Result<Self> {
        let subjects = load_subjects(subjects_path)?;
        let courses = load_courses(courses_path)?;

        info!(
            subjects = subjects.len(),
            courses = courses.len(),
            "reference data loaded"
        );

        Ok(Self { subjects, courses })
    }

    /// Return the first known subject code that occurs anywhere in `text`.
    pub fn find_subject(&self, text: &str) -> Option<&str> {
        self.subjects
            .iter()
            .find(|subj| !subj.is_empty() && text.contains(subj.as_str()))
            .map(String::as_str)
    }

    /// Credit value for a course key.
    ///
    /// Variable-credit courses store `[min, max]`; the maximum is used.
    /// Unknown keys and empty credit lists yield `None`.
    pub fn credits(&self, key: &str) -> Option<u32> {
        match self.courses.get(key)?.as_slice() {
            [] => None,
            [single] => Some(*single),
            [_, max, ..] => Some(*max),
        }
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| DegreeMapError::io(path, e))?;
    serde_json::from_str(&content)
        .map_err(|e| DegreeMapError::reference(format!("failed to parse {}: {e}", path.display())))
}

fn load_subjects(path: &Path) -> Result<Vec<String>> {
    let subjects = match read_json::<SubjectsFile>(path)? {
        SubjectsFile::List(list) => list,
        SubjectsFile::Keyed(map) => {
            let mut keys: Vec<String> = map.into_keys().collect();
            keys.sort();
            keys
        }
    };
    debug!(path = %path.display(), count = subjects.len(), "loaded subject codes");
    Ok(subjects)
}

fn load_courses(path: &Path) -> Result<HashMap<String, Vec<u32>>> {
    let raw: HashMap<String, CourseEntry> = read_json(path)?;
    let courses: HashMap<String, Vec<u32>> = raw
        .into_iter()
        .map(|(key, entry)| (key, entry.into_credits()))
        .collect();
    debug!(path = %path.display(), count = courses.len(), "loaded course credits");
    Ok(courses)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ReferenceData {
        let mut courses = HashMap::new();
        courses.insert("CSCI 1100".to_string(), vec![4]);
        courses.insert("CSCI 4430".to_string(), vec![1, 4]);
        courses.insert("ARCH 0000".to_string(), vec![]);
        ReferenceData::new(vec!["CSCI".into(), "MATH".into()], courses)
    }

    #[test]
    fn find_subject_matches_substring() {
        let reference = sample();
        assert_eq!(reference.find_subject("CSCI 1100 - Computer Science 1"), Some("CSCI"));
        assert_eq!(reference.find_subject("MATH 1010 - Calculus I"), Some("MATH"));
        assert_eq!(reference.find_subject("Computer Science Elective"), None);
    }

    #[test]
    fn credits_uses_max_of_range() {
        let reference = sample();
        assert_eq!(reference.credits("CSCI 1100"), Some(4));
        assert_eq!(reference.credits("CSCI 4430"), Some(4));
        assert_eq!(reference.credits("ARCH 0000"), None);
        assert_eq!(reference.credits("NOPE 9999"), None);
    }

    #[test]
    fn load_fixture_files() {
        let reference = ReferenceData::load(
            Path::new("../../../fixtures/json/subjects.json"),
            Path::new("../../../fixtures/json/courses.json"),
        )
        .expect("load fixtures");

        assert_eq!(reference.find_subject("PHYS 1100 - Physics I"), Some("PHYS"));
        assert_eq!(reference.credits("CSCI 1100"), Some(4));
        // Record-style entry with a variable credit range.
        assert_eq!(reference.credits("CSCI 4700"), Some(4));
    }

    #[test]
    fn keyed_subjects_file_is_accepted() {
        let dir = std::env::temp_dir().join(format!("degreemap-ref-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let subjects = dir.join("subjects.json");
        let courses = dir.join("courses.json");
        std::fs::write(&subjects, r#"{"MATH": "Mathematics", "BIOL": "Biology"}"#).unwrap();
        std::fs::write(&courses, r#"{"BIOL 1010": 3}"#).unwrap();

        let reference = ReferenceData::load(&subjects, &courses).expect("load");
        assert_eq!(reference.find_subject("BIOL 1010 - Intro"), Some("BIOL"));
        assert_eq!(reference.credits("BIOL 1010"), Some(3));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ReferenceData::load(
            Path::new("/nonexistent/subjects.json"),
            Path::new("/nonexistent/courses.json"),
        )
        .unwrap_err();
        assert!(matches!(err, DegreeMapError::Io { .. }));
    }
}
