//! Requirement resolution: raw course strings → requirement map.
//!
//! Each course string is either a named class (it mentions a known subject
//! code) or an elective group (`Hass Elective`, `Mathematics Option`). Named
//! classes are credited from the course reference; each elective alternative
//! is credited a fixed placeholder amount.
//!
//! The catalog repeats "A or B" alternatives in every term they may be taken,
//! so elective credit coming from such groups is halved. This cannot tell a
//! repeated listing from two genuinely separate requirements with identical
//! text; that limitation is accepted.

use std::collections::BTreeSet;

use tracing::{debug, trace};

use degreemap_shared::{CurriculumRules, ReferenceData, RequirementMap, SemesterEntry};

/// Separators between alternatives inside one course string.
const ALTERNATIVE_SEPARATORS: [&str; 2] = [" or ", " Or "];

/// Separator between a course code and its name (`CSCI 1100 - Computer Science 1`).
const CODE_SEPARATOR: &str = " - ";

/// Words that end an elective-group label.
const ELECTIVE_MARKERS: [&str; 2] = ["Elective", "Option"];

/// A class mentioned by name. Ordered by name so output is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct NamedClass {
    name: String,
    code: Option<String>,
}

/// What a single alternative resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Alternative {
    Named(NamedClass),
    Elective(String),
}

/// Build the requirement map for one program's semester slots.
///
/// Only the first `rules.core_terms` slots count; later slots are overflow.
pub fn resolve_requirements(
    slots: &[SemesterEntry],
    reference: &ReferenceData,
    rules: &CurriculumRules,
) -> RequirementMap {
    let mut requirements = RequirementMap::new();
    let mut duplicates = RequirementMap::new();
    let mut named = BTreeSet::new();

    let tokens = slots
        .iter()
        .take(rules.core_terms)
        .flat_map(SemesterEntry::tokens);

    for token in tokens {
        let alternatives = split_alternatives(token);
        let electives = if alternatives.len() > 1 {
            &mut duplicates
        } else {
            &mut requirements
        };

        for alternative in alternatives {
            match classify(alternative, reference, rules) {
                Some(Alternative::Named(class)) => {
                    named.insert(class);
                }
                Some(Alternative::Elective(label)) => {
                    *electives.entry(label).or_insert(0) += rules.elective_credits;
                }
                None => trace!(alternative, "alternative matched no class or elective group"),
            }
        }
    }

    for (label, credits) in duplicates {
        *requirements.entry(label).or_insert(0) += credits / 2;
    }

    for class in named {
        match class_credits(&class, reference) {
            Some(credits) => {
                requirements.insert(class.name, credits);
            }
            None => trace!(class = %class.name, "no credit data for class, omitted"),
        }
    }

    debug!(requirements = requirements.len(), "requirements resolved");
    requirements
}

/// Sum of all requirement credits.
pub fn total_credits(requirements: &RequirementMap) -> u32 {
    requirements.values().sum()
}

/// Split on `" or "`, then each piece on `" Or "`.
fn split_alternatives(token: &str) -> Vec<&str> {
    let [lower, upper] = ALTERNATIVE_SEPARATORS;
    token
        .split(lower)
        .flat_map(|piece| piece.split(upper))
        .collect()
}

fn classify(alternative: &str, reference: &ReferenceData, rules: &CurriculumRules) -> Option<Alternative> {
    if reference.find_subject(alternative).is_some() {
        let class = match alternative.split_once(CODE_SEPARATOR) {
            Some((code, name)) => NamedClass {
                name: name.to_string(),
                code: Some(code.trim().to_string()),
            },
            None => NamedClass {
                name: alternative.to_string(),
                code: None,
            },
        };
        return Some(Alternative::Named(class));
    }

    elective_label(alternative)
        .map(|label| Alternative::Elective(rules.resolve_alias(label).to_string()))
}

/// Text before the earliest elective marker, minus the separating character.
///
/// Returns `None` when there is no marker or the label would be empty.
fn elective_label(alternative: &str) -> Option<&str> {
    let idx = ELECTIVE_MARKERS
        .iter()
        .filter_map(|marker| alternative.find(marker))
        .min()?;

    let head = &alternative[..idx];
    let label = head
        .char_indices()
        .last()
        .map_or(head, |(last, _)| &head[..last]);

    (!label.is_empty()).then_some(label)
}

/// Credits for a named class: by course code first, then by name.
fn class_credits(class: &NamedClass, reference: &ReferenceData) -> Option<u32> {
    class
        .code
        .as_deref()
        .and_then(|code| reference.credits(code))
        .or_else(|| reference.credits(&class.name))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn reference() -> ReferenceData {
        let mut courses = HashMap::new();
        courses.insert("CSCI 1100".to_string(), vec![4]);
        courses.insert("CSCI 4430".to_string(), vec![4]);
        courses.insert("CSCI 4700".to_string(), vec![1, 4]);
        courses.insert("MATH 1010".to_string(), vec![4]);
        courses.insert("Professional Development".to_string(), vec![2]);
        ReferenceData::new(
            vec!["CSCI".into(), "MATH".into(), "PSYC".into()],
            courses,
        )
    }

    fn courses(tokens: &[&str]) -> SemesterEntry {
        SemesterEntry::Courses(tokens.iter().map(|t| (*t).to_string()).collect())
    }

    fn keys(map: &RequirementMap) -> Vec<&str> {
        map.keys().map(String::as_str).collect()
    }

    #[test]
    fn named_class_credited_by_code() {
        let slots = vec![courses(&["CSCI 1100 - Computer Science 1"])];
        let map = resolve_requirements(&slots, &reference(), &CurriculumRules::default());

        assert_eq!(map.get("Computer Science 1"), Some(&4));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn named_class_counted_once_across_terms() {
        let slots = vec![
            courses(&["CSCI 4430 - Programming Languages"]),
            courses(&["CSCI 4430 - Programming Languages"]),
        ];
        let map = resolve_requirements(&slots, &reference(), &CurriculumRules::default());
        assert_eq!(map.get("Programming Languages"), Some(&4));
        assert_eq!(total_credits(&map), 4);
    }

    #[test]
    fn variable_credit_uses_maximum() {
        let slots = vec![courses(&["CSCI 4700 - Capstone Design"])];
        let map = resolve_requirements(&slots, &reference(), &CurriculumRules::default());
        assert_eq!(map.get("Capstone Design"), Some(&4));
    }

    #[test]
    fn unknown_class_is_omitted() {
        let slots = vec![courses(&["CSCI 2500 - Computer Organization"])];
        let map = resolve_requirements(&slots, &reference(), &CurriculumRules::default());
        assert!(map.is_empty());
    }

    #[test]
    fn class_without_code_falls_back_to_name() {
        let slots = vec![courses(&["Professional Development PSYC"])];
        let map = resolve_requirements(&slots, &reference(), &CurriculumRules::default());
        assert!(map.is_empty());

        let slots = vec![courses(&["PSYC 1000 - Professional Development"])];
        let map = resolve_requirements(&slots, &reference(), &CurriculumRules::default());
        assert_eq!(map.get("Professional Development"), Some(&2));
    }

    #[test]
    fn singleton_electives_accumulate() {
        let slots = vec![
            courses(&["Hass Elective Credit Hours: 4"]),
            courses(&["Free Elective Credit Hours: 4", "Hass Elective Credit Hours: 4"]),
        ];
        let map = resolve_requirements(&slots, &reference(), &CurriculumRules::default());

        assert_eq!(keys(&map), vec!["Hass", "Free"]);
        assert_eq!(map.get("Hass"), Some(&8));
        assert_eq!(map.get("Free"), Some(&4));
    }

    #[test]
    fn duplicate_group_is_halved() {
        let token = "Computer Science Elective or Mathematics Option";
        let slots = vec![courses(&[token]), courses(&[token])];
        let map = resolve_requirements(&slots, &reference(), &CurriculumRules::default());

        assert_eq!(map.get("CSCI"), Some(&4));
        assert_eq!(map.get("MATH"), Some(&4));
    }

    #[test]
    fn duplicate_halving_truncates_odd_counts() {
        let slots = vec![courses(&["Computer Science Elective or Option"])];
        let map = resolve_requirements(&slots, &reference(), &CurriculumRules::default());
        // 4 / 2 for CSCI; the bare "Option" alternative has no label.
        assert_eq!(map.get("CSCI"), Some(&2));
        assert_eq!(map.len(), 1);

        let rules = CurriculumRules {
            elective_credits: 3,
            ..CurriculumRules::default()
        };
        let map = resolve_requirements(&slots, &reference(), &rules);
        assert_eq!(map.get("CSCI"), Some(&1));
    }

    #[test]
    fn duplicate_and_singleton_merge() {
        let slots = vec![
            courses(&["CS Elective"]),
            courses(&["CS Elective or Science Elective"]),
            courses(&["CS Elective or Science Elective"]),
        ];
        let map = resolve_requirements(&slots, &reference(), &CurriculumRules::default());
        assert_eq!(map.get("CSCI"), Some(&8));
        assert_eq!(map.get("Science"), Some(&4));
    }

    #[test]
    fn capitalized_or_splits_alternatives() {
        let slots = vec![courses(&["MATH 1010 - Calculus I Or CSCI 1100 - Computer Science 1"])];
        let map = resolve_requirements(&slots, &reference(), &CurriculumRules::default());
        assert_eq!(keys(&map), vec!["Calculus I", "Computer Science 1"]);
    }

    #[test]
    fn named_class_overrides_elective_with_same_key() {
        let mut courses_table = HashMap::new();
        courses_table.insert("Free".to_string(), vec![2]);
        let reference = ReferenceData::new(vec!["XYZ".into()], courses_table);

        let slots = vec![courses(&["Free Elective", "XYZ - Free"])];
        let map = resolve_requirements(&slots, &reference, &CurriculumRules::default());
        assert_eq!(map.get("Free"), Some(&2));
    }

    #[test]
    fn only_core_terms_count() {
        let mut slots: Vec<SemesterEntry> = (0..8).map(|_| courses(&["Free Elective"])).collect();
        slots.push(courses(&["Hass Elective"]));
        slots.push(SemesterEntry::FreeForm {
            title: "Notes".into(),
            text: "Hass Elective".into(),
        });

        let map = resolve_requirements(&slots, &reference(), &CurriculumRules::default());
        assert_eq!(map.get("Free"), Some(&32));
        assert!(!map.contains_key("Hass"));
    }

    #[test]
    fn free_form_slots_contribute_nothing() {
        let slots = vec![SemesterEntry::FreeForm {
            title: "Capstone".into(),
            text: "CSCI 4700 - Capstone Design".into(),
        }];
        let map = resolve_requirements(&slots, &reference(), &CurriculumRules::default());
        assert!(map.is_empty());
        assert_eq!(total_credits(&map), 0);
    }

    #[test]
    fn elective_label_edge_cases() {
        assert_eq!(elective_label("Hass Elective Credit Hours: 4"), Some("Hass"));
        assert_eq!(elective_label("Mathematics Option"), Some("Mathematics"));
        assert_eq!(elective_label("Option"), None);
        assert_eq!(elective_label("Science Option Elective"), Some("Science"));
        assert_eq!(elective_label("Capstone Credit Hours: 4"), None);
    }

    #[test]
    fn empty_input_yields_empty_map() {
        let map = resolve_requirements(&[], &reference(), &CurriculumRules::default());
        assert!(map.is_empty());
        assert_eq!(total_credits(&map), 0);
    }
}
