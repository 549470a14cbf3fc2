//! Program assembly: full program markup → one record per program.
//!
//! Also owns writing the final output document, replaced atomically so a
//! failed run never leaves a half-written file behind.

use std::path::Path;

use scraper::ElementRef;
use tracing::{debug, info, instrument};

use degreemap_markup::normalize::collapse_whitespace;
use degreemap_markup::{
    children_at, direct_text, first_child, parse_document, parse_year, selector, text_content,
};
use degreemap_shared::{
    CatalogOutput, CurriculumRules, DegreeMapError, ProgramRecord, ProgramSet, ReferenceData,
    Result, SemesterEntry,
};

use crate::resolver::{resolve_requirements, total_credits};
use crate::template::build_template;

/// Top-level programs only; concentrations nest under their parent via `child-of`.
const PROGRAM_SELECTOR: &str = "programs > program:not([child-of])";

/// Assemble every top-level program in one `getItems` response.
///
/// Programs with the same name overwrite earlier ones, keeping the first position.
#[instrument(skip_all, fields(bytes = xml.len()))]
pub fn assemble_programs(
    xml: &str,
    reference: &ReferenceData,
    rules: &CurriculumRules,
) -> Result<ProgramSet> {
    let doc = parse_document(xml);

    if doc.select(&selector("programs")?).next().is_none() {
        return Err(DegreeMapError::parse("program content has no <programs> element"));
    }

    let mut programs = ProgramSet::new();
    for program in doc.select(&selector(PROGRAM_SELECTOR)?) {
        let record = assemble_program(program, reference, rules)?;
        debug!(
            program = %record.name,
            credits = record.credits,
            requirements = record.requirements.len(),
            "program assembled"
        );
        programs.insert(record.name.clone(), record);
    }

    info!(count = programs.len(), "programs assembled");
    Ok(programs)
}

/// Build the record for a single `program` element.
pub fn assemble_program(
    program: ElementRef<'_>,
    reference: &ReferenceData,
    rules: &CurriculumRules,
) -> Result<ProgramRecord> {
    let name = first_child(program, "title")
        .map(|title| text_content(title).trim().to_string())
        .ok_or_else(|| DegreeMapError::parse("program without a title"))?;

    let description = program_description(program);

    let mut slots: Vec<SemesterEntry> = Vec::new();
    for year in children_at(program, "cores/core") {
        slots.extend(parse_year(year, &name)?);
    }

    let requirements = resolve_requirements(&slots, reference, rules);
    let credits = total_credits(&requirements);
    let template = build_template(&slots);

    Ok(ProgramRecord {
        name,
        description,
        credits,
        requirements,
        template,
    })
}

/// First direct text of the program's `content/p` paragraphs, whitespace-collapsed.
fn program_description(program: ElementRef<'_>) -> String {
    children_at(program, "content/p")
        .into_iter()
        .flat_map(direct_text)
        .next()
        .map(collapse_whitespace)
        .unwrap_or_default()
}

/// Write the output document as pretty JSON, replacing any previous file.
pub fn write_output(path: &Path, output: &CatalogOutput) -> Result<()> {
    let json = serde_json::to_string_pretty(output).map_err(|e| {
        DegreeMapError::validation(format!("JSON serialization failed: {e}"))
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| DegreeMapError::io(parent, e))?;
    }

    let file_name = path
        .file_name()
        .ok_or_else(|| DegreeMapError::validation(format!("output path {} has no file name", path.display())))?;
    let temp = path.with_file_name(format!(".{}.tmp", file_name.to_string_lossy()));

    std::fs::write(&temp, json).map_err(|e| DegreeMapError::io(&temp, e))?;
    std::fs::rename(&temp, path).map_err(|e| DegreeMapError::io(path, e))?;

    debug!(path = %path.display(), "wrote output document");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_reference() -> ReferenceData {
        ReferenceData::load(
            Path::new("../../../fixtures/json/subjects.json"),
            Path::new("../../../fixtures/json/courses.json"),
        )
        .expect("load reference fixtures")
    }

    fn fixture_programs() -> ProgramSet {
        let xml = std::fs::read_to_string("../../../fixtures/xml/program-items.xml")
            .expect("read program fixture");
        assemble_programs(&xml, &fixture_reference(), &CurriculumRules::default())
            .expect("assemble")
    }

    #[test]
    fn child_programs_are_skipped() {
        let programs = fixture_programs();
        let names: Vec<&str> = programs.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Computer Science", "Biology"]);
    }

    #[test]
    fn computer_science_record() {
        let programs = fixture_programs();
        let cs = programs.get("Computer Science").expect("cs program");

        assert_eq!(
            cs.description,
            "The Computer Science program prepares students for careers in computing."
        );

        let requirements: Vec<(&str, u32)> = cs
            .requirements
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        assert_eq!(
            requirements,
            vec![
                ("Hass", 4),
                ("Free", 8),
                ("CSCI", 4),
                ("MATH", 4),
                ("Calculus I", 4),
                ("Calculus II", 4),
                ("Capstone Design (Fall only)", 4),
                ("Computer Science 1", 4),
                ("Data Structures", 4),
                ("Foundations of Computer Science", 4),
                ("Programming Languages", 4),
            ]
        );
        assert_eq!(cs.credits, 48);
        assert_eq!(cs.credits, total_credits(&cs.requirements));
    }

    #[test]
    fn computer_science_template() {
        let programs = fixture_programs();
        let template = &programs.get("Computer Science").expect("cs program").template;

        let labels: Vec<&str> = template.terms.keys().map(String::as_str).collect();
        assert_eq!(labels.len(), 8);
        assert_eq!(labels[4], "3-Summer");

        assert_eq!(
            template.terms.get("1-Fall").map(SemesterEntry::tokens),
            Some(
                &[
                    "Hass Elective Credit Hours: 4".to_string(),
                    "CSCI 1100 - Computer Science 1".to_string(),
                    "MATH 1010 - Calculus I".to_string(),
                ][..]
            )
        );
        assert_eq!(
            template.terms.get("3-Summer").map(SemesterEntry::tokens),
            Some(&["Free Elective  Credit Hours: 4".to_string()][..])
        );
        assert_eq!(
            template.terms.get("4-Fall").map(SemesterEntry::tokens),
            Some(&["CSCI 4700 - Capstone Design (Fall only)".to_string()][..])
        );
        assert_eq!(
            template.extra,
            vec!["Capstone Requirement", "All students complete a capstone."]
        );
    }

    #[test]
    fn program_without_cores_is_empty() {
        let programs = fixture_programs();
        let biology = programs.get("Biology").expect("biology");

        assert_eq!(biology.description, "");
        assert!(biology.requirements.is_empty());
        assert_eq!(biology.credits, 0);
        assert_eq!(
            serde_json::to_value(&biology.template).unwrap(),
            serde_json::json!({"Extra": []})
        );
    }

    #[test]
    fn missing_programs_root_is_parse_error() {
        let err = assemble_programs(
            "<catalog></catalog>",
            &fixture_reference(),
            &CurriculumRules::default(),
        )
        .unwrap_err();
        assert!(matches!(err, DegreeMapError::Parse { .. }));
    }

    #[test]
    fn missing_semester_title_names_program() {
        let xml = r#"<catalog><programs><program>
            <title>Physics</title>
            <cores><core><title>First Year</title><children>
              <core><content>untitled</content></core>
            </children></core></cores>
        </program></programs></catalog>"#;

        let err = assemble_programs(xml, &fixture_reference(), &CurriculumRules::default())
            .unwrap_err();
        assert!(err.to_string().contains("Physics"));
    }

    #[test]
    fn write_output_replaces_file() {
        let dir = std::env::temp_dir().join(format!("degreemap-out-{}", std::process::id()));
        let path = dir.join("nested").join("programs.json");

        let mut output = CatalogOutput::new();
        output.insert("2023-2024".into(), fixture_programs());
        write_output(&path, &output).expect("first write");

        let mut smaller = CatalogOutput::new();
        smaller.insert("2022-2023".into(), ProgramSet::new());
        write_output(&path, &smaller).expect("second write");

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, serde_json::json!({"2022-2023": {}}));
        assert!(!path.with_file_name(".programs.json.tmp").exists());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
