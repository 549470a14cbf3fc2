//! Shared types, error model, configuration, and reference data for degreemap.
//!
//! This crate is the foundation depended on by all other degreemap crates.
//! It provides:
//! - [`DegreeMapError`], the unified error type
//! - Domain types ([`ProgramRecord`], [`SemesterEntry`], [`Template`], [`OrderedMap`])
//! - Configuration ([`AppConfig`], [`CurriculumRules`], config loading)
//! - [`ReferenceData`], subject codes and course credits, loaded once per run

pub mod config;
pub mod error;
pub mod reference;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    API_KEY_ENV, AppConfig, CORE_TERMS, CatalogConfig, CatalogSettings, CurriculumRules,
    ELECTIVE_CREDITS, OutputConfig, ReferenceConfig, SUBJECT_ALIASES, config_dir,
    config_file_path, init_config, load_config, load_config_from,
};
pub use error::{DegreeMapError, Result};
pub use reference::ReferenceData;
pub use types::{
    CatalogOutput, CatalogRef, EXTRA_LABEL, OrderedMap, ProgramRecord, ProgramSet,
    RequirementMap, SemesterEntry, Template,
};
