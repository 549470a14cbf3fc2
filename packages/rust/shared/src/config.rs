//! Application configuration for degreemap.
//!
//! User config lives at `~/.degreemap/degreemap.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DegreeMapError, Result};
use crate::types::OrderedMap;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "degreemap.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".degreemap";

/// Environment variable that overrides `catalog.api_key`.
pub const API_KEY_ENV: &str = "DEGREEMAP_API_KEY";

/// Number of terms that make up the four-year core curriculum.
pub const CORE_TERMS: usize = 8;

/// Placeholder credit value for one elective/option alternative.
pub const ELECTIVE_CREDITS: u32 = 4;

/// Elective labels the catalog spells out instead of using the subject code.
pub const SUBJECT_ALIASES: &[(&str, &str)] = &[
    ("CS", "CSCI"),
    ("Computer Science", "CSCI"),
    ("Mathematics", "MATH"),
];

// ---------------------------------------------------------------------------
// Config structs (matching degreemap.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Catalog API settings.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Reference data file locations.
    #[serde(default)]
    pub reference: ReferenceConfig,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Curriculum heuristics tied to the institution's catalog shape.
    #[serde(default)]
    pub curriculum: CurriculumRules,
}

/// `[catalog]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Base URL of the content API (trailing slash significant).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Public API key sent with every request.
    #[serde(default = "default_api_key")]
    pub api_key: String,

    /// Program type kept by the listing query.
    #[serde(default = "default_degree_type")]
    pub degree_type: String,

    /// Prefix stripped from catalog titles to get the year label.
    #[serde(default = "default_title_prefix")]
    pub title_prefix: String,

    /// How many of the newest catalogs to scrape.
    #[serde(default = "default_catalog_count")]
    pub catalog_count: usize,

    /// Maximum program ids per content request.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// HTTP timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: default_api_key(),
            degree_type: default_degree_type(),
            title_prefix: default_title_prefix(),
            catalog_count: default_catalog_count(),
            chunk_size: default_chunk_size(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://rpi.apis.acalog.com/v1/".into()
}
fn default_api_key() -> String {
    // Published key for the public catalog API.
    "3eef8a28f26fb2bcc514e6f1938929a1f9317628".into()
}
fn default_degree_type() -> String {
    "Baccalaureate".into()
}
fn default_title_prefix() -> String {
    "Rensselaer Catalog ".into()
}
fn default_catalog_count() -> usize {
    1
}
fn default_chunk_size() -> usize {
    500
}
fn default_timeout_secs() -> u64 {
    60
}

/// `[reference]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceConfig {
    /// JSON list of known subject codes.
    #[serde(default = "default_subjects_path")]
    pub subjects_path: PathBuf,

    /// JSON map of course key → credit list.
    #[serde(default = "default_courses_path")]
    pub courses_path: PathBuf,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            subjects_path: default_subjects_path(),
            courses_path: default_courses_path(),
        }
    }
}

fn default_subjects_path() -> PathBuf {
    PathBuf::from("data/subjs.json")
}
fn default_courses_path() -> PathBuf {
    PathBuf::from("data/courses.json")
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Where the programs document is written. Replaced wholesale each run.
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

fn default_output_path() -> PathBuf {
    PathBuf::from("data/programs.json")
}

/// `[curriculum]` section.
///
/// These are heuristics for one institution's current catalog shape. They are
/// configurable so a new catalog generation can swap them, not so they can be
/// reinterpreted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurriculumRules {
    /// Terms counted toward requirements; later slots are "Extra".
    #[serde(default = "default_core_terms")]
    pub core_terms: usize,

    /// Credits credited per elective/option alternative.
    #[serde(default = "default_elective_credits")]
    pub elective_credits: u32,

    /// Elective label → subject code.
    #[serde(default = "default_subject_aliases")]
    pub subject_aliases: OrderedMap<String, String>,
}

impl Default for CurriculumRules {
    fn default() -> Self {
        Self {
            core_terms: default_core_terms(),
            elective_credits: default_elective_credits(),
            subject_aliases: default_subject_aliases(),
        }
    }
}

impl CurriculumRules {
    /// Map an elective label to its subject code, or return it unchanged.
    pub fn resolve_alias<'a>(&'a self, label: &'a str) -> &'a str {
        self.subject_aliases
            .get(label)
            .map(String::as_str)
            .unwrap_or(label)
    }
}

fn default_core_terms() -> usize {
    CORE_TERMS
}
fn default_elective_credits() -> u32 {
    ELECTIVE_CREDITS
}
fn default_subject_aliases() -> OrderedMap<String, String> {
    SUBJECT_ALIASES
        .iter()
        .map(|(from, to)| ((*from).to_string(), (*to).to_string()))
        .collect()
}

// ---------------------------------------------------------------------------
// Runtime catalog settings (merged from config + env)
// ---------------------------------------------------------------------------

/// Validated settings the catalog client needs at runtime.
#[derive(Debug, Clone)]
pub struct CatalogSettings {
    pub base_url: Url,
    pub api_key: String,
    pub degree_type: String,
    pub title_prefix: String,
    pub timeout_secs: u64,
}

impl TryFrom<&CatalogConfig> for CatalogSettings {
    type Error = DegreeMapError;

    fn try_from(config: &CatalogConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            DegreeMapError::config(format!("invalid catalog.base_url '{}': {e}", config.base_url))
        })?;

        let api_key = match std::env::var(API_KEY_ENV) {
            Ok(val) if !val.is_empty() => val,
            _ => config.api_key.clone(),
        };
        if api_key.is_empty() {
            return Err(DegreeMapError::config(format!(
                "no catalog API key configured. Set catalog.api_key or {API_KEY_ENV}."
            )));
        }

        Ok(Self {
            base_url,
            api_key,
            degree_type: config.degree_type.clone(),
            title_prefix: config.title_prefix.clone(),
            timeout_secs: config.timeout_secs,
        })
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.degreemap/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| DegreeMapError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.degreemap/degreemap.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DegreeMapError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        DegreeMapError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| DegreeMapError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| DegreeMapError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| DegreeMapError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
