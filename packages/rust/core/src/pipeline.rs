//! End-to-end `scrape` pipeline: catalogs → program ids → content → records → file.

use std::path::PathBuf;
use std::time::Instant;

use tracing::{info, instrument, warn};

use degreemap_catalog::CatalogClient;
use degreemap_shared::{
    CatalogOutput, CurriculumRules, DegreeMapError, ProgramSet, ReferenceData, Result,
};

use crate::assembler::{assemble_programs, write_output};

/// Configuration for the `scrape` pipeline.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// How many of the newest catalogs to scrape.
    pub catalog_count: usize,
    /// Maximum program ids per content request.
    pub chunk_size: usize,
    /// Output document path, replaced on success.
    pub output_path: PathBuf,
    /// Curriculum heuristics for the resolver.
    pub rules: CurriculumRules,
}

/// Result of the `scrape` pipeline.
#[derive(Debug)]
pub struct ScrapeResult {
    /// Catalog years scraped, newest first.
    pub years: Vec<String>,
    /// Programs written across all years.
    pub program_count: usize,
    pub output_path: PathBuf,
    pub elapsed: std::time::Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called before a catalog year is scraped.
    fn catalog_started(&self, year: &str, current: usize, total: usize);
    /// Called after each content batch is assembled.
    fn batch_assembled(&self, year: &str, programs: usize, ids_done: usize, ids_total: usize);
    /// Called when the pipeline completes.
    fn done(&self, result: &ScrapeResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn catalog_started(&self, _year: &str, _current: usize, _total: usize) {}
    fn batch_assembled(&self, _year: &str, _programs: usize, _ids_done: usize, _ids_total: usize) {}
    fn done(&self, _result: &ScrapeResult) {}
}

/// Run the full scrape.
///
/// Every request is awaited in turn; any fetch or parse failure aborts the
/// run before the output file is touched.
#[instrument(skip_all, fields(catalogs = config.catalog_count, out = %config.output_path.display()))]
pub async fn scrape(
    client: &CatalogClient,
    config: &ScrapeConfig,
    reference: &ReferenceData,
    progress: &dyn ProgressReporter,
) -> Result<ScrapeResult> {
    if config.catalog_count == 0 {
        return Err(DegreeMapError::validation("catalog count must be at least 1"));
    }
    if config.chunk_size == 0 {
        return Err(DegreeMapError::validation("chunk size must be at least 1"));
    }

    let start = Instant::now();

    // --- Phase 1: Catalog directory ---
    progress.phase("Listing catalogs");
    let mut catalogs = client.catalogs().await?;
    catalogs.truncate(config.catalog_count);

    if catalogs.is_empty() {
        return Err(DegreeMapError::validation("the catalog API returned no catalogs"));
    }

    // --- Phase 2: Programs per catalog ---
    let mut output = CatalogOutput::new();
    let mut program_count = 0;
    let total = catalogs.len();

    for (i, catalog) in catalogs.iter().enumerate() {
        progress.catalog_started(&catalog.year, i + 1, total);
        info!(year = %catalog.year, id = %catalog.id, "scraping catalog");

        let ids = client.program_ids(&catalog.id).await?;
        if ids.is_empty() {
            warn!(year = %catalog.year, "catalog lists no matching programs");
        }

        let mut programs = ProgramSet::new();
        let mut ids_done = 0;
        for batch in ids.chunks(config.chunk_size) {
            let xml = client.program_content(&catalog.id, batch).await?;
            for (name, record) in assemble_programs(&xml, reference, &config.rules)? {
                programs.insert(name, record);
            }
            ids_done += batch.len();
            progress.batch_assembled(&catalog.year, programs.len(), ids_done, ids.len());
        }

        program_count += programs.len();
        output.insert(catalog.year.clone(), programs);
    }

    // --- Phase 3: Output ---
    progress.phase("Writing output");
    write_output(&config.output_path, &output)?;

    let result = ScrapeResult {
        years: output.keys().cloned().collect(),
        program_count,
        output_path: config.output_path.clone(),
        elapsed: start.elapsed(),
    };

    info!(
        years = result.years.len(),
        programs = result.program_count,
        elapsed_ms = result.elapsed.as_millis() as u64,
        "scrape complete"
    );

    progress.done(&result);
    Ok(result)
}
