//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use degreemap_catalog::CatalogClient;
use degreemap_core::pipeline::{ProgressReporter, ScrapeConfig, ScrapeResult};
use degreemap_shared::{
    AppConfig, CatalogSettings, ReferenceData, init_config, load_config, load_config_from,
};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// degreemap: degree requirements and semester templates from the course catalog.
#[derive(Parser)]
#[command(
    name = "degreemap",
    version,
    about = "Scrape catalog degree programs into requirement maps and semester templates.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.degreemap/degreemap.toml.
    #[arg(long = "config", global = true, env = "DEGREEMAP_CONFIG")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Scrape the newest catalogs and write the programs document.
    Scrape {
        /// Number of newest catalogs to scrape.
        #[arg(short, long)]
        catalogs: Option<usize>,

        /// Output file (defaults to output.path from config).
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Subject codes JSON file.
        #[arg(long)]
        subjects: Option<PathBuf>,

        /// Course credits JSON file.
        #[arg(long)]
        courses: Option<PathBuf>,
    },

    /// List published catalogs, newest first.
    Catalogs,

    /// List program ids of the configured degree type in one catalog.
    Programs {
        /// Catalog id (see `degreemap catalogs`).
        #[arg(long)]
        catalog: String,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "degreemap=info",
        1 => "degreemap=debug",
        _ => "degreemap=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config_file.as_deref();

    match cli.command {
        Command::Scrape {
            catalogs,
            out,
            subjects,
            courses,
        } => {
            let overrides = ScrapeOverrides {
                catalogs,
                out,
                subjects,
                courses,
            };
            cmd_scrape(config_path, overrides).await
        }
        Command::Catalogs => cmd_catalogs(config_path).await,
        Command::Programs { catalog } => cmd_programs(config_path, &catalog).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

/// CLI flags that take precedence over config file values.
struct ScrapeOverrides {
    catalogs: Option<usize>,
    out: Option<PathBuf>,
    subjects: Option<PathBuf>,
    courses: Option<PathBuf>,
}

fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    Ok(config)
}

fn build_client(config: &AppConfig) -> Result<CatalogClient> {
    let settings = CatalogSettings::try_from(&config.catalog)?;
    Ok(CatalogClient::new(settings)?)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_scrape(config_path: Option<&Path>, overrides: ScrapeOverrides) -> Result<()> {
    let config = resolve_config(config_path)?;
    let client = build_client(&config)?;

    let subjects_path = overrides
        .subjects
        .unwrap_or_else(|| config.reference.subjects_path.clone());
    let courses_path = overrides
        .courses
        .unwrap_or_else(|| config.reference.courses_path.clone());

    let reference = ReferenceData::load(&subjects_path, &courses_path).wrap_err_with(|| {
        format!(
            "loading reference data from {} and {}",
            subjects_path.display(),
            courses_path.display()
        )
    })?;

    let scrape_config = ScrapeConfig {
        catalog_count: overrides.catalogs.unwrap_or(config.catalog.catalog_count),
        chunk_size: config.catalog.chunk_size,
        output_path: overrides.out.unwrap_or_else(|| config.output.path.clone()),
        rules: config.curriculum.clone(),
    };

    info!(
        catalogs = scrape_config.catalog_count,
        out = %scrape_config.output_path.display(),
        "starting scrape"
    );

    let reporter = CliProgress::new();
    let result = degreemap_core::pipeline::scrape(&client, &scrape_config, &reference, &reporter)
        .await
        .inspect_err(|_| reporter.abandon())?;

    // Print summary
    println!();
    println!("  Programs scraped successfully!");
    println!("  Catalogs: {}", result.years.join(", "));
    println!("  Programs: {}", result.program_count);
    println!("  Output:   {}", result.output_path.display());
    println!("  Time:     {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

async fn cmd_catalogs(config_path: Option<&Path>) -> Result<()> {
    let config = resolve_config(config_path)?;
    let client = build_client(&config)?;

    let catalogs = client.catalogs().await?;
    if catalogs.is_empty() {
        println!("No catalogs published.");
        return Ok(());
    }

    println!("{:<12} ID", "YEAR");
    for catalog in catalogs {
        println!("{:<12} {}", catalog.year, catalog.id);
    }
    Ok(())
}

async fn cmd_programs(config_path: Option<&Path>, catalog: &str) -> Result<()> {
    let config = resolve_config(config_path)?;
    let client = build_client(&config)?;

    let ids = client.program_ids(catalog).await?;
    for id in &ids {
        println!("{id}");
    }
    eprintln!(
        "{} {} program(s) in catalog {catalog}",
        ids.len(),
        client.settings().degree_type
    );
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = resolve_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(
                style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
            );
        }
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }

    fn abandon(&self) {
        self.spinner.abandon();
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn catalog_started(&self, year: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Catalog [{current}/{total}] {year}"));
    }

    fn batch_assembled(&self, year: &str, programs: usize, ids_done: usize, ids_total: usize) {
        self.spinner.set_message(format!(
            "Catalog {year}: [{ids_done}/{ids_total}] ids fetched, {programs} programs"
        ));
    }

    fn done(&self, _result: &ScrapeResult) {
        self.spinner.finish_and_clear();
    }
}
