//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use skillmap_core::{Engine, ExtractionReport, ProgressReporter, SilentProgress};
use skillmap_shared::{AppConfig, init_config, load_config, load_config_from};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// skillmap: turn assessment reports into age-referenced skill records.
#[derive(Parser)]
#[command(
    name = "skillmap",
    version,
    about = "Extract skill records from BDI-3 assessment-report page dumps.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.skillmap/skillmap.toml.
    #[arg(long, global = true, env = "SKILLMAP_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    Json,
    Text,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Extract skills from a page dump (.json or form-feed separated text).
    Extract {
        /// Page dump to read.
        file: PathBuf,

        /// Output format.
        #[arg(short, long, default_value = "json")]
        format: OutputFormat,

        /// Write the output to this file instead of stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// First page index of the item-level range (0-based).
        #[arg(long)]
        first_page: Option<usize>,

        /// End of the item-level range (exclusive).
        #[arg(long)]
        end_page: Option<usize>,

        /// Reference dictionary TOML file.
        #[arg(long)]
        reference: Option<PathBuf>,
    },

    /// Reference dictionary operations.
    Reference {
        #[command(subcommand)]
        action: ReferenceAction,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Reference subcommands.
#[derive(Subcommand)]
pub(crate) enum ReferenceAction {
    /// Load and validate a reference dictionary, then print a summary.
    Check {
        /// Reference dictionary TOML file (defaults to the configured one).
        #[arg(long)]
        reference: Option<PathBuf>,
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

/// Initialize tracing based on CLI flags. Logs go to stderr.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "skillmap=info",
        1 => "skillmap=debug",
        _ => "skillmap=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
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
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config;
    match cli.command {
        Command::Extract {
            file,
            format,
            out,
            first_page,
            end_page,
            reference,
        } => {
            let mut config = resolve_config(config_path.as_deref())?;
            apply_overrides(&mut config, first_page, end_page, reference.as_deref());
            cmd_extract(&config, &file, format, out.as_deref())
        }
        Command::Reference { action } => match action {
            ReferenceAction::Check { reference } => {
                let mut config = resolve_config(config_path.as_deref())?;
                apply_overrides(&mut config, None, None, reference.as_deref());
                cmd_reference_check(&config)
            }
        },
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(config_path.as_deref()),
        },
    }
}

/// Load the config file named by `--config`, or the default one.
fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    Ok(config)
}

/// CLI flags override file values.
fn apply_overrides(
    config: &mut AppConfig,
    first_page: Option<usize>,
    end_page: Option<usize>,
    reference: Option<&Path>,
) {
    if let Some(first) = first_page {
        config.extraction.first_page = first;
    }
    if let Some(end) = end_page {
        config.extraction.end_page = end;
    }
    if let Some(path) = reference {
        config.matching.reference_path = Some(path.display().to_string());
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_extract(
    config: &AppConfig,
    file: &Path,
    format: OutputFormat,
    out: Option<&Path>,
) -> Result<()> {
    let engine = Engine::from_config(config)?;
    info!(file = %file.display(), reference = engine.reference().version(), "extracting");

    // Spinner only when stdout is free of the report.
    let report = if out.is_some() {
        let reporter = CliProgress::new();
        let result = engine.run_path(file, &reporter);
        reporter.spinner.finish_and_clear();
        result?
    } else {
        engine.run_path(file, &SilentProgress)?
    };

    let rendered = match format {
        OutputFormat::Json => skillmap_core::to_json(&report)?,
        OutputFormat::Text => skillmap_core::render_text(&report, engine.reference().age_order()),
    };

    match out {
        Some(path) => {
            let written = skillmap_core::write_atomic(path, &rendered)?;
            print_summary(&report);
            println!("  Output:    {}", written.path.display());
            println!("  SHA-256:   {}", written.sha256);
            println!();
        }
        None => print!("{rendered}"),
    }

    Ok(())
}

fn print_summary(report: &ExtractionReport) {
    let diag = &report.diagnostics;
    println!();
    println!("  Extraction complete");
    println!("  Run:       {}", report.run_id);
    println!("  Source:    {}", report.source);
    println!("  Reference: {}", report.reference_version);
    println!(
        "  Skills:    {} ({} from tables, {} from text)",
        report.results.len(),
        diag.records_from_tables,
        diag.records_from_text
    );
    println!("  Dropped:   {}", diag.dropped_total());
    println!("  Unmatched: {}", diag.unique_unmatched().len());
    println!("  Time:      {}ms", report.elapsed_ms);
}

fn cmd_reference_check(config: &AppConfig) -> Result<()> {
    let engine = Engine::from_config(config)?;
    let reference = engine.reference();

    println!("Reference dictionary OK");
    println!("  Version: {}", reference.version());
    println!("  Entries: {}", reference.len());
    for (domain, count) in reference.domain_counts() {
        println!("    {:<18} {count}", domain.as_str());
    }
    let ungrouped = reference.entries().iter().filter(|e| e.domain.is_none()).count();
    if ungrouped > 0 {
        println!("    {:<18} {ungrouped}", "(no domain)");
    }
    println!("  Age order: {}", reference.age_order().labels().join(", "));
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(path: Option<&Path>) -> Result<()> {
    let config = resolve_config(path)?;
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
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn page_processed(&self, index: usize, records_added: usize) {
        self.spinner
            .set_message(format!("Page {} ({records_added} skills)", index + 1));
    }

    fn done(&self, report: &ExtractionReport) {
        self.spinner
            .set_message(format!("Extracted {} skills", report.results.len()));
    }
}
