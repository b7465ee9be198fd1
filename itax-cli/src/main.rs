use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use itax_core::{FieldValue, ParseMode, RawFinancialInput, SessionRepository, TaxEngine};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use itax_cli::app;
use itax_cli::config::AppConfig;
use itax_cli::csv_loader;
use itax_cli::report::{AnalyticsReport, OutputFormat, to_json};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Compare Indian income tax under the old and new regimes.
#[derive(Debug, Parser)]
#[command(name = "itax", version)]
struct Cli {
    /// TOML configuration file. Defaults to `itax.toml` when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database backend, overriding configuration.
    #[arg(long, global = true)]
    backend: Option<String>,

    /// Database connection string, overriding configuration.
    /// For SQLite this is a file path (e.g. `itax.db`) or `:memory:`.
    #[arg(long, global = true)]
    db: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute tax under both regimes for one record or a CSV file.
    Compute(ComputeArgs),
    /// List stored session ids, newest first.
    Sessions,
    /// Print a stored session and its conversation log.
    Show { session_id: Uuid },
    /// Summarise stored sessions by selected regime.
    Analytics,
}

#[derive(Debug, Args)]
struct ComputeArgs {
    /// CSV file with one record per row; headers are field names.
    #[arg(long)]
    file: Option<PathBuf>,

    #[command(flatten)]
    fields: FieldArgs,

    /// Reject missing or invalid fields instead of treating them as zero.
    #[arg(long)]
    strict: bool,

    /// Store each computation as a new session.
    #[arg(long)]
    save: bool,
}

/// Amounts are taken as text so intake applies the same rules as for files.
#[derive(Debug, Default, Args)]
struct FieldArgs {
    #[arg(long, allow_hyphen_values = true)]
    gross_salary: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    basic_salary: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    hra_received: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    rent_paid: Option<String>,
    #[arg(long = "deduction-80c", allow_hyphen_values = true)]
    deduction_80c: Option<String>,
    #[arg(long = "deduction-80d", allow_hyphen_values = true)]
    deduction_80d: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    standard_deduction: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    professional_tax: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    tds: Option<String>,
    #[arg(long)]
    selected_regime: Option<String>,
}

impl FieldArgs {
    fn into_raw(self) -> RawFinancialInput {
        [
            ("gross_salary", self.gross_salary),
            ("basic_salary", self.basic_salary),
            ("hra_received", self.hra_received),
            ("rent_paid", self.rent_paid),
            ("deduction_80c", self.deduction_80c),
            ("deduction_80d", self.deduction_80d),
            ("standard_deduction", self.standard_deduction),
            ("professional_tax", self.professional_tax),
            ("tds", self.tds),
            ("selected_regime", self.selected_regime),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field.to_string(), FieldValue::from(v))))
        .collect()
    }
}

// ─── tracing ─────────────────────────────────────────────────────────────────

/// Initialise the tracing subscriber.
///
/// * Honours `RUST_LOG` when set.
/// * Falls back to `info` so normal runs are quiet.
/// * Strips timestamps and target names to keep CLI output clean.
/// * Writes to stderr so `--format json` output stays parseable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

// ─── commands ────────────────────────────────────────────────────────────────

async fn open_repository(config: &AppConfig) -> anyhow::Result<Box<dyn SessionRepository>> {
    debug!("connecting to {} backend", config.database.backend);
    let repo = app::build_registry().create(&config.database).await?;
    Ok(repo)
}

async fn run_compute(
    args: ComputeArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> anyhow::Result<String> {
    let mode = if args.strict {
        ParseMode::Strict
    } else {
        config.parse_mode
    };

    let flags = args.fields.into_raw();
    let records = match args.file {
        Some(path) => {
            if !flags.is_empty() {
                bail!("--file cannot be combined with field flags");
            }
            csv_loader::load_from_file(&path)?
        }
        None => vec![flags],
    };
    debug!(records = records.len(), %mode, "computing");

    let repo = if args.save {
        if config.database.connection_string == ":memory:" {
            warn!("saving to an in-memory database; sessions will not outlive this run");
        }
        Some(open_repository(config).await?)
    } else {
        None
    };

    let reports =
        app::compute_records(&TaxEngine::new(), &records, mode, repo.as_deref()).await?;
    app::render_all(&reports, format)
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(backend) = cli.backend {
        config.database.backend = backend;
    }
    if let Some(db) = cli.db {
        config.database.connection_string = db;
    }

    let output = match cli.command {
        Command::Compute(args) => run_compute(args, &config, cli.format).await?,
        Command::Sessions => {
            let repo = open_repository(&config).await?;
            let ids = app::session_ids(&*repo).await?;
            match cli.format {
                OutputFormat::Json => to_json(&ids)?,
                OutputFormat::Table if ids.is_empty() => "No sessions stored.".to_string(),
                OutputFormat::Table => ids
                    .iter()
                    .map(Uuid::to_string)
                    .collect::<Vec<_>>()
                    .join("\n"),
            }
        }
        Command::Show { session_id } => {
            let repo = open_repository(&config).await?;
            let report = app::session_report(&*repo, session_id).await?;
            app::render(&report, cli.format)?
        }
        Command::Analytics => {
            let repo = open_repository(&config).await?;
            let analytics = app::analytics(&*repo).await?;
            match cli.format {
                OutputFormat::Json => to_json(&analytics)?,
                OutputFormat::Table => AnalyticsReport(&analytics).to_string(),
            }
        }
    };

    println!("{output}");
    Ok(())
}
