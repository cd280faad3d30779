use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, anyhow};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{debug, info};

use estimate_cli::app::{self, EstimateInput};
use estimate_cli::config::{self, AppConfig};
use estimate_cli::{interactive, logging};
use estimate_core::InquiryKind;
use estimate_core::contact::ContactForm;
use estimate_core::gallery::GalleryFilter;
use estimate_core::wizard::EstimateSession;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Construction cost estimator.
///
/// Walks through the five-step estimate wizard, takes contact requests and
/// browses the project gallery. Records are saved to the primary store, or
/// to the local offline store when the primary is unavailable.
#[derive(Debug, Parser)]
#[command(name = "estimator", version)]
struct Cli {
    /// Config file. Defaults to `estimator.toml` in the working directory.
    #[arg(long, env = "ESTIMATOR_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Primary database backend, overriding the config file.
    #[arg(long, global = true)]
    backend: Option<String>,

    /// Primary database connection string.
    /// For SQLite this is a file path (e.g. `estimates.db`) or `:memory:`.
    #[arg(long, global = true)]
    db: Option<String>,

    /// Pause before showing results, in milliseconds.
    #[arg(long, global = true)]
    delay_ms: Option<u64>,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Get a project estimate. Prompts step by step unless --project-type is given.
    Estimate(EstimateArgs),
    /// Send a consultation request or a general message.
    Contact(ContactArgs),
    /// List completed projects.
    Gallery(GalleryArgs),
    /// Copy records saved offline into the primary store.
    Sync,
    /// Show saved estimates and contact requests.
    List,
}

#[derive(Debug, Args)]
struct EstimateArgs {
    #[arg(long)]
    project_type: Option<String>,
    #[arg(long, default_value = "")]
    location: String,
    #[arg(long, default_value = "")]
    square_footage: String,
    #[arg(long)]
    stories: Option<String>,
    /// basic, standard, premium or luxury.
    #[arg(long)]
    construction_type: Option<String>,
    #[arg(long)]
    special_requirements: Option<String>,
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long)]
    company: Option<String>,
    /// immediate, 1-3months, 3-6months or 6months+.
    #[arg(long, default_value = "")]
    timeline: String,
}

impl EstimateArgs {
    /// `None` means ask interactively.
    fn into_input(self) -> Option<EstimateInput> {
        let project_type = self.project_type?;
        Some(EstimateInput {
            project_type,
            location: self.location,
            square_footage: self.square_footage,
            stories: self.stories,
            construction_type: self.construction_type,
            special_requirements: self.special_requirements,
            name: self.name,
            email: self.email,
            phone: self.phone,
            company: self.company,
            timeline: self.timeline,
        })
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormKind {
    Consultation,
    General,
}

#[derive(Debug, Args)]
struct ContactArgs {
    #[arg(long, value_enum, default_value = "general")]
    kind: FormKind,
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long, default_value = "")]
    company: String,
    #[arg(long, default_value = "")]
    project_type: String,
    #[arg(long, default_value = "")]
    message: String,
}

impl From<ContactArgs> for ContactForm {
    fn from(args: ContactArgs) -> Self {
        let kind = match args.kind {
            FormKind::Consultation => InquiryKind::Consultation,
            FormKind::General => InquiryKind::General,
        };
        ContactForm {
            kind,
            name: args.name,
            email: args.email,
            phone: args.phone,
            company: args.company,
            project_type: args.project_type,
            message: args.message,
        }
    }
}

#[derive(Debug, Args)]
struct GalleryArgs {
    /// `all` or a category: commercial, medical, religious, industrial, winery.
    #[arg(long, default_value = "all")]
    category: String,
    /// Number of pages to reveal.
    #[arg(long, default_value_t = 1)]
    pages: usize,
    /// CSV catalog to read instead of the built-in one.
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Show a single project by id.
    #[arg(long)]
    show: Option<String>,
}

// ─── config ──────────────────────────────────────────────────────────────────

fn apply_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(backend) = &cli.backend {
        config.database.backend = backend.clone();
    }
    if let Some(db) = &cli.db {
        config.database.connection_string = db.clone();
    }
    if let Some(delay_ms) = cli.delay_ms {
        config.estimator.processing_delay_ms = delay_ms;
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    logging::init_logging()?;

    let cli = Cli::parse();

    let cwd = std::env::current_dir().context("cannot read the working directory")?;
    let mut config = config::load_or_default(cli.config.as_deref(), &cwd)?;
    apply_overrides(&mut config, &cli);

    let level = if cli.verbose { "debug" } else { config.logging.level.as_str() };
    logging::set_log_level(level)?;
    if let Some(path) = &config.logging.file {
        logging::enable_file_logging(path)?;
    }
    debug!(?config, "configuration loaded");

    let registry = app::build_registry();
    let mut stdout = io::stdout();

    let success = match cli.command {
        Command::Estimate(args) => {
            let store = app::open_store(&registry, &config).await?;
            let mut session = EstimateSession::new(config.session_config());

            match args.into_input() {
                Some(input) => app::run_scripted(&mut session, &input)
                    .await
                    .map_err(|(step, reason)| {
                        anyhow!("step {} ({}): {reason}", step.number(), step.title())
                    })?,
                None => interactive::run_interactive(&mut session, io::stdin().lock(), &mut stdout)
                    .await?,
            }

            app::finish_estimate(&mut session, store.as_ref(), &mut stdout)
                .await?
                .success
        }
        Command::Contact(args) => {
            let store = app::open_store(&registry, &config).await?;
            app::run_contact(&ContactForm::from(args), store.as_ref(), &mut stdout)
                .await?
                .success
        }
        Command::Gallery(args) => {
            let projects = app::load_catalog(args.catalog.as_deref())?;
            match args.show {
                Some(id) => app::show_project(projects, &id, &mut stdout)?,
                None => {
                    let filter = GalleryFilter::parse(&args.category)
                        .ok_or_else(|| anyhow!("unknown category '{}'", args.category))?;
                    app::run_gallery(projects, filter, args.pages, &mut stdout)?;
                }
            }
            true
        }
        Command::Sync => {
            let report = app::run_sync(&registry, &config).await?;
            info!(
                estimates = report.estimates_synced,
                contacts = report.contacts_synced,
                remaining = report.remaining,
                "offline sync finished"
            );
            println!(
                "Synced {} estimates and {} contact requests; {} still pending.",
                report.estimates_synced, report.contacts_synced, report.remaining
            );
            report.is_complete()
        }
        Command::List => {
            let store = app::open_store(&registry, &config).await?;
            app::run_list(store.as_ref(), &mut stdout).await?;
            true
        }
    };

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
