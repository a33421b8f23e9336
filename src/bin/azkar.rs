use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use azkar_content::app::App;
use azkar_content::baseline;
use azkar_content::config::{ConfigLoader, ResolvedConfig};
use azkar_content::error::AzkarError;
use azkar_content::output::{ConsoleOutput, JsonOutput, LookupResult, OutputMode, summarize};
use azkar_content::source::HttpSourceClient;
use azkar_content::store::FileSnapshotStore;

#[derive(Parser)]
#[command(name = "azkar")]
#[command(about = "Load, cache and browse remembrance (adhkar) content")]
#[command(version, author)]
struct Cli {
    #[arg(long, global = true)]
    non_interactive: bool,

    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Load content (snapshot, network, or bundled baseline)")]
    Load,
    #[command(about = "Drop the snapshot and fetch content again")]
    Refresh,
    #[command(about = "Drop the persisted snapshot")]
    Invalidate,
    #[command(about = "List categories and entry counts")]
    Categories,
    #[command(about = "Show the entries of one category")]
    Show(ShowArgs),
}

#[derive(Args)]
struct ShowArgs {
    category: String,
}

type CliApp = App<FileSnapshotStore, HttpSourceClient>;

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(err) = report.downcast_ref::<AzkarError>() {
            return ExitCode::from(map_exit_code(err));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &AzkarError) -> u8 {
    match error {
        AzkarError::ConfigRead(_)
        | AzkarError::ConfigParse(_)
        | AzkarError::InvalidSource(_) => 2,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_mode = if cli.non_interactive {
        OutputMode::NonInteractive
    } else {
        OutputMode::Interactive
    };

    let config = ConfigLoader::resolve(cli.config.as_deref())?;
    let app = build_app(&config)?;

    match cli.command.unwrap_or(Commands::Load) {
        Commands::Load => run_load(&app, output_mode, false),
        Commands::Refresh => run_load(&app, output_mode, true),
        Commands::Invalidate => run_invalidate(&app, output_mode),
        Commands::Categories => run_categories(&app, output_mode),
        Commands::Show(args) => run_show(&app, &args.category, output_mode),
    }
}

fn build_app(config: &ResolvedConfig) -> miette::Result<CliApp> {
    let store = match &config.snapshot_path {
        Some(path) => FileSnapshotStore::new_with_path(path.clone()),
        None => FileSnapshotStore::new()?,
    };
    let client = HttpSourceClient::new(config.timeout)?;
    tracing::debug!(
        snapshot = %store.path(),
        sources = config.sources.len(),
        "content pipeline configured"
    );
    Ok(App::new(baseline::bundled(), store, client, config.sources.clone())
        .with_freshness(config.freshness))
}

fn run_load(app: &CliApp, output_mode: OutputMode, refresh: bool) -> miette::Result<()> {
    match output_mode {
        OutputMode::NonInteractive => {
            let result = if refresh {
                app.refresh(&JsonOutput)
            } else {
                app.acquire(&JsonOutput)
            };
            JsonOutput::print_acquisition(&result).into_diagnostic()
        }
        OutputMode::Interactive => {
            let result = if refresh {
                app.refresh(&ConsoleOutput)
            } else {
                app.acquire(&ConsoleOutput)
            };
            ConsoleOutput::print_summary(&result);
            Ok(())
        }
    }
}

fn run_invalidate(app: &CliApp, output_mode: OutputMode) -> miette::Result<()> {
    match output_mode {
        OutputMode::NonInteractive => {
            let result = app.invalidate(&JsonOutput);
            JsonOutput::print_clear(&result).into_diagnostic()
        }
        OutputMode::Interactive => {
            let result = app.invalidate(&ConsoleOutput);
            ConsoleOutput::print_clear(&result);
            Ok(())
        }
    }
}

fn run_categories(app: &CliApp, output_mode: OutputMode) -> miette::Result<()> {
    match output_mode {
        OutputMode::NonInteractive => {
            let result = app.acquire(&JsonOutput);
            JsonOutput::print_categories(&result.origin, &summarize(&result)).into_diagnostic()
        }
        OutputMode::Interactive => {
            let result = app.acquire(&ConsoleOutput);
            ConsoleOutput::print_summary(&result);
            Ok(())
        }
    }
}

fn run_show(app: &CliApp, category: &str, output_mode: OutputMode) -> miette::Result<()> {
    let dataset = match output_mode {
        OutputMode::NonInteractive => app.acquire(&JsonOutput),
        OutputMode::Interactive => app.acquire(&ConsoleOutput),
    }
    .into_dataset();
    let entries = dataset.entries_for(category);
    let result = LookupResult {
        requested: category,
        available: entries.is_some(),
        entries: entries.unwrap_or_default(),
    };
    match output_mode {
        OutputMode::NonInteractive => JsonOutput::print_lookup(&result).into_diagnostic(),
        OutputMode::Interactive => {
            ConsoleOutput::print_lookup(&result);
            Ok(())
        }
    }
}
