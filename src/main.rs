use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use reframe::commands;
use reframe::error_fmt::{AppError, SettingsResultExt};
use reframe::settings::{self, Settings, SETTINGS_FILE};

#[derive(Parser)]
#[command(name = "reframe")]
#[command(about = "Automatic dashboard layout for Power BI report folders")]
struct Cli {
    /// Settings file (defaults to ./reframe.yml when present)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,
    /// Log progress to stderr (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute layouts and print them without modifying anything
    Plan {
        /// Report folder or single page folder (defaults to $INPUT_DIR)
        path: Option<PathBuf>,
        /// Print positions as JSON instead of a table and preview
        #[arg(long)]
        json: bool,
    },
    /// Write a reformatted copy of a report
    Apply {
        /// Source .Report folder (defaults to $INPUT_DIR)
        input: Option<PathBuf>,
        /// Destination folder (defaults to $OUTPUT_REPORT_DIR, then <name>_reformatted.Report)
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Leave the report's base themes untouched
        #[arg(long)]
        no_theme: bool,
    },
}

fn main() {
    // Load .env if present; ignore if missing
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprint!("{}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), default_level))
        }))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn run(cli: Cli) -> Result<(), AppError> {
    let settings_path = cli.config.unwrap_or_else(|| PathBuf::from(SETTINGS_FILE));
    let settings_display = settings_path.display().to_string();
    let mut settings =
        Settings::load_validated(&settings_path).with_settings_path(&settings_display)?;

    match cli.command {
        Commands::Plan { path, json } => {
            let root = settings::resolve_input(path).with_settings_path(&settings_display)?;
            commands::plan(&root, &settings, json)
        }
        Commands::Apply {
            input,
            output,
            no_theme,
        } => {
            let input = settings::resolve_input(input).with_settings_path(&settings_display)?;
            let output = settings::resolve_output(output, &input);
            if no_theme {
                settings.theme.enabled = false;
            }
            commands::apply(&input, &output, &settings).map(|_| ())
        }
    }
}
