mod analyzer;
mod config;
mod fetcher;
mod loader;
mod model;
mod normalizer;
mod parser;
mod report;
mod storage;
mod utils;

use analyzer::{Analyzer, AnalyzerImpl};
use clap::Parser as _;
use clap::error::ErrorKind;
use config::{load_config, AppConfig};
use fetcher::HttpFetcher;
use model::{AnalyzeError, AppError};
use parser::CsvRecordParser;
use std::path::{Path, PathBuf};
use storage::SqliteStorage;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: covid-digest [load_data|analyze]";

#[derive(clap::Parser, Debug)]
#[command(name = "covid-digest", version, about = "Load the OWID COVID-19 dataset and report on it")]
struct Cli {
    /// `load_data` to (re)load the dataset, `analyze` to print the report
    mode: Option<String>,

    /// Path to the JSON config file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Extra positional arguments are accepted and ignored
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    rest: Vec<String>,
}

#[derive(Debug)]
enum Action {
    Load(Cli),
    Analyze(Cli),
    Usage,
    Invalid,
}

/// Maps the command line to what `main` should do. Only help and version
/// requests come back as `Err`; any other parse failure is an invalid command.
fn parse_action<I, T>(args: I) -> Result<Action, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            return Err(e);
        }
        Err(_) => return Ok(Action::Invalid),
    };

    Ok(match cli.mode.as_deref() {
        None => Action::Usage,
        Some("load_data") => Action::Load(cli),
        Some("analyze") => Action::Analyze(cli),
        Some(_) => Action::Invalid,
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), AppError> {
    let action = parse_action(std::env::args_os()).unwrap_or_else(|e| e.exit());

    let (cli, load) = match action {
        Action::Load(cli) => (cli, true),
        Action::Analyze(cli) => (cli, false),
        Action::Usage => {
            println!("{}", USAGE);
            return Ok(());
        }
        Action::Invalid => {
            println!("Invalid command. Use 'load_data' or 'analyze'.");
            return Ok(());
        }
    };

    init_logging(cli.verbose);
    if !cli.rest.is_empty() {
        debug!("Ignoring extra arguments: {:?}", cli.rest);
    }

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        error!("Panic occurred: {}", panic_info);
    }));

    let outcome = if load {
        run_load(&cli.config).await
    } else {
        run_analyze(&cli.config)
    };

    outcome.inspect_err(|e| error!("{}", e))
}

/// `RUST_LOG` wins over the verbose flag. Logs go to stderr so stdout carries only the report.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_load(config_path: &Path) -> Result<(), AppError> {
    let config: AppConfig = load_config(config_path)?;
    let fetcher = HttpFetcher::new(&config.user_agent)?;
    let parser = CsvRecordParser::new();

    info!("Opening store at {}", config.db_path);
    let mut storage = SqliteStorage::new(&config.db_path)?;

    let summary = loader::load_dataset(
        &fetcher,
        &parser,
        &mut storage,
        &config.csv_url,
        config.batch_size,
    )
    .await?;
    info!(
        "Load finished: {} rows parsed, {} inserted in {} batches",
        summary.rows_parsed, summary.rows_inserted, summary.batches
    );
    Ok(())
}

fn run_analyze(config_path: &Path) -> Result<(), AppError> {
    let config = load_config(config_path)?;

    info!("Opening store at {}", config.db_path);
    let storage = SqliteStorage::new(&config.db_path)?;

    let result = AnalyzerImpl::new().analyze(&storage)?;
    let lines = report::render(&result);
    report::publish(&lines, Path::new(&config.report_path)).map_err(AnalyzeError::from)?;

    info!("Analysis complete. Results saved to {}", config.report_path);
    Ok(())
}
