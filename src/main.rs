mod cli;

use clap::Parser;
use clientscore::config::{self, ConfigStore, FileConfigStore};
use clientscore::error::{Result, ScoreError};
use clientscore::evaluate;
use clientscore::extract::{self, Backend};
use clientscore::fetch::{HttpRetriever, SignalCache};
use clientscore::report::{self, OutputFormat};
use clientscore::types::config::Settings;
use clientscore::types::report::Evaluation;
use clientscore::types::signals::Fidelity;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const DEGRADED: i32 = 1;
    pub const INVALID_CONFIG: i32 = 2;
    pub const RUNTIME_FAILURE: i32 = 3;
}

const HTML_EXTENSIONS: [&str; 2] = ["html", "htm"];

fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<i32> {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        cli::Commands::Score(cmd) => {
            let Some(settings) = load_checked(&cmd.config_dir)? else {
                return Ok(exit_code::SUCCESS);
            };
            let backend = backend_of(cmd.backend);
            let mode = match cmd.mode {
                cli::ModeArg::Page => Fidelity::Page,
                cli::ModeArg::Card => Fidelity::Card,
            };

            let evaluations = read_sources(&cmd.path)?
                .into_iter()
                .map(|(source, markup)| {
                    evaluate::evaluate_html(&source, &markup, backend, mode, &settings)
                })
                .collect::<Vec<_>>();
            emit(&evaluations, cmd.format)
        }
        cli::Commands::Fetch(cmd) => {
            let Some(mut settings) = load_checked(&cmd.config_dir)? else {
                return Ok(exit_code::SUCCESS);
            };
            if let Some(timeout) = cmd.timeout {
                settings.retrieval.timeout_secs = timeout;
                settings.validate()?;
            }
            let backend = backend_of(cmd.backend);
            let fallback = match &cmd.fallback_card {
                Some(path) => {
                    let markup = read_file(path)?;
                    Some(Arc::new(extract::extract_html(
                        &markup,
                        backend,
                        Fidelity::Card,
                    )))
                }
                None => None,
            };

            let retriever = Arc::new(HttpRetriever::new(&settings.retrieval)?);
            let runtime = tokio::runtime::Runtime::new()?;
            let evaluations = runtime.block_on(evaluate::evaluate_remote_all(
                cmd.urls,
                Arc::new(SignalCache::new()),
                retriever,
                backend,
                Arc::new(settings),
                fallback,
            ))?;
            emit(&evaluations, cmd.format)
        }
        cli::Commands::Config(cmd) => {
            let mut store = FileConfigStore::new(&cmd.config_dir);
            match cmd.action {
                cli::ConfigAction::Show => {
                    let settings = store.get()?;
                    print!("{}", toml::to_string_pretty(&settings)?);
                    Ok(exit_code::SUCCESS)
                }
                cli::ConfigAction::Validate => {
                    store.get()?.validate()?;
                    println!("configuration is valid");
                    Ok(exit_code::SUCCESS)
                }
                cli::ConfigAction::Reset => {
                    config::reset_to_default(&mut store)?;
                    println!("settings reset to defaults in {}", store.project_file().display());
                    Ok(exit_code::SUCCESS)
                }
                cli::ConfigAction::Enable | cli::ConfigAction::Disable => {
                    let enabled = matches!(cmd.action, cli::ConfigAction::Enable);
                    config::set_enabled(&mut store, enabled)?;
                    println!(
                        "scoring {}",
                        if enabled { "enabled" } else { "disabled" }
                    );
                    Ok(exit_code::SUCCESS)
                }
            }
        }
    }
}

/// Loads and validates settings. `None` means scoring is switched off.
fn load_checked(config_dir: &Path) -> Result<Option<Settings>> {
    let settings = config::load_settings(config_dir)?;
    settings.validate()?;
    if !settings.enabled {
        println!("scoring is disabled; run `clientscore config enable` to turn it back on");
        return Ok(None);
    }
    Ok(Some(settings))
}

fn backend_of(arg: cli::BackendArg) -> Backend {
    match arg {
        cli::BackendArg::Text => Backend::Text,
        cli::BackendArg::Tree => Backend::Tree,
    }
}

fn read_sources(path: &Path) -> Result<Vec<(String, String)>> {
    if path == Path::new("-") {
        let mut markup = String::new();
        std::io::stdin().read_to_string(&mut markup)?;
        return Ok(vec![("<stdin>".to_string(), markup)]);
    }
    if !path.exists() {
        return Err(ScoreError::PathNotFound(path.display().to_string()));
    }
    if path.is_file() {
        return Ok(vec![(path.display().to_string(), read_file(path)?)]);
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| HTML_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        })
        .collect();
    files.sort();
    debug!(count = files.len(), root = %path.display(), "collected html files");

    files
        .into_iter()
        .map(|file| Ok((file.display().to_string(), read_file(&file)?)))
        .collect()
}

fn read_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(ScoreError::PathNotFound(path.display().to_string()));
    }
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn emit(evaluations: &[Evaluation], format: cli::ReportFormat) -> Result<i32> {
    let output_format = match format {
        cli::ReportFormat::Json => OutputFormat::Json,
        cli::ReportFormat::Md => OutputFormat::Md,
    };
    println!("{}", report::render(evaluations, output_format)?);

    if evaluations.iter().any(|evaluation| evaluation.degraded) {
        Ok(exit_code::DEGRADED)
    } else {
        Ok(exit_code::SUCCESS)
    }
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            let code = match e {
                ScoreError::InvalidConfig(_) | ScoreError::ConfigParse(_) => {
                    exit_code::INVALID_CONFIG
                }
                _ => exit_code::RUNTIME_FAILURE,
            };
            std::process::exit(code);
        }
    }
}
