use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use aitools_install::config::Config;
use aitools_install::exec::ShellExecutor;
use aitools_install::installer::{Action, InstallOptions, Installer};
use aitools_install::preflight::WhichResolver;
use aitools_install::report::Reporter;
use aitools_install::signal;

mod cli;

use cli::Cli;
use cli::commands::Commands;

fn setup_logging(config: &Config) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(env!("CARGO_PKG_NAME"))
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join(format!("{}.log", env!("CARGO_PKG_NAME")));

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    let level = config.log_level.as_deref().unwrap_or("info");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

/// Run the selected command and return the process exit status
async fn run_application(cli: &Cli, config: Config) -> Result<i32> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    // Listen before anything is printed so an early Ctrl-C is not lost
    let interrupted = signal::interrupt().context("Failed to install Ctrl-C handler")?;

    let options = InstallOptions {
        dry_run: cli.dry_run,
        verbose: cli.verbose,
        only: cli.only.clone(),
        skip: cli.skip.clone(),
    };
    let mut installer = Installer::new(
        config,
        Arc::new(ShellExecutor::new()),
        WhichResolver,
        Reporter::stdout(),
    )
    .with_options(options);

    let action = match &cli.command {
        None => Action::Install,
        Some(Commands::List { json }) => Action::List { json: *json },
        Some(Commands::Check) => Action::Check,
    };

    Ok(installer.execute(action, interrupted).await?)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    // Setup logging once the configured level is known
    setup_logging(&config).context("Failed to setup logging")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    let code = run_application(&cli, config).await.context("Application failed")?;
    if code != 0 {
        std::process::exit(code);
    }

    Ok(())
}
