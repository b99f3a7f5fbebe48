use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use neo4j_core::{Distribution, PlatformKind, ServerError};
use neo4j_tasks::commands::{describe, dispatch, LifecycleCommand};
use neo4j_tasks::config::Config;
use neo4j_tasks::setup::{build_context, create_control};
use neo4j_tasks::telemetry::{init_telemetry, log_startup_info, report_error};
use std::path::PathBuf;
use tracing::{debug, error};

#[derive(Parser)]
#[command(name = "neo4j-tasks")]
#[command(about = "Install and control a local Neo4j server per environment")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "CONFIG_FILE")]
    config: Option<String>,

    /// Environment selecting the install directory and port prefix
    #[arg(short, long = "env", global = true, env = "NEO4J_ENV")]
    environment: Option<String>,

    /// Directory the install directory is created in
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,

    /// Host serving distribution archives
    #[arg(long, global = true)]
    download_url: Option<String>,

    /// Log level override
    #[arg(long, global = true, env = "LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download, extract and configure a distribution
    Install {
        /// Edition to install (default from configuration)
        edition: Option<String>,
        /// Version to install (default from configuration)
        version: Option<String>,
    },
    /// Start the server
    Start,
    /// Stop the server
    Stop,
    /// Restart the server
    Restart,
    /// Stop the server, clear its database and logs, start it again
    #[command(alias = "reset-yes-i-am-sure")]
    Reset,
    /// Show the resolved install directory, port prefix and platform
    Info,
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(config_file) => Config::from_file(config_file)?,
        None => Config::from_env()?,
    };

    // Apply CLI overrides
    if let Some(ref environment) = cli.environment {
        config.environment = Some(environment.clone());
    }

    if let Some(ref base_dir) = cli.base_dir {
        config.install.base_dir = base_dir.clone();
    }

    if let Some(ref download_url) = cli.download_url {
        config.install.download_url = download_url.clone();
    }

    if let Some(ref log_level) = cli.log_level {
        config.logging.level = log_level.clone();
    }

    Ok(config)
}

fn lifecycle_command(command: &Command, config: &Config) -> Option<LifecycleCommand> {
    match command {
        Command::Install { edition, version } => {
            let defaults = config.default_distribution();
            Some(LifecycleCommand::Install(Distribution::new(
                edition.clone().unwrap_or(defaults.edition),
                version.clone().unwrap_or(defaults.version),
            )))
        }
        Command::Start => Some(LifecycleCommand::Start),
        Command::Stop => Some(LifecycleCommand::Stop),
        Command::Restart => Some(LifecycleCommand::Restart),
        Command::Reset => Some(LifecycleCommand::Reset),
        Command::Info => None,
    }
}

/// Exit code for a failed run; configuration problems map to 1
fn exit_code_for(error: &anyhow::Error) -> i32 {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<ServerError>())
        .map(ServerError::exit_code)
        .unwrap_or(1)
}

fn fail(error: anyhow::Error, context: &str) -> ! {
    report_error(&error, context);
    eprintln!("Error: {error:#}");
    std::process::exit(exit_code_for(&error));
}

async fn run(cli: &Cli, config: &Config) -> Result<()> {
    let Some(command) = lifecycle_command(&cli.command, config) else {
        let context = build_context(config)?;
        for line in describe(&context, PlatformKind::current()) {
            println!("{line}");
        }
        return Ok(());
    };

    let control = create_control(config)?;
    println!("{}", command.announcement(control.context()));

    let outcome = dispatch(control.as_ref(), &command).await?;
    println!("{}", outcome.message());

    if let Some(hint) = command.follow_up(control.context(), &outcome) {
        println!("{hint}");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let config = match load_config(&cli).context("Failed to load configuration") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    };

    init_telemetry(&config.logging).context("Failed to initialize telemetry")?;

    // Validate configuration (will exit if invalid)
    if let Err(e) = config.validate() {
        error!(error = %e, "Configuration validation failed");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }

    log_startup_info(&config);

    if let Err(e) = run(&cli, &config).await {
        fail(e, "neo4j-tasks");
    }

    debug!("Done");
    Ok(())
}
