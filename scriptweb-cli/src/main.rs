//! scriptweb CLI

use anyhow::Result;
use clap::{Parser, Subcommand};
use scriptweb_config::{load_config, load_or_default, Config, LogFormat};
use scriptweb_server::{fixtures, ScriptWorkflow, Server, ShutdownSignal, SignalHandler};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "scriptweb")]
#[command(about = "Compile and run a Rhai script per page load", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the web application
    Serve {
        /// Path to configuration file (defaults apply when omitted)
        #[arg(short, long, env = "SCRIPTWEB_CONFIG")]
        config: Option<PathBuf>,

        /// Log level (trace, debug, info, warn, error); overrides the config
        #[arg(short, long)]
        log_level: Option<String>,
    },

    /// Run the script workflow once and print the report as JSON
    Run {
        /// Path to configuration file (defaults apply when omitted)
        #[arg(short, long, env = "SCRIPTWEB_CONFIG")]
        config: Option<PathBuf>,

        /// Log level (trace, debug, info, warn, error); overrides the config
        #[arg(short, long)]
        log_level: Option<String>,
    },

    /// Validate configuration file
    Validate {
        /// Path to configuration file
        #[arg(short, long, default_value = "scriptweb.yaml")]
        config: PathBuf,
    },

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config, log_level } => {
            let config = load_or_default(config.as_deref())?;
            init_tracing(&config, log_level.as_deref())?;

            tracing::info!(
                listen = %config.server.listen,
                variant = ?config.script.variant,
                "Configuration loaded"
            );

            let server = Server::new(config)?;

            let shutdown = ShutdownSignal::new();
            tokio::spawn(SignalHandler::new(shutdown.clone()).run());

            server.run(shutdown).await?;
            Ok(())
        }

        Commands::Run { config, log_level } => {
            let config = load_or_default(config.as_deref())?;
            init_tracing(&config, log_level.as_deref())?;

            let workflow = ScriptWorkflow::from_config(&config)?;
            let person = fixtures::person_to_copy();
            tracing::info!(person = %person.full_name(), "Running script workflow");

            let report = workflow.execute(&person).await;
            println!("{}", serde_json::to_string_pretty(&report)?);

            if !report.succeeded() {
                std::process::exit(1);
            }
            Ok(())
        }

        Commands::Validate { config } => {
            tracing_subscriber::fmt().with_target(false).init();

            tracing::info!("Validating configuration: {}", config.display());

            match load_config(&config, true) {
                Ok(cfg) => {
                    tracing::info!("✓ Configuration is valid");
                    tracing::info!("  Listen: {}", cfg.server.listen);
                    tracing::info!("  Script variant: {:?}", cfg.script.variant);
                    tracing::info!("  Imports: {}", cfg.script.imports.join(", "));
                    tracing::info!("  Script timeout: {:?}", cfg.script.timeout);
                    Ok(())
                }
                Err(e) => {
                    tracing::error!("✗ Configuration validation failed: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Version => {
            println!("scriptweb");
            println!("Version: {}", env!("CARGO_PKG_VERSION"));
            println!("Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
            Ok(())
        }
    }
}

fn init_tracing(config: &Config, level_override: Option<&str>) -> Result<()> {
    let logging = &config.observability.logging;
    let filter = match level_override.unwrap_or(&logging.level).to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    };
    let json = logging.format == LogFormat::Json;

    // Logs go to stderr so `scriptweb run` keeps stdout for the report
    tracing_subscriber::registry()
        .with(json.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        }))
        .with((!json).then(|| {
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
        }))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(filter.into())
                .add_directive("hyper=warn".parse()?),
        )
        .init();

    Ok(())
}
