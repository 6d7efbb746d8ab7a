//! Solar CRM: CLI server
//!
//! ```sh
//! # Run with default config (~/.config/solar-crm/config.toml)
//! solar-crm
//!
//! # Custom config path
//! solar-crm --config /etc/solar-crm/config.toml
//!
//! # Override the port
//! solar-crm --port 8080
//!
//! # Validate config without starting
//! solar-crm --check
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use solar_crm::config::{AppConfig, CONFIG_PATH_ENV};
use solar_crm::infrastructure::database::redact_url;
use solar_crm::server::{init_tracing, ServerHandle, ServerOptions};

/// Solar CRM: customer management and solar-potential estimation API.
#[derive(Parser, Debug)]
#[command(
    name = "solar-crm",
    version,
    about = "Customer management and solar-potential estimation API",
    long_about = "Solar CRM REST API server.\n\n\
                  Default config: ~/.config/solar-crm/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = CONFIG_PATH_ENV)]
    config: Option<PathBuf>,

    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Skip creating the default admin user.
    #[arg(long)]
    no_admin: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(solar_crm::default_config_path);

    let mut config = match AppConfig::load(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            // A broken file is fatal; only a missing one falls back to defaults
            init_tracing("info", Default::default());
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    init_tracing(&config.logging.level, config.logging.format);
    info!("Configuration: {}", config_path.display());

    if let Err(e) = config.validate() {
        error!("{}", e);
        return ExitCode::FAILURE;
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        println!("✅ Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   API address : {}", config.listen_addr());
        println!("   Database    : {}", redact_url(&config.database.url));
        println!("   Log level   : {}", config.logging.level);
        return ExitCode::SUCCESS;
    }

    // ── Start server ───────────────────────────────────────────
    let handle = match ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        create_default_admin: !cli.no_admin,
    })
    .await
    {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to start server: {}", e);
            return ExitCode::FAILURE;
        }
    };

    handle.install_signal_handler();
    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    ExitCode::SUCCESS
}
