mod app;
mod error;
mod events;
mod routes;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use inkpress::config::{default_config_path, load_config, validate_config, Config, LogFormat};
use inkpress::logging::init_logging;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use state::AppState;

#[derive(Debug, Parser)]
#[command(
    name = "inkpress-server",
    version,
    about = "Blog generation server with live progress"
)]
struct Cli {
    /// Path to the JSON config file. Defaults to the user config directory.
    #[arg(long, env = "INKPRESS_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on, e.g. 127.0.0.1:8080. Overrides `server.bind`.
    #[arg(long)]
    bind: Option<String>,

    /// Log output format (`pretty` or `json`). Overrides `logging.format`.
    #[arg(long)]
    log_format: Option<LogFormat>,
}

/// Loads the config named on the command line, else the default file if it
/// exists, else built-in defaults.
fn resolve_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => match default_config_path().filter(|p| p.exists()) {
            Some(path) => load_config(&path)?,
            None => Config::default(),
        },
    };

    if let Some(bind) = &cli.bind {
        config.server.bind = bind.clone();
    }
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }

    validate_config(&config)?;
    Ok(config)
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = resolve_config(&cli)?;
    init_logging(&config.logging)?;

    info!("Starting inkpress-server v{}", env!("CARGO_PKG_VERSION"));

    let state = AppState::from_config(&config)?;
    let app = app::router(state, &config.server.cors_origins);

    let addr: SocketAddr = config.server.bind.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("inkpress-server: {}", e);
            ExitCode::FAILURE
        }
    }
}
