use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use droid_gateway::api::{ApiServer, ApiState};
use droid_gateway::{AdbExecutor, Config};

/// Droidgate - HTTP control gateway for Android devices via adb
#[derive(Parser)]
#[command(name = "droidgate", version, about)]
struct Cli {
    /// Host to bind to
    #[arg(long, env = "DROIDGATE_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to bind to
    #[arg(long, env = "DROIDGATE_PORT", default_value = "8000")]
    port: u16,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to the adb binary
    #[arg(long, env = "DROIDGATE_ADB", default_value = "adb")]
    adb_path: String,

    /// Per-command execution timeout in seconds
    #[arg(long, env = "DROIDGATE_TIMEOUT_SECS", default_value = "30")]
    timeout_secs: u64,

    /// Default swipe/long-press duration in milliseconds
    #[arg(long, env = "DROIDGATE_DURATION_MS", default_value = "300")]
    duration_ms: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info,droid_gateway=info",
        1 => "info,droid_gateway=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config {
        adb_path: cli.adb_path,
        command_timeout: Duration::from_secs(cli.timeout_secs),
        default_duration_ms: cli.duration_ms,
        ..Config::default()
    };

    tracing::info!(
        host = %cli.host,
        port = cli.port,
        adb = %config.adb_path,
        "starting droid gateway"
    );

    // Advisory only: the executor classifies a missing tool per request
    if which::which(&config.adb_path).is_err() {
        tracing::warn!(
            adb = %config.adb_path,
            "adb not found; install Android SDK platform-tools"
        );
    }

    let executor = Arc::new(AdbExecutor::new(
        config.adb_path.clone(),
        config.command_timeout,
    ));
    let state = ApiState::new(executor, config);

    // Initial scan is best-effort; requests refresh on demand
    match state.registry.refresh().await {
        Ok(devices) => tracing::info!(count = devices.len(), "initial device scan"),
        Err(e) => tracing::warn!(error = %e, "initial device scan failed"),
    }

    ApiServer::new(cli.host, cli.port, state).run().await?;

    Ok(())
}
