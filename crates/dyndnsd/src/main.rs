// # dyndnsd - Dynamic-DNS reconciliation daemon
//
// Thin integration layer: reads configuration from environment variables,
// wires the Cloudflare client into the HTTP router, and serves until a
// shutdown signal arrives. All reconciliation logic lives in dyndns-core.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// - `DYNDNS_LISTEN_ADDR`: Socket address to bind (default 0.0.0.0:8080)
// - `DYNDNS_API_TOKEN`: Cloudflare API token with Zone:DNS:Edit permissions
// - `DYNDNS_AUTH_USER`: Basic-auth username callers must present
// - `DYNDNS_AUTH_PASS`: Basic-auth password callers must present
// - `DYNDNS_LOG_LEVEL`: trace|debug|info|warn|error (default info)
//
// ## Example
//
// ```bash
// export DYNDNS_API_TOKEN=your_token
// export DYNDNS_AUTH_USER=ddns
// export DYNDNS_AUTH_PASS=s3cret
//
// dyndnsd
// ```

mod auth;
mod query;
mod server;

use std::env;
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use dyndns_provider_cloudflare::CloudflareClient;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DaemonExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DaemonExitCode> for ExitCode {
    fn from(code: DaemonExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    listen_addr: SocketAddr,
    api_token: String,
    auth_user: String,
    auth_pass: String,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        let listen_addr = env::var("DYNDNS_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("DYNDNS_LISTEN_ADDR is not a valid socket address: {e}"))?;

        Ok(Self {
            listen_addr,
            api_token: env::var("DYNDNS_API_TOKEN").unwrap_or_default(),
            auth_user: env::var("DYNDNS_AUTH_USER").unwrap_or_default(),
            auth_pass: env::var("DYNDNS_AUTH_PASS").unwrap_or_default(),
            log_level: env::var("DYNDNS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.api_token.is_empty() {
            anyhow::bail!(
                "DYNDNS_API_TOKEN is required. \
                Set it via: export DYNDNS_API_TOKEN=your_token"
            );
        }

        // Cloudflare API tokens are typically 40 characters alphanumeric
        if self.api_token.len() < 20 {
            anyhow::bail!(
                "DYNDNS_API_TOKEN appears too short ({} chars). \
                Cloudflare tokens are typically 40 characters. \
                Verify your token is correct.",
                self.api_token.len()
            );
        }

        // Check for obvious placeholder tokens (common mistake)
        let token_lower = self.api_token.to_lowercase();
        if token_lower.contains("your_token")
            || token_lower.contains("replace_me")
            || token_lower.contains("example")
            || token_lower == "token"
        {
            anyhow::bail!(
                "DYNDNS_API_TOKEN appears to be a placeholder. \
                Use an actual API token from your DNS provider."
            );
        }

        if self.auth_user.is_empty() || self.auth_pass.is_empty() {
            anyhow::bail!(
                "DYNDNS_AUTH_USER and DYNDNS_AUTH_PASS are required. \
                Callers authenticate with these via HTTP basic auth."
            );
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "DYNDNS_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return DaemonExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {e}");
        return DaemonExitCode::ConfigError.into();
    }

    // Initialize tracing
    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {e}");
        return DaemonExitCode::ConfigError.into();
    }

    info!("Starting dyndnsd");

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {e}");
            return DaemonExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_server(config).await {
            error!("Daemon error: {e}");
            DaemonExitCode::RuntimeError
        } else {
            DaemonExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Run the HTTP endpoint until a shutdown signal arrives
async fn run_server(config: Config) -> Result<()> {
    let listen_addr = config.listen_addr;

    let client = CloudflareClient::new(config.api_token)?;
    let state = server::AppState {
        credentials: auth::Credentials {
            user: config.auth_user,
            pass: config.auth_pass,
        },
        store: Arc::new(client),
    };

    let app = server::router(state);
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    info!("Listening on {listen_addr}");

    let shutdown = async {
        match wait_for_shutdown().await {
            Ok(sig) => info!("Received shutdown signal: {sig}"),
            Err(e) => error!("Shutdown signal error: {e}"),
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {e}"))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {e}"))?;

    let signal = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };

    Ok(signal)
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {e}"))?;
    Ok("SIGINT")
}
