//! IPAM Console
//!
//! Serves the IPAM web UI, proxies its API calls to the IPAM backend, and
//! offers a few read-only commands straight from the terminal.

use clap::{Parser, Subcommand};
use ipam_shared::ApiVersion;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use uuid::Uuid;

use ipam_console::cli::{self, BackendClient, OutputFormat};
use ipam_console::server::{self, AppState};

#[derive(Parser, Debug)]
#[command(name = "ipam")]
#[command(version)]
#[command(about = "Web console for the IPAM service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Port for the web UI
    #[arg(short, long, default_value = "8080", env = "IPAM_PORT", global = true)]
    port: u16,

    /// IPAM backend base URL
    #[arg(
        long,
        default_value = "http://127.0.0.1:3000",
        env = "IPAM_BACKEND_URL",
        global = true
    )]
    backend: String,

    /// Backend route layout: `legacy` (/api) or `v1` (/api/v1)
    #[arg(long, default_value = "legacy", env = "IPAM_API_VERSION", global = true)]
    api_version: ApiVersion,

    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the web UI and proxy /api to the backend (default)
    Serve,
    /// List networks
    Networks {
        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Ping every device of a network, one after the other
    Walk {
        /// Network ID
        network_id: Uuid,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Some(Commands::Serve) | None => serve(&cli).await?,
        Some(Commands::Networks { format }) => {
            let client = BackendClient::new(&cli.backend, cli.api_version);
            cli::list_networks(&client, format).await?;
        }
        Some(Commands::Walk { network_id }) => {
            let client = BackendClient::new(&cli.backend, cli.api_version);
            cli::run_walk(&client, network_id).await?;
        }
    }

    Ok(())
}

async fn serve(cli: &Cli) -> anyhow::Result<()> {
    info!("Starting IPAM console...");
    info!("Backend: {} ({} routes)", cli.backend, cli.api_version);

    let state = AppState::new(&cli.backend, cli.api_version);
    let server_handle = server::start_server(cli.port, state).await?;

    info!("");
    info!("   Open http://127.0.0.1:{}", cli.port);
    info!("   Press Ctrl+C to stop");
    info!("");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down...");
        }
        result = server_handle => {
            match result {
                Ok(Err(e)) => tracing::error!("Server error: {}", e),
                Err(e) => tracing::error!("Server task failed: {}", e),
                Ok(Ok(())) => {}
            }
        }
    }

    info!("IPAM console stopped.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_is_the_default() {
        let cli = Cli::try_parse_from(["ipam"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.port, 8080);
        assert_eq!(cli.api_version, ApiVersion::Legacy);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "ipam",
            "networks",
            "--format",
            "json",
            "--api-version",
            "v1",
            "--backend",
            "http://ipam.local",
            "-vv",
        ])
        .unwrap();

        assert!(matches!(
            cli.command,
            Some(Commands::Networks {
                format: OutputFormat::Json
            })
        ));
        assert_eq!(cli.api_version, ApiVersion::V1);
        assert_eq!(cli.backend, "http://ipam.local");
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_walk_requires_a_uuid() {
        assert!(Cli::try_parse_from(["ipam", "walk", "not-a-uuid"]).is_err());
        let id = "6f1c2f7e-3a52-4d2b-9b8e-1f0a9e4c7d10";
        let cli = Cli::try_parse_from(["ipam", "walk", id]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Walk { network_id }) if network_id.to_string() == id));
    }
}
