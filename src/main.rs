use std::fs;
use std::io::{self, Read};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rentsim::api::{SimulatePayload, resolve_payload, run_http_server};
use rentsim::core::simulate;

#[derive(Parser, Debug)]
#[command(
    name = "rentsim",
    about = "Rental investment simulator (cash flow, cap rate, DSCR, post-tax return)"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API.
    Serve {
        #[arg(long, env = "RENTSIM_HOST", default_value = "0.0.0.0")]
        host: IpAddr,
        #[arg(long, env = "RENTSIM_PORT", default_value_t = 8080)]
        port: u16,
    },
    /// Run one simulation from a JSON payload and print the result.
    Simulate {
        #[arg(
            long,
            default_value = "-",
            help = "Path to the JSON payload, or - to read stdin"
        )]
        input: PathBuf,
        #[arg(long, help = "Print the result on a single line")]
        compact: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    match Cli::parse().command {
        Command::Serve { host, port } => {
            run_http_server(SocketAddr::new(host, port))
                .await
                .context("HTTP server failed")?;
        }
        Command::Simulate { input, compact } => {
            let raw = read_payload(&input)?;
            let payload: SimulatePayload =
                serde_json::from_str(&raw).context("invalid simulation JSON payload")?;
            let resolved = resolve_payload(payload)?;
            let result = simulate(&resolved);
            let rendered = if compact {
                serde_json::to_string(&result)?
            } else {
                serde_json::to_string_pretty(&result)?
            };
            println!("{rendered}");
        }
    }

    Ok(())
}

fn read_payload(input: &Path) -> Result<String> {
    if input.as_os_str() == "-" {
        let mut raw = String::new();
        io::stdin()
            .read_to_string(&mut raw)
            .context("failed to read payload from stdin")?;
        return Ok(raw);
    }
    fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))
}
