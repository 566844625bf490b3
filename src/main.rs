//! mcapi command line
//!
//! Sends one signed command to a game server's control API and prints the
//! result as JSON.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use mcapi::{
    network::config::{DEFAULT_HOST, DEFAULT_PORT},
    CallError, ClientConfig, RemoteCommandClient, VERSION,
};

/// Run a command on a game server through its control API.
#[derive(Debug, Parser)]
#[command(name = "mcapi", version, about)]
struct Cli {
    /// Server host.
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    /// Control API port.
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// API user name.
    #[arg(short, long, env = "MCAPI_USERNAME")]
    username: String,

    /// API password.
    #[arg(short, long, env = "MCAPI_PASSWORD", hide_env_values = true)]
    password: String,

    /// Per-call timeout in seconds.
    #[arg(long, default_value_t = 2.0)]
    timeout: f64,

    /// Log request details to stderr.
    #[arg(short, long)]
    verbose: bool,

    /// Remote command name, e.g. `players.online.names`.
    command: String,

    /// Positional arguments. Parsed as JSON when possible, else sent as strings.
    args: Vec<String>,
}

/// Interpret a CLI argument as a JSON value, falling back to a string.
fn parse_argument(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn init_tracing(verbose: bool) -> Result<()> {
    let default_level = if verbose || cfg!(feature = "debug-tracing") {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")
}

fn build_client(cli: &Cli) -> Result<RemoteCommandClient> {
    let timeout = Duration::try_from_secs_f64(cli.timeout)
        .with_context(|| format!("invalid timeout: {}", cli.timeout))?;

    let config = ClientConfig::new(cli.username.as_str(), cli.password.as_str())
        .with_host(cli.host.as_str())
        .with_port(cli.port)
        .with_timeout(timeout);

    RemoteCommandClient::new(config).context("invalid configuration")
}

async fn run(client: &RemoteCommandClient, cli: &Cli) -> Result<Value, CallError> {
    let arguments: Vec<Value> = cli.args.iter().map(String::as_str).map(parse_argument).collect();
    client.call(&cli.command, arguments).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.verbose) {
        eprintln!("{:#}", e);
    }

    debug!("mcapi v{}", VERSION);
    debug!(host = %cli.host, port = cli.port, command = %cli.command, "dispatching call");

    let client = match build_client(&cli) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return ExitCode::from(2);
        }
    };

    match run(&client, &cli).await {
        Ok(value) => {
            match serde_json::to_string_pretty(&value) {
                Ok(text) => println!("{}", text),
                Err(_) => println!("{}", value),
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            match e.code() {
                Some(code) => eprintln!("error ({}): {}", code, e),
                None => eprintln!("error: {}", e),
            }
            ExitCode::FAILURE
        }
    }
}
