/*
[INPUT]:  CLI arguments, optional YAML configuration file, HAPI_* environment
[OUTPUT]: Device listings and provisioning status on stdout
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, subcommands or startup flow
*/

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hapi_cli::{device_status, list_devices, CliConfig, DeviceFilter, ListOptions};

#[derive(Parser, Debug)]
#[command(name = "hapi", version, about = "hAPI device reporting tools")]
struct Cli {
    #[arg(long = "config", value_name = "PATH", global = true)]
    config_path: Option<PathBuf>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "warn", global = true)]
    log_level: String,
    #[arg(long = "endpoint", value_name = "URL", global = true)]
    endpoint: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report devices, optionally filtered by type, model or host
    List {
        /// Show only hosts whose type contains this
        #[arg(short = 't', long = "type", value_name = "TYPE")]
        device_type: Option<String>,
        /// Show only hosts whose model contains this
        #[arg(short = 'm', long = "model", value_name = "MODEL")]
        model: Option<String>,
        /// Show only hosts whose label contains this
        #[arg(short = 'n', long = "host", value_name = "HOST")]
        host: Option<String>,
        /// Show invocation status for VoxCLOUD hosts
        #[arg(short = 's', long = "show-status")]
        show_status: bool,
        /// Show all details about devices
        #[arg(short = 'v', long = "verbose")]
        verbose: bool,
    },
    /// Show the instantiation status of one or more VMs by label
    Status {
        #[arg(required = true, value_name = "LABEL")]
        labels: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    let mut config = load_config(args.config_path.as_ref())?
        .with_env_overrides(|name| std::env::var(name).ok());
    if let Some(endpoint) = args.endpoint {
        config.endpoint = Some(endpoint);
    }
    info!(endpoint = ?config.endpoint, "configuration loaded");

    let client = config.connect().await?;
    let mut stdout = std::io::stdout().lock();

    match args.command {
        Command::List {
            device_type,
            model,
            host,
            show_status,
            verbose,
        } => {
            let options = ListOptions {
                filter: DeviceFilter {
                    device_type,
                    model,
                    host,
                },
                show_status,
                verbose,
            };
            list_devices(&client, &options, &mut stdout).await?;
        }
        Command::Status { labels } => {
            let failures = device_status(&client, &labels, &mut stdout).await?;
            info!(labels = labels.len(), failures, "status report complete");
        }
    }

    Ok(())
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<CliConfig> {
    match path {
        Some(path) => CliConfig::from_file(path).context("load config"),
        None => Ok(CliConfig::default()),
    }
}
