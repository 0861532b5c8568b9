mod codec;
mod commands;
mod config;
mod context;
mod error;
mod output;
mod question;
mod secrets;
mod services;
mod table;
mod traits;

use clap::{Parser, Subcommand};
use commands::{ActivateCommand, GetCommand, ListCommand, UpdateCommand, ValidateCommand, report};
use config::{FileConfig, Overrides, Settings};
use context::Context;
use traits::{Output, TerminalOutput};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "isvc")]
#[command(about = "Configure and activate integrated services on a cluster", long_about = None)]
#[command(version)]
struct Cli {
    /// Backend API endpoint
    #[arg(long, global = true, env = "ISVC_ENDPOINT")]
    endpoint: Option<String>,

    /// Bearer token for the backend API
    #[arg(long, global = true, env = "ISVC_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Organization owning the cluster
    #[arg(long, global = true, env = "ISVC_ORG")]
    organization: Option<String>,

    /// Cluster to configure
    #[arg(long, global = true, env = "ISVC_CLUSTER")]
    cluster: Option<String>,

    /// Config file (defaults to ~/.isvc/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print debug diagnostics
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available integrated services
    List,

    /// Activate an integrated service
    Activate {
        /// Service kind (e.g. monitoring, logging)
        service: String,

        /// Read the specification from a JSON or YAML file instead of asking
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Do not ask for confirmation before sending
        #[arg(short, long)]
        yes: bool,
    },

    /// Update the configuration of an active integrated service
    Update {
        /// Service kind (e.g. monitoring, logging)
        service: String,

        /// Read the specification from a JSON or YAML file instead of asking
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Do not ask for confirmation before sending
        #[arg(short, long)]
        yes: bool,
    },

    /// Show the state of an integrated service
    Get {
        /// Service kind (e.g. monitoring, logging)
        service: String,
    },

    /// Validate a specification file without contacting the backend
    Validate {
        /// Service kind (e.g. monitoring, logging)
        service: String,

        /// Specification file (JSON or YAML)
        #[arg(short, long)]
        file: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("ISVC_LOG")
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let file = match FileConfig::load(cli.config.as_deref()) {
        Ok(file) => file,
        Err(e) => {
            TerminalOutput.error(&format!("{:#}", e));
            return ExitCode::FAILURE;
        }
    };
    let settings = Settings::resolve(
        Overrides {
            endpoint: cli.endpoint,
            token: cli.token,
            organization: cli.organization,
            cluster: cli.cluster,
        },
        file,
    );
    let ctx = Context::new(settings);

    report(&ctx, |ctx| match cli.command {
        Commands::List => ListCommand::execute(ctx),
        Commands::Activate { service, file, yes } => {
            ActivateCommand::execute(ctx, &service, file.as_deref(), yes)
        }
        Commands::Update { service, file, yes } => {
            UpdateCommand::execute(ctx, &service, file.as_deref(), yes)
        }
        Commands::Get { service } => GetCommand::execute(ctx, &service),
        Commands::Validate { service, file } => ValidateCommand::execute(ctx, &service, &file),
    })
}
