//! CLI command definitions for terraform-provider-istiolocal.
//!
//! Each lifecycle command drives one provider operation and prints the JSON
//! response envelope on stdout. JSON arguments accept inline JSON or `@path`.

use std::fs;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use crate::config::{ProviderConfig, DEFAULT_DOCKER_TIMEOUT_SECS, DEFAULT_TYPE_NAME};
use crate::provider::model::{parse_attributes, AttributeMap};
use crate::provider::{Provider, ProviderServer, Response};

/// Terraform provider for local Docker bridge networks.
#[derive(Parser, Debug)]
#[command(name = "terraform-provider-istiolocal")]
#[command(about = "Manage Docker bridge networks as Terraform resources")]
#[command(version)]
#[command(
    long_about = "terraform-provider-istiolocal manages Docker bridge networks.\n\nResources: <type>_network. Data sources: <type>_networks.\n\nExample usage:\n  terraform-provider-istiolocal create istiolocal_network --plan '{\"name\":\"mesh\",\"subnet\":\"192.168.202.0/24\",\"gateway\":\"192.168.202.1\"}'"
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,

    /// Provider type name used as resource and data source prefix.
    #[arg(long, default_value = DEFAULT_TYPE_NAME, global = true)]
    pub type_name: String,

    /// Timeout in seconds for Docker daemon requests.
    #[arg(
        long,
        env = "ISTIOLOCAL_DOCKER_TIMEOUT",
        default_value_t = DEFAULT_DOCKER_TIMEOUT_SECS,
        global = true
    )]
    pub docker_timeout: u64,
}

/// Available CLI subcommands.
#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Print the provider schema as JSON.
    Schema,

    /// Print provider metadata as JSON.
    Metadata,

    /// Plan a resource change from prior state to proposed configuration.
    Plan(PlanArgs),

    /// Create a resource from planned attributes.
    Create(CreateArgs),

    /// Refresh a resource from its current state.
    Read(StateArgs),

    /// Update a resource (networks cannot change in place; prior state is kept).
    Update(UpdateArgs),

    /// Delete a resource.
    Delete(StateArgs),

    /// Import an existing object by id.
    Import(ImportArgs),

    /// Read a data source.
    #[command(name = "read-data")]
    ReadData(ReadDataArgs),
}

#[derive(Parser, Debug)]
pub struct PlanArgs {
    /// Resource type name.
    #[arg(value_name = "TYPE")]
    pub target: String,

    /// Proposed configuration (JSON or @file).
    #[arg(long)]
    pub proposed: String,

    /// Prior state (JSON or @file). Omit when planning a create.
    #[arg(long)]
    pub prior: Option<String>,
}

#[derive(Parser, Debug)]
pub struct CreateArgs {
    /// Resource type name.
    #[arg(value_name = "TYPE")]
    pub target: String,

    /// Planned attributes (JSON or @file).
    #[arg(long)]
    pub plan: String,
}

#[derive(Parser, Debug)]
pub struct StateArgs {
    /// Resource type name.
    #[arg(value_name = "TYPE")]
    pub target: String,

    /// Current state (JSON or @file).
    #[arg(long)]
    pub state: String,
}

#[derive(Parser, Debug)]
pub struct UpdateArgs {
    /// Resource type name.
    #[arg(value_name = "TYPE")]
    pub target: String,

    /// Prior state (JSON or @file).
    #[arg(long)]
    pub prior: String,

    /// Planned attributes (JSON or @file).
    #[arg(long)]
    pub plan: String,
}

#[derive(Parser, Debug)]
pub struct ImportArgs {
    /// Resource type name.
    #[arg(value_name = "TYPE")]
    pub target: String,

    /// Id of the existing object.
    #[arg(long)]
    pub id: String,
}

#[derive(Parser, Debug)]
pub struct ReadDataArgs {
    /// Data source type name.
    #[arg(value_name = "TYPE")]
    pub target: String,

    /// Data source configuration (JSON or @file).
    #[arg(long)]
    pub config: Option<String>,
}

/// Parse CLI arguments.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Builds the provider configuration from CLI flags.
pub fn provider_config(cli: &Cli) -> ProviderConfig {
    ProviderConfig::new()
        .with_type_name(cli.type_name.clone())
        .with_docker_timeout(Duration::from_secs(cli.docker_timeout))
}

/// Run with already parsed arguments.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    let provider = Provider::new(provider_config(&cli));

    match &cli.command {
        Commands::Schema => return print_json(&provider.schema()),
        Commands::Metadata => return print_json(&provider.metadata()),
        _ => {}
    }

    let response = match provider.configure().await {
        Ok(server) => execute(&server, &cli.command).await?,
        Err(e) => Response {
            diagnostics: e
                .to_diagnostic("Failed to connect to Docker daemon")
                .into(),
            ..Default::default()
        },
    };

    print_json(&response)?;

    if response.has_error() {
        let summary = response
            .diagnostics
            .iter()
            .find(|d| d.is_error())
            .map(|d| d.summary.clone())
            .unwrap_or_default();
        anyhow::bail!("{summary}");
    }

    info!(success = true, "Operation completed");
    Ok(())
}

/// Dispatches one lifecycle command to a configured server.
pub async fn execute(server: &ProviderServer, command: &Commands) -> anyhow::Result<Response> {
    let response = match command {
        Commands::Schema | Commands::Metadata => {
            anyhow::bail!("schema and metadata do not need a configured provider")
        }
        Commands::Plan(args) => {
            let proposed = load_attributes(&args.proposed)?;
            let prior = args.prior.as_deref().map(load_attributes).transpose()?;
            server.plan_resource_change(&args.target, prior.as_ref(), &proposed)
        }
        Commands::Create(args) => {
            let plan = load_attributes(&args.plan)?;
            server.create(&args.target, &plan).await
        }
        Commands::Read(args) => {
            let state = load_attributes(&args.state)?;
            server.read(&args.target, &state).await
        }
        Commands::Update(args) => {
            let prior = load_attributes(&args.prior)?;
            let plan = load_attributes(&args.plan)?;
            server.update(&args.target, &prior, &plan).await
        }
        Commands::Delete(args) => {
            let state = load_attributes(&args.state)?;
            server.delete(&args.target, &state).await
        }
        Commands::Import(args) => server.import_state(&args.target, &args.id).await,
        Commands::ReadData(args) => {
            let config = args
                .config
                .as_deref()
                .map(load_attributes)
                .transpose()?
                .unwrap_or_default();
            server.read_data_source(&args.target, &config).await
        }
    };
    Ok(response)
}

/// Loads an attribute map from inline JSON or `@path`.
pub fn load_attributes(arg: &str) -> anyhow::Result<AttributeMap> {
    let json = match arg.strip_prefix('@') {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?
        }
        None => arg.to_string(),
    };
    parse_attributes(&json).with_context(|| format!("Invalid attribute JSON in '{arg}'"))
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
