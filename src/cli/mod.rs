pub mod error;
pub mod init;


use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing::info;

use crate::api::{self, Config, DEFAULT_PORT};
use crate::mcp::NeonMcpServer;
use crate::neon::{DEFAULT_API_HOST, NeonClient, NeonConfig};

pub use error::{CliError, CliResult};

#[derive(Parser, Debug)]
#[command(name = "mcp-server-neon")]
#[command(author, version, about = "MCP server for the Neon API", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register this server in the Claude Desktop configuration
    Init(InitArgs),
    /// Start the MCP server over streamable HTTP
    Start(StartArgs),
}

/// API key taken either positionally or from a flag/environment variable.
#[derive(Args, Debug, Clone, Default)]
pub struct ApiKeyArgs {
    /// Neon API key
    #[arg(value_name = "API_KEY")]
    pub api_key: Option<String>,

    /// Neon API key (alternative to the positional argument)
    #[arg(long = "neon-api-key", env = "NEON_API_KEY", hide_env_values = true)]
    pub neon_api_key: Option<String>,
}

impl ApiKeyArgs {
    /// The positional key wins over the flag. Empty values count as absent.
    pub fn resolve(&self) -> Option<String> {
        self.api_key
            .iter()
            .chain(self.neon_api_key.iter())
            .map(|k| k.trim())
            .find(|k| !k.is_empty())
            .map(str::to_string)
    }
}

#[derive(Args, Debug)]
pub struct InitArgs {
    #[command(flatten)]
    pub key: ApiKeyArgs,

    /// Command the client should launch (defaults to this executable)
    #[arg(long)]
    pub executable_path: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct StartArgs {
    #[command(flatten)]
    pub key: ApiKeyArgs,

    /// Neon API base URL
    #[arg(long, env = "NEON_API_HOST", default_value = DEFAULT_API_HOST)]
    pub api_host: String,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,
}

pub async fn run() -> miette::Result<()> {
    let cli = Cli::parse();
    execute(cli).await?;
    Ok(())
}

pub async fn execute(cli: Cli) -> CliResult<()> {
    match cli.command {
        Commands::Init(args) => run_init(args),
        Commands::Start(args) => start(args).await,
    }
}

fn run_init(args: InitArgs) -> CliResult<()> {
    let api_key = args
        .key
        .resolve()
        .ok_or(CliError::MissingApiKey { command: "init" })?;

    let path = init::handle_init(&api_key, args.executable_path)?;
    println!("Config written to: {}", path.display());
    println!("Restart Claude Desktop to pick up the Neon MCP server.");
    Ok(())
}

/// Build the server for a start invocation without binding anything.
pub fn build_server(args: &StartArgs) -> CliResult<NeonMcpServer> {
    let api_key = args
        .key
        .resolve()
        .ok_or(CliError::MissingApiKey { command: "start" })?;

    let client = NeonClient::new(NeonConfig::new(api_key).with_api_host(&args.api_host))?;
    Ok(NeonMcpServer::try_new(Arc::new(client))?)
}

async fn start(args: StartArgs) -> CliResult<()> {
    let server = build_server(&args)?;

    api::init_tracing();
    info!(api_host = %args.api_host, "starting MCP Server Neon v{}", crate::VERSION);

    let config = Config::default().with_host(args.host).with_port(args.port);
    api::run(config, server).await?;
    Ok(())
}
