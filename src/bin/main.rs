use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use devtools_mcp::{DEFAULT_MODEL, ServerConfig, create_server};

// rmcp imports for MCP stdio server mode
use rmcp::service::ServiceExt;
use rmcp::transport::stdio;

#[derive(Parser)]
#[command(name = "devtools-mcp")]
#[command(about = "MCP server with developer tools for coding agents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run as an MCP stdio server (for use in mcp.json)
    McpStdio {
        /// API key for the OpenAI-backed architect tool
        #[arg(long, env = "OPENAI_API_KEY")]
        openai_api_key: Option<String>,
        /// Model requested for architect plans
        #[arg(long, default_value = DEFAULT_MODEL)]
        openai_model: String,
    },
    /// Run as an MCP HTTP server
    McpHttp {
        /// Bind address, e.g. 127.0.0.1:3947
        #[arg(long, default_value = "127.0.0.1:3947")]
        bind: String,
        /// API key for the OpenAI-backed architect tool
        #[arg(long, env = "OPENAI_API_KEY")]
        openai_api_key: Option<String>,
        /// Model requested for architect plans
        #[arg(long, default_value = DEFAULT_MODEL)]
        openai_model: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Log to stderr; in stdio mode stdout carries the MCP protocol stream.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("devtools_mcp=info".parse()?)
                .add_directive("rmcp=warn".parse()?),
        )
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::McpStdio {
            openai_api_key,
            openai_model,
        } => {
            info!("Starting MCP stdio server (rmcp)");

            let config = server_config(openai_api_key, openai_model);
            let server = create_server(config)?;

            // Run as an MCP stdio server. DevToolsServer implements ServerHandler.
            let service = server
                .serve(stdio())
                .await
                .inspect_err(|e| tracing::error!("serving error: {:?}", e))?;

            // Block until the MCP session ends.
            service.waiting().await?;
            info!("MCP stdio server session ended");
        }
        Commands::McpHttp {
            bind,
            openai_api_key,
            openai_model,
        } => {
            info!("Starting MCP HTTP server (rmcp) on {}", bind);

            let config = server_config(openai_api_key, openai_model);
            let server = create_server(config)?;

            devtools_mcp::server::start_mcp_http(server, &bind).await?;
        }
    }

    Ok(())
}

/// Build the server configuration from CLI arguments.
fn server_config(openai_api_key: Option<String>, openai_model: String) -> ServerConfig {
    if openai_api_key.is_none() {
        tracing::warn!(
            "OPENAI_API_KEY is not set; architect requests will fail until it is provided"
        );
    }
    ServerConfig::new(openai_api_key.unwrap_or_default(), openai_model)
}
