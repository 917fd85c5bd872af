use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taiga_bridge::{config::Config, mcp, taiga::TaigaClient};

#[derive(Parser)]
#[command(name = "taiga-bridge")]
#[command(about = "Read-only MCP bridge for the Taiga project-management API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the MCP server via stdio (the default)
    Mcp,
    /// Verify that the configured credentials authenticate
    Check,
}

/// Logs go to stderr: stdout is the MCP protocol channel.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "taiga_bridge=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = Config::from_env()?;

    match cli.command {
        Some(Commands::Check) => {
            let client = TaigaClient::new(config.api_url.clone());
            client
                .authenticate(&config.username, &config.password)
                .await?;
            println!("Authenticated against {} as {}", config.api_url, config.username);
        }
        Some(Commands::Mcp) | None => {
            mcp::run_stdio_server(config).await?;
        }
    }

    Ok(())
}
