//! LinkedIn post extractor CLI and MCP server
//!
//! `li-post extract <URL>` prints one extraction result; `li-post stdio` and
//! `li-post serve` run the MCP transports.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use linkedin_post_extractor::config::ExtractorConfigBuilder;
use linkedin_post_extractor::handlers::{router, AppState};
use linkedin_post_extractor::{ExtractorConfig, McpServer, PostExtractor};
use tracing_subscriber::EnvFilter;

/// LinkedIn post extractor
#[derive(Parser, Debug)]
#[command(name = "li-post")]
#[command(version)]
#[command(about = "Extract text, links, and images from LinkedIn posts")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    browser: BrowserArgs,
}

#[derive(Args, Debug)]
struct BrowserArgs {
    /// Path to Chrome/Chromium executable
    #[arg(long, global = true)]
    chrome_path: Option<String>,

    /// Disable the Chrome sandbox
    #[arg(long, global = true)]
    no_sandbox: bool,

    /// Show the browser window
    #[arg(long, global = true)]
    headed: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract one post and print the result as JSON
    Extract {
        /// LinkedIn post URL
        url: String,

        /// Write the result to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Serve MCP over stdin/stdout
    Stdio,

    /// Serve MCP over HTTP
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "8000")]
        port: u16,
    },
}

impl BrowserArgs {
    fn apply(&self, config: ExtractorConfig) -> ExtractorConfig {
        let mut builder = ExtractorConfigBuilder::from_config(config);
        if let Some(ref path) = self.chrome_path {
            builder = builder.chrome_path(path.clone());
        }
        if self.no_sandbox {
            builder = builder.sandbox(false);
        }
        if self.headed {
            builder = builder.headless(false);
        }
        builder.build()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.browser.apply(ExtractorConfig::from_env());
    let extractor = PostExtractor::new(&config).context("failed to build extractor")?;

    match cli.command {
        Command::Extract {
            url,
            output,
            compact,
        } => {
            let result = extractor.extract(&url).await;

            let json = if compact {
                serde_json::to_string(&result)?
            } else {
                serde_json::to_string_pretty(&result)?
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, format!("{json}\n"))
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    tracing::info!("Result written to {}", path.display());
                }
                None => println!("{json}"),
            }

            if !result.success {
                eprintln!(
                    "Error: {}",
                    result.error.as_deref().unwrap_or("extraction failed")
                );
                std::process::exit(1);
            }
        }
        Command::Stdio => {
            McpServer::new(extractor).run_stdio().await?;
        }
        Command::Serve { host, port } => {
            let listener = tokio::net::TcpListener::bind((host.as_str(), port))
                .await
                .with_context(|| format!("failed to bind {host}:{port}"))?;
            let addr = listener.local_addr()?;

            tracing::info!("LinkedIn post extractor listening on http://{}", addr);
            axum::serve(listener, router(AppState::new(extractor))).await?;
        }
    }

    Ok(())
}
