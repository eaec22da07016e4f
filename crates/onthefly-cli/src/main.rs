use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use onthefly_client::{ReqwestFetcher, UrlCodec};
use onthefly_core::retry::RetryPolicy;
use onthefly_core::traits::Codec;
use onthefly_core::{ScrapeService, compute_hash};

#[derive(Parser)]
#[command(name = "onthefly", version, about = "Link preview scraper and payload codec")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract preview metadata from a web page
    Scrape {
        /// Target URL to scrape
        #[arg(short, long)]
        url: String,

        /// Allow fetching private and loopback addresses
        #[arg(long, default_value_t = false)]
        allow_private: bool,

        /// Give up after the first failed attempt instead of retrying
        #[arg(long, default_value_t = false)]
        no_retry: bool,
    },

    /// Compress an HTML document into a URL-safe payload
    Encode {
        /// Path to the HTML file (reads stdin if omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Expand a payload back into HTML
    Decode {
        /// The compressed payload
        #[arg(short, long)]
        payload: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Setup tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("onthefly=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scrape {
            url,
            allow_private,
            no_retry,
        } => cmd_scrape(&url, allow_private, no_retry).await?,
        Commands::Encode { file } => cmd_encode(file.as_deref())?,
        Commands::Decode { payload } => cmd_decode(&payload)?,
    }

    Ok(())
}

async fn cmd_scrape(url: &str, allow_private: bool, no_retry: bool) -> Result<()> {
    let mut fetcher = ReqwestFetcher::new().context("Failed to create HTTP client")?;
    if allow_private {
        fetcher = fetcher.allow_private_urls();
    }

    let policy = if no_retry {
        RetryPolicy::none()
    } else {
        RetryPolicy::default()
    };

    tracing::info!("Fetching {}", url);

    let service = ScrapeService::with_policy(fetcher, policy);
    let fields = service.scrape(url).await.map_err(|e| anyhow::anyhow!(e))?;

    println!("{}", serde_json::to_string_pretty(&fields)?);

    Ok(())
}

fn cmd_encode(file: Option<&std::path::Path>) -> Result<()> {
    let html = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    let payload = UrlCodec::new().encode(&html).map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        hash = %&compute_hash(&html)[..8],
        "Compressed {} bytes of HTML into {} payload characters",
        html.len(),
        payload.len()
    );

    println!("{payload}");

    Ok(())
}

fn cmd_decode(payload: &str) -> Result<()> {
    let html = UrlCodec::new().decode(payload).map_err(|e| anyhow::anyhow!(e))?;

    println!("{html}");

    Ok(())
}
