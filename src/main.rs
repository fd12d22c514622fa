use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use reqwest::Method;
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use media_probe::{
    FetchOptions, MediaProbe,
    config::Config,
    context::StateStore,
    http::HeaderSet,
};

#[derive(Parser)]
#[command(name = "media-probe")]
#[command(version)]
#[command(about = "Classify media URLs and fetch remote playback configuration")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Format token from URL heuristics, probing the server when needed
    MediaType { url: String },
    /// Format token from the server's declared content type
    Probe { url: String },
    /// Whether the URL host is an IPv4 or IPv6 literal
    HostFamily { url: String },
    /// Whether an HLS playlist is live
    Liveness {
        url: String,
        /// Report the deciding rule and any failure instead of true/false
        #[arg(long)]
        explain: bool,
    },
    /// Fetch a remote configuration document (lenient JSON)
    Config {
        url: String,
        #[command(flatten)]
        request: RequestArgs,
    },
    /// Fetch a page and decode it with a character encoding
    Raw {
        url: String,
        /// Encoding label (defaults to fetch.default_encoding)
        #[arg(short, long)]
        encoding: Option<String>,
        #[command(flatten)]
        request: RequestArgs,
    },
    /// Read a value from the configured context stores
    Lookup { store: String, key: String },
}

#[derive(Args)]
struct RequestArgs {
    /// HTTP method
    #[arg(short = 'X', long, default_value = "GET")]
    method: String,

    /// Request header as NAME:VALUE (repeatable)
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    headers: Vec<(String, String)>,

    /// Request body (JSON, or sent as text when it does not parse)
    #[arg(short, long)]
    body: Option<String>,
}

impl RequestArgs {
    fn into_options(self) -> Result<FetchOptions> {
        let method = Method::from_str(&self.method.to_ascii_uppercase())
            .with_context(|| format!("invalid HTTP method '{}'", self.method))?;

        let mut options = FetchOptions::default()
            .method(method)
            .headers(HeaderSet::from_pairs(self.headers));
        if let Some(body) = self.body {
            options = options.body(serde_json::from_str(&body).unwrap_or(Value::String(body)));
        }
        Ok(options)
    }
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected NAME:VALUE, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty header name in '{raw}'"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_filter = format!("media_probe={}", cli.log_level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match &cli.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::load()?,
    };
    info!("Starting media-probe v{}", env!("CARGO_PKG_VERSION"));

    let probe = MediaProbe::from_config(&config)?;

    match cli.command {
        Command::MediaType { url } => {
            println!("{}", probe.classify_media_type(&url).await);
        }
        Command::Probe { url } => {
            let outcome = probe.probe_content_type(&url).await;
            println!("{}", outcome.format);
            if let Some(failure) = outcome.failure {
                eprintln!("probe failed: {failure}");
            }
        }
        Command::HostFamily { url } => {
            println!("{}", probe.classify_host_family(&url)?);
        }
        Command::Liveness { url, explain } => {
            if explain {
                match probe.check_playlist_liveness(&url).await {
                    Ok(verdict) => println!("{}", serde_json::to_string(&verdict)?),
                    Err(e) => println!("error: {e}"),
                }
            } else {
                println!("{}", probe.classify_playlist_liveness(&url).await);
            }
        }
        Command::Config { url, request } => {
            let payload = probe.fetch_config(&url, request.into_options()?).await?;
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        Command::Raw {
            url,
            encoding,
            request,
        } => {
            let text = probe
                .fetch_raw_text(&url, encoding.as_deref(), request.into_options()?)
                .await?;
            println!("{text}");
        }
        Command::Lookup { store, key } => {
            let store = StateStore::from_str(&store)
                .map_err(|_| anyhow!("unknown store '{store}' (expected setting or play)"))?;
            match probe.context().get(store, &key) {
                Some(value) => println!("{}", serde_json::to_string_pretty(value)?),
                None => println!("null"),
            }
        }
    }

    Ok(())
}
