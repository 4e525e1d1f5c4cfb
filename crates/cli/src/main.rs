use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use baymirror_core::{
    load_config, load_config_from_env, pick_video_torrent, validate_config, Config, MirrorSearch,
};

const USAGE: &str = "usage: baymirror <mirrors | search QUERY.. | videos QUERY.. | pick QUERY..>";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    /// List mirrors that pass the configured filters.
    Mirrors,
    /// Resolve a mirror and print every result for the query.
    Search(String),
    /// Best result per video quality tier.
    Videos(String),
    /// First result satisfying the configured filters.
    Pick(String),
}

fn parse_command(args: &[String]) -> Result<Command> {
    let Some((name, rest)) = args.split_first() else {
        bail!(USAGE);
    };
    let query = rest.join(" ");

    let needs_query = |command: fn(String) -> Command| -> Result<Command> {
        if query.trim().is_empty() {
            bail!("missing search query\n{}", USAGE);
        }
        Ok(command(query.clone()))
    };

    match name.as_str() {
        "mirrors" => Ok(Command::Mirrors),
        "search" => needs_query(Command::Search),
        "videos" => needs_query(Command::Videos),
        "pick" => needs_query(Command::Pick),
        other => bail!("unknown command {:?}\n{}", other, USAGE),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

fn load(config_path: &Path) -> Result<Config> {
    let config = if config_path.exists() {
        info!("Loading configuration from {:?}", config_path);
        load_config(config_path)
            .with_context(|| format!("Failed to load config from {:?}", config_path))?
    } else {
        info!("No config file at {:?}, using defaults", config_path);
        load_config_from_env().context("Failed to load config from environment")?
    };

    validate_config(&config).context("Configuration validation failed")?;
    Ok(config)
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = parse_command(&args)?;

    let config_path = std::env::var("BAYMIRROR_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));
    let config = load(&config_path)?;

    let search = MirrorSearch::from_config(&config).context("Failed to initialize search")?;

    match command {
        Command::Mirrors => {
            let mirrors = search.get_mirrors().await.context("Failed to list mirrors")?;
            info!("Found {} mirrors", mirrors.len());
            print_json(&mirrors)
        }
        Command::Search(query) => {
            let resolution = search
                .get_torrents(&query)
                .await
                .with_context(|| format!("Search for {:?} failed", query))?;
            print_json(&resolution)
        }
        Command::Videos(query) => {
            let torrents = search
                .search_videos(&query, &[] as &[&str])
                .await
                .with_context(|| format!("Video search for {:?} failed", query))?;
            print_json(&torrents)
        }
        Command::Pick(query) => {
            let resolution = search
                .get_torrents(&query)
                .await
                .with_context(|| format!("Search for {:?} failed", query))?;
            let torrent = pick_video_torrent(&resolution.torrents, search.filters())
                .with_context(|| format!("Nothing to pick for {:?}", query))?;
            print_json(&torrent)
        }
    }
}
