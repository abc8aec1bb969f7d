use clap::{Parser, Subcommand};
use log::info;
use rcanvas::clients::errors::Result;
use rcanvas::service::{CanvasService, ConfigBuilder, DEFAULT_SEARCH_LIMIT, parse_search_types};
use rcanvas::settings::Settings;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "rcanvas")]
#[command(version, about = "Look up Spotify tracks and their Canvas videos", long_about = None)]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a track link, URI or id and fetch its record
    Track { link: String },
    /// Fetch an artist and their top tracks
    Artist { id: String },
    /// Search the catalog
    Search {
        query: String,
        /// Comma separated list of `artist`, `track`
        #[arg(long = "type", default_value = "artist,track")]
        kind: String,
        #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: u32,
    },
    /// Parse a saved Canvas page
    Parse {
        file: std::path::PathBuf,
        /// Original track link, used to build the Spotify URL
        #[arg(long)]
        link: Option<String>,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    info!("Building config ...");
    let config = ConfigBuilder::new().settings(cli.settings).build()?;
    let service = CanvasService::new(config);

    match &cli.command {
        Commands::Track { link } => print_json(&service.resolve_and_fetch_track(link).await?),
        Commands::Artist { id } => print_json(&service.fetch_artist(id).await?),
        Commands::Search { query, kind, limit } => {
            let types = parse_search_types(kind)?;
            print_json(&service.search(query, &types, *limit).await?)
        }
        Commands::Parse { file, link } => {
            let html = tokio::fs::read_to_string(file).await?;
            print_json(&service.parse_scraped_page(&html, link.as_deref())?)
        }
    }
}
