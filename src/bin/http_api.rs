//! HTTP front for rcanvas

use clap::Parser;
use log::info;
use rcanvas::http_api;
use rcanvas::service::{CanvasService, ConfigBuilder};
use rcanvas::settings::Settings;

#[derive(Parser)]
#[command(name = "http_api")]
#[command(version, about = "Serve the rcanvas API over HTTP", long_about = None)]
struct Args {
    #[command(flatten)]
    settings: Settings,

    /// Address to listen on
    #[arg(long, env = "RCANVAS_BIND", default_value = "127.0.0.1:3000")]
    bind: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    info!("Starting rcanvas http_api v{}", env!("CARGO_PKG_VERSION"));
    let config = ConfigBuilder::new().settings(args.settings).build()?;
    http_api::serve(CanvasService::new(config), &args.bind).await?;
    Ok(())
}
