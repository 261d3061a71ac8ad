pub use crate::error::Error;
use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::server::Storefront;
use crate::settings::Settings;

mod catalog;
mod error;
mod listing;
mod money;
mod page;
mod reservation;
mod server;
mod settings;

include!(concat!(env!("OUT_DIR"), "/templates.rs"));

/// Demo storefront for browsing events and reserving tickets.
#[derive(Parser)]
struct Args {
    /// Settings file, without extension (JSON, TOML or YAML).
    #[arg(long, default_value = "settings")]
    settings: String,
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    port: Option<u16>,
}

fn main() -> anyhow::Result<()> {
    init_logger()?;
    let args = Args::parse();

    let mut settings = Settings::load(&args.settings).context("Failed to load settings")?;
    if let Some(host) = args.host {
        settings.host = host;
    }
    if let Some(port) = args.port {
        settings.port = port;
    }

    let catalog = settings.catalog().context("Failed to build catalog")?;
    let addr = settings.address();
    info!(%addr, events = catalog.events().len(), "Listening");

    let storefront = Storefront::new(catalog, settings.site());
    gotham::start(addr, server::router(storefront)).context("Server stopped unexpectedly")
}

fn init_logger() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let subscriber = tracing_subscriber::fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_target(false);

    tracing_subscriber::registry()
        .with(subscriber)
        .with(env_filter)
        .try_init()?;
    Ok(())
}
