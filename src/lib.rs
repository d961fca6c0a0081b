pub mod app;
pub mod cli;
pub mod command_processor;
pub mod config;
pub mod import;
pub mod json_store;
pub mod model;
pub mod parser;
pub mod presenter;
pub mod remote;
pub mod store;
pub mod validation;

use anyhow::Result;
use log::info;

/// Run the interactive application.
pub async fn run() -> Result<()> {
    let mut app = app::Application::new()?;
    info!("Initializing Buurtmarkt application");
    app.run().await
}

pub fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Debug)
        .format_timestamp(None)
        .format_target(false)
        .init();
}

// Re-export commonly used types
pub use config::Config;
pub use model::{EventType, MarketEvent};
pub use store::{DateBucket, EventStore, FilterState, ViewModel};
