use anyhow::Result;
use buurtmarkt::app::Application;
use buurtmarkt::cli::{self, Cli};
use clap::Parser;
use env_logger::Env;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging with custom format
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            use chrono::Local;
            use std::io::Write;
            writeln!(
                buf,
                "{} [{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(command) => {
            let mut app = Application::new()?;
            app.run_once(cli::to_command_args(&command)).await
        }
        None => {
            info!("Starting Buurtmarkt terminal");
            let mut app = Application::new()?;
            app.run().await
        }
    }
}
