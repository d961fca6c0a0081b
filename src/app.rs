use crate::command_processor::{CommandArgs, CommandProcessor};
use crate::config::Config;
use crate::json_store::{ConfigIdentity, JsonStore};
use crate::presenter::TerminalPresenter;
use anyhow::Result;
use rustyline::DefaultEditor;

/// Composition root: wires config, the document store, the identity provider
/// and the presenter together, then drives the interactive loop.
pub struct Application {
    processor: CommandProcessor,
}

impl Application {
    pub fn new() -> Result<Self> {
        let config = Config::load()?;
        let store = JsonStore::new()?;
        let identity =
            ConfigIdentity::new(config.identity.uid.clone(), config.identity.email.clone());
        let processor = CommandProcessor::new(
            config,
            Box::new(store),
            Box::new(identity),
            Box::new(TerminalPresenter::new()),
        );
        Ok(Self { processor })
    }

    /// Execute a single command line and return.
    pub async fn run_once(&mut self, args: CommandArgs) -> Result<()> {
        self.processor.process(args).await.map(|_| ())
    }

    /// Interactive terminal loop.
    pub async fn run(&mut self) -> Result<()> {
        log::info!("Starting Buurtmarkt terminal");

        let mut rl = DefaultEditor::new()?;

        println!("Welkom bij Buurtmarkt! Typ 'help' voor de commando's.");
        let prompt = "🛍️  ";

        loop {
            match rl.readline(prompt) {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(line.as_str());
                    match CommandArgs::parse(&line) {
                        Ok(args) => match self.processor.process(args).await {
                            Ok(true) => {}
                            Ok(false) => break,
                            Err(err) => {
                                log::error!("Failed to process command: {:?}", err);
                                println!("Fout: {}", err);
                            }
                        },
                        Err(err) => println!("Fout: {}", err),
                    }
                }
                Err(rustyline::error::ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(rustyline::error::ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    println!("Error: {:?}", err);
                    break;
                }
            }
        }

        Ok(())
    }
}
