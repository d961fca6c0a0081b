use clap::{Parser, Subcommand};
use std::collections::HashMap;

use crate::command_processor::CommandArgs;

/// Buurtmarkt - terminal tool for local flea-market listings
#[derive(Debug, Parser)]
#[command(name = "buurtmarkt")]
#[command(about = "Rommelmarkten in je buurt: doorzoeken, toevoegen en bulk importeren", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute (if not specified, enters interactive mode)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the (filtered) listing
    #[command(alias = "list")]
    Lijst {
        /// Event type (rommelmarkt, garageverkoop, braderie, kermis,
        /// boerenmarkt, antiekmarkt, feest)
        #[arg(long = "type")]
        event_type: Option<String>,

        /// Free-text location search
        #[arg(long)]
        plaats: Option<String>,

        /// Date bucket (vandaag, morgen, week, weekend, maand, toekomst)
        #[arg(long)]
        periode: Option<String>,
    },

    /// Bulk import pasted listings from a text file (admin)
    Import {
        /// Path to the text file with pasted listings
        #[arg(required = true)]
        pad: String,
    },

    /// Upcoming-event counters
    Stats,
}

/// Map a one-shot subcommand onto the interactive command surface.
pub fn to_command_args(command: &Commands) -> CommandArgs {
    let mut flags: HashMap<String, Option<String>> = HashMap::new();
    match command {
        Commands::Lijst { event_type, plaats, periode } => {
            if let Some(t) = event_type {
                flags.insert("--type".to_string(), Some(t.clone()));
            }
            if let Some(p) = plaats {
                flags.insert("--plaats".to_string(), Some(p.clone()));
            }
            if let Some(p) = periode {
                flags.insert("--periode".to_string(), Some(p.clone()));
            }
            CommandArgs { command: "lijst".to_string(), args: vec![], flags }
        }
        Commands::Import { pad } => {
            CommandArgs { command: "import".to_string(), args: vec![pad.clone()], flags }
        }
        Commands::Stats => CommandArgs { command: "stats".to_string(), args: vec![], flags },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lijst_maps_to_filter_flags() {
        let command = Commands::Lijst {
            event_type: Some("garage".to_string()),
            plaats: None,
            periode: Some("weekend".to_string()),
        };
        let args = to_command_args(&command);
        assert_eq!(args.command, "lijst");
        assert_eq!(args.flags.get("--type"), Some(&Some("garage".to_string())));
        assert_eq!(args.flags.get("--periode"), Some(&Some("weekend".to_string())));
        assert!(!args.flags.contains_key("--plaats"));
    }

    #[test]
    fn test_import_carries_path() {
        let args = to_command_args(&Commands::Import { pad: "markten.txt".to_string() });
        assert_eq!(args.command, "import");
        assert_eq!(args.args, vec!["markten.txt"]);
    }
}
