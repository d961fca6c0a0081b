//! Command parsing and dispatch for the interactive terminal.
//!
//! Lines from the prompt are split into a command, positional arguments and
//! `--flag [value]` pairs, with double quotes grouping multi-word arguments.
//! The processor owns the composition root: config, document store, identity
//! provider and the in-memory event store.

use anyhow::{Result, anyhow};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use log::{debug, warn};
use std::collections::HashMap;
use std::io::{self, Write};

use crate::config::Config;
use crate::import;
use crate::model::{EventType, MarketEvent};
use crate::presenter::Presenter;
use crate::remote::{self, DocumentStore, IdentityProvider};
use crate::store::{DateBucket, EventStore};
use crate::validation;

/// Command line arguments structure
#[derive(Debug, Clone)]
pub struct CommandArgs {
    pub command: String,
    pub args: Vec<String>,
    pub flags: HashMap<String, Option<String>>,
}

impl CommandArgs {
    pub fn parse(input: &str) -> Result<Self> {
        // Normalize non-breaking spaces and collapse whitespace runs
        let normalized_input =
            input.replace('\u{a0}', " ").split_whitespace().collect::<Vec<_>>().join(" ");

        debug!("Normalized input: {}", normalized_input);

        let mut parts = Vec::new();
        let mut current = String::new();
        let mut in_quotes = false;
        let mut escaped = false;

        for c in normalized_input.chars() {
            match c {
                '\\' if !escaped => {
                    escaped = true;
                }
                '"' if !escaped => {
                    in_quotes = !in_quotes;
                    if !in_quotes && !current.is_empty() {
                        parts.push(current.clone());
                        current.clear();
                    }
                }
                ' ' if !in_quotes && !escaped => {
                    if !current.is_empty() {
                        parts.push(current.clone());
                        current.clear();
                    }
                }
                _ => {
                    if escaped && c != '"' {
                        current.push('\\');
                    }
                    current.push(c);
                    escaped = false;
                }
            }
        }
        if !current.is_empty() {
            parts.push(current);
        }

        if parts.is_empty() {
            return Err(anyhow!("Geen commando opgegeven"));
        }

        let command = parts.remove(0).to_lowercase();
        let mut args = Vec::new();
        let mut flags = HashMap::new();
        let mut i = 0;

        while i < parts.len() {
            if parts[i].starts_with("--") {
                let flag = parts[i].clone();
                if i + 1 < parts.len() && !parts[i + 1].starts_with("--") {
                    flags.insert(flag, Some(parts[i + 1].clone()));
                    i += 1;
                } else {
                    flags.insert(flag, None);
                }
            } else {
                args.push(parts[i].clone());
            }
            i += 1;
        }

        debug!("Parsed command: {:?}, args: {:?}, flags: {:?}", command, args, flags);

        Ok(CommandArgs { command, args, flags })
    }
}

/// Owns the collaborators and the event store; executes one command at a time.
pub struct CommandProcessor {
    config: Config,
    store: Box<dyn DocumentStore>,
    identity: Box<dyn IdentityProvider>,
    events: EventStore,
    presenter: Box<dyn Presenter>,
}

impl CommandProcessor {
    pub fn new(
        config: Config,
        store: Box<dyn DocumentStore>,
        identity: Box<dyn IdentityProvider>,
        presenter: Box<dyn Presenter>,
    ) -> Self {
        let events = EventStore::new(config.listing.page_size);
        Self { config, store, identity, events, presenter }
    }

    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn is_admin(&self) -> bool {
        remote::is_admin(self.identity.current().as_ref(), &self.config.admin.emails)
    }

    /// Re-fetch the full collection (no incremental sync) and reload the
    /// in-memory store.
    async fn refresh(&mut self) -> Result<()> {
        let mut records =
            remote::load_markets(self.store.as_ref(), &self.config.listing.collection).await?;
        if !self.config.listing.toon_verleden {
            let now = self.now();
            records.retain(|r| r.datum_start >= now);
        }
        self.events.load(records);
        Ok(())
    }

    /// Execute one command. Returns `false` when the loop should stop.
    pub async fn process(&mut self, args: CommandArgs) -> Result<bool> {
        match args.command.as_str() {
            "exit" | "quit" | "stop" => return Ok(false),
            "help" | "hulp" => self.print_help(),
            "login" => match self.identity.sign_in().await {
                Ok(session) => println!("Aangemeld als {}", session.email),
                Err(e) => {
                    warn!("aanmelden mislukt: {}", e);
                    println!("Kon niet inloggen");
                }
            },
            "logout" => {
                self.identity.sign_out().await?;
                println!("Afgemeld");
            }
            "wie" => match self.identity.current() {
                Some(session) => {
                    let rol = if self.is_admin() { " (beheerder)" } else { "" };
                    println!("{}{}", session.email, rol);
                }
                None => println!("Niet aangemeld"),
            },
            "lijst" | "list" => {
                self.refresh().await?;
                self.apply_filter_flags(&args)?;
                self.presenter.render(&self.events.view(self.now()));
            }
            "filter" => {
                self.apply_filter_flags(&args)?;
                self.presenter.render(&self.events.view(self.now()));
            }
            "wis-filters" => {
                self.events.clear_filters();
                self.presenter.render(&self.events.view(self.now()));
            }
            "meer" | "more" => {
                self.events.load_more();
                self.presenter.render(&self.events.view(self.now()));
            }
            "stats" => {
                self.refresh().await?;
                let now = self.now();
                self.presenter.render_stats(&self.events.stats(now));
                self.presenter.render_upcoming(&self.events.upcoming(now, 3));
            }
            "toevoegen" | "add" => self.handle_add(&args).await?,
            "import" => self.handle_import(&args).await?,
            "verwijder" | "delete" => self.handle_delete(&args).await?,
            "leegmaken" | "clear-all" => self.handle_clear_all().await?,
            other => {
                println!("Onbekend commando: {} (typ 'help')", other);
            }
        }
        Ok(true)
    }

    fn apply_filter_flags(&mut self, args: &CommandArgs) -> Result<()> {
        let mut filter = self.events.filter().clone();
        if let Some(Some(t)) = args.flags.get("--type") {
            filter.event_type = Some(EventType::parse(t));
        }
        if let Some(Some(q)) = args.flags.get("--plaats") {
            filter.location_query = Some(q.clone());
        }
        if let Some(Some(p)) = args.flags.get("--periode") {
            filter.date_bucket =
                Some(DateBucket::parse(p).ok_or_else(|| anyhow!("onbekende periode: {}", p))?);
        }
        self.events.set_filter(filter);
        Ok(())
    }

    /// `toevoegen "naam" "locatie" <datum> <start> [--eind HH:MM] [--type t]
    /// [--standen n] [--standgeld bedrag] [--organisator ..] [--contact ..]`
    async fn handle_add(&mut self, args: &CommandArgs) -> Result<()> {
        let session = match self.identity.current() {
            Some(s) => s,
            None => {
                println!("Eerst aanmelden om een evenement toe te voegen");
                return Ok(());
            }
        };
        if args.args.len() < 4 {
            println!("Gebruik: toevoegen \"naam\" \"locatie\" JJJJ-MM-DD UU:MM [--eind UU:MM] [--type soort]");
            return Ok(());
        }

        let naam = &args.args[0];
        let locatie = &args.args[1];
        let datum = NaiveDate::parse_from_str(&args.args[2], "%Y-%m-%d")
            .map_err(|_| anyhow!("ongeldige datum: {}", args.args[2]))?;
        let start = NaiveTime::parse_from_str(&args.args[3], "%H:%M")
            .map_err(|_| anyhow!("ongeldig tijdstip: {}", args.args[3]))?;

        let mut event = MarketEvent::new(naam.clone(), locatie.clone(), datum.and_time(start));
        if let Some(Some(eind)) = args.flags.get("--eind") {
            let eind = NaiveTime::parse_from_str(eind, "%H:%M")
                .map_err(|_| anyhow!("ongeldig eindtijdstip: {}", eind))?;
            event.datum_eind = Some(datum.and_time(eind));
        }
        if let Some(Some(t)) = args.flags.get("--type") {
            event.event_type = EventType::parse(t);
        }
        if let Some(Some(n)) = args.flags.get("--standen") {
            event.aantal_standen = Some(n.parse().map_err(|_| anyhow!("ongeldig aantal: {}", n))?);
        }
        if let Some(Some(fee)) = args.flags.get("--standgeld") {
            event.standgeld =
                Some(fee.replace(',', ".").parse().map_err(|_| anyhow!("ongeldig bedrag: {}", fee))?);
        }
        if let Some(Some(org)) = args.flags.get("--organisator") {
            event.organisator = Some(org.clone());
        }
        if let Some(Some(contact)) = args.flags.get("--contact") {
            event.contact = Some(contact.clone());
        }

        let now = self.now();
        // Validation runs before any remote call
        if let Err(e) = validation::validate_submission(&event, now) {
            println!("Niet opgeslagen: {}", e);
            return Ok(());
        }
        import::stamp_submission(&mut event, &session, now);

        match self.store.insert(&self.config.listing.collection, event).await {
            Ok(id) => {
                println!("Evenement opgeslagen ({})", id);
                self.refresh().await?;
            }
            Err(e) => {
                log::error!("opslaan mislukt: {}", e);
                println!("Opslaan mislukt, probeer later opnieuw");
            }
        }
        Ok(())
    }

    /// `import <pad>`: bulk import of pasted listings from a text file.
    async fn handle_import(&mut self, args: &CommandArgs) -> Result<()> {
        let session = match self.identity.current() {
            Some(s) => s,
            None => {
                println!("Eerst aanmelden om te importeren");
                return Ok(());
            }
        };
        if !self.is_admin() {
            println!("Alleen beheerders kunnen bulk importeren");
            return Ok(());
        }
        let path = args.args.first().ok_or_else(|| anyhow!("Gebruik: import <pad>"))?;
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("kan {} niet lezen: {}", path, e))?;

        let report = import::run(
            self.store.as_ref(),
            &self.config.listing.collection,
            &session,
            &raw,
            self.now(),
        )
        .await;
        println!("{}", report);
        self.refresh().await?;
        Ok(())
    }

    async fn handle_delete(&mut self, args: &CommandArgs) -> Result<()> {
        if !self.is_admin() {
            println!("Alleen beheerders kunnen verwijderen");
            return Ok(());
        }
        let id = args.args.first().ok_or_else(|| anyhow!("Gebruik: verwijder <id>"))?;
        match self.store.delete(&self.config.listing.collection, id).await {
            Ok(()) => {
                println!("Verwijderd");
                self.refresh().await?;
            }
            Err(e) => {
                log::error!("verwijderen mislukt: {}", e);
                println!("Verwijderen mislukt: {}", e);
            }
        }
        Ok(())
    }

    /// Destructive bulk clear: requires two sequential explicit confirmations.
    async fn handle_clear_all(&mut self) -> Result<()> {
        if !self.is_admin() {
            println!("Alleen beheerders kunnen de collectie leegmaken");
            return Ok(());
        }
        if !confirm("Alle evenementen verwijderen? (ja/nee): ")?
            || !confirm("Zeker? Dit kan niet ongedaan gemaakt worden (ja/nee): ")?
        {
            println!("Geannuleerd");
            return Ok(());
        }
        let removed = self.store.clear(&self.config.listing.collection).await?;
        println!("{} evenementen verwijderd", removed);
        self.refresh().await?;
        Ok(())
    }

    fn print_help(&self) {
        println!("Beschikbare commando's:");
        println!("  lijst [--type soort] [--plaats tekst] [--periode bucket]");
        println!("  filter [--type soort] [--plaats tekst] [--periode bucket]");
        println!("  wis-filters | meer | stats");
        println!("  login | logout | wie");
        println!("  toevoegen \"naam\" \"locatie\" JJJJ-MM-DD UU:MM [--eind UU:MM] [--type soort]");
        println!("            [--standen n] [--standgeld bedrag] [--organisator ..] [--contact ..]");
        println!("  import <pad>          (beheerder)");
        println!("  verwijder <id>        (beheerder)");
        println!("  leegmaken             (beheerder, dubbele bevestiging)");
        println!("  help | exit");
        println!();
        let soorten: Vec<&str> = EventType::ALL.iter().map(|t| t.as_str()).collect();
        println!("Soorten: {}", soorten.join(", "));
        println!("Periodes: vandaag, morgen, week, weekend, maand, toekomst");
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("ja"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quoted_args() {
        let args =
            CommandArgs::parse("toevoegen \"Grote Markt\" \"Kerkstraat, 9000 GENT\" 2025-07-12 09:00")
                .unwrap();
        assert_eq!(args.command, "toevoegen");
        assert_eq!(args.args[0], "Grote Markt");
        assert_eq!(args.args[1], "Kerkstraat, 9000 GENT");
        assert_eq!(args.args[2], "2025-07-12");
    }

    #[test]
    fn test_parse_flags() {
        let args = CommandArgs::parse("lijst --type garage --periode weekend --meer").unwrap();
        assert_eq!(args.command, "lijst");
        assert_eq!(args.flags.get("--type"), Some(&Some("garage".to_string())));
        assert_eq!(args.flags.get("--periode"), Some(&Some("weekend".to_string())));
        assert_eq!(args.flags.get("--meer"), Some(&None));
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(CommandArgs::parse("").is_err());
        assert!(CommandArgs::parse("   ").is_err());
    }
}
