//! Presentation seam: the pipeline computes a [`ViewModel`], a `Presenter`
//! turns it into output. All markup concerns live behind this trait; the
//! store and filters never print anything themselves.

use crate::model::MarketEvent;
use crate::store::{Stats, ViewModel};

pub trait Presenter {
    fn render(&self, view: &ViewModel);
    fn render_stats(&self, stats: &Stats);
    /// Short list of the first upcoming events (the "hero" strip).
    fn render_upcoming(&self, events: &[&MarketEvent]);
}

/// Terminal renderer: one text card per event, a result count and a
/// load-more hint.
pub struct TerminalPresenter;

impl TerminalPresenter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TerminalPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Presenter for TerminalPresenter {
    fn render(&self, view: &ViewModel) {
        if view.events.is_empty() {
            println!("Geen evenementen gevonden.");
            return;
        }
        for event in &view.events {
            let id = event.id.as_deref().unwrap_or("-");
            println!(
                "{} {}  [{}]",
                event.event_type.icon(),
                event.naam,
                id
            );
            println!("   {} • {}", event.datum_start.format("%a %d-%m-%Y %H:%M"), event.locatie);
            if let Some(eind) = event.datum_eind {
                println!("   tot {}", eind.format("%H:%M"));
            }
            if let Some(org) = &event.organisator {
                println!("   organisatie: {}", org);
            }
            if let Some(fee) = event.standgeld {
                println!("   standgeld: €{:.2}", fee);
            }
        }
        let suffix = if view.total == 1 { "" } else { "en" };
        println!("\n{} evenement{} gevonden", view.total, suffix);
        if view.has_more {
            println!("(typ 'meer' om de volgende pagina te tonen)");
        }
    }

    fn render_stats(&self, stats: &Stats) {
        println!(
            "{} markten deze maand, {} binnen de 7 dagen",
            stats.this_month, stats.this_week
        );
    }

    fn render_upcoming(&self, events: &[&MarketEvent]) {
        if events.is_empty() {
            return;
        }
        println!("Eerstvolgende markten:");
        for event in events {
            println!(
                "  {} {} • {}",
                event.event_type.icon(),
                event.naam,
                event.datum_start.format("%a %d-%m-%Y")
            );
        }
    }
}
