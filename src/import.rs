//! Bulk import: parse a paste, validate each candidate and persist them one
//! remote write at a time. Individual failures are tallied, never fatal;
//! the report reads "N geïmporteerd, M fouten".

use chrono::NaiveDateTime;
use std::fmt;

use crate::model::MarketEvent;
use crate::parser;
use crate::remote::{DocumentStore, Session};
use crate::validation;

/// Aggregate outcome of one import run. Which blocks failed is not tracked,
/// only how many.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    pub errors: usize,
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} geïmporteerd, {} fouten", self.imported, self.errors)
    }
}

/// Parse `raw` and persist every valid candidate sequentially.
///
/// The submitter identity and `now` are stamped on each record before the
/// write. Parse failures, validation failures and write failures all count as
/// errors; a failure never stops the remaining blocks.
pub async fn run(
    store: &dyn DocumentStore,
    collection: &str,
    session: &Session,
    raw: &str,
    now: NaiveDateTime,
) -> ImportReport {
    let parsed = parser::parse_bulk(raw);
    let mut report = ImportReport { imported: 0, errors: parsed.failed_blocks };

    for mut event in parsed.events {
        if let Err(e) = validation::validate_submission(&event, now) {
            log::warn!("kandidaat '{}' afgekeurd: {}", event.naam, e);
            report.errors += 1;
            continue;
        }
        stamp_submission(&mut event, session, now);
        // One write at a time; a failed write only costs this record.
        match store.insert(collection, event).await {
            Ok(id) => {
                log::debug!("geïmporteerd als {}", id);
                report.imported += 1;
            }
            Err(e) => {
                log::error!("wegschrijven mislukt: {}", e);
                report.errors += 1;
            }
        }
    }

    log::info!("bulkimport klaar: {}", report);
    report
}

/// Stamp submitter identity and creation instant on a candidate record.
pub fn stamp_submission(event: &mut MarketEvent, session: &Session, now: NaiveDateTime) {
    event.uid = Some(session.uid.clone());
    event.email = Some(session.email.clone());
    event.toegevoegd_op = Some(now);
}
