//! Bulk-import parsing pipeline: raw pasted text in, candidate records out.
//!
//! Split into three stages, each testable on its own:
//! - [`segment`]: cut the paste into per-listing blocks;
//! - [`extract`]: turn one block into a candidate [`MarketEvent`];
//! - [`dutch`]: date/time token lookups shared by both.
//!
//! Failures are per block: an unparseable block is logged, counted and
//! skipped, never aborting the batch.

pub mod dutch;
pub mod extract;
pub mod segment;

use crate::model::MarketEvent;

/// Outcome of parsing one paste.
#[derive(Debug, Default)]
pub struct BulkParse {
    pub events: Vec<MarketEvent>,
    /// Blocks that could not be turned into a record.
    pub failed_blocks: usize,
}

/// Parse a full paste into candidate records, best effort.
pub fn parse_bulk(raw: &str) -> BulkParse {
    let mut outcome = BulkParse::default();
    for (i, block) in segment::segment(raw).iter().enumerate() {
        match extract::extract(block) {
            Ok(event) => outcome.events.push(event),
            Err(e) => {
                log::warn!("blok {} overgeslagen: {}", i + 1, e);
                outcome.failed_blocks += 1;
            }
        }
    }
    log::info!(
        "{} kandidaten geparset, {} blokken overgeslagen",
        outcome.events.len(),
        outcome.failed_blocks
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bulk_skips_bad_blocks() {
        let raw = "\
GENT (9000) Kerkstraat
za 12 juli 2025
Rommelmarkt Centrum
BRUGGE (8000)
geen datum in dit blok
AALST (9300) Grote Markt
zo 13 juli 2025
Braderie binnenstad
";
        let outcome = parse_bulk(raw);
        assert_eq!(outcome.events.len(), 2);
        assert_eq!(outcome.failed_blocks, 1);
        assert_eq!(outcome.events[0].naam, "Rommelmarkt Centrum");
        assert_eq!(outcome.events[1].naam, "Braderie binnenstad");
    }
}
