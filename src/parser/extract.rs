//! Field extraction: one segmented block in, one candidate `MarketEvent` out.
//!
//! The input is best-effort pasted text, so extraction is an ordered list of
//! (predicate, extractor) rules applied to every line of the block. Each rule
//! fills its field from the first line that qualifies and ignores the rest;
//! a single line can feed several fields only when the patterns are disjoint.
//! Location and date are mandatory; a block missing either is unparseable.

use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::model::{EventType, MarketEvent};
use crate::parser::dutch;
use crate::parser::segment::{self, Header};

const MAX_FIELD_LEN: usize = 100;
const MAX_DESCRIPTION_LEN: usize = 200;
const DEFAULT_START: (u32, u32) = (9, 0);

/// Lines that never qualify as an event name.
const NAME_EXCLUSIONS: [&str; 3] = ["opstellen", "ontruiming", "bekijk details"];

static RE_PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\+32|0032)\s?\d|\b04\d{2}[\s./]?\d").unwrap());

static RE_STANDGELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)standplaats\s*:?\s*(\d+(?:,\d{1,2})?)\s*€").unwrap());

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("blok heeft te weinig bruikbare regels ({0})")]
    TooShort(usize),
    #[error("geen plaatsnaam gevonden op de eerste regel")]
    NoLocation,
    #[error("geen datum gevonden in het blok")]
    NoDate,
}

/// Partial-record accumulator filled by the line rules.
#[derive(Debug, Default)]
struct Draft {
    date: Option<NaiveDate>,
    start_time: Option<NaiveTime>,
    end_time: Option<NaiveTime>,
    organisator: Option<String>,
    contact: Option<String>,
    standgeld: Option<f64>,
}

/// One line rule: `matches` classifies the line, `apply` fills the draft.
/// The rule still reports a match when its field is already taken, so later
/// passes (name selection, description) can skip the line.
struct LineRule {
    name: &'static str,
    matches: fn(&str) -> bool,
    apply: fn(&str, &mut Draft),
}

/// Ordered rule table; first qualifying line wins per field.
static LINE_RULES: &[LineRule] = &[
    LineRule { name: "datum", matches: dutch::is_date_line, apply: apply_date },
    LineRule { name: "uren", matches: dutch::is_time_line, apply: apply_time_range },
    LineRule { name: "contact", matches: is_contact_line, apply: apply_contact },
    LineRule { name: "standgeld", matches: is_standgeld_line, apply: apply_standgeld },
];

fn apply_date(line: &str, draft: &mut Draft) {
    if draft.date.is_none() {
        draft.date = dutch::parse_date_line(line);
    }
}

fn apply_time_range(line: &str, draft: &mut Draft) {
    if draft.start_time.is_none() {
        if let Some((start, end)) = dutch::parse_time_range(line) {
            draft.start_time = Some(start);
            draft.end_time = Some(end);
        }
    }
}

fn is_contact_line(line: &str) -> bool {
    line.contains('@') || RE_PHONE.is_match(line)
}

/// "Organisator - contact" when a hyphen is present, otherwise the whole line
/// is the contact.
fn apply_contact(line: &str, draft: &mut Draft) {
    if draft.contact.is_some() {
        return;
    }
    match line.split_once('-') {
        Some((left, right)) => {
            draft.organisator = Some(truncate(left.trim(), MAX_FIELD_LEN));
            draft.contact = Some(truncate(right.trim(), MAX_FIELD_LEN));
        }
        None => draft.contact = Some(truncate(line.trim(), MAX_FIELD_LEN)),
    }
}

fn is_standgeld_line(line: &str) -> bool {
    RE_STANDGELD.is_match(line)
}

fn apply_standgeld(line: &str, draft: &mut Draft) {
    if draft.standgeld.is_some() {
        return;
    }
    if let Some(caps) = RE_STANDGELD.captures(line) {
        // Comma is the decimal separator in the source material.
        let normalized = caps[1].replace(',', ".");
        draft.standgeld = normalized.parse::<f64>().ok();
    }
}

/// Char-boundary-safe truncation.
fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Turn one block into a candidate record.
///
/// The first line must be a place-name header; the remaining lines are run
/// through the rule table. Start time defaults to 09:00 when no opening-hours
/// line was found. Returns an error when the block is too short or misses a
/// mandatory field (place, date).
pub fn extract(block: &[String]) -> Result<MarketEvent, ExtractError> {
    if block.len() < 2 {
        return Err(ExtractError::TooShort(block.len()));
    }

    let header: Header = segment::parse_header(&block[0]).ok_or(ExtractError::NoLocation)?;

    let mut draft = Draft::default();
    // Tracks which rules claimed each line, for the name/description passes.
    let mut claimed = vec![false; block.len()];

    for (i, line) in block.iter().enumerate().skip(1) {
        for rule in LINE_RULES {
            if (rule.matches)(line) {
                log::debug!("regel {} geclassificeerd als {}", i + 1, rule.name);
                (rule.apply)(line, &mut draft);
                if rule.name != "standgeld" {
                    claimed[i] = true;
                }
            }
        }
    }

    let date = draft.date.ok_or(ExtractError::NoDate)?;

    let locatie = if header.adres.is_empty() {
        format!("{} {}", header.postcode, header.plaats)
    } else {
        format!("{}, {} {}", header.adres, header.postcode, header.plaats)
    };

    let naam = select_name(block, &claimed)
        .map(|n| truncate(n, MAX_FIELD_LEN))
        .unwrap_or_else(|| format!("Rommelmarkt {}", header.plaats));

    let event_type = infer_type(block);
    let beschrijving = build_description(block, &claimed);

    let (sh, sm) = DEFAULT_START;
    let start_time = draft.start_time.unwrap_or_else(|| {
        NaiveTime::from_hms_opt(sh, sm, 0).expect("default start time is valid")
    });

    let mut event = MarketEvent::new(naam, locatie, date.and_time(start_time));
    event.event_type = event_type;
    event.datum_eind = draft.end_time.map(|t| date.and_time(t));
    event.organisator = draft.organisator;
    event.contact = draft.contact;
    event.beschrijving = beschrijving;
    event.standgeld = draft.standgeld;
    Ok(event)
}

/// First post-header line that plausibly is a title: 5-80 characters, no URL,
/// e-mail or parenthesis, not digit-initial, not claimed by a date/time/contact
/// rule and not on the exclusion list.
fn select_name<'a>(block: &'a [String], claimed: &[bool]) -> Option<&'a str> {
    block.iter().enumerate().skip(1).find_map(|(i, line)| {
        if claimed[i] {
            return None;
        }
        let len = line.chars().count();
        if !(5..=80).contains(&len) {
            return None;
        }
        if line.contains("http") || line.contains('@') || line.contains('(') {
            return None;
        }
        if line.starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }
        let lower = line.to_lowercase();
        if NAME_EXCLUSIONS.iter().any(|kw| lower.contains(kw)) {
            return None;
        }
        Some(line.as_str())
    })
}

/// First keyword hit in line-scan order decides the type; default rommelmarkt.
fn infer_type(block: &[String]) -> EventType {
    for line in block {
        let lower = line.to_lowercase();
        if lower.contains("garage") {
            return EventType::Garageverkoop;
        }
        if lower.contains("braderie") {
            return EventType::Braderie;
        }
        if lower.contains("kermis") {
            return EventType::Kermis;
        }
        if lower.contains("antiek") || lower.contains("brocante") {
            return EventType::Antiekmarkt;
        }
        if lower.contains("feest") {
            return EventType::Feest;
        }
    }
    EventType::Rommelmarkt
}

/// Lines 2-6 that are free text of a sensible length, joined and capped.
fn build_description(block: &[String], claimed: &[bool]) -> Option<String> {
    let parts: Vec<&str> = block
        .iter()
        .enumerate()
        .skip(1)
        .take(5)
        .filter(|(i, line)| {
            let len = line.chars().count();
            !claimed[*i] && len > 15 && len < 150
        })
        .map(|(_, line)| line.as_str())
        .collect();

    if parts.is_empty() {
        return None;
    }
    Some(truncate(&parts.join(" "), MAX_DESCRIPTION_LEN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn block(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_extract_minimal_block() {
        let b = block(&[
            "GENT (9000) Kerkstraat",
            "za 12 juli 2025",
            "10:00 - 16:00",
            "Rommelmarkt Centrum",
            "organisator@example.com",
        ]);
        let event = extract(&b).unwrap();
        assert_eq!(event.locatie, "Kerkstraat, 9000 GENT");
        assert_eq!(event.naam, "Rommelmarkt Centrum");
        assert_eq!(event.datum_start.to_string(), "2025-07-12 10:00:00");
        assert_eq!(event.datum_eind.unwrap().to_string(), "2025-07-12 16:00:00");
        assert!(event.contact.unwrap().contains("organisator@example.com"));
    }

    #[test]
    fn test_extract_defaults_start_time() {
        let b = block(&["BRUGGE (8000)", "zo 13 juli 2025", "Garageverkoop in de wijk"]);
        let event = extract(&b).unwrap();
        assert_eq!(event.datum_start.to_string(), "2025-07-13 09:00:00");
        assert!(event.datum_eind.is_none());
        assert_eq!(event.event_type, EventType::Garageverkoop);
        assert_eq!(event.locatie, "8000 BRUGGE");
    }

    #[test]
    fn test_extract_name_fallback_and_contact_split() {
        let b = block(&[
            "AALST (9300) Grote Markt",
            "za 2 aug 2025",
            "Feestcomité Centrum - 0475 12 34 56",
        ]);
        let event = extract(&b).unwrap();
        // No qualifying name line (the contact rule claimed the only candidate)
        assert_eq!(event.naam, "Rommelmarkt AALST");
        assert_eq!(event.organisator.as_deref(), Some("Feestcomité Centrum"));
        assert_eq!(event.contact.as_deref(), Some("0475 12 34 56"));
    }

    #[test]
    fn test_extract_standgeld_comma_decimal() {
        let b = block(&[
            "LEUVEN (3000) Oude Markt",
            "zo 7 sep 2025",
            "Brocante aan de Dijle",
            "standplaats 12,50€",
        ]);
        let event = extract(&b).unwrap();
        assert_eq!(event.standgeld, Some(12.5));
        assert_eq!(event.event_type, EventType::Antiekmarkt);
    }

    #[test]
    fn test_extract_description_window() {
        let b = block(&[
            "GENT (9000) Kerkstraat",
            "za 12 juli 2025",
            "Grote jaarlijkse rommelmarkt in het centrum",
            "kort",
            "Meer dan honderd standen en een gezellige sfeer",
        ]);
        let event = extract(&b).unwrap();
        let desc = event.beschrijving.unwrap();
        assert!(desc.contains("jaarlijkse rommelmarkt"));
        assert!(desc.contains("honderd standen"));
        assert!(!desc.contains("kort"));
    }

    #[test]
    fn test_extract_failures() {
        assert_eq!(extract(&block(&["GENT (9000)"])).unwrap_err(), ExtractError::TooShort(1));
        assert_eq!(
            extract(&block(&["geen header", "za 12 juli 2025"])).unwrap_err(),
            ExtractError::NoLocation
        );
        assert_eq!(
            extract(&block(&["GENT (9000)", "Rommelmarkt zonder datum"])).unwrap_err(),
            ExtractError::NoDate
        );
    }
}
