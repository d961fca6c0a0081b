//! Core record types for market listings.
//
// A `MarketEvent` is the canonical unit: built from the submission form or the
// bulk-import parser, validated, then handed to the document store. Records are
// never edited in place; they are only created and (by admins) deleted.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of listing categories. Free-text keywords normalize into this
/// enum; anything unrecognized falls back to `Rommelmarkt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    #[default]
    Rommelmarkt,
    Garageverkoop,
    Braderie,
    Kermis,
    Boerenmarkt,
    Antiekmarkt,
    Feest,
}

impl EventType {
    pub const ALL: [EventType; 7] = [
        EventType::Rommelmarkt,
        EventType::Garageverkoop,
        EventType::Braderie,
        EventType::Kermis,
        EventType::Boerenmarkt,
        EventType::Antiekmarkt,
        EventType::Feest,
    ];

    /// Normalize a free-text keyword into the closed enumeration.
    /// Unrecognized input yields the default type.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "garageverkoop" | "garage" => EventType::Garageverkoop,
            "braderie" => EventType::Braderie,
            "kermis" => EventType::Kermis,
            "boerenmarkt" => EventType::Boerenmarkt,
            "antiekmarkt" | "antiek" | "brocante" => EventType::Antiekmarkt,
            "feest" => EventType::Feest,
            _ => EventType::Rommelmarkt,
        }
    }

    /// Stable lowercase identifier, matching the stored representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Rommelmarkt => "rommelmarkt",
            EventType::Garageverkoop => "garageverkoop",
            EventType::Braderie => "braderie",
            EventType::Kermis => "kermis",
            EventType::Boerenmarkt => "boerenmarkt",
            EventType::Antiekmarkt => "antiekmarkt",
            EventType::Feest => "feest",
        }
    }

    /// Display icon for terminal cards.
    pub fn icon(&self) -> &'static str {
        match self {
            EventType::Rommelmarkt => "🛍️",
            EventType::Garageverkoop => "🏠",
            EventType::Braderie => "🎪",
            EventType::Kermis => "🎡",
            EventType::Boerenmarkt => "🥕",
            EventType::Antiekmarkt => "🏺",
            EventType::Feest => "🎉",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            EventType::Rommelmarkt => "Rommelmarkt",
            EventType::Garageverkoop => "Garageverkoop",
            EventType::Braderie => "Braderie",
            EventType::Kermis => "Kermis",
            EventType::Boerenmarkt => "Boerenmarkt",
            EventType::Antiekmarkt => "Antiekmarkt",
            EventType::Feest => "Feest",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Actief,
    Inactief,
}

/// One market listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketEvent {
    /// Store-assigned id; absent until the record has been persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub naam: String,
    #[serde(rename = "type", default)]
    pub event_type: EventType,
    pub locatie: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organisator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beschrijving: Option<String>,
    pub datum_start: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datum_eind: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aantal_standen: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standgeld: Option<f64>,
    #[serde(default)]
    pub status: EventStatus,
    /// Set by the store at persistence time, immutable afterwards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toegevoegd_op: Option<NaiveDateTime>,
    /// Submitter identity, stamped from the authenticated session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl MarketEvent {
    /// Minimal constructor for a not-yet-persisted record.
    pub fn new(naam: impl Into<String>, locatie: impl Into<String>, datum_start: NaiveDateTime) -> Self {
        Self {
            id: None,
            naam: naam.into(),
            event_type: EventType::default(),
            locatie: locatie.into(),
            organisator: None,
            contact: None,
            beschrijving: None,
            datum_start,
            datum_eind: None,
            aantal_standen: None,
            standgeld: None,
            status: EventStatus::default(),
            toegevoegd_op: None,
            uid: None,
            email: None,
        }
    }

    /// Duplicate-detection key: two records with the same name, location and
    /// start calendar day are considered the same listing.
    pub fn dedup_key(&self) -> (String, String, NaiveDate) {
        (self.naam.clone(), self.locatie.clone(), self.datum_start.date())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_event_type_parse() {
        assert_eq!(EventType::parse("garage"), EventType::Garageverkoop);
        assert_eq!(EventType::parse("Brocante"), EventType::Antiekmarkt);
        assert_eq!(EventType::parse("antiek"), EventType::Antiekmarkt);
        assert_eq!(EventType::parse("kermis"), EventType::Kermis);
        // Unknown keywords fall back to the default
        assert_eq!(EventType::parse("snuffelmarkt"), EventType::Rommelmarkt);
        assert_eq!(EventType::parse(""), EventType::Rommelmarkt);
    }

    #[test]
    fn test_dedup_key_uses_calendar_day() {
        let day = NaiveDate::from_ymd_opt(2025, 7, 12).unwrap();
        let morning = MarketEvent::new("Markt", "Gent", day.and_hms_opt(9, 0, 0).unwrap());
        let evening = MarketEvent::new("Markt", "Gent", day.and_hms_opt(18, 0, 0).unwrap());
        assert_eq!(morning.dedup_key(), evening.dedup_key());
    }

    #[test]
    fn test_serde_type_field_name() {
        let day = NaiveDate::from_ymd_opt(2025, 7, 12).unwrap();
        let mut event = MarketEvent::new("Markt", "Gent", day.and_hms_opt(9, 0, 0).unwrap());
        event.event_type = EventType::Garageverkoop;
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "garageverkoop");
        assert_eq!(json["status"], "actief");
    }
}
