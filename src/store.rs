//! In-memory event store and the filter/paginate pipeline.
//!
//! The store owns the list fetched from the remote collection and recomputes a
//! render-ready view model on demand. All state lives on the struct and is
//! passed by reference from the composition root; there are no module globals.
//! Filtering is a pure function of (records, filter state, now), so applying
//! the same filters twice always yields the same view.

use chrono::{Datelike, Duration, NaiveDateTime, Weekday};
use serde::Serialize;
use std::collections::HashSet;

use crate::model::{EventType, MarketEvent};

pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Named date-range predicate over an event's start instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBucket {
    Today,
    Tomorrow,
    Week,
    Weekend,
    Month,
    Future,
}

impl DateBucket {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "today" | "vandaag" => Some(DateBucket::Today),
            "tomorrow" | "morgen" => Some(DateBucket::Tomorrow),
            "week" => Some(DateBucket::Week),
            "weekend" => Some(DateBucket::Weekend),
            "month" | "maand" => Some(DateBucket::Month),
            "future" | "toekomst" => Some(DateBucket::Future),
            _ => None,
        }
    }

    /// Whether a start instant falls inside this bucket, relative to `now`.
    pub fn contains(&self, start: NaiveDateTime, now: NaiveDateTime) -> bool {
        match self {
            DateBucket::Today => start.date() == now.date(),
            DateBucket::Tomorrow => start.date() == (now + Duration::days(1)).date(),
            DateBucket::Week => start >= now && start <= now + Duration::days(7),
            DateBucket::Weekend => {
                matches!(start.weekday(), Weekday::Sat | Weekday::Sun)
            }
            DateBucket::Month => {
                start.month() == now.month() && start.year() == now.year()
            }
            DateBucket::Future => start > now,
        }
    }
}

/// Ephemeral per-viewing-session filter state; never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    pub event_type: Option<EventType>,
    pub location_query: Option<String>,
    pub date_bucket: Option<DateBucket>,
}

impl FilterState {
    pub fn is_empty(&self) -> bool {
        self.event_type.is_none() && self.location_query.is_none() && self.date_bucket.is_none()
    }

    /// Filter predicate for one record: type equality, location substring
    /// over "locatie naam organisator", date bucket.
    pub fn matches(&self, event: &MarketEvent, now: NaiveDateTime) -> bool {
        if let Some(t) = self.event_type {
            if event.event_type != t {
                return false;
            }
        }
        if let Some(q) = &self.location_query {
            let haystack = format!(
                "{} {} {}",
                event.locatie,
                event.naam,
                event.organisator.as_deref().unwrap_or("")
            )
            .to_lowercase();
            if !haystack.contains(&q.to_lowercase()) {
                return false;
            }
        }
        if let Some(bucket) = self.date_bucket {
            if !bucket.contains(event.datum_start, now) {
                return false;
            }
        }
        true
    }
}

/// Render-ready snapshot handed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct ViewModel {
    /// Visible window: filtered, deduplicated, sorted, paginated.
    pub events: Vec<MarketEvent>,
    /// Total number of filtered records (across all pages).
    pub total: usize,
    pub page: usize,
    pub has_more: bool,
}

/// Upcoming-event counters shown in the page header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    /// Events starting between now and the end of the current month.
    pub this_month: usize,
    /// Events starting within the next 7 days.
    pub this_week: usize,
}

/// Owns the loaded record list, the active filters and the page cursor.
#[derive(Debug)]
pub struct EventStore {
    all: Vec<MarketEvent>,
    filter: FilterState,
    page: usize,
    page_size: usize,
}

impl EventStore {
    pub fn new(page_size: usize) -> Self {
        Self { all: Vec::new(), filter: FilterState::default(), page: 1, page_size }
    }

    /// Replace the record list with a fresh remote snapshot: deduplicate by
    /// (naam, locatie, start day) keeping the first occurrence, sort ascending
    /// by start instant, reset the page cursor.
    pub fn load(&mut self, records: Vec<MarketEvent>) {
        let mut seen = HashSet::new();
        let mut unique: Vec<MarketEvent> =
            records.into_iter().filter(|r| seen.insert(r.dedup_key())).collect();
        unique.sort_by_key(|r| r.datum_start);
        log::debug!("{} records geladen na ontdubbeling", unique.len());
        self.all = unique;
        self.page = 1;
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Change the active filters; any change resets the window to page 1.
    pub fn set_filter(&mut self, filter: FilterState) {
        if filter != self.filter {
            self.filter = filter;
            self.page = 1;
        }
    }

    pub fn clear_filters(&mut self) {
        self.set_filter(FilterState::default());
    }

    /// Widen the visible window by one page. Monotonic until the next
    /// filter change or reload.
    pub fn load_more(&mut self) {
        self.page += 1;
    }

    fn filtered(&self, now: NaiveDateTime) -> Vec<&MarketEvent> {
        self.all.iter().filter(|e| self.filter.matches(e, now)).collect()
    }

    /// Recompute the view model. Pure in (records, filters, page, now).
    pub fn view(&self, now: NaiveDateTime) -> ViewModel {
        let filtered = self.filtered(now);
        let total = filtered.len();
        let visible = self.page * self.page_size;
        let events: Vec<MarketEvent> =
            filtered.into_iter().take(visible).cloned().collect();
        ViewModel { has_more: total > visible, events, total, page: self.page }
    }

    /// First `n` events that still lie in the future (hero strip).
    pub fn upcoming(&self, now: NaiveDateTime, n: usize) -> Vec<&MarketEvent> {
        self.all.iter().filter(|e| e.datum_start > now).take(n).collect()
    }

    /// Header counters: upcoming events this month and within 7 days.
    pub fn stats(&self, now: NaiveDateTime) -> Stats {
        let week_end = now + Duration::days(7);
        let this_month = self
            .all
            .iter()
            .filter(|e| {
                e.datum_start >= now
                    && e.datum_start.month() == now.month()
                    && e.datum_start.year() == now.year()
            })
            .count();
        let this_week =
            self.all.iter().filter(|e| e.datum_start >= now && e.datum_start <= week_end).count();
        Stats { this_month, this_week }
    }
}
