//! End-to-end tests for the bulk-import pipeline: paste in, records in the
//! store, listing view out.

use async_trait::async_trait;
use buurtmarkt::import;
use buurtmarkt::json_store::JsonStore;
use buurtmarkt::model::MarketEvent;
use buurtmarkt::remote::{self, DocumentStore, OrderBy, Session, StoreError};
use buurtmarkt::store::EventStore;
use chrono::{NaiveDate, NaiveDateTime};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

const COLLECTION: &str = "rommelmarkten";

fn session() -> Session {
    Session { uid: "beheerder".to_string(), email: "beheer@example.com".to_string() }
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, 0).unwrap()
}

#[tokio::test]
async fn import_round_trip_minimal_block() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let store = JsonStore::with_dir(dir.path().to_path_buf())?;
    let raw = "GENT (9000) Kerkstraat\nza 12 juli 2025\n10:00 - 16:00\nRommelmarkt Centrum\norganisator@example.com";

    let report = import::run(&store, COLLECTION, &session(), raw, at(2025, 7, 1, 12, 0)).await;
    assert_eq!(report.imported, 1);
    assert_eq!(report.errors, 0);

    let records = store.query_all(COLLECTION, OrderBy::DatumStart).await?;
    assert_eq!(records.len(), 1);
    let event = &records[0];
    assert_eq!(event.locatie, "Kerkstraat, 9000 GENT");
    assert_eq!(event.naam, "Rommelmarkt Centrum");
    assert_eq!(event.datum_start, at(2025, 7, 12, 10, 0));
    assert_eq!(event.datum_eind, Some(at(2025, 7, 12, 16, 0)));
    assert!(event.contact.as_deref().unwrap().contains("organisator@example.com"));
    // Submitter identity is stamped before the write
    assert_eq!(event.email.as_deref(), Some("beheer@example.com"));
    assert!(event.id.is_some());
    Ok(())
}

#[tokio::test]
async fn import_continues_past_failing_block() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let store = JsonStore::with_dir(dir.path().to_path_buf())?;
    // Five blocks; block 3 has no extractable date.
    let raw = "\
GENT (9000) Kerkstraat
za 12 juli 2025
Rommelmarkt Centrum
BRUGGE (8000) Markt
zo 13 juli 2025
Brocante aan de Reien
AALST (9300) Grote Markt
hier staat geen datum
Braderie binnenstad
LEUVEN (3000) Oude Markt
za 19 juli 2025
Garageverkoop studentenbuurt
HASSELT (3500) Kolonel Dusartplein
zo 20 juli 2025
Boerenmarkt met streekproducten
";
    let report = import::run(&store, COLLECTION, &session(), raw, at(2025, 7, 1, 12, 0)).await;
    assert_eq!(report.imported, 4);
    assert_eq!(report.errors, 1);

    // Blocks 4 and 5 were processed despite the failure in block 3
    let records = store.query_all(COLLECTION, OrderBy::DatumStart).await?;
    let names: Vec<&str> = records.iter().map(|r| r.naam.as_str()).collect();
    assert!(names.contains(&"Garageverkoop studentenbuurt"));
    assert!(names.contains(&"Boerenmarkt met streekproducten"));
    assert_eq!(records.len(), 4);
    Ok(())
}

#[tokio::test]
async fn import_rejects_past_dates_without_aborting() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let store = JsonStore::with_dir(dir.path().to_path_buf())?;
    let raw = "\
GENT (9000) Kerkstraat
za 12 juli 2025
Rommelmarkt Centrum
BRUGGE (8000) Markt
zo 13 juli 2025
Brocante aan de Reien
";
    // Submission instant after the first event's start
    let report = import::run(&store, COLLECTION, &session(), raw, at(2025, 7, 12, 12, 0)).await;
    assert_eq!(report.imported, 1);
    assert_eq!(report.errors, 1);
    Ok(())
}

#[tokio::test]
async fn imported_records_flow_into_paginated_view() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let store = JsonStore::with_dir(dir.path().to_path_buf())?;
    // 25 distinct listings across consecutive days
    let mut raw = String::new();
    for i in 0..25 {
        raw.push_str(&format!(
            "GENT (9000) Straat {}\nza {} aug 2025\nRommelmarkt nummer {}\n",
            i + 1,
            (i % 28) + 1,
            i + 1
        ));
    }
    let report = import::run(&store, COLLECTION, &session(), &raw, at(2025, 7, 1, 12, 0)).await;
    assert_eq!(report.imported, 25);

    let records = remote::load_markets(&store, COLLECTION).await?;
    let mut events = EventStore::new(12);
    events.load(records);
    let now = at(2025, 7, 1, 12, 0);

    assert_eq!(events.view(now).events.len(), 12);
    events.load_more();
    assert_eq!(events.view(now).events.len(), 24);
    events.load_more();
    let view = events.view(now);
    assert_eq!(view.events.len(), 25);
    assert!(!view.has_more);
    Ok(())
}

/// Backend that only serves the creation-order index, like a store with the
/// start-date index still building.
struct CreationOrderOnly {
    records: Vec<MarketEvent>,
}

#[async_trait]
impl DocumentStore for CreationOrderOnly {
    async fn insert(&self, _collection: &str, _event: MarketEvent) -> Result<String, StoreError> {
        Err(StoreError::Backend("alleen-lezen".to_string()))
    }

    async fn query_all(
        &self,
        _collection: &str,
        order: OrderBy,
    ) -> Result<Vec<MarketEvent>, StoreError> {
        match order {
            OrderBy::DatumStart => Err(StoreError::IndexUnavailable),
            OrderBy::ToegevoegdOpDesc => Ok(self.records.clone()),
        }
    }

    async fn delete(&self, _collection: &str, _id: &str) -> Result<(), StoreError> {
        Err(StoreError::Backend("alleen-lezen".to_string()))
    }

    async fn clear(&self, _collection: &str) -> Result<usize, StoreError> {
        Err(StoreError::Backend("alleen-lezen".to_string()))
    }
}

#[tokio::test]
async fn load_markets_falls_back_to_creation_order() -> anyhow::Result<()> {
    let backend = CreationOrderOnly {
        records: vec![
            MarketEvent::new("laat", "Gent", at(2025, 8, 1, 9, 0)),
            MarketEvent::new("vroeg", "Gent", at(2025, 7, 1, 9, 0)),
        ],
    };
    let records = remote::load_markets(&backend, COLLECTION).await?;
    assert_eq!(records.len(), 2);

    // The in-memory store re-sorts by start instant regardless of fetch order
    let mut events = EventStore::new(12);
    events.load(records);
    let view = events.view(at(2025, 6, 1, 12, 0));
    assert_eq!(view.events[0].naam, "vroeg");
    Ok(())
}
