//! Local JSON-file backend: a `DocumentStore` that keeps each collection as
//! one JSON array under the user's data directory. It is the stand-in for the
//! hosted database so the binary works end-to-end offline; the trait boundary
//! keeps it swappable for a real remote backend.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::sync::Mutex;
use uuid::Uuid;

use crate::model::MarketEvent;
use crate::remote::{DocumentStore, IdentityProvider, OrderBy, Session, StoreError};

const STORE_DIR: &str = ".buurtmarkt";
// Size cap on collection files to keep a corrupt or runaway file from
// stalling startup (10MB).
const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;
const MAX_RECORDS: usize = 10_000;

pub struct JsonStore {
    store_dir: PathBuf,
}

impl JsonStore {
    /// Store under `~/.buurtmarkt`.
    pub fn new() -> Result<Self> {
        let home_dir = dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
        Self::with_dir(home_dir.join(STORE_DIR))
    }

    /// Store under an explicit directory (used by tests).
    pub fn with_dir(store_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&store_dir)?;
        Ok(Self { store_dir })
    }

    fn collection_path(&self, collection: &str) -> PathBuf {
        self.store_dir.join(format!("{}.json", collection))
    }

    fn read_collection(&self, collection: &str) -> Result<Vec<MarketEvent>, StoreError> {
        let path = self.collection_path(collection);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let metadata =
            std::fs::metadata(&path).map_err(|e| StoreError::Backend(e.to_string()))?;
        if metadata.len() > MAX_FILE_SIZE {
            return Err(StoreError::Backend(format!(
                "collectie {} overschrijdt de maximale bestandsgrootte",
                collection
            )));
        }
        let file = File::open(&path).map_err(|e| StoreError::Backend(e.to_string()))?;
        let reader = BufReader::new(file);
        let records: Vec<MarketEvent> = serde_json::from_reader(reader)
            .map_err(|e| StoreError::Backend(format!("ongeldige JSON: {}", e)))?;
        if records.len() > MAX_RECORDS {
            return Err(StoreError::Backend(format!(
                "te veel records in collectie {} (maximum {})",
                collection, MAX_RECORDS
            )));
        }
        Ok(records)
    }

    fn write_collection(
        &self,
        collection: &str,
        records: &[MarketEvent],
    ) -> Result<(), StoreError> {
        let path = self.collection_path(collection);
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, records)
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}

#[async_trait]
impl DocumentStore for JsonStore {
    async fn insert(&self, collection: &str, mut event: MarketEvent) -> Result<String, StoreError> {
        let mut records = self.read_collection(collection)?;
        let id = Uuid::new_v4().to_string();
        event.id = Some(id.clone());
        if event.toegevoegd_op.is_none() {
            event.toegevoegd_op = Some(chrono::Local::now().naive_local());
        }
        records.push(event);
        self.write_collection(collection, &records)?;
        log::debug!("record {} opgeslagen in {}", id, collection);
        Ok(id)
    }

    async fn query_all(
        &self,
        collection: &str,
        order: OrderBy,
    ) -> Result<Vec<MarketEvent>, StoreError> {
        let mut records = self.read_collection(collection)?;
        match order {
            OrderBy::DatumStart => records.sort_by_key(|r| r.datum_start),
            OrderBy::ToegevoegdOpDesc => {
                records.sort_by(|a, b| b.toegevoegd_op.cmp(&a.toegevoegd_op))
            }
        }
        Ok(records)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut records = self.read_collection(collection)?;
        let before = records.len();
        records.retain(|r| r.id.as_deref() != Some(id));
        if records.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.write_collection(collection, &records)
    }

    async fn clear(&self, collection: &str) -> Result<usize, StoreError> {
        let records = self.read_collection(collection)?;
        let removed = records.len();
        self.write_collection(collection, &[])?;
        Ok(removed)
    }
}

/// Identity provider backed by the local config: "signing in" simply adopts
/// the configured uid/e-mail pair. Mirrors the popup flow's observable
/// contract (a session appears after sign-in, disappears after sign-out)
/// without any real authentication.
pub struct ConfigIdentity {
    identity: Session,
    signed_in: Mutex<Option<Session>>,
}

impl ConfigIdentity {
    pub fn new(uid: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            identity: Session { uid: uid.into(), email: email.into() },
            signed_in: Mutex::new(None),
        }
    }
}

#[async_trait]
impl IdentityProvider for ConfigIdentity {
    async fn sign_in(&self) -> Result<Session> {
        let session = self.identity.clone();
        *self.signed_in.lock().map_err(|_| anyhow!("sessievergrendeling mislukt"))? =
            Some(session.clone());
        log::info!("aangemeld als {}", session.email);
        Ok(session)
    }

    async fn sign_out(&self) -> Result<()> {
        *self.signed_in.lock().map_err(|_| anyhow!("sessievergrendeling mislukt"))? = None;
        Ok(())
    }

    fn current(&self) -> Option<Session> {
        self.signed_in.lock().ok()?.clone()
    }
}
