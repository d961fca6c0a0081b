//! Contracts for the external collaborators: the hosted document store and the
//! identity provider. Only the call shape matters here; storage, indexing and
//! the sign-in flow itself belong to the backing service.

use async_trait::async_trait;
use thiserror::Error;

use crate::model::MarketEvent;

/// Authenticated session as delivered by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub uid: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBy {
    /// Ascending by event start instant (preferred listing order).
    DatumStart,
    /// Descending by creation instant (fallback when the start-date index is
    /// not available on the backend).
    ToegevoegdOpDesc,
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend cannot serve the requested ordering (missing index).
    #[error("index niet beschikbaar voor de gevraagde sortering")]
    IndexUnavailable,
    #[error("record niet gevonden: {0}")]
    NotFound(String),
    #[error("opslagfout: {0}")]
    Backend(String),
}

/// Hosted document database, one collection of market records.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persist a new record; the store assigns the id and stamps
    /// `toegevoegd_op`. Returns the assigned id.
    async fn insert(&self, collection: &str, event: MarketEvent) -> Result<String, StoreError>;

    /// Fetch the full collection in the requested order.
    async fn query_all(
        &self,
        collection: &str,
        order: OrderBy,
    ) -> Result<Vec<MarketEvent>, StoreError>;

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// Remove every record in the collection (admin bulk clear).
    async fn clear(&self, collection: &str) -> Result<usize, StoreError>;
}

/// Third-party sign-in. The provider owns token and session lifecycle; this
/// client only ever sees the resulting (uid, email) pair.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self) -> anyhow::Result<Session>;
    async fn sign_out(&self) -> anyhow::Result<()>;
    fn current(&self) -> Option<Session>;
}

/// Load the collection for listing, preferring start-date order and falling
/// back to creation order when the index is unavailable. One fallback, no
/// backoff; any other error propagates.
pub async fn load_markets(
    store: &dyn DocumentStore,
    collection: &str,
) -> Result<Vec<MarketEvent>, StoreError> {
    match store.query_all(collection, OrderBy::DatumStart).await {
        Ok(records) => Ok(records),
        Err(StoreError::IndexUnavailable) => {
            log::info!("index ontbreekt, fallback op sortering per toegevoegd_op");
            store.query_all(collection, OrderBy::ToegevoegdOpDesc).await
        }
        Err(e) => Err(e),
    }
}

/// Advisory admin check against the configured allow-list. This is evaluated
/// client-side only; the backend enforces nothing.
pub fn is_admin(session: Option<&Session>, admin_emails: &[String]) -> bool {
    session
        .map(|s| admin_emails.iter().any(|e| e.eq_ignore_ascii_case(&s.email)))
        .unwrap_or(false)
}
