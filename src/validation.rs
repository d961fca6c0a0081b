//! Submission validation for market listings.
//
// Runs synchronously before any remote call; a record that fails here never
// reaches the document store.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::model::MarketEvent;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("verplicht veld ontbreekt: {0}")]
    MissingField(&'static str),
    #[error("einde moet na het begin liggen")]
    EndNotAfterStart,
    #[error("startdatum ligt in het verleden")]
    StartInPast,
    #[error("standgeld mag niet negatief zijn")]
    NegativeFee,
}

/// Validate a candidate record against the submission rules.
///
/// `now` is the submission instant; a start strictly before it is rejected.
pub fn validate_submission(event: &MarketEvent, now: NaiveDateTime) -> Result<(), ValidationError> {
    if event.naam.trim().is_empty() {
        return Err(ValidationError::MissingField("naam"));
    }
    if event.locatie.trim().is_empty() {
        return Err(ValidationError::MissingField("locatie"));
    }
    if let Some(eind) = event.datum_eind {
        if eind <= event.datum_start {
            return Err(ValidationError::EndNotAfterStart);
        }
    }
    if event.datum_start < now {
        return Err(ValidationError::StartInPast);
    }
    if let Some(fee) = event.standgeld {
        if fee < 0.0 {
            return Err(ValidationError::NegativeFee);
        }
    }
    Ok(())
}
