//! Entity store contract for apartment records
//!
//! The HTTP layer only ever talks to `dyn ApartmentStore`; backends live
//! under `crate::storage`. The store is the sole authority for identifier
//! assignment and uniqueness.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::model::{Apartment, NewApartment};
use crate::query::ApartmentQuery;

/// Failures of the entity store backend
///
/// "Record absent" is not an error: lookups return `Ok(None)` and searches
/// return an empty Vec, so callers can map absence and unavailability to
/// different response codes.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Identifier collision on insert
    #[error("apartment with id '{id}' already exists")]
    Duplicate { id: Uuid },

    /// The backend cannot serve requests
    #[error("storage backend unavailable: {message}")]
    Unavailable { message: String },
}

/// Persistence operations for apartment records
#[async_trait]
pub trait ApartmentStore: Send + Sync {
    /// Persist a new record, assigning its identifier and timestamps
    async fn create(&self, new: NewApartment) -> Result<Apartment, StoreError>;

    /// Look up a record by identifier
    async fn get(&self, id: &Uuid) -> Result<Option<Apartment>, StoreError>;

    /// List every record, in store-defined order
    async fn list(&self) -> Result<Vec<Apartment>, StoreError>;

    /// Search records matching a compound range query
    ///
    /// An empty result is an empty Vec, never an error.
    async fn find(&self, query: &ApartmentQuery) -> Result<Vec<Apartment>, StoreError>;
}
