//! In-memory implementation of ApartmentStore for testing and development

use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::apartments::model::{Apartment, NewApartment};
use crate::apartments::store::{ApartmentStore, StoreError};
use crate::query::ApartmentQuery;

/// In-memory apartment store
///
/// Useful for testing and development. Uses RwLock for thread-safe access;
/// listing order follows insertion order.
#[derive(Clone, Default)]
pub struct InMemoryApartmentStore {
    records: Arc<RwLock<IndexMap<Uuid, Apartment>>>,
}

impl InMemoryApartmentStore {
    /// Create a new in-memory apartment store
    pub fn new() -> Self {
        Self::default()
    }

    fn unavailable<E: std::fmt::Display>(err: E) -> StoreError {
        StoreError::Unavailable {
            message: format!("failed to acquire lock: {}", err),
        }
    }
}

#[async_trait]
impl ApartmentStore for InMemoryApartmentStore {
    async fn create(&self, new: NewApartment) -> Result<Apartment, StoreError> {
        let apartment = Apartment::create(new);

        let mut records = self.records.write().map_err(Self::unavailable)?;
        if records.contains_key(&apartment.id) {
            return Err(StoreError::Duplicate { id: apartment.id });
        }
        records.insert(apartment.id, apartment.clone());

        Ok(apartment)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Apartment>, StoreError> {
        let records = self.records.read().map_err(Self::unavailable)?;
        Ok(records.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Apartment>, StoreError> {
        let records = self.records.read().map_err(Self::unavailable)?;
        Ok(records.values().cloned().collect())
    }

    async fn find(&self, query: &ApartmentQuery) -> Result<Vec<Apartment>, StoreError> {
        let records = self.records.read().map_err(Self::unavailable)?;
        Ok(records
            .values()
            .filter(|apartment| query.matches(apartment))
            .cloned()
            .collect())
    }
}
