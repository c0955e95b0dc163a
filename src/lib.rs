//! # Flatboard
//!
//! A small property-listing service: clients create apartment records with
//! optional photo attachments and query them with numeric range filters.
//!
//! ## Architecture
//!
//! - **Entity store**: [`apartments::ApartmentStore`] behind an in-memory
//!   backend ([`storage::InMemoryApartmentStore`]); sole authority for
//!   identifier assignment.
//! - **Filter pipeline**: [`query::parse_filters`] validates client filter
//!   descriptors at the boundary; [`query::translate`] merges them into one
//!   range constraint per field.
//! - **Media store**: [`media::FsMediaStore`] persists photos under
//!   `{root}/{apartment_id}/{index}.jpg` and derives image association by
//!   enumerating that directory — no metadata records.
//! - **HTTP surface**: axum handlers in [`apartments::handlers`], wired by
//!   [`server::build_router`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use flatboard::prelude::*;
//!
//! let state = AppState {
//!     store: Arc::new(InMemoryApartmentStore::new()),
//!     media: Arc::new(FsMediaStore::new("images")),
//! };
//! flatboard::server::serve(state, "127.0.0.1:3000").await?;
//! ```

pub mod apartments;
pub mod config;
pub mod core;
pub mod media;
pub mod query;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Domain ===
    pub use crate::apartments::{
        Apartment, ApartmentStore, ApartmentWithImages, Coordinates, NewApartment, StoreError,
        handlers::AppState,
    };
    pub use crate::core::{ApiError, ApiResponse, FilterError, ValidationError};
    pub use crate::media::{FsMediaStore, ImageRef, ImageUpload, MediaError};
    pub use crate::query::{ApartmentQuery, FilterDescriptor, FilterOp, NumericField};

    // === Config ===
    pub use crate::config::AppConfig;

    // === Storage ===
    pub use crate::storage::InMemoryApartmentStore;

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use std::sync::Arc;
    pub use uuid::Uuid;
}
