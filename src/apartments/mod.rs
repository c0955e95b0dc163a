//! Apartment domain: entity model, store contract, and HTTP handlers

pub mod handlers;
pub mod model;
pub mod store;

pub use model::{Apartment, ApartmentWithImages, Coordinates, NewApartment};
pub use store::{ApartmentStore, StoreError};
