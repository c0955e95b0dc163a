//! Core types shared across the service: error taxonomy and response envelope

pub mod error;
pub mod response;

pub use error::{ApiError, FilterError, ValidationError};
pub use response::ApiResponse;
