//! File-backed media persistence and image association

pub mod store;

pub use store::{FsMediaStore, ImageRef, ImageUpload, MediaError};
