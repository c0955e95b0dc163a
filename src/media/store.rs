//! Filesystem-backed media store
//!
//! Uploaded photos live on durable storage, never in the entity store: one
//! directory per apartment identifier, files named by their zero-based
//! position in the upload batch. Image identity is always the pair
//! (apartment id, index) — there is no independent image identifier and no
//! metadata record; association is derived by enumerating the directory at
//! query time.

use futures::future::join_all;
use serde::{Serialize, Serializer};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use uuid::Uuid;

/// File extension used for every stored image
pub const IMAGE_EXT: &str = "jpg";

/// Failures of the media store
#[derive(Debug, Error)]
pub enum MediaError {
    /// No stored file for this (apartment, index) pair
    #[error("image {index} for apartment '{apartment_id}' not found")]
    NotFound { apartment_id: Uuid, index: u32 },

    /// One or more files in an upload batch failed to persist
    #[error("failed to persist upload batch for apartment '{apartment_id}': {message}")]
    BatchWrite { apartment_id: Uuid, message: String },

    /// Underlying filesystem error outside a batch write
    #[error("media storage error: {0}")]
    Io(#[from] std::io::Error),
}

/// An uploaded file awaiting persistence
///
/// The original client file name is kept for logging only; stored names are
/// derived from the batch position.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

/// Addressable reference to a stored image
///
/// Serializes as the relative locator the image-serving route understands,
/// e.g. `/apartments/images/{apartment_id}/{index}.jpg`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageRef {
    pub apartment_id: Uuid,
    pub index: u32,
}

impl ImageRef {
    pub fn location(&self) -> String {
        format!(
            "/apartments/images/{}/{}.{}",
            self.apartment_id, self.index, IMAGE_EXT
        )
    }
}

impl Serialize for ImageRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.location())
    }
}

/// Parse a stored image file name (`{index}.jpg`) back into its index
pub fn parse_image_name(name: &str) -> Option<u32> {
    name.strip_suffix(IMAGE_EXT)?
        .strip_suffix('.')?
        .parse()
        .ok()
}

/// Filesystem media store rooted at a configurable directory
#[derive(Debug, Clone)]
pub struct FsMediaStore {
    root: PathBuf,
}

impl FsMediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn apartment_dir(&self, id: &Uuid) -> PathBuf {
        self.root.join(id.to_string())
    }

    fn image_path(&self, id: &Uuid, index: u32) -> PathBuf {
        self.apartment_dir(id)
            .join(format!("{}.{}", index, IMAGE_EXT))
    }

    /// Persist an upload batch under the apartment's directory
    ///
    /// Creates the scoping directory if absent, then issues one write per
    /// file concurrently and joins them. The batch is all-or-nothing: if any
    /// write fails, the apartment's media directory is removed (best-effort)
    /// so a partial image set is never observable, and the whole batch is
    /// reported as failed.
    pub async fn store_batch(&self, id: &Uuid, files: &[ImageUpload]) -> Result<(), MediaError> {
        if files.is_empty() {
            return Ok(());
        }

        let dir = self.apartment_dir(id);
        match self.write_batch(&dir, files).await {
            Ok(()) => {
                tracing::debug!(apartment_id = %id, count = files.len(), "stored upload batch");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(apartment_id = %id, error = %err, "upload batch failed, rolling back");
                let _ = fs::remove_dir_all(&dir).await;
                Err(MediaError::BatchWrite {
                    apartment_id: *id,
                    message: err.to_string(),
                })
            }
        }
    }

    async fn write_batch(&self, dir: &Path, files: &[ImageUpload]) -> std::io::Result<()> {
        fs::create_dir_all(dir).await?;

        let writes = files.iter().enumerate().map(|(index, upload)| {
            let path = dir.join(format!("{}.{}", index, IMAGE_EXT));
            fs::write(path, upload.bytes.clone())
        });

        // every write runs to completion before the batch verdict; the
        // rollback in store_batch must never race an in-flight write
        for result in join_all(writes).await {
            result?;
        }

        Ok(())
    }

    /// Read the stored bytes for one image
    pub async fn retrieve(&self, id: &Uuid, index: u32) -> Result<Vec<u8>, MediaError> {
        match fs::read(self.image_path(id, index)).await {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(MediaError::NotFound {
                apartment_id: *id,
                index,
            }),
            Err(err) => Err(MediaError::Io(err)),
        }
    }

    /// Enumerate the images associated with an apartment, ordered by index
    ///
    /// An apartment with no stored files (or no directory at all) resolves
    /// to an empty sequence, not an error. This never reads file content.
    pub async fn resolve(&self, id: &Uuid) -> Result<Vec<ImageRef>, MediaError> {
        let mut entries = match fs::read_dir(self.apartment_dir(id)).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(MediaError::Io(err)),
        };

        let mut indices = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if let Some(index) = entry.file_name().to_str().and_then(parse_image_name) {
                indices.push(index);
            }
        }
        indices.sort_unstable();

        Ok(indices
            .into_iter()
            .map(|index| ImageRef {
                apartment_id: *id,
                index,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn upload(bytes: &[u8]) -> ImageUpload {
        ImageUpload {
            file_name: Some("photo.jpg".to_string()),
            bytes: bytes.to_vec(),
        }
    }

    #[tokio::test]
    async fn test_store_and_resolve_preserves_upload_order() {
        let dir = tempdir().unwrap();
        let store = FsMediaStore::new(dir.path());
        let id = Uuid::new_v4();

        store
            .store_batch(&id, &[upload(b"zero"), upload(b"one"), upload(b"two")])
            .await
            .unwrap();

        let refs = store.resolve(&id).await.unwrap();
        assert_eq!(refs.len(), 3);
        assert_eq!(
            refs.iter().map(|r| r.index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert_eq!(refs[1].location(), format!("/apartments/images/{}/1.jpg", id));
    }

    #[tokio::test]
    async fn test_resolve_without_uploads_is_empty_not_error() {
        let dir = tempdir().unwrap();
        let store = FsMediaStore::new(dir.path());

        let refs = store.resolve(&Uuid::new_v4()).await.unwrap();
        assert!(refs.is_empty());
    }

    #[tokio::test]
    async fn test_retrieve_round_trips_bytes() {
        let dir = tempdir().unwrap();
        let store = FsMediaStore::new(dir.path());
        let id = Uuid::new_v4();

        store
            .store_batch(&id, &[upload(b"front door"), upload(b"kitchen")])
            .await
            .unwrap();

        assert_eq!(store.retrieve(&id, 0).await.unwrap(), b"front door");
        assert_eq!(store.retrieve(&id, 1).await.unwrap(), b"kitchen");
    }

    #[tokio::test]
    async fn test_retrieve_missing_image_is_not_found() {
        let dir = tempdir().unwrap();
        let store = FsMediaStore::new(dir.path());
        let id = Uuid::new_v4();

        let err = store.retrieve(&id, 0).await.unwrap_err();
        assert!(matches!(err, MediaError::NotFound { index: 0, .. }));
    }

    #[tokio::test]
    async fn test_failed_batch_rolls_back_written_files() {
        let dir = tempdir().unwrap();
        let store = FsMediaStore::new(dir.path());
        let id = Uuid::new_v4();

        // occupy the path of the second file with a directory so its write fails
        std::fs::create_dir_all(dir.path().join(id.to_string()).join("1.jpg")).unwrap();

        let err = store
            .store_batch(&id, &[upload(b"ok"), upload(b"collides")])
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::BatchWrite { .. }));

        // nothing of the batch survives, including the first (successful) write
        assert!(!dir.path().join(id.to_string()).exists());
        assert!(store.resolve(&id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_batch_creates_nothing() {
        let dir = tempdir().unwrap();
        let store = FsMediaStore::new(dir.path());
        let id = Uuid::new_v4();

        store.store_batch(&id, &[]).await.unwrap();
        assert!(!dir.path().join(id.to_string()).exists());
    }

    #[tokio::test]
    async fn test_resolve_orders_double_digit_indices_numerically() {
        let dir = tempdir().unwrap();
        let store = FsMediaStore::new(dir.path());
        let id = Uuid::new_v4();

        let files: Vec<ImageUpload> = (0..12).map(|i| upload(format!("{i}").as_bytes())).collect();
        store.store_batch(&id, &files).await.unwrap();

        let indices: Vec<u32> = store.resolve(&id).await.unwrap().iter().map(|r| r.index).collect();
        assert_eq!(indices, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn test_parse_image_name() {
        assert_eq!(parse_image_name("0.jpg"), Some(0));
        assert_eq!(parse_image_name("17.jpg"), Some(17));
        assert_eq!(parse_image_name("cover.jpg"), None);
        assert_eq!(parse_image_name("3.png"), None);
        assert_eq!(parse_image_name("3"), None);
    }

    #[test]
    fn test_image_ref_serializes_as_locator() {
        let id = Uuid::nil();
        let image = ImageRef {
            apartment_id: id,
            index: 2,
        };
        let json = serde_json::to_string(&image).unwrap();
        assert_eq!(
            json,
            format!("\"/apartments/images/{}/2.jpg\"", id)
        );
    }
}
