//! Local file storage for uploaded images.
//!
//! Clients submit images as base64 strings (optionally with a
//! `data:image/...;base64,` prefix). Files land under the configured upload
//! root and are served by `ServeDir` at `/uploads`. When an image is
//! replaced, the caller deletes the old file only after the new file is
//! written and the referencing row is committed.

use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use rand::distr::{Alphanumeric, SampleString};
use thiserror::Error;

/// Public URL prefix under which stored files are served.
pub const URL_PREFIX: &str = "/uploads";

const FILE_NAME_LENGTH: usize = 40;

/// Errors that can occur in file storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The submitted payload was not valid base64.
    #[error("invalid base64 image data: {0}")]
    Decode(#[from] base64::DecodeError),

    /// A delete target resolved outside the upload root.
    #[error("invalid stored file url: {0}")]
    InvalidUrl(String),
}

/// Stores uploaded files on local disk.
#[derive(Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a file store rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Filesystem root the store writes under, for wiring up `ServeDir`.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Decode a base64 image payload and write it under `folder`, returning
    /// the public URL of the stored file.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Decode` for malformed base64 and
    /// `StorageError::Io` if the write fails.
    pub async fn store(&self, folder: &str, base64_data: &str) -> Result<String, StorageError> {
        let (data, extension) = split_data_url(base64_data);
        let bytes = BASE64.decode(data.trim())?;

        let name = Alphanumeric.sample_string(&mut rand::rng(), FILE_NAME_LENGTH);
        let file_name = format!("{name}.{extension}");

        let dir = self.root.join(folder);
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&file_name), &bytes).await?;

        Ok(format!("{URL_PREFIX}/{folder}/{file_name}"))
    }

    /// Delete a previously stored file by its public URL. A file that is
    /// already gone is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidUrl` if the URL does not point into the
    /// upload root, `StorageError::Io` if the delete fails.
    pub async fn delete(&self, url: &str) -> Result<(), StorageError> {
        let relative = url
            .strip_prefix(&format!("{URL_PREFIX}/"))
            .ok_or_else(|| StorageError::InvalidUrl(url.to_owned()))?;
        if relative.contains("..") {
            return Err(StorageError::InvalidUrl(url.to_owned()));
        }

        match tokio::fs::remove_file(self.root.join(relative)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}

/// Split an optional `data:image/<ext>;base64,` prefix off the payload,
/// defaulting the extension to `png`.
fn split_data_url(payload: &str) -> (&str, &str) {
    if let Some(rest) = payload.strip_prefix("data:image/") {
        if let Some((ext, data)) = rest.split_once(";base64,") {
            let ext = match ext {
                "jpeg" => "jpg",
                other => other,
            };
            return (data, ext);
        }
    }
    (payload, "png")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_plain_base64() {
        let (data, ext) = split_data_url("aGVsbG8=");
        assert_eq!(data, "aGVsbG8=");
        assert_eq!(ext, "png");
    }

    #[test]
    fn test_split_data_url_prefix() {
        let (data, ext) = split_data_url("data:image/jpeg;base64,aGVsbG8=");
        assert_eq!(data, "aGVsbG8=");
        assert_eq!(ext, "jpg");
    }

    #[test]
    fn test_split_data_url_webp() {
        let (_, ext) = split_data_url("data:image/webp;base64,aGVsbG8=");
        assert_eq!(ext, "webp");
    }

    #[tokio::test]
    async fn test_store_and_delete_roundtrip() {
        let dir = std::env::temp_dir().join(format!(
            "gerai-storage-test-{}",
            Alphanumeric.sample_string(&mut rand::rng(), 12)
        ));
        let store = FileStore::new(&dir);

        let url = store.store("products", "aGVsbG8=").await.expect("store");
        assert!(url.starts_with("/uploads/products/"));
        assert!(url.ends_with(".png"));

        let relative = url.strip_prefix("/uploads/").expect("prefix");
        let contents = tokio::fs::read(dir.join(relative)).await.expect("read");
        assert_eq!(contents, b"hello");

        store.delete(&url).await.expect("delete");
        // A second delete of the same file is fine
        store.delete(&url).await.expect("idempotent delete");

        tokio::fs::remove_dir_all(&dir).await.expect("cleanup");
    }

    #[tokio::test]
    async fn test_delete_rejects_foreign_url() {
        let store = FileStore::new("/tmp/gerai-uploads");
        assert!(matches!(
            store.delete("/etc/passwd").await,
            Err(StorageError::InvalidUrl(_))
        ));
        assert!(matches!(
            store.delete("/uploads/../escape.png").await,
            Err(StorageError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_store_rejects_bad_base64() {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime");
        let store = FileStore::new(std::env::temp_dir());
        let result = rt.block_on(store.store("products", "not valid base64!!!"));
        assert!(matches!(result, Err(StorageError::Decode(_))));
    }
}
