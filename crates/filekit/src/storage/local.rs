//! Local filesystem gateway backed by `tokio::fs`

use async_trait::async_trait;
use std::path::Path;
use tokio::fs::{File, OpenOptions};

use super::traits::{DirEntry, FileType, Metadata, Storage, StorageReader, StorageWriter};
use crate::error::Result;

/// Storage gateway over the real local filesystem.
///
/// Stateless; every operation maps to one `tokio::fs` call. `stat` follows
/// symlinks, so `cd` into a symlinked directory behaves like a shell.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

impl LocalStorage {
    /// Create a new local gateway.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn stat(&self, path: &Path) -> Result<Metadata> {
        let meta = tokio::fs::metadata(path).await?;
        Ok(Metadata {
            file_type: if meta.is_dir() {
                FileType::Directory
            } else {
                FileType::File
            },
            size: meta.len(),
        })
    }

    async fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let mut reader = tokio::fs::read_dir(path).await?;
        let mut entries = Vec::new();

        while let Some(entry) = reader.next_entry().await? {
            let file_type = entry.file_type().await?;
            let kind = if file_type.is_dir() {
                FileType::Directory
            } else if file_type.is_symlink() {
                FileType::Symlink
            } else {
                FileType::File
            };

            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().to_string(),
                file_type: kind,
            });
        }

        Ok(entries)
    }

    async fn exists(&self, path: &Path) -> Result<bool> {
        Ok(tokio::fs::try_exists(path).await?)
    }

    async fn create_new(&self, path: &Path) -> Result<()> {
        // create_new gives exclusive-create semantics: no overwrite.
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await?;
        Ok(())
    }

    async fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        tokio::fs::rename(from, to).await?;
        Ok(())
    }

    async fn unlink(&self, path: &Path) -> Result<()> {
        // remove_file refuses directories, which is exactly the rm contract.
        tokio::fs::remove_file(path).await?;
        Ok(())
    }

    async fn open_read(&self, path: &Path) -> Result<StorageReader> {
        let file = File::open(path).await?;
        Ok(Box::new(file))
    }

    async fn open_write(&self, path: &Path) -> Result<StorageWriter> {
        let file = File::create(path).await?;
        Ok(Box::new(file))
    }
}
