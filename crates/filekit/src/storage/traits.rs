//! Storage gateway trait definitions

use async_trait::async_trait;
use std::path::Path;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::error::Result;

/// Readable byte stream handed out by a gateway.
pub type StorageReader = Box<dyn AsyncRead + Send + Unpin>;

/// Writable byte stream handed out by a gateway.
///
/// A write is complete only once the stream has been flushed and shut down;
/// gateways may defer the actual commit until then.
pub type StorageWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Async storage gateway.
///
/// The operation set is exactly what the command surface needs: metadata,
/// listing, exclusive create, rename, single-file unlink, and streaming
/// read/write handles. There is no recursive delete and no
/// directory creation on this seam.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Get metadata for a path.
    async fn stat(&self, path: &Path) -> Result<Metadata>;

    /// Read directory entries. Fails if the path is not a directory.
    async fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>>;

    /// Check if a path exists.
    async fn exists(&self, path: &Path) -> Result<bool>;

    /// Create a new empty file. Fails if the path already exists.
    async fn create_new(&self, path: &Path) -> Result<()>;

    /// Rename a file or directory. Atomic at the storage layer.
    async fn rename(&self, from: &Path, to: &Path) -> Result<()>;

    /// Remove a single file. Fails on directories.
    async fn unlink(&self, path: &Path) -> Result<()>;

    /// Open a file for streamed reading.
    async fn open_read(&self, path: &Path) -> Result<StorageReader>;

    /// Open a file for streamed writing, creating or truncating it.
    async fn open_write(&self, path: &Path) -> Result<StorageWriter>;
}

/// File metadata.
#[derive(Debug, Clone)]
pub struct Metadata {
    /// Entry type
    pub file_type: FileType,
    /// Size in bytes
    pub size: u64,
}

/// Entry type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// Regular file
    File,
    /// Directory
    Directory,
    /// Symbolic link
    Symlink,
}

impl FileType {
    /// Check if this is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self, FileType::File)
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, FileType::Directory)
    }
}

/// Directory entry.
#[derive(Debug, Clone)]
pub struct DirEntry {
    /// Entry name (not the full path)
    pub name: String,
    /// Entry type
    pub file_type: FileType,
}
