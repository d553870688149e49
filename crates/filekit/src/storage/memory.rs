//! In-memory storage gateway
//!
//! A map-backed gateway used by the test suite and by embedders that want a
//! sandboxed session. Writes stream into a buffer and commit to the map
//! when the writer is flushed or shut down, so "sink fully flushed" has the
//! same meaning here as on a real filesystem.

use async_trait::async_trait;
use std::collections::HashMap;
use std::io::{Error as IoError, ErrorKind};
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, RwLock};
use std::task::{Context, Poll};
use tokio::io::AsyncWrite;

use super::traits::{DirEntry, FileType, Metadata, Storage, StorageReader, StorageWriter};
use crate::cursor::normalize_path;
use crate::error::Result;

type EntryMap = HashMap<PathBuf, Entry>;

/// In-memory storage gateway.
#[derive(Clone)]
pub struct MemoryStorage {
    entries: Arc<RwLock<EntryMap>>,
}

#[derive(Debug, Clone)]
enum Entry {
    File(Vec<u8>),
    Directory,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStorage {
    /// Create a new in-memory gateway seeded with `/`, `/home` and
    /// `/home/user`.
    pub fn new() -> Self {
        let mut entries = HashMap::new();
        for dir in ["/", "/home", "/home/user"] {
            entries.insert(PathBuf::from(dir), Entry::Directory);
        }
        Self {
            entries: Arc::new(RwLock::new(entries)),
        }
    }

    /// Insert a directory, for test fixtures.
    pub fn insert_dir(&self, path: impl AsRef<Path>) {
        let path = normalize_path(path.as_ref());
        self.entries.write().unwrap().insert(path, Entry::Directory);
    }

    /// Insert a file with the given content, for test fixtures.
    pub fn insert_file(&self, path: impl AsRef<Path>, content: &[u8]) {
        let path = normalize_path(path.as_ref());
        self.entries
            .write()
            .unwrap()
            .insert(path, Entry::File(content.to_vec()));
    }

    /// Read a file's committed content, for test assertions.
    pub fn file_contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        let path = normalize_path(path.as_ref());
        match self.entries.read().unwrap().get(&path) {
            Some(Entry::File(content)) => Some(content.clone()),
            _ => None,
        }
    }

    fn parent_is_dir(entries: &EntryMap, path: &Path) -> bool {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                matches!(entries.get(parent), Some(Entry::Directory))
            }
            _ => true,
        }
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn stat(&self, path: &Path) -> Result<Metadata> {
        let path = normalize_path(path);
        let entries = self.entries.read().unwrap();

        match entries.get(&path) {
            Some(Entry::File(content)) => Ok(Metadata {
                file_type: FileType::File,
                size: content.len() as u64,
            }),
            Some(Entry::Directory) => Ok(Metadata {
                file_type: FileType::Directory,
                size: 0,
            }),
            None => Err(IoError::new(ErrorKind::NotFound, "not found").into()),
        }
    }

    async fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let path = normalize_path(path);
        let entries = self.entries.read().unwrap();

        match entries.get(&path) {
            Some(Entry::Directory) => {
                let mut result = Vec::new();

                for (entry_path, entry) in entries.iter() {
                    if entry_path.parent() == Some(&path) && entry_path != &path {
                        let name = entry_path
                            .file_name()
                            .map(|n| n.to_string_lossy().to_string())
                            .unwrap_or_default();
                        let file_type = match entry {
                            Entry::File(_) => FileType::File,
                            Entry::Directory => FileType::Directory,
                        };
                        result.push(DirEntry { name, file_type });
                    }
                }

                Ok(result)
            }
            Some(_) => Err(IoError::other("not a directory").into()),
            None => Err(IoError::new(ErrorKind::NotFound, "not found").into()),
        }
    }

    async fn exists(&self, path: &Path) -> Result<bool> {
        let path = normalize_path(path);
        Ok(self.entries.read().unwrap().contains_key(&path))
    }

    async fn create_new(&self, path: &Path) -> Result<()> {
        let path = normalize_path(path);
        let mut entries = self.entries.write().unwrap();

        if entries.contains_key(&path) {
            return Err(IoError::new(ErrorKind::AlreadyExists, "file exists").into());
        }
        if !Self::parent_is_dir(&entries, &path) {
            return Err(IoError::new(ErrorKind::NotFound, "parent directory not found").into());
        }

        entries.insert(path, Entry::File(Vec::new()));
        Ok(())
    }

    async fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        let from = normalize_path(from);
        let to = normalize_path(to);
        let mut entries = self.entries.write().unwrap();

        if !entries.contains_key(&from) {
            return Err(IoError::new(ErrorKind::NotFound, "not found").into());
        }

        // Move the entry and everything under it so directory renames keep
        // their children reachable.
        let moved: Vec<PathBuf> = entries
            .keys()
            .filter(|p| p.starts_with(&from))
            .cloned()
            .collect();

        for old in moved {
            if let Some(entry) = entries.remove(&old) {
                let new = match old.strip_prefix(&from) {
                    Ok(suffix) if !suffix.as_os_str().is_empty() => to.join(suffix),
                    _ => to.clone(),
                };
                entries.insert(new, entry);
            }
        }

        Ok(())
    }

    async fn unlink(&self, path: &Path) -> Result<()> {
        let path = normalize_path(path);
        let mut entries = self.entries.write().unwrap();

        match entries.get(&path) {
            Some(Entry::File(_)) => {
                entries.remove(&path);
                Ok(())
            }
            Some(Entry::Directory) => Err(IoError::other("is a directory").into()),
            None => Err(IoError::new(ErrorKind::NotFound, "not found").into()),
        }
    }

    async fn open_read(&self, path: &Path) -> Result<StorageReader> {
        let path = normalize_path(path);
        let entries = self.entries.read().unwrap();

        match entries.get(&path) {
            Some(Entry::File(content)) => Ok(Box::new(std::io::Cursor::new(content.clone()))),
            Some(Entry::Directory) => Err(IoError::other("is a directory").into()),
            None => Err(IoError::new(ErrorKind::NotFound, "not found").into()),
        }
    }

    async fn open_write(&self, path: &Path) -> Result<StorageWriter> {
        let path = normalize_path(path);
        let entries = self.entries.read().unwrap();

        if matches!(entries.get(&path), Some(Entry::Directory)) {
            return Err(IoError::other("is a directory").into());
        }
        if !Self::parent_is_dir(&entries, &path) {
            return Err(IoError::new(ErrorKind::NotFound, "parent directory not found").into());
        }
        drop(entries);

        Ok(Box::new(MemoryWriter {
            path,
            buf: Vec::new(),
            entries: Arc::clone(&self.entries),
        }))
    }
}

/// Buffering writer that commits to the entry map on flush/shutdown.
struct MemoryWriter {
    path: PathBuf,
    buf: Vec<u8>,
    entries: Arc<RwLock<EntryMap>>,
}

impl MemoryWriter {
    fn commit(&self) {
        self.entries
            .write()
            .unwrap()
            .insert(self.path.clone(), Entry::File(self.buf.clone()));
    }
}

impl AsyncWrite for MemoryWriter {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<std::io::Result<usize>> {
        self.get_mut().buf.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        self.commit();
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        self.commit();
        Poll::Ready(Ok(()))
    }
}
