//! Storage gateway for Filekit
//!
//! The gateway is the only seam that touches real storage. Commands see the
//! [`Storage`] trait and nothing else, so the whole shell runs unchanged
//! over the local filesystem ([`LocalStorage`]) or an in-memory map
//! ([`MemoryStorage`], used by the test suite and embedders).

mod local;
mod memory;
mod traits;

pub use local::LocalStorage;
pub use memory::MemoryStorage;
pub use traits::{DirEntry, FileType, Metadata, Storage, StorageReader, StorageWriter};
