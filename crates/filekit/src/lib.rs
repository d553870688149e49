//! Filekit - interactive file manager shell
//!
//! One command per line against a single working-directory cursor. File
//! transfers, hashing and (de)compression run as streamed pipelines that
//! never buffer whole files; failures are reported coarsely (`Operation
//! failed` / `Invalid input`) and never end the session.
//!
//! # Example
//!
//! ```rust
//! use filekit::{MemoryStorage, Outcome, Session};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let storage = Arc::new(MemoryStorage::new());
//!     storage.insert_file("/home/user/hello.txt", b"hi there");
//!
//!     let mut session = Session::builder()
//!         .storage(storage)
//!         .home("/home/user")
//!         .build();
//!
//!     let mut out = Vec::new();
//!     assert_eq!(session.dispatch("ls", &mut out).await, Outcome::Success);
//!     assert_eq!(session.dispatch("hash hello.txt", &mut out).await, Outcome::Success);
//! }
//! ```
//!
//! Custom gateways implement the [`Storage`] trait; custom commands are
//! [`Command`] implementations. Both seams are async via [`async_trait`].

mod commands;
mod cursor;
mod error;
mod pipeline;
mod session;
mod storage;

pub use commands::{
    Add, Arity, Cat, Cd, Command, Compress, Context, Cp, Decompress, Hash, Ls, Mv, Os, Rm, Rn, Up,
};
pub use cursor::Cursor;
pub use error::{Error, Result};
pub use pipeline::{GzipCompress, GzipDecompress, HexDigest, StreamPipeline, Transform};
pub use session::{Outcome, Session, SessionBuilder, EXIT_SENTINEL};
pub use storage::{
    DirEntry, FileType, LocalStorage, MemoryStorage, Metadata, Storage, StorageReader,
    StorageWriter,
};

// Re-exported so custom Storage and Command implementations don't need
// their own async-trait dependency.
pub use async_trait::async_trait;
