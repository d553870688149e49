//! Command handlers
//!
//! Each shell command is a [`Command`] implementation registered in the
//! session's command table. The [`Context`] carries exactly what a handler
//! may touch: the positional arguments, the working-directory cursor, the
//! storage gateway and the output sink. Navigation commands are the only
//! ones that mutate the cursor.

mod archive;
mod cat;
mod checksum;
mod fileops;
mod hostinfo;
mod listing;
mod navigation;
mod transfer;

pub use archive::{Compress, Decompress};
pub use cat::Cat;
pub use checksum::Hash;
pub use fileops::{Add, Rm, Rn};
pub use hostinfo::Os;
pub use listing::Ls;
pub use navigation::{Cd, Up};
pub use transfer::{Cp, Mv};

pub(crate) use hostinfo::home_dir;

use async_trait::async_trait;
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::cursor::Cursor;
use crate::error::Result;
use crate::storage::Storage;

/// Execution context for one command invocation.
pub struct Context<'a> {
    /// Positional arguments (not including the command name).
    pub args: &'a [String],

    /// Working-directory cursor. Read by every handler for path
    /// resolution; written only by `up` and `cd`.
    pub cursor: &'a mut Cursor,

    /// Storage gateway.
    pub storage: Arc<dyn Storage>,

    /// Output sink for human-readable command output.
    pub out: &'a mut (dyn AsyncWrite + Send + Unpin),
}

impl Context<'_> {
    /// Write text to the output sink.
    pub async fn write(&mut self, text: &str) -> Result<()> {
        self.out.write_all(text.as_bytes()).await?;
        Ok(())
    }

    /// Write one line to the output sink.
    pub async fn write_line(&mut self, text: &str) -> Result<()> {
        self.out.write_all(text.as_bytes()).await?;
        self.out.write_all(b"\n").await?;
        Ok(())
    }
}

/// Positional argument contract, validated before a handler runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    min: usize,
    max: usize,
}

impl Arity {
    /// Exactly `n` arguments.
    pub const fn exact(n: usize) -> Self {
        Self { min: n, max: n }
    }

    /// Between `min` and `max` arguments, inclusive.
    pub const fn range(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Check an argument count against the contract.
    pub fn accepts(&self, count: usize) -> bool {
        count >= self.min && count <= self.max
    }
}

/// Trait for implementing shell commands.
///
/// Return `Ok(())` once the command's output has been written to the
/// context sink; return an error to have the dispatcher report the coarse
/// failure kind (`Invalid input` for [`crate::Error::InvalidInput`],
/// `Operation failed` for everything else).
#[async_trait]
pub trait Command: Send + Sync {
    /// Accepted positional argument count.
    fn arity(&self) -> Arity;

    /// Execute the command.
    async fn execute(&self, ctx: Context<'_>) -> Result<()>;
}

/// Render a two-column table with a header row and dash underline.
pub(crate) fn render_table(headers: (&str, &str), rows: &[(String, String)]) -> String {
    let width = rows
        .iter()
        .map(|(left, _)| left.len())
        .chain([headers.0.len()])
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    out.push_str(&format!("{:<width$}  {}\n", headers.0, headers.1));
    out.push_str(&format!(
        "{:<width$}  {}\n",
        "-".repeat(headers.0.len()),
        "-".repeat(headers.1.len())
    ));
    for (left, right) in rows {
        out.push_str(&format!("{left:<width$}  {right}\n"));
    }
    out
}
