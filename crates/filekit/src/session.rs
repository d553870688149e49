//! Session dispatcher
//!
//! The dispatcher owns the command table, the working-directory cursor and
//! the storage gateway, and processes exactly one input line at a time. A
//! handler failure never terminates the loop and never skips the
//! post-command cursor line; the only terminal outcome is the exit
//! sentinel, which is recognized before tokenization so no command can
//! shadow it.

use futures_util::FutureExt;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, warn};

use crate::commands::{
    self, Add, Cat, Cd, Command, Compress, Context, Cp, Decompress, Hash, Ls, Mv, Os, Rm, Rn, Up,
};
use crate::cursor::Cursor;
use crate::storage::{LocalStorage, Storage};

/// The literal input line that ends the session.
pub const EXIT_SENTINEL: &str = ".exit";

const OPERATION_FAILED: &str = "Operation failed";
const INVALID_INPUT: &str = "Invalid input";

/// Outcome of dispatching one input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The command ran to completion.
    Success,
    /// The command failed at runtime; `Operation failed` was reported.
    OperationFailed,
    /// The line never became a runnable command; `Invalid input` was
    /// reported.
    InvalidInput,
    /// The exit sentinel was received; nothing was printed.
    Exit,
}

/// An interactive file manager session.
///
/// Create one with [`Session::builder`] and feed it lines via
/// [`Session::dispatch`]. The caller serializes input: the next line is
/// read only after the previous dispatch — including any streaming
/// pipeline it awaited — has returned.
pub struct Session {
    storage: Arc<dyn Storage>,
    cursor: Cursor,
    commands: HashMap<&'static str, Box<dyn Command>>,
}

impl Session {
    /// Create a session over the given gateway, starting at `home`.
    ///
    /// The starting directory is trusted; every later cursor change goes
    /// through a verified `cd`.
    pub fn new(storage: Arc<dyn Storage>, home: impl Into<PathBuf>) -> Self {
        let mut commands: HashMap<&'static str, Box<dyn Command>> = HashMap::new();

        // The command table, built once per session.
        commands.insert("up", Box::new(Up));
        commands.insert("cd", Box::new(Cd));
        commands.insert("ls", Box::new(Ls));
        commands.insert("cat", Box::new(Cat));
        commands.insert("add", Box::new(Add));
        commands.insert("rn", Box::new(Rn));
        commands.insert("cp", Box::new(Cp));
        commands.insert("mv", Box::new(Mv));
        commands.insert("rm", Box::new(Rm));
        commands.insert("os", Box::new(Os));
        commands.insert("hash", Box::new(Hash));
        commands.insert("compress", Box::new(Compress));
        commands.insert("decompress", Box::new(Decompress));

        Self {
            storage,
            cursor: Cursor::new(home),
            commands,
        }
    }

    /// Create a new SessionBuilder for customized configuration.
    pub fn builder() -> SessionBuilder {
        SessionBuilder::default()
    }

    /// The current working directory.
    pub fn cwd(&self) -> &Path {
        self.cursor.path()
    }

    /// Dispatch one input line.
    ///
    /// Writes the command output, the coarse failure report if any, and
    /// the post-command cursor line to `out`, then returns the outcome.
    /// On [`Outcome::Exit`] nothing is written; the caller prints its own
    /// farewell.
    pub async fn dispatch<W>(&mut self, line: &str, out: &mut W) -> Outcome
    where
        W: AsyncWrite + Send + Unpin,
    {
        let line = line.trim();
        if line == EXIT_SENTINEL {
            return Outcome::Exit;
        }

        let outcome = self.run_command(line, out).await;

        let report = match outcome {
            Outcome::OperationFailed => Some(OPERATION_FAILED),
            Outcome::InvalidInput => Some(INVALID_INPUT),
            _ => None,
        };
        // Reporting is best-effort: a broken sink must not wedge the loop.
        if let Some(report) = report {
            let _ = out.write_all(report.as_bytes()).await;
            let _ = out.write_all(b"\n").await;
        }

        let state = format!("You are currently in {}\n", self.cursor.path().display());
        let _ = out.write_all(state.as_bytes()).await;
        let _ = out.flush().await;

        outcome
    }

    async fn run_command<W>(&mut self, line: &str, out: &mut W) -> Outcome
    where
        W: AsyncWrite + Send + Unpin,
    {
        let mut tokens = line.split_whitespace();
        let Some(name) = tokens.next() else {
            debug!("empty input line");
            return Outcome::InvalidInput;
        };
        let args: Vec<String> = tokens.map(str::to_string).collect();

        let Some(command) = self.commands.get(name) else {
            debug!(command = name, "unknown command");
            return Outcome::InvalidInput;
        };

        if !command.arity().accepts(args.len()) {
            debug!(
                command = name,
                args = args.len(),
                "argument count rejected"
            );
            return Outcome::InvalidInput;
        }

        let ctx = Context {
            args: &args,
            cursor: &mut self.cursor,
            storage: Arc::clone(&self.storage),
            out,
        };

        match AssertUnwindSafe(command.execute(ctx)).catch_unwind().await {
            Ok(Ok(())) => Outcome::Success,
            Ok(Err(err)) if err.is_invalid_input() => {
                debug!(command = name, %err, "usage error");
                Outcome::InvalidInput
            }
            Ok(Err(err)) => {
                warn!(command = name, %err, "command failed");
                Outcome::OperationFailed
            }
            Err(_) => {
                error!(command = name, "command panicked");
                Outcome::OperationFailed
            }
        }
    }
}

/// Builder for customized session configuration.
#[derive(Default)]
pub struct SessionBuilder {
    storage: Option<Arc<dyn Storage>>,
    home: Option<PathBuf>,
}

impl SessionBuilder {
    /// Set a custom storage gateway.
    pub fn storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Set the starting directory.
    pub fn home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    /// Build the session.
    ///
    /// Defaults: the local filesystem gateway and the user's home
    /// directory.
    pub fn build(self) -> Session {
        let storage = self
            .storage
            .unwrap_or_else(|| Arc::new(LocalStorage::new()));
        let home = self.home.unwrap_or_else(commands::home_dir);
        Session::new(storage, home)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn memory_session() -> Session {
        Session::builder()
            .storage(Arc::new(MemoryStorage::new()))
            .home("/home/user")
            .build()
    }

    #[tokio::test]
    async fn test_exit_sentinel_is_recognized_before_lookup() {
        let mut session = memory_session();
        let mut out = Vec::new();
        assert_eq!(session.dispatch(".exit", &mut out).await, Outcome::Exit);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_command_reports_invalid_input() {
        let mut session = memory_session();
        let mut out = Vec::new();
        let outcome = session.dispatch("frobnicate", &mut out).await;
        assert_eq!(outcome, Outcome::InvalidInput);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Invalid input"));
        assert!(text.contains("You are currently in /home/user"));
    }

    #[tokio::test]
    async fn test_arity_violation_reports_invalid_input() {
        let mut session = memory_session();
        let mut out = Vec::new();
        assert_eq!(session.dispatch("cd", &mut out).await, Outcome::InvalidInput);
        assert_eq!(
            session.dispatch("up extra", &mut out).await,
            Outcome::InvalidInput
        );
    }

    #[tokio::test]
    async fn test_cursor_line_prints_after_failures() {
        let mut session = memory_session();
        let mut out = Vec::new();
        let outcome = session.dispatch("cat missing.txt", &mut out).await;
        assert_eq!(outcome, Outcome::OperationFailed);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Operation failed"));
        assert!(text.ends_with("You are currently in /home/user\n"));
    }
}
