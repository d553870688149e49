//! Navigation commands (up, cd)

use async_trait::async_trait;

use super::{Arity, Command, Context};
use crate::error::{Error, Result};

/// The up command - move the cursor to its parent directory.
///
/// At the filesystem root this is a no-op, not a failure.
pub struct Up;

#[async_trait]
impl Command for Up {
    fn arity(&self) -> Arity {
        Arity::exact(0)
    }

    async fn execute(&self, ctx: Context<'_>) -> Result<()> {
        ctx.cursor.ascend();
        Ok(())
    }
}

/// The cd command - change the working directory.
///
/// The target is stat'ed first; on any failure the cursor is left
/// untouched, otherwise it is replaced in a single assignment.
pub struct Cd;

#[async_trait]
impl Command for Cd {
    fn arity(&self) -> Arity {
        Arity::exact(1)
    }

    async fn execute(&self, ctx: Context<'_>) -> Result<()> {
        let target = ctx.cursor.resolve(&ctx.args[0]);

        let metadata = ctx.storage.stat(&target).await?;
        if !metadata.file_type.is_dir() {
            return Err(Error::Operation(format!(
                "not a directory: {}",
                target.display()
            )));
        }

        ctx.cursor.replace(target);
        Ok(())
    }
}
