//! File operation commands (add, rn, rm)

use async_trait::async_trait;

use super::{Arity, Command, Context};
use crate::error::Result;

/// The add command - create a new empty file.
///
/// Exclusive-create: an existing target is a failure, never an overwrite.
pub struct Add;

#[async_trait]
impl Command for Add {
    fn arity(&self) -> Arity {
        Arity::exact(1)
    }

    async fn execute(&self, ctx: Context<'_>) -> Result<()> {
        let path = ctx.cursor.resolve(&ctx.args[0]);
        ctx.storage.create_new(&path).await
    }
}

/// The rn command - rename a file or directory.
///
/// Both operands resolve against the cursor; the rename itself is atomic at
/// the storage layer.
pub struct Rn;

#[async_trait]
impl Command for Rn {
    fn arity(&self) -> Arity {
        Arity::exact(2)
    }

    async fn execute(&self, ctx: Context<'_>) -> Result<()> {
        let from = ctx.cursor.resolve(&ctx.args[0]);
        let to = ctx.cursor.resolve(&ctx.args[1]);
        ctx.storage.rename(&from, &to).await
    }
}

/// The rm command - delete a single file.
///
/// Directories are refused; there is no recursive delete.
pub struct Rm;

#[async_trait]
impl Command for Rm {
    fn arity(&self) -> Arity {
        Arity::exact(1)
    }

    async fn execute(&self, ctx: Context<'_>) -> Result<()> {
        let path = ctx.cursor.resolve(&ctx.args[0]);
        ctx.storage.unlink(&path).await
    }
}
