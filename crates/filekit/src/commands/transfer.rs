//! Streamed transfer commands (cp, mv)

use async_trait::async_trait;
use std::path::PathBuf;

use super::{Arity, Command, Context};
use crate::error::{Error, Result};
use crate::pipeline::StreamPipeline;

/// The cp command - streamed copy of a file into a directory.
///
/// The destination is always a directory; the effective target is
/// `destDir/basename(source)`. Success means the sink was fully flushed,
/// not merely that the streams were attached.
pub struct Cp;

#[async_trait]
impl Command for Cp {
    fn arity(&self) -> Arity {
        Arity::exact(2)
    }

    async fn execute(&self, mut ctx: Context<'_>) -> Result<()> {
        let (source, dest) = (ctx.args[0].clone(), ctx.args[1].clone());
        copy_into(&mut ctx, &source, &dest).await?;
        Ok(())
    }
}

/// The mv command - streamed copy, then unlink of the source.
///
/// The source is removed only after the copy fully completed, so a copy
/// failure leaves it intact. An unlink failure after a successful copy is
/// still a failure: move is not atomic across the copy/unlink boundary and
/// a duplicate remains at the destination.
pub struct Mv;

#[async_trait]
impl Command for Mv {
    fn arity(&self) -> Arity {
        Arity::exact(2)
    }

    async fn execute(&self, mut ctx: Context<'_>) -> Result<()> {
        let (arg0, arg1) = (ctx.args[0].clone(), ctx.args[1].clone());
        let source = copy_into(&mut ctx, &arg0, &arg1).await?;
        ctx.storage.unlink(&source).await
    }
}

/// Check the transfer preconditions, stream the bytes, and return the
/// resolved source path.
///
/// Checked before any bytes move: the source is not a directory and the
/// destination is an existing directory. Copying a file onto itself is
/// refused — streaming into the write handle would truncate the source
/// before it is read.
async fn copy_into(ctx: &mut Context<'_>, source: &str, dest: &str) -> Result<PathBuf> {
    let src_path = ctx.cursor.resolve(source);
    let src_meta = ctx.storage.stat(&src_path).await?;
    if src_meta.file_type.is_dir() {
        return Err(Error::Operation(format!(
            "source is a directory: {}",
            src_path.display()
        )));
    }

    let dest_dir = ctx.cursor.resolve(dest);
    let dest_meta = ctx.storage.stat(&dest_dir).await?;
    if !dest_meta.file_type.is_dir() {
        return Err(Error::Operation(format!(
            "destination is not a directory: {}",
            dest_dir.display()
        )));
    }

    let Some(name) = src_path.file_name() else {
        return Err(Error::Operation(format!(
            "source has no file name: {}",
            src_path.display()
        )));
    };
    let dest_path = dest_dir.join(name);
    if dest_path == src_path {
        return Err(Error::Operation(
            "source and destination are the same file".into(),
        ));
    }

    let reader = ctx.storage.open_read(&src_path).await?;
    let writer = ctx.storage.open_write(&dest_path).await?;
    StreamPipeline::new().run(reader, writer).await?;

    Ok(src_path)
}
