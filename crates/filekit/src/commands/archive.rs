//! Codec commands (compress, decompress)

use async_trait::async_trait;

use super::{Arity, Command, Context};
use crate::error::{Error, Result};
use crate::pipeline::{GzipCompress, GzipDecompress, StreamPipeline, Transform};

/// The compress command - gzip a file into a destination path.
pub struct Compress;

#[async_trait]
impl Command for Compress {
    fn arity(&self) -> Arity {
        Arity::exact(2)
    }

    async fn execute(&self, mut ctx: Context<'_>) -> Result<()> {
        run_codec(&mut ctx, GzipCompress::new()).await
    }
}

/// The decompress command - gunzip a file into a destination path.
pub struct Decompress;

#[async_trait]
impl Command for Decompress {
    fn arity(&self) -> Arity {
        Arity::exact(2)
    }

    async fn execute(&self, mut ctx: Context<'_>) -> Result<()> {
        run_codec(&mut ctx, GzipDecompress::new()).await
    }
}

/// Read source → codec stage → write destination, one terminal outcome.
///
/// Any stage's failure aborts the whole pipeline; the destination may be
/// left partially written but success is never reported for it.
async fn run_codec(ctx: &mut Context<'_>, stage: impl Transform + 'static) -> Result<()> {
    let src_path = ctx.cursor.resolve(&ctx.args[0]);
    let src_meta = ctx.storage.stat(&src_path).await?;
    if src_meta.file_type.is_dir() {
        return Err(Error::Operation(format!(
            "is a directory: {}",
            src_path.display()
        )));
    }

    let dest_path = ctx.cursor.resolve(&ctx.args[1]);
    if dest_path == src_path {
        return Err(Error::Operation(
            "source and destination are the same file".into(),
        ));
    }

    let reader = ctx.storage.open_read(&src_path).await?;
    let writer = ctx.storage.open_write(&dest_path).await?;
    StreamPipeline::new().stage(stage).run(reader, writer).await?;

    Ok(())
}
