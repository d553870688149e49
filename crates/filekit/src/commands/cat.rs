//! File read command (cat)

use async_trait::async_trait;

use super::{Arity, Command, Context};
use crate::error::{Error, Result};
use crate::pipeline::StreamPipeline;

/// The cat command - stream a file's bytes to the output.
///
/// Chunks are written in arrival order and the whole file is never held in
/// memory. A read error mid-stream surfaces as a failure even though some
/// chunks may already have been rendered.
pub struct Cat;

#[async_trait]
impl Command for Cat {
    fn arity(&self) -> Arity {
        Arity::exact(1)
    }

    async fn execute(&self, mut ctx: Context<'_>) -> Result<()> {
        let path = ctx.cursor.resolve(&ctx.args[0]);

        let metadata = ctx.storage.stat(&path).await?;
        if metadata.file_type.is_dir() {
            return Err(Error::Operation(format!(
                "is a directory: {}",
                path.display()
            )));
        }

        let reader = ctx.storage.open_read(&path).await?;
        StreamPipeline::new().run(reader, &mut *ctx.out).await?;

        // Keep the cursor line off the file's last (possibly unterminated)
        // line.
        ctx.write("\n").await
    }
}
