//! Content hash command (hash)

use async_trait::async_trait;
use sha2::Sha256;

use super::{Arity, Command, Context};
use crate::error::{Error, Result};
use crate::pipeline::{HexDigest, StreamPipeline};

/// The hash command - SHA-256 of a file, streamed chunk by chunk.
///
/// The digest stage emits the lowercase hex string only once the source has
/// fully drained, so a mid-stream error never produces a digest.
pub struct Hash;

#[async_trait]
impl Command for Hash {
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
        StreamPipeline::new()
            .stage(HexDigest::<Sha256>::new())
            .run(reader, &mut *ctx.out)
            .await?;

        ctx.write("\n").await
    }
}
