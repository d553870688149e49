//! Streaming pipeline: source → transform stages → sink
//!
//! Every streaming command (cat, cp, mv, hash, compress, decompress) is one
//! pipeline run with a single terminal outcome. Chunks flow through the
//! stages in arrival order; success is reported only after the source is
//! drained, every stage has flushed its tail, and the sink is shut down.

use flate2::write::{GzDecoder, GzEncoder};
use flate2::Compression;
use sha2::Digest;
use std::io::Write;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{Error, Result};

const CHUNK_SIZE: usize = 64 * 1024;

/// An incremental byte transform.
///
/// `update` consumes one chunk and returns whatever output is ready;
/// `finish` returns the tail once the input is exhausted. A stage may hold
/// bytes back across updates (codecs) or emit everything at the end
/// (digests).
pub trait Transform: Send {
    /// Feed one chunk; return the bytes produced by it.
    fn update(&mut self, chunk: &[u8]) -> Result<Vec<u8>>;

    /// Signal end of input; return the remaining output.
    fn finish(&mut self) -> Result<Vec<u8>>;
}

/// Gzip compression stage.
pub struct GzipCompress {
    encoder: Option<GzEncoder<Vec<u8>>>,
}

impl Default for GzipCompress {
    fn default() -> Self {
        Self::new()
    }
}

impl GzipCompress {
    /// Create a compression stage at the default level.
    pub fn new() -> Self {
        Self {
            encoder: Some(GzEncoder::new(Vec::new(), Compression::default())),
        }
    }
}

impl Transform for GzipCompress {
    fn update(&mut self, chunk: &[u8]) -> Result<Vec<u8>> {
        let Some(encoder) = self.encoder.as_mut() else {
            return Err(Error::Operation("codec already finalized".into()));
        };
        encoder.write_all(chunk)?;
        Ok(std::mem::take(encoder.get_mut()))
    }

    fn finish(&mut self) -> Result<Vec<u8>> {
        match self.encoder.take() {
            Some(encoder) => Ok(encoder.finish()?),
            None => Ok(Vec::new()),
        }
    }
}

/// Gzip decompression stage.
///
/// Corrupt or truncated input surfaces as an error from `update` or
/// `finish`, aborting the pipeline.
pub struct GzipDecompress {
    decoder: Option<GzDecoder<Vec<u8>>>,
}

impl Default for GzipDecompress {
    fn default() -> Self {
        Self::new()
    }
}

impl GzipDecompress {
    /// Create a decompression stage.
    pub fn new() -> Self {
        Self {
            decoder: Some(GzDecoder::new(Vec::new())),
        }
    }
}

impl Transform for GzipDecompress {
    fn update(&mut self, chunk: &[u8]) -> Result<Vec<u8>> {
        let Some(decoder) = self.decoder.as_mut() else {
            return Err(Error::Operation("codec already finalized".into()));
        };
        decoder.write_all(chunk)?;
        Ok(std::mem::take(decoder.get_mut()))
    }

    fn finish(&mut self) -> Result<Vec<u8>> {
        match self.decoder.take() {
            Some(decoder) => Ok(decoder.finish()?),
            None => Ok(Vec::new()),
        }
    }
}

/// Digest accumulation stage.
///
/// Consumes the stream and emits nothing until `finish`, which produces the
/// lowercase hex digest. A pipeline that errors mid-stream therefore never
/// emits a digest.
pub struct HexDigest<D: Digest> {
    hasher: Option<D>,
}

impl<D: Digest> Default for HexDigest<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Digest> HexDigest<D> {
    /// Create a digest stage.
    pub fn new() -> Self {
        Self {
            hasher: Some(D::new()),
        }
    }
}

impl<D: Digest + Send> Transform for HexDigest<D> {
    fn update(&mut self, chunk: &[u8]) -> Result<Vec<u8>> {
        if let Some(hasher) = self.hasher.as_mut() {
            hasher.update(chunk);
        }
        Ok(Vec::new())
    }

    fn finish(&mut self) -> Result<Vec<u8>> {
        match self.hasher.take() {
            Some(hasher) => {
                let hex: String = hasher
                    .finalize()
                    .iter()
                    .map(|b| format!("{:02x}", b))
                    .collect();
                Ok(hex.into_bytes())
            }
            None => Ok(Vec::new()),
        }
    }
}

/// A source → transforms → sink pipeline.
///
/// With no stages it is a plain streamed copy.
#[derive(Default)]
pub struct StreamPipeline {
    stages: Vec<Box<dyn Transform>>,
}

impl StreamPipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Append a transform stage.
    pub fn stage(mut self, stage: impl Transform + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Run the pipeline to completion.
    ///
    /// Returns the number of bytes written to the sink. The sink is flushed
    /// and shut down before success is reported; any error from the source,
    /// a stage, or the sink aborts the whole run.
    pub async fn run<R, W>(mut self, mut source: R, mut sink: W) -> Result<u64>
    where
        R: AsyncRead + Unpin + Send,
        W: AsyncWrite + Unpin + Send,
    {
        let mut buf = vec![0u8; CHUNK_SIZE];
        let mut written = 0u64;

        loop {
            let n = source.read(&mut buf).await?;
            if n == 0 {
                break;
            }

            let mut chunk = buf[..n].to_vec();
            for stage in self.stages.iter_mut() {
                chunk = stage.update(&chunk)?;
            }
            if !chunk.is_empty() {
                written += chunk.len() as u64;
                sink.write_all(&chunk).await?;
            }
        }

        // Drain stage tails in order; stage i's tail still flows through
        // every stage after it.
        for i in 0..self.stages.len() {
            let (head, rest) = self.stages.split_at_mut(i + 1);
            let mut tail = head[i].finish()?;
            for stage in rest.iter_mut() {
                tail = stage.update(&tail)?;
            }
            if !tail.is_empty() {
                written += tail.len() as u64;
                sink.write_all(&tail).await?;
            }
        }

        sink.flush().await?;
        sink.shutdown().await?;
        Ok(written)
    }
}
