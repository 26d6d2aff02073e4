//! Streaming adapter.
//!
//! Build pipelines hand source over in chunks, but the transform needs the
//! whole program to build a syntax tree. `TransformStream` buffers every
//! chunk and runs the transform once at end-of-input. On failure nothing is
//! emitted.

use std::io::{self, Read, Write};

use thiserror::Error;
use tracing::debug;

use crate::error::TransformError;
use crate::transforms::{AmdTransformer, TransformStats};

const READ_CHUNK_SIZE: usize = 8 * 1024;

#[derive(Error, Debug)]
pub enum StreamError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("input is not valid UTF-8 (first invalid byte at offset {valid_up_to})")]
    InvalidUtf8 { valid_up_to: usize },

    #[error(transparent)]
    Transform(#[from] TransformError),
}

#[derive(Debug, Default)]
pub struct TransformStream {
    buffer: Vec<u8>,
    chunks: usize,
}

impl TransformStream {
    pub fn new() -> Self {
        TransformStream::default()
    }

    /// Buffer a chunk. Never transforms.
    pub fn write(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
        self.chunks += 1;
    }

    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// End of input: decode and transform everything buffered.
    pub fn end(self) -> Result<String, StreamError> {
        self.end_with_stats().map(|(code, _)| code)
    }

    pub fn end_with_stats(self) -> Result<(String, TransformStats), StreamError> {
        debug!(
            chunks = self.chunks,
            bytes = self.buffer.len(),
            "end of input"
        );
        let source = String::from_utf8(self.buffer).map_err(|err| StreamError::InvalidUtf8 {
            valid_up_to: err.utf8_error().valid_up_to(),
        })?;
        let mut transformer = AmdTransformer::new();
        let code = transformer.transform(&source)?;
        Ok((code, transformer.stats()))
    }
}

/// Read `reader` to the end, transform, and write the result to `writer`.
///
/// The output is written in one piece only after the transform succeeded.
pub fn transform_reader<R: Read, W: Write>(
    mut reader: R,
    mut writer: W,
) -> Result<TransformStats, StreamError> {
    let mut stream = TransformStream::new();
    let mut chunk = [0u8; READ_CHUNK_SIZE];
    loop {
        match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => stream.write(&chunk[..n]),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        }
    }

    let (code, stats) = stream.end_with_stats()?;
    writer.write_all(code.as_bytes())?;
    writer.flush()?;
    Ok(stats)
}
