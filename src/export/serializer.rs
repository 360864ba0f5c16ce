//! Pipeline serialization
//!
//! The artifact is the raw bincode encoding of a [`FittedPipeline`]: no
//! header, checksum or version tag.

use crate::error::{PipelineError, Result};
use crate::pipeline::FittedPipeline;
use bincode::Options;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Same layout as `bincode::serialize`: fixed-width integers, trailing
/// bytes tolerated
fn codec() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .allow_trailing_bytes()
}

/// Write `pipeline` to `path`, replacing any existing file
pub fn save_pipeline(pipeline: &FittedPipeline, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    codec()
        .serialize_into(&mut writer, pipeline)
        .map_err(|e| PipelineError::SerializationError(format!("Failed to write: {}", e)))?;
    writer.flush()?;

    debug!(path = %path.display(), "Serialized fitted pipeline");
    Ok(())
}

/// Read a pipeline written by [`save_pipeline`].
///
/// Decoding is limited to the file's length, so a corrupt length prefix
/// fails with [`PipelineError::SerializationError`] instead of allocating.
pub fn load_pipeline(path: impl AsRef<Path>) -> Result<FittedPipeline> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(PipelineError::MissingFile(path.to_path_buf()));
    }
    let bytes = std::fs::read(path)?;

    let pipeline = codec()
        .with_limit(bytes.len() as u64)
        .deserialize(&bytes)
        .map_err(|e| PipelineError::SerializationError(format!("Failed to deserialize: {}", e)))?;
    Ok(pipeline)
}
