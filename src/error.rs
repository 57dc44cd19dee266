use std::io;

use thiserror::Error;

use crate::bitpack::Overflow;

// Everything that can stop a compress or decompress run. The pipeline never
// recovers from any of these: either a complete output is produced, or the
// run ends with one of them and no partial output is flushed.
#[derive(Debug, Error)]
pub enum CodecError {
  // Malformed input bytes: bad magic, missing header fields, truncated
  // raster or codeword stream
  #[error("{0}")]
  Format(String),

  #[error("i/o error: {0}")]
  Io(#[from] io::Error),

  #[error("{0}")]
  Overflow(#[from] Overflow),
}
