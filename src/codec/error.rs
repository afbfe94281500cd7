//! Codec error types.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("IO error when accessing `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("malformed document payload")]
    Json(#[from] serde_json::Error),
}
