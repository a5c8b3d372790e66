use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BenchError>;

/// Failures a benchmark can hit while acquiring its resources.
///
/// None of these are recovered locally: the binaries surface them and exit
/// with status 1.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("allocation of {bytes} bytes for {context} failed")]
    Alloc { bytes: u64, context: &'static str },

    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not open directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("could not create output file {}: {source}", path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write output: {0}")]
    Write(#[from] io::Error),

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("failed to render {what}: {reason}")]
    Render { what: &'static str, reason: String },

    #[error("malformed report {}: {reason}", path.display())]
    MalformedReport { path: PathBuf, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl BenchError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        BenchError::Read {
            path: path.into(),
            source,
        }
    }
}
