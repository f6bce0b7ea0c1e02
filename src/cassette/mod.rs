//! Cassette format for recording and replaying backend interactions.

pub mod format;
pub mod recorder;
pub mod replayer;
pub mod session;

use thiserror::Error;

/// Failure while reading, writing or serving a cassette.
#[derive(Debug, Error)]
pub enum CassetteError {
    /// The cassette file could not be read or written.
    #[error("cassette I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// The cassette file is not valid YAML for a cassette.
    #[error("cassette is malformed: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// A recorded value does not have the expected shape.
    #[error("{context}: {source}")]
    Value {
        /// Port and method being replayed.
        context: String,
        /// Underlying decode error.
        source: serde_json::Error,
    },
    /// Nothing was recorded for a port/method pair.
    #[error("cassette has no interactions for {port}::{method}; recorded pairs: [{available}]")]
    NotRecorded {
        /// Requested port.
        port: String,
        /// Requested method.
        method: String,
        /// Recorded `port::method` pairs.
        available: String,
    },
    /// Every recorded interaction for a pair has been served.
    #[error("cassette exhausted: all {count} {port}::{method} interactions consumed (last seq {last_seq})")]
    Exhausted {
        /// Requested port.
        port: String,
        /// Requested method.
        method: String,
        /// Number of interactions recorded for the pair.
        count: usize,
        /// Sequence number of the last one.
        last_seq: u64,
    },
}
