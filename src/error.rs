use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the dedup/consensus core.
///
/// Every variant is fatal to the invocation (see design notes): there is no
/// retry path and no partial output is committed on failure.
#[derive(Debug, Error)]
pub enum DedupError {
    #[error("cannot open or stat input file {path:?}")]
    InputOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed FASTQ input ({reason}) in {path:?} at record {record}")]
    InputFormat {
        path: PathBuf,
        record: usize,
        reason: String,
    },

    #[error("read1 has {read1} records but read2 has {read2}")]
    ReadCountMismatch { read1: usize, read2: usize },

    #[error("could not allocate capacity for {what} ({requested} entries)")]
    OutOfMemory {
        what: &'static str,
        requested: usize,
        #[source]
        source: std::collections::TryReserveError,
    },

    #[error("cannot create output file {path:?}")]
    OutputOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
