//! Error types for pg-dump-splitter

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while splitting a schema dump
#[derive(Error, Debug)]
pub enum SplitterError {
    #[error("Failed to read dump file: {path}")]
    DumpRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Dump path is a directory, not a file: {path}")]
    DumpIsDirectory { path: PathBuf },

    #[error("Dump file is empty: {path}")]
    DumpEmpty { path: PathBuf },

    #[error("Failed to write output file: {path}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
