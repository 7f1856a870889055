//! JSON staging files
//!
//! Extracted records can be written to disk before persistence and read
//! back from there. The files are pretty-printed UTF-8 JSON arrays; non-ASCII
//! text such as typographic quotes is written as is.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors reading or writing a staging file
#[derive(Debug, Error)]
pub enum StagingError {
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Writes `records` to `path` as an indented JSON array
pub fn write_json<T: Serialize>(path: &Path, records: &[T]) -> Result<(), StagingError> {
    tracing::info!("Writing {} records to {}", records.len(), path.display());

    let io_error = |source: std::io::Error| StagingError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records).map_err(|source| StagingError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(io_error)?;

    Ok(())
}

/// Reads a JSON array written by `write_json`
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StagingError> {
    tracing::info!("Reading records from {}", path.display());

    let file = File::open(path).map_err(|source| StagingError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_reader(BufReader::new(file)).map_err(|source| StagingError::Json {
        path: path.to_path_buf(),
        source,
    })
}
