//! Error types for file loading and export.

use std::path::PathBuf;
use thiserror::Error;

/// Failure while reading a file on the background reader.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The file could not be opened or read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file content is not valid UTF-8.
    #[error("{} is not valid UTF-8 (first invalid byte at offset {offset})", path.display())]
    Encoding { path: PathBuf, offset: usize },

    /// The read was cancelled before it finished.
    #[error("Read cancelled")]
    Cancelled,

    /// The reader thread panicked before reporting a result.
    #[error("Reader for {} stopped unexpectedly", path.display())]
    Crashed { path: PathBuf },
}

impl ReadError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure while writing an exported artifact.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The XML writer failed while encoding.
    #[error("Failed to encode XML: {0}")]
    Xml(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_error_display() {
        let err = ReadError::Encoding {
            path: PathBuf::from("dml.sql"),
            offset: 12,
        };
        assert_eq!(
            err.to_string(),
            "dml.sql is not valid UTF-8 (first invalid byte at offset 12)"
        );
        assert_eq!(ReadError::Cancelled.to_string(), "Read cancelled");
        let crashed = ReadError::Crashed {
            path: PathBuf::from("ddl.sql"),
        };
        assert_eq!(crashed.to_string(), "Reader for ddl.sql stopped unexpectedly");
    }

    #[test]
    fn test_export_error_display() {
        let err = ExportError::Write {
            path: PathBuf::from("out/a_dml.xml"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "Failed to write out/a_dml.xml: denied");
    }
}
