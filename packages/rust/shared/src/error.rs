//! The one error enum shared by every degreemap library crate.
//!
//! The `degreemap` binary converts it into an `eyre::Report` at the top.

use std::path::PathBuf;

/// Anything that can stop a scrape, from a bad config file to a missing `<programs>` node.
#[derive(Debug, thiserror::Error)]
pub enum DegreeMapError {
    /// `degreemap.toml` could not be read, parsed, or validated.
    #[error("config error: {message}")]
    Config { message: String },

    /// Transport failure or non-2xx answer from the catalog API.
    #[error("network error: {0}")]
    Network(String),

    /// Catalog markup was missing a node required for positional parsing.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Subject or course reference file could not be read or decoded.
    #[error("reference data error: {message}")]
    Reference { message: String },

    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Rejected input, such as a zero catalog count.
    #[error("validation error: {message}")]
    Validation { message: String },
}

pub type Result<T> = std::result::Result<T, DegreeMapError>;

impl DegreeMapError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Markup that does not have the shape the parsers walk.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    pub fn reference(msg: impl Into<String>) -> Self {
        Self::Reference {
            message: msg.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// I/O failure on `path`; the path is part of the message.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = DegreeMapError::config("missing API key");
        assert_eq!(err.to_string(), "config error: missing API key");

        let err = DegreeMapError::parse("program 'Biology' has a semester block without a title");
        assert!(err.to_string().starts_with("parse error:"));
        assert!(err.to_string().contains("Biology"));
    }

    #[test]
    fn io_error_keeps_path() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = DegreeMapError::io("/tmp/subjects.json", source);
        assert!(err.to_string().contains("subjects.json"));
    }
}
