//! All error types for the poet crate.
//!
//! These are returned from every fallible step of an export (decoding, writing, plist encoding).
//! The `Context` and `Language` variants wrap another error with the location an operator needs
//! to find the offending service data or directory.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("I/O error at `{}`: {source}", path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed record #{index}: {message}")]
    MalformedRecord { index: usize, message: String },

    #[error("invalid data: {0}")]
    DataMismatch(String),

    #[error("unknown export type: {0}")]
    UnknownExportType(String),

    #[error("fetch error: {message}")]
    Fetch {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("context `{context}`: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<Error>,
    },

    #[error("language `{language}`: {source}")]
    Language {
        language: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Creates a file system error for `path`.
    pub fn file_system(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::FileSystem {
            path: path.into(),
            source,
        }
    }

    /// Creates a malformed record error for the record at `index`.
    pub fn malformed_record(index: usize, message: impl Into<String>) -> Self {
        Error::MalformedRecord {
            index,
            message: message.into(),
        }
    }

    /// Creates an error for a failed download from a translation source.
    pub fn fetch_error(
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::Fetch {
            message: message.into(),
            source,
        }
    }

    /// Attaches the context name that was being written when `self` happened.
    pub fn in_context(self, context: impl Into<String>) -> Self {
        Error::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Attaches the language that was being exported when `self` happened.
    pub fn in_language(self, language: impl Into<String>) -> Self {
        Error::Language {
            language: language.into(),
            source: Box::new(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_parse_error() {
        let json_error = serde_json::from_str::<serde_json::Value>("{ invalid json }").unwrap_err();
        let error = Error::Parse(json_error);
        assert!(error.to_string().contains("parse error"));
    }

    #[test]
    fn test_file_system_error_names_path() {
        let error = Error::file_system(
            "/tmp/out/de.lproj",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let message = error.to_string();
        assert!(message.contains("/tmp/out/de.lproj"));
        assert!(message.contains("denied"));
    }

    #[test]
    fn test_malformed_record_error() {
        let error = Error::malformed_record(3, "missing `term`");
        assert_eq!(error.to_string(), "malformed record #3: missing `term`");
    }

    #[test]
    fn test_wrapped_error_keeps_location() {
        let error = Error::DataMismatch("bad".to_string())
            .in_context("Main.strings")
            .in_language("de");
        assert_eq!(
            error.to_string(),
            "language `de`: context `Main.strings`: invalid data: bad"
        );
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_fetch_error_with_source() {
        let source = Box::new(io::Error::new(io::ErrorKind::TimedOut, "timed out"));
        let error = Error::fetch_error("download of `de` failed", Some(source));
        assert_eq!(error.to_string(), "fetch error: download of `de` failed");
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_error_debug() {
        let error = Error::DataMismatch("test".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("DataMismatch"));
        assert!(debug.contains("test"));
    }
}
