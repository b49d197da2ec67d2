//! Error types shared by the core pipeline.
//!
//! Library code returns these `thiserror` types; the CLI layer wraps them in
//! `anyhow` with context.

use std::path::PathBuf;

use thiserror::Error;

/// Failure while reading or writing a dictionary file.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The file exists but could not be read, or could not be written.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file content is not a usable dictionary.
    #[error("Failed to parse dictionary {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// The in-memory tree could not be serialized; the target file is untouched.
    #[error("Failed to serialize dictionary {path}: {reason}")]
    Serialize { path: PathBuf, reason: String },

    /// The file exists but failed to load, so the cached tree does not hold
    /// its entries and saving would drop them.
    #[error("Refusing to overwrite dictionary {path}: it could not be loaded")]
    Unloaded { path: PathBuf },
}

impl CodecError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn serialize(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Serialize {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Path of the dictionary file the error refers to.
    pub fn path(&self) -> &PathBuf {
        match self {
            CodecError::Io { path, .. }
            | CodecError::Parse { path, .. }
            | CodecError::Serialize { path, .. }
            | CodecError::Unloaded { path } => path,
        }
    }
}

/// Failure reported by a translate collaborator.
///
/// `code` is collaborator-defined (HTTP status, process exit code, ...).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("translation failed [{code}]: {message}")]
pub struct TranslationError {
    pub code: String,
    pub message: String,
}

impl TranslationError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// A dialect probe could not classify an offset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot classify offset {offset}: {reason}")]
pub struct AmbiguousContextError {
    pub offset: usize,
    pub reason: &'static str,
}

impl AmbiguousContextError {
    pub fn new(offset: usize, reason: &'static str) -> Self {
        Self { offset, reason }
    }
}
