//! Errors raised by the document and project model

use std::path::{Path, PathBuf};

use thiserror::Error;

/// One input file that could not be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveFailure {
    /// Tag of the document owning the slot
    pub document: String,
    pub index: usize,
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Syntax error in {} on line {line}", .path.display())]
    Syntax { path: PathBuf, line: usize },

    #[error("Invalid parameter: {0}")]
    Param(String),

    #[error("Missing required section '{section}' in {}", .path.display())]
    MissingSection { section: &'static str, path: PathBuf },

    #[error("Failed to configure document(s): {}", .0.join(", "))]
    DocumentsFailed(Vec<String>),

    #[error("Repeated document tag(s): {}", .0.join(", "))]
    DuplicateTags(Vec<String>),

    #[error("No document tagged '{0}' in project")]
    UnknownDocument(String),

    #[error("Failed to save {} input file(s): {}", .0.len(), describe_failures(.0))]
    SaveFailed(Vec<SaveFailure>),
}

impl ModelError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        ModelError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn index(index: usize, len: usize) -> Self {
        ModelError::Param(format!(
            "input file index {} out of range (document has {})",
            index, len
        ))
    }
}

fn describe_failures(failures: &[SaveFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{}#{} {} ({})", f.document, f.index, f.path.display(), f.reason))
        .collect::<Vec<_>>()
        .join(", ")
}
