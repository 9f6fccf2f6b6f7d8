//! Input files referenced by documents
//!
//! Contents are read from disk on first access and cached. Edits only touch
//! the cache until the file is explicitly saved.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::domain::SyntaxProfile;

use super::ModelError;

/// One input file slot of a document
#[derive(Debug, Clone)]
pub struct InputFile {
    /// Canonical path; two slots with equal paths refer to the same file
    path: PathBuf,

    /// Cached contents, `None` until first loaded or set
    contents: Option<String>,

    /// True when the cache differs from what was last read or written
    modified: bool,

    syntax: SyntaxProfile,
}

impl InputFile {
    pub fn new(path: impl Into<PathBuf>, syntax: SyntaxProfile) -> Self {
        Self {
            path: path.into(),
            contents: None,
            modified: false,
            syntax,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn syntax(&self) -> SyntaxProfile {
        self.syntax
    }

    pub fn set_syntax(&mut self, syntax: SyntaxProfile) {
        self.syntax = syntax;
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn is_loaded(&self) -> bool {
        self.contents.is_some()
    }

    /// Cached contents without touching the disk
    pub(crate) fn cached(&self) -> Option<&str> {
        self.contents.as_deref()
    }

    /// Returns the contents, reading the file on first access
    pub fn contents(&mut self) -> Result<&str, ModelError> {
        if self.contents.is_none() {
            let text = fs::read_to_string(&self.path).map_err(|e| ModelError::io(&self.path, e))?;
            debug!("Loaded {} ({} bytes)", self.path.display(), text.len());
            self.contents = Some(text);
        }
        Ok(self.contents.as_deref().unwrap_or_default())
    }

    /// Replaces the cached contents. Returns true if they changed.
    ///
    /// An unloaded file is read first so that writing back its disk contents
    /// is not a change.
    pub fn set_contents(&mut self, text: &str) -> bool {
        if self.contents.is_none() {
            match fs::read_to_string(&self.path) {
                Ok(current) => self.contents = Some(current),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => warn!(
                    "Could not read {} before replacing it: {}",
                    self.path.display(),
                    e
                ),
            }
        }
        if self.contents.as_deref() == Some(text) {
            return false;
        }
        self.contents = Some(text.to_string());
        self.modified = true;
        true
    }

    /// Overwrites cache and modified flag to mirror another slot of the same file
    pub(crate) fn mirror(&mut self, text: &str, modified: bool) {
        self.contents = Some(text.to_string());
        self.modified = modified;
    }

    /// Writes the cached contents if modified, then clears the flag
    pub fn save(&mut self) -> Result<bool, ModelError> {
        if !self.modified {
            return Ok(false);
        }

        let text = self.contents.as_deref().unwrap_or_default();
        fs::write(&self.path, text).map_err(|e| ModelError::io(&self.path, e))?;
        debug!("Saved {}", self.path.display());

        self.modified = false;
        Ok(true)
    }
}
