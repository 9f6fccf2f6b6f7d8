//! Build engine contract

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

use crate::domain::BuildEngineKind;
use crate::storage::{DocumentModel, ModelError, Settings};

use super::DoxygenEngine;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Document cannot be built: {0}")]
    InvalidDocument(String),

    #[error("Unable to save all input files, build aborted: {0}")]
    Flush(#[source] ModelError),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} did not finish within {} s", .timeout.as_secs_f32())]
    Timeout { program: String, timeout: Duration },

    #[error("{program} failed ({}): {stderr}", exit_label(.code))]
    ToolFailed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Build engine '{0}' is not supported")]
    Unsupported(BuildEngineKind),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

impl BuildError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        BuildError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Something that turns a document into an output artifact.
///
/// Implementations flush the document's input files before invoking any
/// external tool, and block until the tool finishes or times out.
pub trait BuildEngine {
    /// Which engine this is
    fn kind(&self) -> BuildEngineKind;

    /// Builds `document` into `out_dir` and returns the artifact path
    fn build(
        &self,
        document: &mut DocumentModel,
        out_dir: &Path,
        project_name: &str,
    ) -> Result<PathBuf, BuildError>;
}

/// Writes every modified input file of a configured document
pub fn flush_inputs(document: &mut DocumentModel) -> Result<(), BuildError> {
    if !document.is_configured() {
        return Err(BuildError::InvalidDocument(document.tag().to_string()));
    }
    document.save_all_input_files().map_err(BuildError::Flush)?;
    Ok(())
}

/// Returns the engine for a configured kind.
///
/// Doxygen is the only engine with a tool behind it; `none` falls back to it.
pub fn engine_for(kind: BuildEngineKind, settings: &Settings) -> Result<Box<dyn BuildEngine>, BuildError> {
    match kind {
        BuildEngineKind::Doxygen => Ok(Box::new(DoxygenEngine::from_settings(settings))),
        BuildEngineKind::None => {
            warn!("No build engine configured, using doxygen");
            Ok(Box::new(DoxygenEngine::from_settings(settings)))
        }
        other => Err(BuildError::Unsupported(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn engine_lookup() {
        let settings = Settings::default();
        assert_eq!(
            engine_for(BuildEngineKind::Doxygen, &settings).unwrap().kind(),
            BuildEngineKind::Doxygen
        );
        assert_eq!(
            engine_for(BuildEngineKind::None, &settings).unwrap().kind(),
            BuildEngineKind::Doxygen
        );
        assert!(matches!(
            engine_for(BuildEngineKind::Markdown, &settings),
            Err(BuildError::Unsupported(BuildEngineKind::Markdown))
        ));
    }

    #[test]
    fn unconfigured_document_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut doc = DocumentModel::new("x", dir.path().join("x.cdd"));
        assert!(matches!(
            flush_inputs(&mut doc),
            Err(BuildError::InvalidDocument(_))
        ));
    }

    #[test]
    fn flush_writes_pending_edits() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.cdp"), "old").unwrap();
        fs::write(dir.path().join("x.cdd"), "document:\nx\ninput_files:\na.cdp\n").unwrap();
        let mut doc = DocumentModel::open(dir.path().join("x.cdd")).unwrap();

        doc.set_input_file_contents(0, "new").unwrap();
        flush_inputs(&mut doc).unwrap();

        assert_eq!(fs::read_to_string(dir.path().join("a.cdp")).unwrap(), "new");
    }
}
