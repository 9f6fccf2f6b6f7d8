//! Document model
//!
//! A document is described by a config file (`*.cdd`):
//!
//! ```text
//! document:
//! intro
//!
//! name:
//! Introduction
//!
//! output_directory:
//! ../build
//!
//! input_files:
//! pages/overview.cdp
//! ../shared/glossary.cdp
//! ```
//!
//! Only `document` is required. Input files are resolved against the config
//! file's directory and canonicalized, so that the same file listed by two
//! documents is recognized as shared.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::domain::{
    BuildEngineKind, ConfigSection, Outline, OutlineParser, StructuralElement, SyntaxProfile,
};

use super::conf::{read_conf, write_conf};
use super::{InputFile, ModelError, SaveFailure};

const SEC_DOCUMENT: &str = "document";
const SEC_NAME: &str = "name";
const SEC_BUILD_ENGINE: &str = "build_engine";
const SEC_INPUT_FILES: &str = "input_files";
const SEC_OUTPUT_DIRECTORY: &str = "output_directory";

/// Profile assigned to every input file found in a config
pub const DEFAULT_SYNTAX: SyntaxProfile = SyntaxProfile::Doxygen;

/// One buildable document and its input files
#[derive(Debug, Clone)]
pub struct DocumentModel {
    tag: String,
    name: String,
    config_path: PathBuf,
    output_dir: PathBuf,
    input_files: Vec<InputFile>,

    /// Engine named by the document itself
    own_engine: BuildEngineKind,

    /// Engine inherited from the enclosing project
    inherited_engine: BuildEngineKind,

    configured: bool,
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

impl DocumentModel {
    /// Creates an unconfigured document.
    ///
    /// `tag` is used until the config is read, and as the tag written to a
    /// freshly created config.
    pub fn new(tag: impl Into<String>, config_path: impl Into<PathBuf>) -> Self {
        let tag = tag.into();
        let config_path = config_path.into();
        Self {
            name: tag.clone(),
            output_dir: parent_dir(&config_path),
            tag,
            config_path,
            input_files: Vec::new(),
            own_engine: BuildEngineKind::None,
            inherited_engine: BuildEngineKind::None,
            configured: false,
        }
    }

    /// Sets the engine used when the document does not name one
    pub fn with_build_engine(mut self, engine: BuildEngineKind) -> Self {
        self.inherited_engine = engine;
        self
    }

    /// Creates and configures a document from its config file
    pub fn open(config_path: impl Into<PathBuf>) -> Result<Self, ModelError> {
        let config_path = config_path.into();
        let tag = config_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());

        let mut doc = Self::new(tag, config_path.clone());
        doc.configure(&config_path)?;
        Ok(doc)
    }

    /// Loads the document's config from `config_path`.
    ///
    /// A missing config is created with a single `document` section holding
    /// the current tag. Missing optional sections fall back to defaults and
    /// input files that do not exist are skipped; both only warn.
    pub fn configure(&mut self, config_path: &Path) -> Result<(), ModelError> {
        self.config_path = config_path.to_path_buf();
        self.input_files.clear();
        self.configured = false;

        let base_dir = parent_dir(config_path);

        if !config_path.exists() {
            debug!("Creating {}", config_path.display());
            let sections = [ConfigSection::with_contents(SEC_DOCUMENT, [self.tag.as_str()])];
            write_conf(config_path, &sections)?;

            self.name = self.tag.clone();
            self.output_dir = base_dir;
            self.own_engine = BuildEngineKind::None;
            self.configured = true;
            return Ok(());
        }

        let conf = read_conf(config_path)?;

        let tag = conf
            .first_value(SEC_DOCUMENT)
            .ok_or_else(|| ModelError::MissingSection {
                section: SEC_DOCUMENT,
                path: config_path.to_path_buf(),
            })?
            .to_string();

        let output_dir = match conf.first_value(SEC_OUTPUT_DIRECTORY) {
            Some(dir) => base_dir.join(dir),
            None => {
                warn!(
                    "No '{}' section in {}, using {}",
                    SEC_OUTPUT_DIRECTORY,
                    config_path.display(),
                    base_dir.display()
                );
                base_dir.clone()
            }
        };

        let own_engine = match conf.first_value(SEC_BUILD_ENGINE) {
            Some(value) => value.parse().unwrap_or_else(|e| {
                warn!("{} in {}, inheriting", e, config_path.display());
                BuildEngineKind::None
            }),
            None => BuildEngineKind::None,
        };

        let mut input_files = Vec::new();
        let listed: Vec<&str> = conf
            .section(SEC_INPUT_FILES)
            .map(|s| s.values().filter(|v| !v.is_empty()).collect())
            .unwrap_or_default();

        if listed.is_empty() {
            warn!("No input files for {}", config_path.display());
        }

        for entry in listed {
            match base_dir.join(entry).canonicalize() {
                Ok(path) if path.is_file() => {
                    debug!("Found input file {}", path.display());
                    input_files.push(InputFile::new(path, DEFAULT_SYNTAX));
                }
                _ => warn!(
                    "In {}: input file {} does not exist, ignoring",
                    tag, entry
                ),
            }
        }

        let name = match conf.first_value(SEC_NAME) {
            Some(name) => name.to_string(),
            None => {
                warn!("No '{}' section in {}", SEC_NAME, config_path.display());
                tag.clone()
            }
        };

        self.tag = tag;
        self.name = name;
        self.output_dir = output_dir;
        self.own_engine = own_engine;
        self.input_files = input_files;
        self.configured = true;

        debug!(
            "Configured document '{}' with {} input file(s)",
            self.tag,
            self.input_files.len()
        );
        Ok(())
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// True once `configure` has succeeded
    pub fn is_configured(&self) -> bool {
        self.configured
    }

    /// Effective engine: the document's own, else the inherited one
    pub fn build_engine(&self) -> BuildEngineKind {
        self.own_engine.or_inherit(self.inherited_engine)
    }

    pub fn input_file_count(&self) -> usize {
        self.input_files.len()
    }

    /// Canonical paths of the input files, in order
    pub fn input_file_paths(&self) -> Vec<&Path> {
        self.input_files.iter().map(|f| f.path()).collect()
    }

    pub(crate) fn input_files(&self) -> &[InputFile] {
        &self.input_files
    }

    pub(crate) fn input_file_mut(&mut self, index: usize) -> Result<&mut InputFile, ModelError> {
        let len = self.input_files.len();
        self.input_files
            .get_mut(index)
            .ok_or_else(|| ModelError::index(index, len))
    }

    fn input_file(&self, index: usize) -> Result<&InputFile, ModelError> {
        self.input_files
            .get(index)
            .ok_or_else(|| ModelError::index(index, self.input_files.len()))
    }

    /// Returns the contents of an input file, loading it on first access
    pub fn input_file_contents(&mut self, index: usize) -> Result<&str, ModelError> {
        self.input_file_mut(index)?.contents()
    }

    /// Replaces the in-memory contents of an input file.
    ///
    /// Returns true if the contents changed, which marks the file modified.
    pub fn set_input_file_contents(&mut self, index: usize, text: &str) -> Result<bool, ModelError> {
        Ok(self.input_file_mut(index)?.set_contents(text))
    }

    pub fn is_modified(&self, index: usize) -> Result<bool, ModelError> {
        Ok(self.input_file(index)?.is_modified())
    }

    pub fn input_file_syntax(&self, index: usize) -> Result<SyntaxProfile, ModelError> {
        Ok(self.input_file(index)?.syntax())
    }

    pub fn set_input_file_syntax(
        &mut self,
        index: usize,
        syntax: SyntaxProfile,
    ) -> Result<(), ModelError> {
        self.input_file_mut(index)?.set_syntax(syntax);
        Ok(())
    }

    /// Writes an input file to disk if it was modified.
    ///
    /// Returns true if the file was written.
    pub fn save_input_file(&mut self, index: usize) -> Result<bool, ModelError> {
        self.input_file_mut(index)?.save()
    }

    /// Saves every modified input file.
    ///
    /// Every file is attempted even after a failure; all failures are
    /// reported together. Returns the number of files written.
    pub fn save_all_input_files(&mut self) -> Result<usize, ModelError> {
        let mut written = 0;
        let mut failures = Vec::new();

        for (index, file) in self.input_files.iter_mut().enumerate() {
            match file.save() {
                Ok(true) => written += 1,
                Ok(false) => {}
                Err(e) => {
                    warn!("{}", e);
                    failures.push(SaveFailure {
                        document: self.tag.clone(),
                        index,
                        path: file.path().to_path_buf(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        if failures.is_empty() {
            Ok(written)
        } else {
            Err(ModelError::SaveFailed(failures))
        }
    }

    /// Raw text of the document's config file
    pub fn config_contents(&self) -> Result<String, ModelError> {
        fs::read_to_string(&self.config_path).map_err(|e| ModelError::io(&self.config_path, e))
    }

    /// Builds the document outline from scratch.
    ///
    /// Each input file is parsed in list order and its top-level elements
    /// become children of a root node for the document. Files that cannot be
    /// read contribute nothing.
    pub fn outline(&mut self) -> Outline {
        let mut outline = Outline::new(StructuralElement::document_root(&self.tag, &self.name));
        let root = outline.root();

        for (index, file) in self.input_files.iter_mut().enumerate() {
            let syntax = file.syntax();
            let text = match file.contents() {
                Ok(text) => text,
                Err(e) => {
                    warn!("Skipping input file in outline of '{}': {}", self.tag, e);
                    continue;
                }
            };

            let parsed = OutlineParser::new(syntax, &self.tag, index).parse(text);
            if parsed.found {
                outline.splice(root, parsed.fragment);
            }
        }

        for tag in outline.duplicate_tags() {
            warn!("Document '{}' repeats structural tag '{}'", self.tag, tag);
        }

        outline
    }

    /// Looks up a structural element by tag in a fresh outline
    pub fn find_element(&mut self, tag: &str) -> Option<StructuralElement> {
        self.outline().find_by_tag(tag).cloned()
    }
}
