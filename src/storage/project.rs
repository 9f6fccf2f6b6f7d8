//! Project model
//!
//! A project config (`*.cdc`) names the project and lists its documents:
//!
//! ```text
//! project:
//! handbook
//!
//! name:
//! Handbook
//!
//! build_engine:
//! doxygen
//!
//! documents:
//! intro/intro.cdd
//! api/api.cdd
//! ```
//!
//! `project` and `documents` are required. Document references are
//! resolved against the directory of the project config.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::build::{BuildEngine, BuildError};
use crate::domain::{BuildEngineKind, Outline, StructuralElement, SyntaxProfile};

use super::conf::read_conf;
use super::{DocumentModel, ModelError, SaveFailure};

const SEC_PROJECT: &str = "project";
const SEC_NAME: &str = "name";
const SEC_BUILD_ENGINE: &str = "build_engine";
const SEC_DOCUMENTS: &str = "documents";

/// A collection of documents that may share input files
#[derive(Debug, Clone, Default)]
pub struct ProjectModel {
    tag: String,
    name: String,
    build_engine: BuildEngineKind,
    config_path: PathBuf,
    base_dir: PathBuf,
    documents: Vec<DocumentModel>,
}

impl ProjectModel {
    /// Opens and configures a project from its config file
    pub fn open(config_path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let mut project = Self::default();
        project.configure(config_path.as_ref())?;
        Ok(project)
    }

    /// Loads the project config and every document it lists.
    ///
    /// Any previous state is dropped first. A missing required section
    /// leaves the project empty. Documents that fail to configure do not
    /// stop the others, but make the whole load fail, as do repeated
    /// document tags; in both cases the documents stay loaded. Failed
    /// documents are reported first, and repeated tags can still be read
    /// with [`ProjectModel::duplicate_document_tags`].
    pub fn configure(&mut self, config_path: &Path) -> Result<(), ModelError> {
        *self = Self::default();

        let conf = read_conf(config_path)?;
        let base_dir = match config_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let tag = conf
            .first_value(SEC_PROJECT)
            .ok_or_else(|| ModelError::MissingSection {
                section: SEC_PROJECT,
                path: config_path.to_path_buf(),
            })?
            .to_string();

        let references: Vec<&str> = conf
            .section(SEC_DOCUMENTS)
            .map(|s| s.values().filter(|v| !v.is_empty()).collect())
            .unwrap_or_default();
        if references.is_empty() {
            return Err(ModelError::MissingSection {
                section: SEC_DOCUMENTS,
                path: config_path.to_path_buf(),
            });
        }

        let name = match conf.first_value(SEC_NAME) {
            Some(name) => name.to_string(),
            None => {
                debug!("No '{}' section in {}", SEC_NAME, config_path.display());
                tag.clone()
            }
        };

        let build_engine = match conf.first_value(SEC_BUILD_ENGINE) {
            Some(value) => value.parse().unwrap_or_else(|e| {
                warn!("{} in {}", e, config_path.display());
                BuildEngineKind::None
            }),
            None => {
                warn!(
                    "No '{}' section in {}, documents should name one",
                    SEC_BUILD_ENGINE,
                    config_path.display()
                );
                BuildEngineKind::None
            }
        };

        let documents = references
            .iter()
            .map(|reference| {
                let path = base_dir.join(reference);
                let placeholder = Path::new(reference)
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| reference.to_string());
                DocumentModel::new(placeholder, path).with_build_engine(build_engine)
            })
            .collect();

        self.tag = tag;
        self.name = name;
        self.build_engine = build_engine;
        self.config_path = config_path.to_path_buf();
        self.base_dir = base_dir;
        self.documents = documents;

        let failed = self.configure_all_documents();

        if !failed.is_empty() {
            return Err(ModelError::DocumentsFailed(failed));
        }

        let duplicates = self.duplicate_document_tags();
        if !duplicates.is_empty() {
            warn!("Repeated document tag(s) in {}: {}", self.tag, duplicates.join(", "));
            return Err(ModelError::DuplicateTags(duplicates));
        }

        debug!(
            "Configured project '{}' with {} document(s)",
            self.tag,
            self.documents.len()
        );
        Ok(())
    }

    /// Configures every document, returning the config paths that failed
    fn configure_all_documents(&mut self) -> Vec<String> {
        let mut failed = Vec::new();
        for doc in &mut self.documents {
            let path = doc.config_path().to_path_buf();
            if let Err(e) = doc.configure(&path) {
                warn!("Failed to configure {}: {}", path.display(), e);
                failed.push(path.display().to_string());
            }
        }
        failed
    }

    /// Tags shared by more than one configured document.
    ///
    /// Documents that failed to load still carry a placeholder tag and are
    /// not counted.
    pub fn duplicate_document_tags(&self) -> Vec<String> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut repeated = Vec::new();
        for doc in self.documents.iter().filter(|d| d.is_configured()) {
            let count = counts.entry(doc.tag()).or_insert(0);
            *count += 1;
            if *count == 2 {
                repeated.push(doc.tag().to_string());
            }
        }
        repeated
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn build_engine(&self) -> BuildEngineKind {
        self.build_engine
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Directory that document references are resolved against
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn documents(&self) -> &[DocumentModel] {
        &self.documents
    }

    /// Document tags in config order
    pub fn document_tags(&self) -> Vec<&str> {
        self.documents.iter().map(|d| d.tag()).collect()
    }

    pub fn document(&self, tag: &str) -> Option<&DocumentModel> {
        self.documents.iter().find(|d| d.tag() == tag)
    }

    /// Outline of one document
    pub fn document_outline(&mut self, doc_tag: &str) -> Result<Outline, ModelError> {
        let d = self.document_position(doc_tag)?;
        Ok(self.documents[d].outline())
    }

    /// Looks up a structural element in one document
    pub fn find_element(
        &mut self,
        doc_tag: &str,
        tag: &str,
    ) -> Result<Option<StructuralElement>, ModelError> {
        let d = self.document_position(doc_tag)?;
        Ok(self.documents[d].find_element(tag))
    }

    fn document_position(&self, tag: &str) -> Result<usize, ModelError> {
        self.documents
            .iter()
            .position(|d| d.tag() == tag)
            .ok_or_else(|| ModelError::UnknownDocument(tag.to_string()))
    }

    /// Every `(document, slot)` holding the given canonical path
    fn slots_for(&self, path: &Path) -> Vec<(usize, usize)> {
        let mut slots = Vec::new();
        for (d, doc) in self.documents.iter().enumerate() {
            for (s, file) in doc.input_files().iter().enumerate() {
                if file.path() == path {
                    slots.push((d, s));
                }
            }
        }
        slots
    }

    /// Clears the modified flag of every slot of `path` holding `written`.
    ///
    /// A modified slot whose cached contents differ keeps its flag and its
    /// edit, and is written when its own turn comes.
    fn mark_saved(&mut self, path: &Path, written: &str) -> Result<(), ModelError> {
        for (d, s) in self.slots_for(path) {
            let doc_tag = self.documents[d].tag().to_string();
            let file = self.documents[d].input_file_mut(s)?;
            let diverged = file.is_modified() && file.cached().is_some_and(|text| text != written);
            if diverged {
                warn!(
                    "{} holds other contents in '{}', keeping it unsaved",
                    path.display(),
                    doc_tag
                );
            } else {
                file.mirror(written, false);
            }
        }
        Ok(())
    }

    fn shared_path(&self, doc_tag: &str, index: usize) -> Result<(usize, PathBuf), ModelError> {
        let d = self.document_position(doc_tag)?;
        let doc = &self.documents[d];
        let path = doc
            .input_files()
            .get(index)
            .map(|f| f.path().to_path_buf())
            .ok_or_else(|| ModelError::index(index, doc.input_file_count()))?;
        Ok((d, path))
    }

    pub fn shared_input_file_contents(
        &mut self,
        doc_tag: &str,
        index: usize,
    ) -> Result<&str, ModelError> {
        let d = self.document_position(doc_tag)?;
        self.documents[d].input_file_contents(index)
    }

    /// Sets the contents of an input file in every document that lists it.
    ///
    /// All referencing slots end up with the same contents and modified
    /// flag. The target is validated before anything changes, so either
    /// every slot is updated or none is. Returns the number of slots.
    pub fn set_shared_input_file_contents(
        &mut self,
        doc_tag: &str,
        index: usize,
        content: &str,
    ) -> Result<usize, ModelError> {
        let (_, path) = self.shared_path(doc_tag, index)?;
        let slots = self.slots_for(&path);

        let mut modified = false;
        for &(d, s) in &slots {
            let file = self.documents[d].input_file_mut(s)?;
            file.set_contents(content);
            modified |= file.is_modified();
        }
        for &(d, s) in &slots {
            self.documents[d].input_file_mut(s)?.mirror(content, modified);
        }

        debug!(
            "Propagated edit of {} to {} slot(s)",
            path.display(),
            slots.len()
        );
        Ok(slots.len())
    }

    /// Saves an input file and marks every slot sharing it as saved
    pub fn save_shared_input_file(&mut self, doc_tag: &str, index: usize) -> Result<bool, ModelError> {
        let (d, path) = self.shared_path(doc_tag, index)?;
        if !self.documents[d].save_input_file(index)? {
            return Ok(false);
        }

        let content = self.documents[d].input_file_contents(index)?.to_string();
        self.mark_saved(&path, &content)?;
        Ok(true)
    }

    /// Saves the modified input files of every document.
    ///
    /// A shared file is written once and every slot holding the written
    /// contents is marked saved. Like [`DocumentModel::save_all_input_files`], every file is
    /// attempted and failures are aggregated.
    pub fn save_all(&mut self) -> Result<usize, ModelError> {
        let mut written = 0;
        let mut failures = Vec::new();

        for d in 0..self.documents.len() {
            for s in 0..self.documents[d].input_file_count() {
                let file = self.documents[d].input_file_mut(s)?;
                let path = file.path().to_path_buf();
                match file.save() {
                    Ok(false) => {}
                    Ok(true) => {
                        written += 1;
                        let content = self.documents[d].input_file_contents(s)?.to_string();
                        self.mark_saved(&path, &content)?;
                    }
                    Err(e) => {
                        warn!("{}", e);
                        failures.push(SaveFailure {
                            document: self.documents[d].tag().to_string(),
                            index: s,
                            path,
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }

        if failures.is_empty() {
            Ok(written)
        } else {
            Err(ModelError::SaveFailed(failures))
        }
    }

    pub fn input_file_syntax(&self, doc_tag: &str, index: usize) -> Result<SyntaxProfile, ModelError> {
        let d = self.document_position(doc_tag)?;
        self.documents[d].input_file_syntax(index)
    }

    pub fn set_input_file_syntax(
        &mut self,
        doc_tag: &str,
        index: usize,
        syntax: SyntaxProfile,
    ) -> Result<(), ModelError> {
        let d = self.document_position(doc_tag)?;
        self.documents[d].set_input_file_syntax(index, syntax)
    }

    /// Outline of every document, each as a subtree of a project root
    pub fn outline(&mut self) -> Outline {
        let mut outline = Outline::new(StructuralElement::project_root(&self.tag, &self.name));
        let root = outline.root();
        for doc in &mut self.documents {
            outline.graft(root, doc.outline());
        }

        for tag in outline.duplicate_tags() {
            debug!("Structural tag '{}' appears in more than one place", tag);
        }
        outline
    }

    /// Builds one document with the given engine.
    ///
    /// The output goes to `out_dir`, or to the document's output directory.
    pub fn build(
        &mut self,
        doc_tag: &str,
        engine: &dyn BuildEngine,
        out_dir: Option<&Path>,
    ) -> Result<PathBuf, BuildError> {
        let project_name = self.name.clone();
        let d = self
            .document_position(doc_tag)
            .map_err(|_| BuildError::InvalidDocument(doc_tag.to_string()))?;
        let doc = &mut self.documents[d];

        let out_dir = out_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| doc.output_dir().to_path_buf());

        let result = engine.build(doc, &out_dir, &project_name);
        self.sync_flushed(d).map_err(BuildError::Flush)?;
        result
    }

    /// Propagates the saved state of a document's files to shared slots
    fn sync_flushed(&mut self, d: usize) -> Result<(), ModelError> {
        let saved: Vec<(PathBuf, String)> = self.documents[d]
            .input_files()
            .iter()
            .filter(|f| !f.is_modified())
            .filter_map(|f| Some((f.path().to_path_buf(), f.cached()?.to_string())))
            .collect();

        for (path, content) in saved {
            self.mark_saved(&path, &content)?;
        }
        Ok(())
    }
}
