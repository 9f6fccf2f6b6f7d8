//! # Storage Layer
//!
//! Everything that touches the filesystem: config files, input files, and
//! the document and project models built on them.
//!
//! ## File Formats
//!
//! | Data | Format | Typical name |
//! |------|--------|--------------|
//! | Project | Config notation | `handbook.cdc` |
//! | Document | Config notation | `intro/intro.cdd` |
//! | Input files | Marked-up prose | `intro/overview.cdp` |
//! | Settings | TOML | `~/.config/crossdocs/config.toml` |
//!
//! ## Sharing
//!
//! Input file paths are canonicalized when a document is configured. Two
//! slots with the same path are the same file, and [`ProjectModel`] keeps
//! their in-memory contents identical.
//!
//! ## Key Types
//!
//! - [`ProjectModel`] - Entry point: a project and its documents
//! - [`DocumentModel`] - One document, its input files and outline
//! - [`InputFile`] - Lazily loaded, explicitly saved file contents
//! - [`Settings`] - User settings for builds

mod conf;
mod document;
mod error;
mod input_file;
mod project;
mod settings;

pub use conf::{read_conf, write_conf};
pub use document::{DocumentModel, DEFAULT_SYNTAX};
pub use error::{ModelError, SaveFailure};
pub use input_file::InputFile;
pub use project::ProjectModel;
pub use settings::{Settings, SettingsError, DEFAULT_BUILD_TIMEOUT_SECS};
