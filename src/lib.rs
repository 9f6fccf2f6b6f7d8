//! CrossDocs - documentation projects built from shared input files
//!
//! A project lists documents; each document lists input files written in a
//! marked-up prose syntax. The same input file may belong to several
//! documents, and edits made through one document are visible in all of
//! them. Structural markers in the input files (`\section`, `\subsection`,
//! ...) are parsed into an outline used for navigation.

pub mod build;
pub mod cli;
pub mod domain;
pub mod storage;

pub use build::{BuildEngine, BuildError, DoxygenEngine};
pub use domain::{ConfigFile, ConfigSection, Outline, StructuralElement, SyntaxProfile};
pub use storage::{DocumentModel, ModelError, ProjectModel};
