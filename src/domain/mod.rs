//! Domain models for CrossDocs
//!
//! Contains the parsers and outline tree without any I/O concerns.

mod notation;
mod outline;
mod outline_parser;
mod profile;

pub use notation::{serialize, ConfigFile, ConfigSection, NotationError, COMMAND_MARKER, COMMENT_MARKER};
pub use outline::{ElementKind, NodeId, Outline, OutlineFragment, OutlineTree, StructuralElement};
pub use outline_parser::{OutlineParser, ParsedOutline};
pub use profile::{BuildEngineKind, ProfileError, SyntaxProfile};
