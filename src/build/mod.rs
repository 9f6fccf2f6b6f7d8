//! # Build Engines
//!
//! Turning a document into a viewable artifact is delegated to an external
//! tool. Engines implement [`BuildEngine`] and run the tool through a
//! [`ToolRunner`], which captures its output and enforces a timeout.
//!
//! ## Build Steps
//!
//! ```text
//! DocumentModel ──flush──> input files on disk
//!       │
//!       ├── aggregate input files ──> <work>/<tag>.dox
//!       ├── doxygen -s -g ──────────> <work>/<tag>_Doxyfile (+ appended items)
//!       └── doxygen <Doxyfile> ─────> <out>/<tag>/html/index.html
//! ```
//!
//! If flushing any input file fails, the tool is never invoked.
//!
//! ## Key Types
//!
//! - [`BuildEngine`] - Capability contract for engines
//! - [`DoxygenEngine`] - Engine backed by the `doxygen` executable
//! - [`ToolRunner`] - Blocking process execution with a timeout

mod doxygen;
mod engine;
mod runner;

pub use doxygen::DoxygenEngine;
pub use engine::{engine_for, flush_inputs, BuildEngine, BuildError};
pub use runner::{ToolOutput, ToolRunner};
