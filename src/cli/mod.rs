//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `docs` | List a project's documents and their input files |
//! | `outline` | Print the structural outline of a project or one document |
//! | `sections` | Dump the sections of any config file |
//! | `check` | Load a project and report repeated tags |
//! | `build` | Build one document with Doxygen |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Logging
//!
//! Diagnostics go to stderr through `tracing`. `RUST_LOG` controls the
//! filter; `--verbose` turns on debug output:
//! ```bash
//! crossdocs --verbose outline handbook.cdc
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod build_cmd;
mod outline_cmd;
mod output;
mod project_cmd;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
