//! Reading and writing config notation files

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::domain::{self, ConfigFile, ConfigSection, NotationError};

use super::ModelError;

/// Reads and parses a config notation file
pub fn read_conf(path: &Path) -> Result<ConfigFile, ModelError> {
    let text = fs::read_to_string(path).map_err(|e| ModelError::io(path, e))?;

    let conf = ConfigFile::parse(&text).map_err(|e| match e {
        NotationError::Syntax { line } => ModelError::Syntax {
            path: path.to_path_buf(),
            line,
        },
    })?;

    debug!("Parsed {} ({} sections)", path.display(), conf.sections().len());
    Ok(conf)
}

/// Serializes sections and writes them to `path`
pub fn write_conf(path: &Path, sections: &[ConfigSection]) -> Result<(), ModelError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ModelError::io(parent, e))?;
    }
    fs::write(path, domain::serialize(sections)).map_err(|e| ModelError::io(path, e))
}
