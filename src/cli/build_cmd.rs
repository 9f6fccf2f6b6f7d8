//! Build command

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use super::output::Output;
use crate::build::engine_for;
use crate::storage::{ProjectModel, Settings};

/// Builds one document of a project
pub fn build(
    output: &Output,
    settings: &Settings,
    path: &Path,
    doc_tag: &str,
    out_dir: Option<&Path>,
) -> Result<()> {
    let mut project = ProjectModel::open(path)
        .with_context(|| format!("Failed to load project: {}", path.display()))?;

    let kind = project
        .document(doc_tag)
        .map(|doc| doc.build_engine())
        .unwrap_or(project.build_engine());
    let engine = engine_for(kind, settings)?;
    debug!("Building '{}' with {}", doc_tag, engine.kind());

    let artifact = project
        .build(doc_tag, engine.as_ref(), out_dir)
        .with_context(|| format!("Failed to build document '{}'", doc_tag))?;

    let report = serde_json::json!({
        "document": doc_tag,
        "artifact": artifact,
    });
    output.report(&report, || println!("Built '{}': {}", doc_tag, artifact.display()));
    Ok(())
}
