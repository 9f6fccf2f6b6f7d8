//! Project inspection commands (docs, sections, check)

use std::path::Path;

use anyhow::{bail, Context, Result};

use super::output::Output;
use crate::storage::{read_conf, ModelError, ProjectModel};

/// Lists the documents of a project
pub fn docs(output: &Output, path: &Path) -> Result<()> {
    let project = ProjectModel::open(path)
        .with_context(|| format!("Failed to load project: {}", path.display()))?;

    let items: Vec<_> = project
        .documents()
        .iter()
        .map(|doc| {
            serde_json::json!({
                "tag": doc.tag(),
                "name": doc.name(),
                "config": doc.config_path(),
                "build_engine": doc.build_engine().as_str(),
                "input_files": doc.input_file_paths(),
            })
        })
        .collect();
    let report = serde_json::json!({
        "project": project.tag(),
        "name": project.name(),
        "documents": items,
    });

    output.report(&report, || {
        println!("{} ({})", project.name(), project.tag());
        for doc in project.documents() {
            println!();
            output.row(&[doc.tag(), doc.name(), doc.build_engine().as_str()]);
            for file in doc.input_file_paths() {
                println!("  {}", file.display());
            }
        }
    });
    Ok(())
}

/// Dumps the sections of a config file in file order
pub fn sections(output: &Output, path: &Path) -> Result<()> {
    let conf = read_conf(path)?;

    output.report(&conf.sections(), || print!("{}", conf.serialize()));
    Ok(())
}

/// Structural tags repeated within a document, as `(document, tag)`.
///
/// Repeats across documents come from shared input files and are not
/// reported.
fn duplicate_elements(project: &mut ProjectModel) -> Vec<(String, String)> {
    let mut tags: Vec<String> = Vec::new();
    for tag in project.document_tags() {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }

    let mut repeated = Vec::new();
    for tag in tags {
        if let Ok(outline) = project.document_outline(&tag) {
            for element in outline.duplicate_tags() {
                repeated.push((tag.clone(), element));
            }
        }
    }
    repeated
}

/// Loads a project and reports repeated document and structural tags
pub fn check(output: &Output, path: &Path) -> Result<()> {
    let mut project = ProjectModel::default();
    let mut duplicate_docs = Vec::new();
    let mut failed_docs = Vec::new();

    match project.configure(path) {
        Ok(()) => {}
        Err(ModelError::DuplicateTags(tags)) => duplicate_docs = tags,
        Err(ModelError::DocumentsFailed(paths)) => {
            failed_docs = paths;
            duplicate_docs = project.duplicate_document_tags();
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to load project: {}", path.display()))
        }
    }

    let duplicate_elements = duplicate_elements(&mut project);
    let ok = duplicate_docs.is_empty() && failed_docs.is_empty() && duplicate_elements.is_empty();

    let report = serde_json::json!({
        "project": project.tag(),
        "documents": project.document_tags(),
        "duplicate_document_tags": duplicate_docs,
        "failed_documents": failed_docs,
        "duplicate_structural_tags": duplicate_elements
            .iter()
            .map(|(doc, tag)| serde_json::json!({ "document": doc, "tag": tag }))
            .collect::<Vec<_>>(),
        "ok": ok,
    });

    output.report(&report, || {
        for doc in &failed_docs {
            output.problem(&format!("document {} could not be loaded", doc));
        }
        for tag in &duplicate_docs {
            output.problem(&format!("document tag '{}' is used more than once", tag));
        }
        for (doc, tag) in &duplicate_elements {
            output.problem(&format!(
                "structural tag '{}' is used more than once in document '{}'",
                tag, doc
            ));
        }
        if ok {
            println!(
                "Project '{}' is consistent ({} document(s))",
                project.tag(),
                project.documents().len()
            );
        }
    });

    if !ok {
        bail!("Project check failed: {}", path.display());
    }
    Ok(())
}
