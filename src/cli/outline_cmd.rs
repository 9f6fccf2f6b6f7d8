//! Outline command

use std::path::Path;

use anyhow::{Context, Result};

use super::output::Output;
use crate::domain::Outline;
use crate::storage::ProjectModel;

/// Prints the outline of a project, or of one of its documents
pub fn outline(output: &Output, path: &Path, doc_tag: Option<&str>) -> Result<()> {
    let mut project = ProjectModel::open(path)
        .with_context(|| format!("Failed to load project: {}", path.display()))?;

    let outline = match doc_tag {
        Some(tag) => project.document_outline(tag)?,
        None => project.outline(),
    };

    output.report(&outline.to_tree(), || print_tree(&outline));
    Ok(())
}

fn print_tree(outline: &Outline) {
    for (id, depth) in outline.walk() {
        let element = outline.element(id);
        let indent = "  ".repeat(depth);
        match element.line {
            Some(line) => println!(
                "{}{} {} [{}] ({}:{})",
                indent,
                element.kind,
                element.tag,
                element.name,
                element.file_index.unwrap_or_default(),
                line
            ),
            None => println!("{}{} {} [{}]", indent, element.kind, element.tag, element.name),
        }
    }
}
