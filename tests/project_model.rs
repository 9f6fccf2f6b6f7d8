//! Library-level tests across the config parser, outline parser, and the
//! document and project models.

use std::fs;
use std::path::{Path, PathBuf};

use crossdocs::domain::{ConfigFile, ElementKind, NotationError, OutlineParser, SyntaxProfile};
use crossdocs::{DocumentModel, ModelError, ProjectModel};
use tempfile::TempDir;

fn write(dir: &Path, rel: &str, text: &str) -> PathBuf {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, text).unwrap();
    path
}

// =============================================================================
// Config notation
// =============================================================================

#[test]
fn headers_and_contents() {
    let conf = ConfigFile::parse("a:\nc1\nc2\n\nb:\nc3\n").unwrap();

    assert_eq!(conf.headers(), vec!["a", "b"]);
    assert_eq!(
        conf.section_contents("a").unwrap(),
        &["c1".to_string(), "c2".to_string()]
    );
    assert_eq!(conf.section_contents("b").unwrap(), &["c3".to_string()]);
}

#[test]
fn repeated_header_lookup_returns_last() {
    let conf = ConfigFile::parse("a:\nX\n\na:\nY\n").unwrap();
    assert_eq!(conf.section_contents("a").unwrap(), &["Y".to_string()]);
}

#[test]
fn two_tokens_while_idle_is_syntax_error() {
    let result = ConfigFile::parse("# header\n\nfoo bar\n");
    assert_eq!(result.unwrap_err(), NotationError::Syntax { line: 3 });
}

// =============================================================================
// Outline parser
// =============================================================================

#[test]
fn section_with_subsection() {
    let parsed = OutlineParser::new(SyntaxProfile::Doxygen, "doc", 0)
        .parse("\\section s1 Intro\n\\subsection s1a Details\n");

    assert!(parsed.found);
    let top: Vec<_> = parsed.fragment.top_level().collect();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].tag, "s1");
    assert_eq!(top[0].name, "Intro");

    let all: Vec<_> = parsed.fragment.elements().collect();
    assert_eq!(all[1].tag, "s1a");
    assert_eq!(all[1].name, "Details");
    assert_eq!(all[1].kind, ElementKind::Subsection);
}

#[test]
fn orphan_subsection_is_skipped() {
    let parsed = OutlineParser::new(SyntaxProfile::Doxygen, "doc", 0)
        .parse("\\subsection early Too Early\n\\section s1 Intro\n");

    assert!(parsed.found);
    let tags: Vec<_> = parsed.fragment.elements().map(|e| e.tag.as_str()).collect();
    assert_eq!(tags, vec!["s1"]);
}

// =============================================================================
// Documents and projects
// =============================================================================

fn shared_project(dir: &Path) -> PathBuf {
    write(dir, "shared/common.cdp", "\\section common Common\n");
    write(
        dir,
        "one/one.cdd",
        "document:\none\ninput_files:\n../shared/common.cdp\n",
    );
    write(
        dir,
        "two/two.cdd",
        "document:\ntwo\ninput_files:\n../shared/./common.cdp\n",
    );
    write(
        dir,
        "p.cdc",
        "project:\np\n\nbuild_engine:\ndoxygen\n\ndocuments:\none/one.cdd\ntwo/two.cdd\n",
    )
}

#[test]
fn shared_edit_reaches_every_document() {
    let dir = TempDir::new().unwrap();
    let mut project = ProjectModel::open(shared_project(dir.path())).unwrap();

    let slots = project
        .set_shared_input_file_contents("one", 0, "\\section common Edited\n")
        .unwrap();
    assert_eq!(slots, 2);

    assert_eq!(
        project.shared_input_file_contents("two", 0).unwrap(),
        "\\section common Edited\n"
    );
    assert!(project.document("two").unwrap().is_modified(0).unwrap());
}

#[test]
fn conflicting_edits_last_write_wins() {
    let dir = TempDir::new().unwrap();
    let mut project = ProjectModel::open(shared_project(dir.path())).unwrap();

    project.set_shared_input_file_contents("one", 0, "from one").unwrap();
    project.set_shared_input_file_contents("two", 0, "from two").unwrap();

    for tag in ["one", "two"] {
        assert_eq!(project.shared_input_file_contents(tag, 0).unwrap(), "from two");
    }

    assert_eq!(project.save_all().unwrap(), 1);
    for tag in ["one", "two"] {
        assert!(!project.document(tag).unwrap().is_modified(0).unwrap());
    }
    assert_eq!(
        fs::read_to_string(dir.path().join("shared/common.cdp")).unwrap(),
        "from two"
    );
}

#[test]
fn saving_after_edits_from_both_documents_keeps_latest() {
    let dir = TempDir::new().unwrap();
    let mut project = ProjectModel::open(shared_project(dir.path())).unwrap();

    project.set_shared_input_file_contents("one", 0, "first edit").unwrap();
    project.set_shared_input_file_contents("two", 0, "later edit").unwrap();
    project.save_all().unwrap();

    assert_eq!(
        fs::read_to_string(dir.path().join("shared/common.cdp")).unwrap(),
        "later edit"
    );
    for tag in ["one", "two"] {
        assert_eq!(project.shared_input_file_contents(tag, 0).unwrap(), "later edit");
        assert!(!project.document(tag).unwrap().is_modified(0).unwrap());
    }
}

#[test]
fn repeated_document_tag_fails_configure() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a/a.cdd", "document:\nsame\n");
    write(dir.path(), "b/b.cdd", "document:\nsame\n");
    let path = write(dir.path(), "p.cdc", "project:\np\n\ndocuments:\na/a.cdd\nb/b.cdd\n");

    DocumentModel::open(dir.path().join("a/a.cdd")).unwrap();
    DocumentModel::open(dir.path().join("b/b.cdd")).unwrap();

    let mut project = ProjectModel::default();
    let result = project.configure(&path);
    assert!(matches!(result, Err(ModelError::DuplicateTags(ref tags)) if tags == &["same"]));
    assert_eq!(project.documents().len(), 2);
}

#[test]
fn document_without_input_files_has_childless_outline() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "empty.cdd", "document:\nempty\ninput_files:\nmissing.cdp\n");

    let mut doc = DocumentModel::open(path).unwrap();
    assert!(doc.is_configured());
    assert_eq!(doc.input_file_count(), 0);

    let outline = doc.outline();
    assert!(outline.is_childless());
    assert_eq!(outline.element(outline.root()).kind, ElementKind::Document);
}

#[test]
fn project_outline_nests_documents() {
    let dir = TempDir::new().unwrap();
    let mut project = ProjectModel::open(shared_project(dir.path())).unwrap();

    let outline = project.outline();
    let root = outline.root();
    assert_eq!(outline.element(root).kind, ElementKind::Project);

    let docs: Vec<_> = outline
        .children(root)
        .iter()
        .map(|&id| outline.element(id).tag.as_str())
        .collect();
    assert_eq!(docs, vec!["one", "two"]);

    let found = project.find_element("two", "common").unwrap().unwrap();
    assert_eq!(found.line, Some(1));
    assert_eq!(found.file_index, Some(0));
    assert!(project.find_element("two", "absent").unwrap().is_none());
    assert!(matches!(
        project.find_element("three", "common"),
        Err(ModelError::UnknownDocument(_))
    ));
}
