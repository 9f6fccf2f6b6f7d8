//! Structural outline of documents and projects
//!
//! Outlines are index-backed trees. A parse of one input file produces an
//! [`OutlineFragment`]: a flat list of nodes whose parents are indices into
//! the same list. Fragments and whole outlines are attached to a larger
//! [`Outline`] by copying their nodes and shifting the indices, so no node is
//! ever shared between two trees.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

/// Kind of an outline node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Project,
    Document,
    Section,
    Subsection,
    Subsubsection,
    Paragraph,
}

impl ElementKind {
    /// Nesting depth of a structural marker (section = 0). Roots have none.
    pub fn depth(&self) -> Option<usize> {
        match self {
            ElementKind::Project | ElementKind::Document => None,
            ElementKind::Section => Some(0),
            ElementKind::Subsection => Some(1),
            ElementKind::Subsubsection => Some(2),
            ElementKind::Paragraph => Some(3),
        }
    }

    /// Returns true for section-like markers found inside input files
    pub fn is_structural(&self) -> bool {
        self.depth().is_some()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Project => "project",
            ElementKind::Document => "document",
            ElementKind::Section => "section",
            ElementKind::Subsection => "subsection",
            ElementKind::Subsubsection => "subsubsection",
            ElementKind::Paragraph => "paragraph",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named heading found in an input file, or a synthetic root
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuralElement {
    pub tag: String,
    pub name: String,
    pub kind: ElementKind,

    /// 1-based line in the input file; roots have none
    pub line: Option<usize>,

    /// Tag of the owning document
    pub document: String,

    /// Index of the originating input file in the owning document
    pub file_index: Option<usize>,
}

impl StructuralElement {
    /// Synthetic root representing a whole document
    pub fn document_root(tag: &str, name: &str) -> Self {
        Self {
            tag: tag.to_string(),
            name: name.to_string(),
            kind: ElementKind::Document,
            line: None,
            document: tag.to_string(),
            file_index: None,
        }
    }

    /// Synthetic root representing a whole project
    pub fn project_root(tag: &str, name: &str) -> Self {
        Self {
            tag: tag.to_string(),
            name: name.to_string(),
            kind: ElementKind::Project,
            line: None,
            document: String::new(),
            file_index: None,
        }
    }
}

/// Index of a node within an [`Outline`]
pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
struct FragmentNode {
    element: StructuralElement,
    parent: Option<usize>,
}

/// Detached nodes from one input file, in insertion order.
///
/// A node with no parent is top level; otherwise `parent` indexes an earlier
/// node of the same fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutlineFragment {
    nodes: Vec<FragmentNode>,
}

impl OutlineFragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Inserts an element at the given depth.
    ///
    /// Walks down from the top level, picking the most recently added child
    /// at each step. Returns false, leaving the fragment untouched, when an
    /// ancestor is missing.
    pub fn insert_at_depth(&mut self, element: StructuralElement, depth: usize) -> bool {
        let mut parent: Option<usize> = None;
        for _ in 0..depth {
            match self.nodes.iter().rposition(|n| n.parent == parent) {
                Some(idx) => parent = Some(idx),
                None => return false,
            }
        }
        self.nodes.push(FragmentNode { element, parent });
        true
    }

    /// Elements of the fragment in insertion order
    pub fn elements(&self) -> impl Iterator<Item = &StructuralElement> {
        self.nodes.iter().map(|n| &n.element)
    }

    /// Elements with no parent, in order
    pub fn top_level(&self) -> impl Iterator<Item = &StructuralElement> {
        self.nodes
            .iter()
            .filter(|n| n.parent.is_none())
            .map(|n| &n.element)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct OutlineNode {
    element: StructuralElement,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A rooted outline tree. Node 0 is the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outline {
    nodes: Vec<OutlineNode>,
}

impl Outline {
    pub fn new(root: StructuralElement) -> Self {
        Self {
            nodes: vec![OutlineNode {
                element: root,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        0
    }

    /// Number of nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true when the root has no children
    pub fn is_childless(&self) -> bool {
        self.nodes[0].children.is_empty()
    }

    pub fn element(&self, id: NodeId) -> &StructuralElement {
        &self.nodes[id].element
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    fn push(&mut self, element: StructuralElement, parent: NodeId) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(OutlineNode {
            element,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(id);
        id
    }

    /// Attaches a fragment's top-level nodes, in order, as children of `parent`
    pub fn splice(&mut self, parent: NodeId, fragment: OutlineFragment) {
        let offset = self.nodes.len();
        for node in fragment.nodes {
            let target = match node.parent {
                Some(local) => local + offset,
                None => parent,
            };
            self.push(node.element, target);
        }
    }

    /// Attaches another outline, root included, as the last child of `parent`
    pub fn graft(&mut self, parent: NodeId, other: Outline) {
        let offset = self.nodes.len();
        for node in other.nodes {
            let target = match node.parent {
                Some(local) => local + offset,
                None => parent,
            };
            self.push(node.element, target);
        }
    }

    /// Depth-first, pre-order traversal yielding `(node, depth below root)`
    pub fn walk(&self) -> Vec<(NodeId, usize)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![(self.root(), 0usize)];
        while let Some((id, depth)) = stack.pop() {
            out.push((id, depth));
            for &child in self.nodes[id].children.iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        out
    }

    /// First structural element with the given tag, in outline order
    pub fn find_by_tag(&self, tag: &str) -> Option<&StructuralElement> {
        self.walk()
            .into_iter()
            .map(|(id, _)| &self.nodes[id].element)
            .find(|e| e.kind.is_structural() && e.tag == tag)
    }

    /// Structural tags that occur more than once, in first-seen order
    pub fn duplicate_tags(&self) -> Vec<String> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut order = Vec::new();

        for (id, _) in self.walk() {
            let element = &self.nodes[id].element;
            if !element.kind.is_structural() {
                continue;
            }
            let count = counts.entry(element.tag.as_str()).or_insert(0);
            *count += 1;
            if *count == 2 {
                order.push(element.tag.clone());
            }
        }

        order
    }

    /// Nested, serializable view of the tree
    pub fn to_tree(&self) -> OutlineTree {
        self.subtree(self.root())
    }

    fn subtree(&self, id: NodeId) -> OutlineTree {
        OutlineTree {
            element: self.nodes[id].element.clone(),
            children: self.nodes[id]
                .children
                .iter()
                .map(|&child| self.subtree(child))
                .collect(),
        }
    }
}

/// Owned nested tree, used for JSON output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineTree {
    #[serde(flatten)]
    pub element: StructuralElement,
    pub children: Vec<OutlineTree>,
}
