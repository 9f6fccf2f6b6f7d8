//! Structural outline extraction from input file text
//!
//! The doxygen profile recognizes four markers, from shallowest to deepest:
//!
//! ```text
//! \section        <tag> <name...>
//! \subsection     <tag> <name...>
//! \subsubsection  <tag> <name...>
//! \paragraph      <tag> <name...>
//! ```
//!
//! Only the first marker on a line is considered. A marker can only open
//! under its parent level: which markers are tried on a line depends on the
//! deepest level reached so far, deepest candidate first.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use super::outline::{ElementKind, OutlineFragment, StructuralElement};
use super::profile::SyntaxProfile;

/// Compiled marker patterns, one per structural kind
struct MarkerRules {
    section: Regex,
    subsection: Regex,
    subsubsection: Regex,
    paragraph: Regex,
}

impl MarkerRules {
    fn for_kind(&self, kind: ElementKind) -> Option<&Regex> {
        match kind {
            ElementKind::Section => Some(&self.section),
            ElementKind::Subsection => Some(&self.subsection),
            ElementKind::Subsubsection => Some(&self.subsubsection),
            ElementKind::Paragraph => Some(&self.paragraph),
            ElementKind::Project | ElementKind::Document => None,
        }
    }
}

fn marker(keyword: &str) -> Regex {
    Regex::new(&format!(r"\\{keyword}\s+(\S+)\s+(.*)")).expect("marker pattern is valid")
}

static DOXYGEN_RULES: Lazy<MarkerRules> = Lazy::new(|| MarkerRules {
    section: marker("section"),
    subsection: marker("subsection"),
    subsubsection: marker("subsubsection"),
    paragraph: marker("paragraph"),
});

fn rules_for(syntax: SyntaxProfile) -> Option<&'static MarkerRules> {
    match syntax {
        SyntaxProfile::Doxygen => Some(&DOXYGEN_RULES),
        SyntaxProfile::Latex
        | SyntaxProfile::Html
        | SyntaxProfile::Markdown
        | SyntaxProfile::None => None,
    }
}

/// Deepest level opened so far while scanning a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Idle,
    AtSection,
    AtSubsection,
    AtSubsubsection,
    AtParagraph,
}

impl ParseState {
    /// Kinds to try on the next line, in order
    fn candidates(self) -> &'static [ElementKind] {
        use ElementKind::*;
        match self {
            ParseState::Idle => &[Section],
            ParseState::AtSection => &[Subsection, Section],
            ParseState::AtSubsection => &[Subsubsection, Subsection, Section],
            ParseState::AtSubsubsection | ParseState::AtParagraph => {
                &[Paragraph, Subsubsection, Subsection, Section]
            }
        }
    }

    fn after(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Section => ParseState::AtSection,
            ElementKind::Subsection => ParseState::AtSubsection,
            ElementKind::Subsubsection => ParseState::AtSubsubsection,
            ElementKind::Paragraph => ParseState::AtParagraph,
            ElementKind::Project | ElementKind::Document => ParseState::Idle,
        }
    }
}

/// Result of scanning one input file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedOutline {
    /// True when at least one element was inserted
    pub found: bool,
    pub fragment: OutlineFragment,
}

/// Scans input file text for structural markers.
///
/// Holds only the attribution of produced elements; every call to
/// [`OutlineParser::parse`] starts from a clean state.
#[derive(Debug, Clone)]
pub struct OutlineParser<'a> {
    syntax: SyntaxProfile,
    document: &'a str,
    file_index: usize,
}

impl<'a> OutlineParser<'a> {
    pub fn new(syntax: SyntaxProfile, document: &'a str, file_index: usize) -> Self {
        Self {
            syntax,
            document,
            file_index,
        }
    }

    pub fn parse(&self, text: &str) -> ParsedOutline {
        let mut fragment = OutlineFragment::new();

        let Some(rules) = rules_for(self.syntax) else {
            return ParsedOutline {
                found: false,
                fragment,
            };
        };

        let mut state = ParseState::Idle;

        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;

            for &kind in state.candidates() {
                let Some(caps) = rules.for_kind(kind).and_then(|re| re.captures(line)) else {
                    continue;
                };

                let element = StructuralElement {
                    tag: caps[1].to_string(),
                    name: caps[2].trim_end().to_string(),
                    kind,
                    line: Some(line_no),
                    document: self.document.to_string(),
                    file_index: Some(self.file_index),
                };

                let depth = kind.depth().unwrap_or_default();
                if fragment.insert_at_depth(element, depth) {
                    state = ParseState::after(kind);
                    break;
                }

                warn!(
                    document = self.document,
                    line = line_no,
                    "No parent open for {} '{}', skipping",
                    kind,
                    &caps[1]
                );
            }
        }

        ParsedOutline {
            found: !fragment.is_empty(),
            fragment,
        }
    }
}
