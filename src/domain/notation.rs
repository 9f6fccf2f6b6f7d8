//! Config notation used by project and document files
//!
//! The notation is line oriented:
//!
//! ```text
//! # comment
//! project:
//! handbook
//!
//! documents:
//! intro/intro.cdd
//! api/api.cdd
//! ```
//!
//! A header is a single whitespace-free token ending in `:` and opens a
//! section. Each following single-token line is a content line of that
//! section. Blank lines close the section; comment lines are inert.
//! Sections may repeat, and lookups return the latest one.

use serde::Serialize;
use thiserror::Error;

/// Marks a comment line when it is the first non-blank character
pub const COMMENT_MARKER: char = '#';

/// Terminates a header token
pub const COMMAND_MARKER: char = ':';

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotationError {
    #[error("Syntax error on line {line}")]
    Syntax { line: usize },
}

/// One header with its ordered content lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigSection {
    pub header: String,
    pub contents: Vec<String>,
}

impl ConfigSection {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            contents: Vec::new(),
        }
    }

    /// Creates a section with the given content lines
    pub fn with_contents<I, S>(header: impl Into<String>, contents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            header: header.into(),
            contents: contents.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the content lines trimmed of surrounding whitespace
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.contents.iter().map(|line| line.trim())
    }
}

/// Parser states. Reaching a syntax error is terminal and ends the parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    AtHeader,
    AtArgument,
}

/// Classification of a single input line
#[derive(Debug, PartialEq, Eq)]
enum LineKind<'a> {
    Blank,
    Comment,
    Header(&'a str),
    Argument,
    Invalid,
}

fn classify(line: &str) -> LineKind<'_> {
    let mut tokens = line.split_whitespace();

    let Some(first) = tokens.next() else {
        return LineKind::Blank;
    };

    if first.starts_with(COMMENT_MARKER) {
        return LineKind::Comment;
    }

    if tokens.next().is_some() {
        return LineKind::Invalid;
    }

    match first.strip_suffix(COMMAND_MARKER) {
        Some(header) => LineKind::Header(header),
        None => LineKind::Argument,
    }
}

/// An ordered list of parsed sections
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfigFile {
    sections: Vec<ConfigSection>,
}

impl ConfigFile {
    pub fn new(sections: Vec<ConfigSection>) -> Self {
        Self { sections }
    }

    /// Parses text in the config notation.
    ///
    /// On a syntax error the sections gathered so far are dropped and the
    /// 1-based number of the offending line is reported.
    pub fn parse(text: &str) -> Result<Self, NotationError> {
        let mut sections: Vec<ConfigSection> = Vec::new();
        let mut state = State::Idle;

        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;

            state = match (state, classify(line)) {
                (_, LineKind::Blank) => State::Idle,
                (current, LineKind::Comment) => current,
                (_, LineKind::Header(header)) => {
                    sections.push(ConfigSection::new(header));
                    State::AtHeader
                }
                (State::AtHeader | State::AtArgument, LineKind::Argument) => {
                    match sections.last_mut() {
                        Some(section) => section.contents.push(line.to_string()),
                        None => return Err(NotationError::Syntax { line: line_no }),
                    }
                    State::AtArgument
                }
                (State::Idle, LineKind::Argument) | (_, LineKind::Invalid) => {
                    return Err(NotationError::Syntax { line: line_no });
                }
            };
        }

        Ok(Self { sections })
    }

    /// Returns all sections in file order
    pub fn sections(&self) -> &[ConfigSection] {
        &self.sections
    }

    /// Consumes the file and returns its sections
    pub fn into_sections(self) -> Vec<ConfigSection> {
        self.sections
    }

    /// Returns every header in order, duplicates included
    pub fn headers(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.header.as_str()).collect()
    }

    /// Returns the last section with the given header
    pub fn section(&self, header: &str) -> Option<&ConfigSection> {
        self.sections.iter().rev().find(|s| s.header == header)
    }

    /// Returns the content lines of the last section with the given header
    pub fn section_contents(&self, header: &str) -> Option<&[String]> {
        self.section(header).map(|s| s.contents.as_slice())
    }

    /// Returns the first non-empty value of the last matching section
    pub fn first_value(&self, header: &str) -> Option<&str> {
        self.section(header)
            .and_then(|s| s.values().find(|v| !v.is_empty()))
    }

    /// Serializes the sections back into the config notation
    pub fn serialize(&self) -> String {
        serialize(&self.sections)
    }
}

/// Writes `header:` followed by each content line, one per line
pub fn serialize(sections: &[ConfigSection]) -> String {
    let mut out = String::new();
    for section in sections {
        out.push_str(&section.header);
        out.push(COMMAND_MARKER);
        out.push('\n');
        for line in &section.contents {
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_headers_and_contents() {
        let text = "a:\nc1\nc2\n\nb:\nc3\n";
        let file = ConfigFile::parse(text).unwrap();

        assert_eq!(file.headers(), vec!["a", "b"]);
        assert_eq!(
            file.section_contents("a").unwrap(),
            &["c1".to_string(), "c2".to_string()]
        );
        assert_eq!(file.section_contents("b").unwrap(), &["c3".to_string()]);
    }

    #[test]
    fn last_matching_section_wins() {
        let text = "a:\nX\n\na:\nY\n";
        let file = ConfigFile::parse(text).unwrap();

        assert_eq!(file.headers(), vec!["a", "a"]);
        assert_eq!(file.section_contents("a").unwrap(), &["Y".to_string()]);
    }

    #[test]
    fn missing_section_is_absent() {
        let file = ConfigFile::parse("a:\nx\n").unwrap();
        assert!(file.section_contents("b").is_none());
        assert!(file.first_value("b").is_none());
    }

    #[test]
    fn two_tokens_without_section_reports_line() {
        let text = "# header comment\n\nfoo bar\n";
        let err = ConfigFile::parse(text).unwrap_err();
        assert_eq!(err, NotationError::Syntax { line: 3 });
    }

    #[test]
    fn argument_in_idle_state_fails() {
        let err = ConfigFile::parse("a:\nx\n\ny\n").unwrap_err();
        assert_eq!(err, NotationError::Syntax { line: 4 });
    }

    #[test]
    fn multi_token_content_line_fails() {
        let err = ConfigFile::parse("name:\nMy Handbook\n").unwrap_err();
        assert_eq!(err, NotationError::Syntax { line: 2 });
    }

    #[test]
    fn comments_do_not_close_a_section() {
        let text = "input_files:\na.cdp\n# b.cdp is disabled\nc.cdp\n";
        let file = ConfigFile::parse(text).unwrap();
        assert_eq!(
            file.section_contents("input_files").unwrap(),
            &["a.cdp".to_string(), "c.cdp".to_string()]
        );
    }

    #[test]
    fn header_strips_single_marker() {
        let file = ConfigFile::parse("weird::\nx\n").unwrap();
        assert_eq!(file.headers(), vec!["weird:"]);
    }

    #[test]
    fn content_lines_are_kept_raw() {
        let file = ConfigFile::parse("document:\n   intro\n").unwrap();
        assert_eq!(file.section_contents("document").unwrap(), &["   intro".to_string()]);
        assert_eq!(file.first_value("document"), Some("intro"));
    }

    #[test]
    fn serialize_writes_marker_and_lines() {
        let sections = vec![
            ConfigSection::with_contents("document", ["intro"]),
            ConfigSection::with_contents("input_files", ["a.cdp", "b.cdp"]),
        ];
        assert_eq!(
            serialize(&sections),
            "document:\nintro\ninput_files:\na.cdp\nb.cdp\n"
        );
    }

    #[test]
    fn empty_text_has_no_sections() {
        let file = ConfigFile::parse("").unwrap();
        assert!(file.sections().is_empty());
    }

    fn section_strategy() -> impl Strategy<Value = ConfigSection> {
        (
            "[a-z_]{1,12}",
            proptest::collection::vec("[A-Za-z0-9_./-]{1,16}", 0..5),
        )
            .prop_map(|(header, contents)| ConfigSection::with_contents(header, contents))
    }

    proptest! {
        #[test]
        fn serialize_then_parse_round_trips(
            sections in proptest::collection::vec(section_strategy(), 0..6)
        ) {
            let text = serialize(&sections);
            let parsed = ConfigFile::parse(&text).unwrap();
            prop_assert_eq!(parsed.into_sections(), sections);
        }
    }
}
