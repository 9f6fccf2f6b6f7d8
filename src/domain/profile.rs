//! Syntax profiles for input files and build engine choices

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ProfileError {
    #[error("Unknown build engine: '{0}'")]
    UnknownBuildEngine(String),

    #[error("Unknown syntax profile: '{0}'")]
    UnknownSyntax(String),
}

/// Which marker grammar is applied to an input file when extracting its outline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyntaxProfile {
    #[default]
    Doxygen,
    Latex,
    Html,
    Markdown,
    None,
}

impl SyntaxProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyntaxProfile::Doxygen => "doxygen",
            SyntaxProfile::Latex => "latex",
            SyntaxProfile::Html => "html",
            SyntaxProfile::Markdown => "markdown",
            SyntaxProfile::None => "none",
        }
    }
}

impl fmt::Display for SyntaxProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyntaxProfile {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "doxygen" => Ok(SyntaxProfile::Doxygen),
            "latex" => Ok(SyntaxProfile::Latex),
            "html" => Ok(SyntaxProfile::Html),
            "markdown" => Ok(SyntaxProfile::Markdown),
            "none" => Ok(SyntaxProfile::None),
            other => Err(ProfileError::UnknownSyntax(other.to_string())),
        }
    }
}

/// Build engine named in a project or document config.
///
/// `None` means "inherit": a document without its own engine uses the
/// project's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildEngineKind {
    Doxygen,
    Markdown,
    Custom,
    #[default]
    None,
}

impl BuildEngineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildEngineKind::Doxygen => "doxygen",
            BuildEngineKind::Markdown => "markdown",
            BuildEngineKind::Custom => "custom",
            BuildEngineKind::None => "none",
        }
    }

    /// Returns `self` unless it is `None`, in which case `inherited` applies
    pub fn or_inherit(self, inherited: BuildEngineKind) -> BuildEngineKind {
        match self {
            BuildEngineKind::None => inherited,
            own => own,
        }
    }
}

impl fmt::Display for BuildEngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildEngineKind {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "doxygen" => Ok(BuildEngineKind::Doxygen),
            "markdown" => Ok(BuildEngineKind::Markdown),
            "custom" => Ok(BuildEngineKind::Custom),
            "none" => Ok(BuildEngineKind::None),
            other => Err(ProfileError::UnknownBuildEngine(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_build_engine() {
        assert_eq!("doxygen".parse(), Ok(BuildEngineKind::Doxygen));
        assert_eq!(" Custom ".parse(), Ok(BuildEngineKind::Custom));
        assert!("sphinx".parse::<BuildEngineKind>().is_err());
    }

    #[test]
    fn none_inherits() {
        assert_eq!(
            BuildEngineKind::None.or_inherit(BuildEngineKind::Doxygen),
            BuildEngineKind::Doxygen
        );
        assert_eq!(
            BuildEngineKind::Markdown.or_inherit(BuildEngineKind::Doxygen),
            BuildEngineKind::Markdown
        );
    }

    #[test]
    fn syntax_display_round_trip() {
        for profile in [
            SyntaxProfile::Doxygen,
            SyntaxProfile::Latex,
            SyntaxProfile::Html,
            SyntaxProfile::Markdown,
            SyntaxProfile::None,
        ] {
            assert_eq!(profile.to_string().parse::<SyntaxProfile>(), Ok(profile));
        }
    }
}
