//! Qualified module names.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// A dotted name failed validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid module name: {0:?}")]
pub struct InvalidName(pub String);

/// A qualified module name: a non-empty, dot-delimited sequence of
/// identifier segments, e.g. `pkg.sub`.
///
/// Always absolute with respect to the runtime's root. Built by
/// [`ModuleName::parse`] or by the runtime for synthetic modules.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleName(Vec<String>);

impl ModuleName {
    /// Parse and validate a dotted name.
    pub fn parse(text: &str) -> Result<Self, InvalidName> {
        let segments: Vec<String> = text.split('.').map(str::to_string).collect();
        if !segments.iter().all(|s| is_identifier(s)) {
            return Err(InvalidName(text.to_string()));
        }
        Ok(Self(segments))
    }

    /// Build a name from pre-validated segments.
    pub fn from_segments<S: AsRef<str>>(segments: &[S]) -> Self {
        assert!(!segments.is_empty());
        Self(segments.iter().map(|s| s.as_ref().to_string()).collect())
    }

    /// The dotted form, e.g. `"pkg.sub"`.
    pub fn as_dotted(&self) -> String {
        self.0.join(".")
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// First segment.
    pub fn head(&self) -> &str {
        self.0.first().map(|s| s.as_str()).expect("module name is never empty")
    }

    /// Last segment.
    pub fn last(&self) -> &str {
        self.0.last().map(|s| s.as_str()).expect("module name is never empty")
    }

    /// The enclosing package's name, if any.
    pub fn parent(&self) -> Option<ModuleName> {
        if self.0.len() < 2 {
            return None;
        }
        Some(ModuleName(self.0[..self.0.len() - 1].to_vec()))
    }

    /// Iterate the name's prefixes in loading order, including the full
    /// name itself: `a.b.c` yields `a`, `a.b`, `a.b.c`.
    pub fn prefixes(&self) -> impl Iterator<Item = ModuleName> + '_ {
        (1..=self.0.len()).map(move |n| ModuleName(self.0[..n].to_vec()))
    }

    /// The relative filesystem path implied by the name: each dot
    /// becomes the host directory separator.
    pub fn to_rel_path(&self) -> PathBuf {
        self.0.iter().collect()
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_dotted())
    }
}
