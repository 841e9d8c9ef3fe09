//! Call paths: the nested position of a call, e.g. `Solver::run/LS::improve`

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between path segments
pub const SEPARATOR: char = '/';

/// Slash-joined sequence of qualified names, outermost caller first.
///
/// The last segment is the qualified name of the call this path describes,
/// the prefix is the path of its immediate caller.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallPath(String);

impl CallPath {
    /// Join qualified names from outermost to innermost
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut path = String::new();
        for (i, segment) in segments.into_iter().enumerate() {
            if i > 0 {
                path.push(SEPARATOR);
            }
            path.push_str(segment.as_ref());
        }
        Self(path)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path of the caller, empty for root calls
    pub fn parent(&self) -> &str {
        self.0.rsplit_once(SEPARATOR).map_or("", |(parent, _)| parent)
    }

    /// Qualified name of the call itself
    pub fn leaf(&self) -> &str {
        self.0.rsplit_once(SEPARATOR).map_or(&self.0, |(_, leaf)| leaf)
    }

    pub fn depth(&self) -> usize {
        if self.0.is_empty() {
            0
        } else {
            self.0.matches(SEPARATOR).count() + 1
        }
    }

    pub fn is_root(&self) -> bool {
        !self.0.contains(SEPARATOR)
    }
}

impl From<&str> for CallPath {
    fn from(path: &str) -> Self {
        Self(path.to_string())
    }
}

impl From<String> for CallPath {
    fn from(path: String) -> Self {
        Self(path)
    }
}

impl fmt::Display for CallPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
