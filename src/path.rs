//! Dotted option addresses
//!
//! Every diagnostic carries the full dotted path of the option it concerns
//! (`subnets.default.addressPrefix`), so users can find the offending line in
//! their declaration without guessing.

use std::fmt;

/// Address of one option, as a sequence of segments joined by dots
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct OptionPath(Vec<String>);

impl OptionPath {
    /// The empty path, addressing the option set itself
    pub fn root() -> Self {
        OptionPath(Vec::new())
    }

    /// Extend the path with one more segment
    pub fn child(&self, segment: impl AsRef<str>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.as_ref().to_string());
        OptionPath(segments)
    }

    /// Concatenate another path onto this one
    pub fn join(&self, other: &OptionPath) -> Self {
        let mut segments = self.0.clone();
        segments.extend(other.0.iter().cloned());
        OptionPath(segments)
    }

    /// First segment, if any
    pub fn head(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for OptionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

impl From<&str> for OptionPath {
    fn from(dotted: &str) -> Self {
        if dotted.is_empty() {
            return OptionPath::root();
        }
        OptionPath(dotted.split('.').map(str::to_string).collect())
    }
}

impl From<String> for OptionPath {
    fn from(dotted: String) -> Self {
        OptionPath::from(dotted.as_str())
    }
}
