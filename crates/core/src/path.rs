//! Response paths
//!
//! A `ResponsePath` points at a location inside a query result, e.g.
//! `boxes.elements[2].labelIdentifier`. Reads use it to report exactly which
//! field was missing from the cache, and server errors carry one.
//!
//! - ResponsePath: sequence of segments from the operation root
//! - PathSegment: a response key (`.field`) or a list position (`[n]`)

use serde::{Deserialize, Serialize};
use std::fmt;

/// A segment in a response path
///
/// # Examples
///
/// ```
/// use boxcache_core::path::PathSegment;
///
/// let field = PathSegment::Field("boxes".to_string());
/// let idx = PathSegment::Index(0);
/// assert_eq!(format!("{}{}", field, idx), ".boxes[0]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathSegment {
    /// Response key (alias if present, otherwise field name): `.foo`
    Field(String),
    /// List position: `[0]`
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(k) => write!(f, ".{}", k),
            PathSegment::Index(i) => write!(f, "[{}]", i),
        }
    }
}

/// A path into a query result
///
/// Paths are built while walking a selection set, so the builder methods
/// return a new path and leave the parent untouched.
///
/// # Examples
///
/// ```
/// use boxcache_core::path::ResponsePath;
///
/// let root = ResponsePath::root();
/// let label = root.field("boxes").field("elements").index(2).field("labelIdentifier");
///
/// assert_eq!(label.to_string(), "boxes.elements[2].labelIdentifier");
/// assert_eq!(label.len(), 4);
/// assert!(root.is_root());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct ResponsePath {
    segments: Vec<PathSegment>,
}

impl ResponsePath {
    /// Create the root path (empty path)
    pub fn root() -> Self {
        ResponsePath {
            segments: Vec::new(),
        }
    }

    /// Create a path from a vector of segments
    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        ResponsePath { segments }
    }

    /// Get the path segments
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Get the number of segments in the path
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if the path has no segments
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Check if this is the root path
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Child path for a response key
    pub fn field(&self, key: impl Into<String>) -> Self {
        let mut child = self.clone();
        child.segments.push(PathSegment::Field(key.into()));
        child
    }

    /// Child path for a list position
    pub fn index(&self, idx: usize) -> Self {
        let mut child = self.clone();
        child.segments.push(PathSegment::Index(idx));
        child
    }

    /// Render as `a.b[0].c`
    pub fn to_path_string(&self) -> String {
        let mut result = String::new();
        for seg in &self.segments {
            match seg {
                PathSegment::Field(k) => {
                    if !result.is_empty() {
                        result.push('.');
                    }
                    result.push_str(k);
                }
                PathSegment::Index(i) => {
                    result.push('[');
                    result.push_str(&i.to_string());
                    result.push(']');
                }
            }
        }
        result
    }
}

impl fmt::Display for ResponsePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_path_string())
    }
}
