//! Typed paths into a design document
//!
//! A [`DocPath`] is an ordered sequence of segments addressing one position
//! in the document tree. It replaces ad hoc dotted-string accessors: paths
//! are constructed once and reused for lookups, default patches, and error
//! messages.

use serde_json::Value;
use std::fmt;

/// One step into the document tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Property of a mapping
    Key(String),
    /// Element of a sequence
    Index(usize),
}

/// An ordered path into a design document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DocPath {
    segments: Vec<PathSegment>,
}

impl DocPath {
    /// The document root
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a dotted key path like `lwc.ports.pdi`
    pub fn parse(dotted: &str) -> Self {
        Self {
            segments: dotted
                .split('.')
                .filter(|s| !s.is_empty())
                .map(|s| PathSegment::Key(s.to_string()))
                .collect(),
        }
    }

    /// Extend with a property key
    pub fn key(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Key(name.to_string()));
        Self { segments }
    }

    /// Extend with a sequence index
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// The final segment and everything leading up to it
    pub fn split_last(&self) -> Option<(&PathSegment, &[PathSegment])> {
        self.segments.split_last()
    }

    /// Follow the path through a document, `None` if any step is missing
    pub fn lookup<'a>(&self, doc: &'a Value) -> Option<&'a Value> {
        let mut current = doc;
        for segment in &self.segments {
            current = match segment {
                PathSegment::Key(key) => current.as_object()?.get(key)?,
                PathSegment::Index(index) => current.as_array()?.get(*index)?,
            };
        }
        Some(current)
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "(root)");
        }
        let mut first = true;
        for segment in &self.segments {
            match segment {
                PathSegment::Key(key) => {
                    if !first {
                        write!(f, ".")?;
                    }
                    write!(f, "{key}")?;
                }
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
            first = false;
        }
        Ok(())
    }
}
