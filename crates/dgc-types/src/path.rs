//! Traversal paths into a value graph.
//!
//! A [`FieldPath`] names one location in a compared graph: a sequence of
//! field names, positional indices, and map keys. The rendered form
//! (`a.b[0]`, `prices.get("apple")`) is what field-comparator registration
//! and ignore-path matching key on, so rendering is exact and stable.

use std::fmt;
use std::fmt::Write as _;

/// One step of a [`FieldPath`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A named object field, rendered as `.name`.
    Field(String),
    /// A positional index into an array or list, rendered as `[i]`.
    Index(usize),
    /// A map key, rendered as `.get(<key>)` using the key's compact form.
    Key(String),
}

/// A dot-separated path from the comparison root to one value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// The empty path naming the comparison root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns `true` for the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The path's segments, outermost first.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Extend with an arbitrary segment.
    pub fn child(&self, segment: PathSegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    /// Extend with a field name.
    pub fn field(&self, name: impl Into<String>) -> Self {
        self.child(PathSegment::Field(name.into()))
    }

    /// Extend with a positional index.
    pub fn index(&self, index: usize) -> Self {
        self.child(PathSegment::Index(index))
    }

    /// Extend with a rendered map key.
    pub fn key(&self, rendered_key: impl Into<String>) -> Self {
        self.child(PathSegment::Key(rendered_key.into()))
    }

    /// Render the path to its canonical dotted form. The root renders as
    /// the empty string.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Field(name) => {
                    if i > 0 {
                        out.push('.');
                    }
                    out.push_str(name);
                }
                PathSegment::Index(index) => {
                    let _ = write!(out, "[{index}]");
                }
                PathSegment::Key(key) => {
                    if i > 0 {
                        out.push('.');
                    }
                    let _ = write!(out, "get({key})");
                }
            }
        }
        out
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
