//! Path-annotated error records and the aggregator that stitches them together
//!
//! Every compiled node reports failures as an [`ErrorReport`]. When a parent
//! node folds a child's report into its own it prepends the child's location
//! (object key or array index), so by the time a report reaches the root each
//! record carries the full path from the root schema to the failing node.
//!
//! Copyright (c) 2025 Dataval Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One step on the way from the root schema to a nested node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Array position
    Index(usize),
    /// Object key
    Key(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Index(index) => write!(f, "{}", index),
            PathSegment::Key(key) => write!(f, "{}", key),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// Ordered sequence of path segments, outermost first
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<PathSegment>);

impl Path {
    /// The empty path (the root node)
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Segments, outermost first
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Put `prefix` in front of the existing segments
    pub fn prepend(&mut self, prefix: &Path) {
        if prefix.is_root() {
            return;
        }
        let mut segments = prefix.0.clone();
        segments.append(&mut self.0);
        self.0 = segments;
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.0 {
            write!(f, "[{}]", segment)?;
        }
        Ok(())
    }
}

impl From<PathSegment> for Path {
    fn from(segment: PathSegment) -> Self {
        Self(vec![segment])
    }
}

impl From<Vec<PathSegment>> for Path {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }
}

impl From<&str> for Path {
    fn from(key: &str) -> Self {
        PathSegment::from(key).into()
    }
}

impl From<String> for Path {
    fn from(key: String) -> Self {
        PathSegment::from(key).into()
    }
}

impl From<usize> for Path {
    fn from(index: usize) -> Self {
        PathSegment::from(index).into()
    }
}

impl From<()> for Path {
    fn from(_: ()) -> Self {
        Path::root()
    }
}

/// A single failure and where it happened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Path from the root schema to the failing node
    pub path: Path,
    /// Human-readable failure message
    pub message: String,
}

impl ErrorRecord {
    /// Create a record located at the current node
    pub fn new<M: Into<String>>(message: M) -> Self {
        Self {
            path: Path::root(),
            message: message.into(),
        }
    }

    /// Create a record located at `path` relative to the current node
    pub fn at<P, M>(path: P, message: M) -> Self
    where
        P: Into<Path>,
        M: Into<String>,
    {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

impl From<String> for ErrorRecord {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for ErrorRecord {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Ordered collection of error records
#[derive(Debug, Clone, Default, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{}", self.error_string())]
pub struct ErrorReport {
    records: Vec<ErrorRecord>,
}

impl ErrorReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record; raw messages are located at the current node
    pub fn push<R: Into<ErrorRecord>>(&mut self, record: R) {
        self.records.push(record.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.records.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// The recorded errors, or `None` when there are none
    pub fn errors(&self) -> Option<&[ErrorRecord]> {
        if self.records.is_empty() {
            None
        } else {
            Some(&self.records)
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ErrorRecord> {
        self.records.iter()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// One `[seg][seg]: message` line per record, or `null` when empty
    pub fn error_string(&self) -> String {
        if self.records.is_empty() {
            return "null".to_string();
        }
        self.records
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Move every record out of `source` into `self`, prefixing each path
    pub fn inherit<P: Into<Path>>(&mut self, source: &mut ErrorReport, prefix: P) {
        let prefix = prefix.into();
        for mut record in source.records.drain(..) {
            record.path.prepend(&prefix);
            self.records.push(record);
        }
    }

    /// `Ok(value)` if nothing was recorded, the report otherwise
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl From<ErrorRecord> for ErrorReport {
    fn from(record: ErrorRecord) -> Self {
        Self {
            records: vec![record],
        }
    }
}

impl From<Vec<ErrorRecord>> for ErrorReport {
    fn from(records: Vec<ErrorRecord>) -> Self {
        Self { records }
    }
}

impl<'a> IntoIterator for &'a ErrorReport {
    type Item = &'a ErrorRecord;
    type IntoIter = std::slice::Iter<'a, ErrorRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
