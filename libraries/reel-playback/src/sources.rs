//! Source fallback resolver
//!
//! Ordered candidate URIs with a cursor that only ever moves forward. A source
//! that failed is never retried within the same session.

use serde::{Deserialize, Serialize};

/// Where a source URI points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// `http://`, `https://` or protocol-relative `//host/...`
    Remote,

    /// Root-relative path served by the site (`/assets/videos/...`)
    Local,

    /// Anything else (relative path, data URI, ...)
    Other,
}

impl SourceKind {
    pub fn classify(uri: &str) -> Self {
        if uri.starts_with("http://") || uri.starts_with("https://") || uri.starts_with("//") {
            SourceKind::Remote
        } else if uri.starts_with('/') {
            SourceKind::Local
        } else {
            SourceKind::Other
        }
    }
}

/// Result of advancing past a failed source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Next candidate to load
    Next { index: usize, uri: String },

    /// Nothing left to try
    Exhausted,
}

/// Ordered, deduplicated candidate sources with a forward-only cursor
#[derive(Debug, Clone)]
pub struct SourceList {
    /// Candidate URIs in priority order
    sources: Vec<String>,

    /// Index of the candidate currently in use
    current: usize,

    /// Set once every candidate has failed
    exhausted: bool,
}

impl SourceList {
    /// Build from raw candidates
    ///
    /// Blank entries are dropped and duplicates keep their first position.
    /// An empty result is immediately exhausted.
    pub fn new<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut sources: Vec<String> = Vec::new();
        for candidate in candidates {
            let candidate: String = candidate.into();
            let candidate = candidate.trim();
            if candidate.is_empty() || sources.iter().any(|s| s == candidate) {
                continue;
            }
            sources.push(candidate.to_string());
        }

        let exhausted = sources.is_empty();
        Self {
            sources,
            current: 0,
            exhausted,
        }
    }

    /// Candidate currently in use, `None` once exhausted
    pub fn current(&self) -> Option<&str> {
        if self.exhausted {
            None
        } else {
            self.sources.get(self.current).map(String::as_str)
        }
    }

    /// Index of the candidate in use (last tried index once exhausted)
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Mark the current candidate failed and move to the next one
    pub fn advance(&mut self) -> Advance {
        if self.exhausted {
            return Advance::Exhausted;
        }

        if self.current + 1 >= self.sources.len() {
            self.exhausted = true;
            return Advance::Exhausted;
        }

        self.current += 1;
        Advance::Next {
            index: self.current,
            uri: self.sources[self.current].clone(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// All candidates in priority order
    pub fn as_slice(&self) -> &[String] {
        &self.sources
    }
}
