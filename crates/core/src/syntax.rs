//! Directive syntax: the follow tokens recognized at line start and the
//! delimiter markers wrapping inlined blocks.
//!
//! The same markers are used to emit inlined blocks and to recognize them
//! on the next pass, so changing them between passes breaks idempotency.
//!
//! # Example
//!
//! ```toml
//! tokens = ["follows", "follow", "flw"]
//! open_marker = "#>> follow "
//! close_marker = "#<< follow"
//! ```

use crate::error::ResolveError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TOKENS: &[&str] = &["follows", "follow", "flw"];
pub const DEFAULT_OPEN_MARKER: &str = "#>> follow ";
pub const DEFAULT_CLOSE_MARKER: &str = "#<< follow";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Syntax {
    /// Directive tokens. Matched case-insensitively, longest first.
    pub tokens: Vec<String>,
    /// Prefix of the open marker line; the followed unit's name is appended.
    pub open_marker: String,
    /// The full close marker line.
    pub close_marker: String,
}

impl Default for Syntax {
    fn default() -> Self {
        Syntax {
            tokens: DEFAULT_TOKENS.iter().map(|t| t.to_string()).collect(),
            open_marker: DEFAULT_OPEN_MARKER.to_string(),
            close_marker: DEFAULT_CLOSE_MARKER.to_string(),
        }
    }
}

impl Syntax {
    /// Validate and normalize: tokens are lowercased, deduplicated and
    /// sorted longest-first; markers must be non-empty and distinguishable.
    pub fn normalized(mut self) -> Result<Self, ResolveError> {
        let mut tokens: Vec<String> = self
            .tokens
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        tokens.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
        tokens.dedup();
        if tokens.is_empty() {
            return Err(invalid("at least one directive token is required"));
        }
        self.tokens = tokens;

        let open = self.open_marker.trim_start();
        let close = self.close_marker.trim();
        if open.trim().is_empty() {
            return Err(invalid("open marker must not be empty"));
        }
        if close.is_empty() {
            return Err(invalid("close marker must not be empty"));
        }
        if close.starts_with(open.trim_end()) {
            return Err(invalid("close marker must not begin with the open marker"));
        }
        if self.tokens.iter().any(|t| starts_with_ci(open, t) || starts_with_ci(close, t)) {
            return Err(invalid("markers must not begin with a directive token"));
        }
        self.open_marker = open.to_string();
        self.close_marker = close.to_string();
        Ok(self)
    }

    /// If `line` is a directive, return the trimmed name it references.
    pub fn directive_target<'l>(&self, line: &'l str) -> Option<&'l str> {
        let line = line.trim();
        self.tokens
            .iter()
            .find_map(|t| strip_prefix_ci(line, t))
            .map(str::trim)
    }

    /// The open marker line labeled with `name`, without terminator.
    pub fn open_line(&self, name: &str) -> String {
        format!("{}{}", self.open_marker, name)
    }

    pub fn is_open_for(&self, line: &str, name: &str) -> bool {
        line.trim() == self.open_line(name).trim()
    }

    /// True for an open marker carrying any label.
    pub fn is_open(&self, line: &str) -> bool {
        line.trim().starts_with(self.open_marker.trim_end())
    }

    pub fn is_close(&self, line: &str) -> bool {
        line.trim() == self.close_marker
    }
}

fn invalid(reason: &str) -> ResolveError {
    ResolveError::InvalidSyntax {
        reason: reason.to_string(),
    }
}

fn starts_with_ci(s: &str, lowered_prefix: &str) -> bool {
    strip_prefix_ci(s, lowered_prefix).is_some()
}

/// Strip `lowered_prefix` (already lowercase) from the start of `s`,
/// comparing case-insensitively.
fn strip_prefix_ci<'s>(s: &'s str, lowered_prefix: &str) -> Option<&'s str> {
    let mut expected = lowered_prefix.chars();
    let mut want = expected.next();
    for (i, c) in s.char_indices() {
        let Some(w) = want else {
            return Some(&s[i..]);
        };
        let mut lower = c.to_lowercase();
        if lower.next() != Some(w) || lower.next().is_some() {
            return None;
        }
        want = expected.next();
    }
    match want {
        None => Some(""),
        Some(_) => None,
    }
}
