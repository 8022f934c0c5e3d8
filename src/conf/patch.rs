//! Line-oriented read-modify-write engine for key-bearing config files.
//!
//! The daemon configs are hand-written text files whose line order matters,
//! so reconciliation never reorders, adds or removes lines — it only
//! rewrites lines in place, and only touches the disk when at least one
//! line actually changed.

use std::path::Path;

use tracing::{debug, warn};

use crate::textfile;

/// How an [`Assignment`] picks its candidate line.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// The line contains this token anywhere.
    Token(String),
    /// The line is `key=value` shaped and its key (before the first `=`,
    /// trimmed) equals this name.
    Key(String),
}

impl Matcher {
    fn matches(&self, line: &str) -> bool {
        match self {
            Matcher::Token(token) => line.contains(token.as_str()),
            Matcher::Key(name) => match line.split_once('=') {
                Some((key, _)) => key.trim() == name,
                None => false,
            },
        }
    }
}

/// A desired rewrite: every line the matcher accepts is replaced by
/// `target`, unless it is already satisfied.
///
/// An assignment marked [`once`](Self::once) is instead consumed by its
/// first match, so two once-assignments with the same matcher bind to the
/// first and second matching line in file order.
#[derive(Debug, Clone)]
pub struct Assignment {
    matcher: Matcher,
    /// Token whose presence in the matched line means it is already
    /// correct. When `None`, the line is compared to `target` verbatim.
    satisfied_by: Option<String>,
    target: String,
    once: bool,
}

impl Assignment {
    pub fn token(token: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            matcher: Matcher::Token(token.into()),
            satisfied_by: None,
            target: target.into(),
            once: false,
        }
    }

    pub fn key(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            matcher: Matcher::Key(name.into()),
            satisfied_by: None,
            target: target.into(),
            once: false,
        }
    }

    pub fn satisfied_by(mut self, token: impl Into<String>) -> Self {
        self.satisfied_by = Some(token.into());
        self
    }

    /// Consume this assignment at its first matching line instead of
    /// applying it to every matching line.
    pub fn once(mut self) -> Self {
        self.once = true;
        self
    }
}

/// Apply `assignments` to the file at `path`.
///
/// A missing or unreadable file reconciles trivially (no lines, no write).
/// Returns whether the file was rewritten. The rewrite truncates in place;
/// a write failure is logged and reported as no write.
pub fn reconcile(path: &Path, assignments: &[Assignment]) -> bool {
    let mut lines = textfile::read_lines(path);
    let changed = reconcile_lines(&mut lines, assignments);

    if !changed {
        debug!(path = %path.display(), "config already up to date");
        return false;
    }
    if let Err(e) = textfile::write_lines(path, &lines) {
        warn!(path = %path.display(), "failed to rewrite config: {}", e);
        return false;
    }
    true
}

/// In-memory half of [`reconcile`]; line count and order are preserved.
pub fn reconcile_lines(lines: &mut [String], assignments: &[Assignment]) -> bool {
    let mut consumed = vec![false; assignments.len()];
    let mut changed = false;

    for line in lines.iter_mut() {
        for (i, assignment) in assignments.iter().enumerate() {
            if consumed[i] || !assignment.matcher.matches(line) {
                continue;
            }
            if assignment.once {
                consumed[i] = true;
            }

            let satisfied = match &assignment.satisfied_by {
                Some(token) => line.contains(token.as_str()),
                None => *line == assignment.target,
            };
            if !satisfied {
                *line = assignment.target.clone();
                changed = true;
            }
            break;
        }
    }
    changed
}
