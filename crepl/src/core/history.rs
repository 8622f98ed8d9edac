//! Append-only-with-rewind log of accepted input fragments.
//!
//! The history holds every recorded line together with a cursor. Fragments
//! below the cursor are "live" (part of the assembled program); fragments at
//! or beyond it form the redo tail, retained until a new recording overwrites
//! them. Undo and redo only move the cursor; the per-fragment output byte
//! counts let the session roll the output ledger back exactly.

use std::sync::LazyLock;

use regex::Regex;

static INCLUDE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*#\s*include\s").expect("include pattern"));

/// How a fragment participates in source assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    /// A preprocessor include directive; emitted ahead of all statements.
    Include,
    /// Any other recorded line; emitted inside `main` in entry order.
    Statement,
}

/// One accepted line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// The raw line as typed.
    pub text: String,
    pub kind: FragmentKind,
    /// Stdout bytes attributed to the run that followed recording this line.
    pub output_bytes: usize,
    /// Stderr bytes attributed to that run.
    pub error_bytes: usize,
}

impl Fragment {
    /// Build a fragment from a raw line, deciding its kind once.
    ///
    /// The kind is never re-evaluated later, even across undo/redo.
    pub fn classify(text: impl Into<String>) -> Self {
        let text = text.into();
        let kind = if INCLUDE_RE.is_match(&text) {
            FragmentKind::Include
        } else {
            FragmentKind::Statement
        };
        Self {
            text,
            kind,
            output_bytes: 0,
            error_bytes: 0,
        }
    }
}

/// Ordered fragment log plus the cursor marking how many are live.
#[derive(Debug, Default)]
pub struct History {
    fragments: Vec<Fragment>,
    position: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live fragments (the cursor).
    pub fn position(&self) -> usize {
        self.position
    }

    /// Total stored fragments, redo tail included.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Append a fragment, discarding the redo tail first if one exists.
    pub fn record(&mut self, fragment: Fragment) {
        self.fragments.truncate(self.position);
        self.fragments.push(fragment);
        self.position += 1;
    }

    /// Exclude the most recent live fragment and return it, or `None` when
    /// nothing is live. The fragment stays stored for redo.
    pub fn undo(&mut self) -> Option<&Fragment> {
        if self.position == 0 {
            return None;
        }
        self.position -= 1;
        Some(&self.fragments[self.position])
    }

    /// Re-admit the first redo-tail fragment and return it, or `None` when
    /// the tail is empty. The caller is expected to recompile afterwards so
    /// the fragment's output contribution is re-measured rather than
    /// replayed from stale counts.
    pub fn redo(&mut self) -> Option<&Fragment> {
        if self.position == self.fragments.len() {
            return None;
        }
        self.position += 1;
        Some(&self.fragments[self.position - 1])
    }

    /// The most recent live fragment, mutably; target of delta attribution.
    pub fn last_live_mut(&mut self) -> Option<&mut Fragment> {
        if self.position == 0 {
            return None;
        }
        self.fragments.get_mut(self.position - 1)
    }

    /// Live fragments in entry order.
    pub fn live_fragments(&self) -> impl Iterator<Item = &Fragment> {
        self.fragments[..self.position].iter()
    }

    /// Texts of live statement fragments, in entry order.
    pub fn live_statements(&self) -> impl Iterator<Item = &str> {
        self.live_fragments()
            .filter(|fragment| fragment.kind == FragmentKind::Statement)
            .map(|fragment| fragment.text.as_str())
    }

    /// Texts of live include fragments, in entry order.
    pub fn live_includes(&self) -> impl Iterator<Item = &str> {
        self.live_fragments()
            .filter(|fragment| fragment.kind == FragmentKind::Include)
            .map(|fragment| fragment.text.as_str())
    }
}
