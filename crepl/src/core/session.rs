//! Mutable state for one interactive session.

use crate::core::history::History;
use crate::core::ledger::OutputLedger;

/// How raw input lines are currently treated.
///
/// A single enum rather than two booleans: paste mode and function-paste
/// mode are mutually exclusive, and this makes the combined state
/// unrepresentable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputMode {
    /// Lines are classified and recorded normally; recompile per line.
    #[default]
    Normal,
    /// Lines are recorded but recompiles are deferred until the mode ends.
    Paste,
    /// Lines go verbatim into the function buffer, bypassing the history.
    FunctionPaste,
}

/// Everything the engine mutates across one session's lifetime.
#[derive(Debug, Default)]
pub struct Session {
    pub history: History,
    pub ledger: OutputLedger,
    /// Most recent compiler diagnostic text; empty when the last compile
    /// succeeded (or none has run yet).
    pub compile_error: String,
    pub mode: InputMode,
    /// Verbatim lines collected in function-paste mode; assembled ahead of
    /// `main` so they can define functions and globals.
    pub functions: Vec<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Undo the most recent live fragment: move the cursor back, subtract
    /// its attributed bytes from the ledger, and return its original text.
    pub fn undo(&mut self) -> Option<String> {
        let fragment = self.history.undo()?;
        let output = fragment.output_bytes;
        let errors = fragment.error_bytes;
        let text = fragment.text.clone();
        self.ledger.retract(output, errors);
        Some(text)
    }

    /// Re-admit the next redo-tail fragment and return its text.
    ///
    /// The ledger is deliberately untouched: the fragment's contribution is
    /// re-derived by the recompile-and-rerun that follows, not replayed from
    /// the stored counts.
    pub fn redo(&mut self) -> Option<String> {
        self.history.redo().map(|fragment| fragment.text.clone())
    }
}
