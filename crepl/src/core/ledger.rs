//! Running totals of output already shown to the user.
//!
//! Every run re-executes the whole accumulated program, so its streams start
//! with everything the user has already seen. The ledger stores how many
//! stdout/stderr bytes have been printed across the session; slicing a run's
//! full streams at those offsets yields exactly the new suffix. The totals
//! grow on a successful run-and-print and shrink only on undo, by the exact
//! amount attributed to the undone fragment.

/// Byte offsets into the cumulative program output already printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputLedger {
    output_shown: usize,
    error_shown: usize,
}

impl OutputLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output_shown(&self) -> usize {
        self.output_shown
    }

    pub fn error_shown(&self) -> usize {
        self.error_shown
    }

    /// The not-yet-shown suffix of a run's full stdout.
    ///
    /// Empty when the stream is no longer than what was already shown (a
    /// shrunken stream can only happen for nondeterministic programs).
    pub fn unseen_output<'a>(&self, stdout: &'a [u8]) -> &'a [u8] {
        stdout.get(self.output_shown..).unwrap_or(&[])
    }

    /// The not-yet-shown suffix of a run's full stderr.
    pub fn unseen_errors<'a>(&self, stderr: &'a [u8]) -> &'a [u8] {
        stderr.get(self.error_shown..).unwrap_or(&[])
    }

    /// Record that `output`/`errors` more bytes have been printed.
    pub fn advance(&mut self, output: usize, errors: usize) {
        self.output_shown += output;
        self.error_shown += errors;
    }

    /// Roll back the totals by an undone fragment's attributed counts.
    pub fn retract(&mut self, output: usize, errors: usize) {
        self.output_shown = self.output_shown.saturating_sub(output);
        self.error_shown = self.error_shown.saturating_sub(errors);
    }
}
