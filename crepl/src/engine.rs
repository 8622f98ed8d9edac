//! The session loop: read, classify, record, recompile, run, diff.
//!
//! Each iteration blocks on one line of input, then optionally on the
//! compiler and on the compiled program. Because the whole accumulated
//! program re-executes on every accepted line, the run's streams contain
//! everything already shown; the ledger offsets slice out only the new
//! suffix, which is printed and attributed to the most recent live fragment.

use std::io::Write;

use anyhow::{Context, Result};
use tracing::debug;

use crate::commands::{self, Disposition};
use crate::core::assemble;
use crate::core::history::Fragment;
use crate::core::session::{InputMode, Session};
use crate::io::input::LineReader;
use crate::io::toolchain::{RunOutput, Toolchain};

/// How the session loop ended. Both variants are clean terminations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The input source was exhausted.
    EndOfInput,
    /// The classifier requested termination (`.q`).
    Quit,
}

/// Drive the session until end of input or a quit request.
///
/// Per-iteration compile failures are swallowed here (stored on the session
/// and reported with a one-line notice); spawn failures and I/O errors
/// propagate to the caller.
pub fn run_session<T, R, W>(
    session: &mut Session,
    reader: &mut R,
    toolchain: &mut T,
    prompt: &str,
    sink: &mut W,
) -> Result<SessionEnd>
where
    T: Toolchain,
    R: LineReader,
    W: Write,
{
    loop {
        let Some(line) = reader.read_line(prompt)? else {
            writeln!(sink).context("write output")?;
            return Ok(SessionEnd::EndOfInput);
        };

        let (record, recompile) = match commands::process(&line, session, sink)? {
            Disposition::Quit => return Ok(SessionEnd::Quit),
            Disposition::Command { record, recompile } => (record, recompile),
        };

        if session.mode == InputMode::FunctionPaste && line.trim() != ".f" {
            session.functions.push(line);
        } else if record {
            let fragment = Fragment::classify(line);
            debug!(kind = ?fragment.kind, "recording fragment");
            session.history.record(fragment);
        }

        if recompile && session.mode == InputMode::Normal {
            compile_and_show(session, toolchain, sink)?;
        }
    }
}

fn compile_and_show<T: Toolchain, W: Write>(
    session: &mut Session,
    toolchain: &mut T,
    sink: &mut W,
) -> Result<()> {
    let source = assemble::full_source(&session.history, &session.functions);
    debug!(source_bytes = source.len(), "recompiling accumulated program");
    match toolchain.compile(&source)? {
        Some(diagnostics) => {
            session.compile_error = diagnostics;
            writeln!(sink, "[Compile error - type .e to see it.]").context("write output")?;
        }
        None => {
            session.compile_error.clear();
            let output = toolchain.run()?;
            show_new_output(session, &output, sink)?;
        }
    }
    Ok(())
}

/// Print only the not-yet-shown suffixes, advance the ledger, and attribute
/// the delta to the last live fragment.
///
/// Attribution happens per stream and only when that stream's delta is
/// non-empty; the no-new-output recompile after an undo must not overwrite
/// an earlier fragment's counts.
fn show_new_output<W: Write>(session: &mut Session, output: &RunOutput, sink: &mut W) -> Result<()> {
    let new_output = session.ledger.unseen_output(&output.stdout);
    let new_errors = session.ledger.unseen_errors(&output.stderr);
    let output_len = new_output.len();
    let errors_len = new_errors.len();

    if output_len > 0 {
        sink.write_all(new_output).context("write output")?;
    }
    if errors_len > 0 {
        sink.write_all(new_errors).context("write output")?;
    }
    sink.flush().context("flush output")?;

    session.ledger.advance(output_len, errors_len);
    if let Some(fragment) = session.history.last_live_mut() {
        if output_len > 0 {
            fragment.output_bytes = output_len;
        }
        if errors_len > 0 {
            fragment.error_bytes = errors_len;
        }
    }
    debug!(
        new_output_bytes = output_len,
        new_error_bytes = errors_len,
        shown_output = session.ledger.output_shown(),
        shown_errors = session.ledger.error_shown(),
        "output reconciled"
    );
    Ok(())
}
