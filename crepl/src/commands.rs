//! Dot-prefixed meta-command classifier.
//!
//! Given one raw input line and the mutable session, decides whether the
//! line should be recorded and whether a recompile should follow, performing
//! side effects (printing, undo/redo, mode toggles) along the way. Session
//! termination is an ordinary [`Disposition::Quit`] value, not an exception,
//! so the engine's exit path is a plain branch.

use std::io::Write;

use anyhow::Result;

use crate::core::assemble;
use crate::core::session::{InputMode, Session};

const HELP: &str = "\
.e  Show the last compile diagnostics
.f  Toggle function paste mode (lines go above main)
.h  Show this help message
.l  List the lines you have entered
.L  List the whole program as passed to the compiler
.p  Toggle paste mode (compile deferred until toggled off)
.q  Quit the session
.r  Redo the most recently undone line
.u  Undo the previous line
";

/// What the engine should do with the just-classified line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Command { record: bool, recompile: bool },
    Quit,
}

fn ignore() -> Result<Disposition> {
    Ok(Disposition::Command {
        record: false,
        recompile: false,
    })
}

fn recompile_only() -> Result<Disposition> {
    Ok(Disposition::Command {
        record: false,
        recompile: true,
    })
}

/// Classify one line, mutating the session and writing notices to `sink`.
pub fn process<W: Write>(line: &str, session: &mut Session, sink: &mut W) -> Result<Disposition> {
    let trimmed = line.trim();

    // In function-paste mode every line except the toggle is verbatim
    // function text; no other command is interpreted.
    if session.mode == InputMode::FunctionPaste && trimmed != ".f" {
        return ignore();
    }

    match trimmed {
        ".e" => {
            if session.compile_error.is_empty() {
                writeln!(sink, "[No compile errors]")?;
            } else {
                write!(sink, "{}", session.compile_error)?;
                if !session.compile_error.ends_with('\n') {
                    writeln!(sink)?;
                }
            }
            ignore()
        }
        ".f" => toggle_function_paste(session, sink),
        ".h" => {
            write!(sink, "{HELP}")?;
            ignore()
        }
        ".l" => {
            for fragment in session.history.live_fragments() {
                writeln!(sink, "{}", fragment.text)?;
            }
            ignore()
        }
        ".L" => {
            write!(
                sink,
                "{}",
                assemble::full_source(&session.history, &session.functions)
            )?;
            ignore()
        }
        ".p" => toggle_paste(session, sink),
        ".q" => Ok(Disposition::Quit),
        ".r" => match session.redo() {
            Some(text) => {
                writeln!(sink, "[Redone '{text}']")?;
                recompile_only()
            }
            None => {
                writeln!(sink, "[Nothing to redo]")?;
                ignore()
            }
        },
        ".u" => match session.undo() {
            Some(text) => {
                writeln!(sink, "[Undone '{text}']")?;
                recompile_only()
            }
            None => {
                writeln!(sink, "[Nothing to undo]")?;
                ignore()
            }
        },
        _ => Ok(Disposition::Command {
            record: true,
            recompile: true,
        }),
    }
}

fn toggle_paste<W: Write>(session: &mut Session, sink: &mut W) -> Result<Disposition> {
    match session.mode {
        InputMode::Normal => {
            session.mode = InputMode::Paste;
            writeln!(sink, "[Paste mode on - '.p' again to compile]")?;
            ignore()
        }
        InputMode::Paste => {
            session.mode = InputMode::Normal;
            writeln!(sink, "[Paste mode off]")?;
            recompile_only()
        }
        InputMode::FunctionPaste => {
            writeln!(sink, "[Finish function paste mode with '.f' first]")?;
            ignore()
        }
    }
}

fn toggle_function_paste<W: Write>(session: &mut Session, sink: &mut W) -> Result<Disposition> {
    match session.mode {
        InputMode::Normal => {
            session.mode = InputMode::FunctionPaste;
            writeln!(sink, "[Function paste mode on - '.f' again to compile]")?;
            ignore()
        }
        InputMode::FunctionPaste => {
            session.mode = InputMode::Normal;
            writeln!(sink, "[Function paste mode off]")?;
            recompile_only()
        }
        InputMode::Paste => {
            writeln!(sink, "[Finish paste mode with '.p' first]")?;
            ignore()
        }
    }
}
