//! End-to-end session scenarios over scripted fakes.
//!
//! These tests drive the engine loop line by line to verify the growing-
//! suffix output diffing, the ledger rollback across undo/redo, and the
//! error cycle behavior.

use crepl::core::session::Session;
use crepl::engine::{SessionEnd, run_session};
use crepl::test_support::{ScriptedReader, ScriptedToolchain, assert_ledger_invariant};

/// Feed one line through the engine and return what it printed (the engine
/// appends one newline when the input source is exhausted).
fn step(session: &mut Session, toolchain: &mut ScriptedToolchain, line: &str) -> String {
    let mut reader = ScriptedReader::new(&[line]);
    let mut sink = Vec::new();
    let end = run_session(session, &mut reader, toolchain, "> ", &mut sink).expect("session");
    assert_eq!(end, SessionEnd::EndOfInput);
    let mut printed = String::from_utf8(sink).expect("utf8");
    assert!(printed.ends_with('\n'));
    printed.pop();
    printed
}

/// The canonical four-step scenario: declare, print, mutate, print. Every
/// run re-executes the whole program, but only the new suffix is shown.
#[test]
fn reruns_show_only_the_new_output_suffix() {
    let mut session = Session::new();
    let mut toolchain = ScriptedToolchain::new();

    assert_eq!(step(&mut session, &mut toolchain, "int x = 5;"), "");
    assert_eq!(step(&mut session, &mut toolchain, "emit(\"5\");"), "5");
    assert_eq!(step(&mut session, &mut toolchain, "x = 6;"), "");
    assert_eq!(step(&mut session, &mut toolchain, "emit(\"6\");"), "6");

    assert_eq!(toolchain.compiles, 4);
    assert_eq!(session.ledger.output_shown(), 2);
    assert_ledger_invariant(&session);
}

#[test]
fn recompiling_unchanged_source_prints_nothing_new() {
    let mut session = Session::new();
    let mut toolchain = ScriptedToolchain::new();

    assert_eq!(step(&mut session, &mut toolchain, "emit(\"5\");"), "5");
    // Entering and leaving paste mode recompiles the identical program.
    step(&mut session, &mut toolchain, ".p");
    let printed = step(&mut session, &mut toolchain, ".p");
    assert_eq!(printed, "[Paste mode off]");
    assert_eq!(toolchain.compiles, 2);
    assert_eq!(session.ledger.output_shown(), 1);
    assert_ledger_invariant(&session);
}

#[test]
fn stderr_is_diffed_independently_of_stdout() {
    let mut session = Session::new();
    let mut toolchain = ScriptedToolchain::new();

    assert_eq!(step(&mut session, &mut toolchain, "warn(\"E\");"), "E");
    assert_eq!(step(&mut session, &mut toolchain, "emit(\"o\");"), "o");
    assert_eq!(session.ledger.output_shown(), 1);
    assert_eq!(session.ledger.error_shown(), 1);
    assert_ledger_invariant(&session);
}

#[test]
fn compile_failure_is_recoverable_and_leaves_the_ledger_alone() {
    let mut session = Session::new();
    let mut toolchain = ScriptedToolchain::new();

    assert_eq!(step(&mut session, &mut toolchain, "emit(\"a\");"), "a");
    let printed = step(&mut session, &mut toolchain, "int @bad;");
    assert_eq!(printed, "[Compile error - type .e to see it.]");

    // The failing line is recorded (undo removes it), but no program output
    // was produced and the accounting is untouched.
    assert_eq!(session.history.position(), 2);
    assert_eq!(session.ledger.output_shown(), 1);
    assert_ledger_invariant(&session);

    let printed = step(&mut session, &mut toolchain, ".e");
    assert!(printed.contains("unexpected token '@bad'"));

    // Undo the bad line; the session keeps going.
    step(&mut session, &mut toolchain, ".u");
    assert_eq!(step(&mut session, &mut toolchain, "emit(\"b\");"), "b");
    assert_ledger_invariant(&session);
}

#[test]
fn undo_rolls_back_exactly_the_attributed_bytes() {
    let mut session = Session::new();
    let mut toolchain = ScriptedToolchain::new();

    step(&mut session, &mut toolchain, "emit(\"5\");");
    step(&mut session, &mut toolchain, "emit(\"6\");");
    assert_eq!(session.ledger.output_shown(), 2);

    let printed = step(&mut session, &mut toolchain, ".u");
    // The undo recompiles the shortened program; its full output matches
    // what is already shown, so nothing is reprinted.
    assert_eq!(printed, "[Undone 'emit(\"6\");']");
    assert_eq!(session.ledger.output_shown(), 1);
    assert_ledger_invariant(&session);

    // A subsequent unrelated statement's delta is unaffected by the undone
    // output: recording it also discards the redo tail.
    assert_eq!(step(&mut session, &mut toolchain, "emit(\"X\");"), "X");
    assert_eq!(session.ledger.output_shown(), 2);
    assert_eq!(step(&mut session, &mut toolchain, ".r"), "[Nothing to redo]");
    assert_ledger_invariant(&session);
}

#[test]
fn undo_then_redo_converges_to_the_pre_undo_state() {
    let mut session = Session::new();
    let mut toolchain = ScriptedToolchain::new();

    step(&mut session, &mut toolchain, "emit(\"5\");");
    let position_before = session.history.position();
    let shown_before = session.ledger.output_shown();

    step(&mut session, &mut toolchain, ".u");
    assert_eq!(session.ledger.output_shown(), 0);

    // Redo re-admits the fragment; its contribution is re-derived by the
    // rerun, which reprints the byte that undo rolled back.
    let printed = step(&mut session, &mut toolchain, ".r");
    assert_eq!(printed, "[Redone 'emit(\"5\");']\n5");

    assert_eq!(session.history.position(), position_before);
    assert_eq!(session.ledger.output_shown(), shown_before);
    assert_ledger_invariant(&session);
}

#[test]
fn includes_lead_the_assembled_source_regardless_of_entry_order() {
    let mut session = Session::new();
    let mut toolchain = ScriptedToolchain::new();

    step(&mut session, &mut toolchain, "int x = 5;");
    step(&mut session, &mut toolchain, "#include <stdio.h>");

    let source = toolchain.last_source.clone().expect("source");
    assert!(source.starts_with("#include <stdio.h>\n"));
    let include_at = source.find("#include").expect("include");
    let statement_at = source.find("int x = 5;").expect("statement");
    assert!(include_at < statement_at);
}

#[test]
fn function_definitions_take_effect_when_paste_mode_ends() {
    let mut session = Session::new();
    let mut toolchain = ScriptedToolchain::new();

    step(&mut session, &mut toolchain, ".f");
    step(&mut session, &mut toolchain, "void greet(void) {");
    step(&mut session, &mut toolchain, "    emit(\"hi\");");
    step(&mut session, &mut toolchain, "}");
    // Toggling off recompiles; the definition alone produces no output.
    let printed = step(&mut session, &mut toolchain, ".f");
    assert_eq!(printed, "[Function paste mode off]");

    assert_eq!(session.functions.len(), 3);
    assert_eq!(session.history.position(), 0);
    let source = toolchain.last_source.clone().expect("source");
    assert!(source.find("void greet").expect("fn") < source.find("int main").expect("main"));
    assert_ledger_invariant(&session);
}

#[test]
fn quit_ends_the_session_without_processing_later_lines() {
    let mut session = Session::new();
    let mut reader = ScriptedReader::new(&["emit(\"a\");", ".q", "emit(\"b\");"]);
    let mut toolchain = ScriptedToolchain::new();
    let mut sink = Vec::new();

    let end = run_session(&mut session, &mut reader, &mut toolchain, "> ", &mut sink)
        .expect("session");
    assert_eq!(end, SessionEnd::Quit);
    assert_eq!(toolchain.compiles, 1);
    assert_eq!(session.history.len(), 1);
}
