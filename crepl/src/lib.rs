//! An interactive read-eval-print loop for C.
//!
//! Every accepted line is appended to an in-memory program, the whole program
//! is recompiled with a real compiler and re-executed, and only the output
//! produced since the previous run is printed. Undo and redo rewind the
//! accumulated program together with the output accounting, so output is
//! never duplicated or lost across edit and error cycles.
//!
//! The architecture enforces a strict separation:
//!
//! - **[`core`]**: Pure session state (fragment history, output ledger,
//!   source assembly). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (configuration, child processes,
//!   line editing). Behind traits to enable scripted fakes in tests.
//!
//! Orchestration modules ([`engine`], [`commands`]) coordinate core state
//! with I/O to implement the session loop.
//!
//! Known hazard: neither the compile step nor the compiled program runs under
//! a timeout. A user program that never terminates stalls the whole session.

pub mod commands;
pub mod core;
pub mod engine;
pub mod exit_codes;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
