//! Pure session state shared by the engine.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod assemble;
pub mod history;
pub mod ledger;
pub mod session;
