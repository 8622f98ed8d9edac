//! Side-effecting operations: configuration, child processes, line editing.

pub mod config;
pub mod input;
pub mod process;
pub mod toolchain;
