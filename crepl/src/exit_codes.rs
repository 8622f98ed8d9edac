//! Stable exit codes for the crepl binary.

/// Session ended cleanly (end of input or `.q`).
pub const OK: i32 = 0;
/// Startup failure, toolchain spawn failure, or other fatal error.
pub const ERROR: i32 = 1;
