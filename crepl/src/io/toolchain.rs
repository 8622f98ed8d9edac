//! Toolchain invoker: building and running the compiler and its product.
//!
//! The [`Toolchain`] trait decouples the session engine from the actual
//! compiler backend. Tests use scripted toolchains that derive output from
//! the assembled source without spawning processes.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Result, anyhow};
use tracing::{debug, instrument, warn};

use crate::io::config::{
    INCLUDE_DIRS_TOKEN, ITEM_TOKEN, LIB_DIRS_TOKEN, LIBS_TOKEN, OUTFILE_TOKEN, ReplConfig,
};
use crate::io::process::run_command;

/// Diagnostic text reported when the compiler fails without writing anything.
pub const NO_COMPILER_OUTPUT: &str = "Unknown compile error - compiler did not write any output.";

/// Full stdout/stderr of one program run (cumulative, not a delta).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// Abstraction over the compile-and-run backend.
pub trait Toolchain {
    /// Compile `source`. `Ok(None)` on success; `Ok(Some(diagnostics))` on a
    /// nonzero compiler exit (recoverable); `Err` when the compiler could
    /// not be started at all (fatal).
    fn compile(&mut self, source: &str) -> Result<Option<String>>;

    /// Run the previously compiled program to completion with no arguments,
    /// capturing both streams in full.
    fn run(&mut self) -> Result<RunOutput>;
}

/// Repeatable search-path and library flags collected from the CLI.
#[derive(Debug, Clone, Default)]
pub struct LinkOptions {
    pub include_dirs: Vec<String>,
    pub lib_dirs: Vec<String>,
    pub libs: Vec<String>,
}

/// Toolchain that drives a real compiler through its stdin.
pub struct GccToolchain {
    command: Vec<String>,
    exe_path: PathBuf,
}

impl GccToolchain {
    /// Expand the configured compile template once; the command is fixed for
    /// the session's lifetime.
    pub fn new(config: &ReplConfig, link: &LinkOptions, exe_path: &Path) -> Self {
        Self {
            command: build_compile_command(config, link, exe_path),
            exe_path: exe_path.to_path_buf(),
        }
    }
}

impl Toolchain for GccToolchain {
    #[instrument(skip_all, fields(source_bytes = source.len()))]
    fn compile(&mut self, source: &str) -> Result<Option<String>> {
        let mut cmd = Command::new(&self.command[0]);
        cmd.args(&self.command[1..]);
        let output = run_command(cmd, Some(source.as_bytes()))?;
        if output.status.success() {
            debug!("compile succeeded");
            return Ok(None);
        }

        // Diagnostics are never silently dropped.
        let mut diagnostics = String::from_utf8_lossy(&output.stdout).into_owned();
        diagnostics.push_str(&String::from_utf8_lossy(&output.stderr));
        if diagnostics.trim().is_empty() {
            diagnostics = NO_COMPILER_OUTPUT.to_string();
        }
        warn!(exit_code = ?output.status.code(), "compile failed");
        Ok(Some(diagnostics))
    }

    #[instrument(skip_all)]
    fn run(&mut self) -> Result<RunOutput> {
        let output = run_command(Command::new(&self.exe_path), None)?;
        debug!(
            exit_code = ?output.status.code(),
            stdout_bytes = output.stdout.len(),
            stderr_bytes = output.stderr.len(),
            "program finished"
        );
        Ok(RunOutput {
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// First line of the configured version query's combined output, trimmed.
pub fn compiler_version(config: &ReplConfig) -> Result<String> {
    let mut cmd = Command::new(&config.version_command[0]);
    cmd.args(&config.version_command[1..]);
    let output = run_command(cmd, None)?;
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text.lines()
        .next()
        .map(|line| line.trim().to_string())
        .ok_or_else(|| anyhow!("version command produced no output"))
}

/// Substitute the template tokens into a concrete argument vector.
pub fn build_compile_command(
    config: &ReplConfig,
    link: &LinkOptions,
    exe_path: &Path,
) -> Vec<String> {
    let outfile = exe_path.to_string_lossy();
    let mut command = Vec::new();
    for part in &config.compile_command {
        match part.as_str() {
            INCLUDE_DIRS_TOKEN => {
                expand_repeated(&config.include_dir_flag, &link.include_dirs, &mut command);
            }
            LIB_DIRS_TOKEN => expand_repeated(&config.lib_dir_flag, &link.lib_dirs, &mut command),
            LIBS_TOKEN => expand_repeated(&config.lib_flag, &link.libs, &mut command),
            _ => command.push(part.replace(OUTFILE_TOKEN, &outfile)),
        }
    }
    command
}

/// Expand a per-item flag template once for every value, in order.
fn expand_repeated(template: &[String], values: &[String], out: &mut Vec<String>) {
    for value in values {
        for part in template {
            out.push(part.replace(ITEM_TOKEN, value));
        }
    }
}
