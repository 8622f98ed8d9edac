//! Helpers for running child processes with fully captured output.
//!
//! Compile and run steps block until the child exits; there is deliberately
//! no timeout (see the crate docs). Output is drained on reader threads
//! while the child runs so a chatty process cannot deadlock on a full pipe.

use std::fmt;
use std::io::{Read, Write};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, error, instrument};

/// Captured child process output.
#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// The compiler or the compiled binary could not be started at all.
///
/// Unlike a nonzero compiler exit, this is fatal to the session; callers
/// recognize it through `anyhow::Error::downcast_ref`.
#[derive(Debug)]
pub struct ToolchainSpawnError {
    pub program: String,
    pub source: std::io::Error,
}

impl fmt::Display for ToolchainSpawnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to start `{}`: {}", self.program, self.source)
    }
}

impl std::error::Error for ToolchainSpawnError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Run a command to completion, optionally feeding `stdin`, capturing both
/// streams in full.
///
/// The child's stdin is closed once the input is written, so a compiler
/// reading source from stdin proceeds to completion or failure.
#[instrument(skip_all, fields(stdin_bytes = stdin.map_or(0, |input| input.len())))]
pub fn run_command(mut cmd: Command, stdin: Option<&[u8]>) -> Result<CommandOutput> {
    if stdin.is_some() {
        cmd.stdin(Stdio::piped());
    } else {
        cmd.stdin(Stdio::null());
    }
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());

    debug!("spawning child process");
    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            error!(err = %e, "failed to spawn command");
            let program = cmd.get_program().to_string_lossy().into_owned();
            return Err(anyhow::Error::new(ToolchainSpawnError { program, source: e }));
        }
    };

    if let Some(input) = stdin {
        let mut child_stdin = child
            .stdin
            .take()
            .ok_or_else(|| anyhow!("stdin was not piped"))?;
        // A child that exits before draining its stdin (a fast-failing
        // compile of a large program) breaks the pipe mid-write. That is not
        // a failure of ours: stop writing and report the child's own exit
        // status and diagnostics.
        match child_stdin.write_all(input) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                debug!("child exited before draining stdin");
            }
            Err(e) => return Err(e).context("write stdin"),
        }
        // child_stdin drops here, closing the pipe.
    }

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("stdout was not piped"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow!("stderr was not piped"))?;

    let stdout_handle = thread::spawn(move || read_stream(stdout));
    let stderr_handle = thread::spawn(move || read_stream(stderr));

    let status = child.wait().context("wait for command")?;

    let stdout = join_output(stdout_handle).context("join stdout")?;
    let stderr = join_output(stderr_handle).context("join stderr")?;

    debug!(
        exit_code = ?status.code(),
        stdout_bytes = stdout.len(),
        stderr_bytes = stderr.len(),
        "command finished"
    );
    Ok(CommandOutput {
        status,
        stdout,
        stderr,
    })
}

fn read_stream<R: Read>(mut reader: R) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).context("read output")?;
    Ok(buf)
}

fn join_output(handle: thread::JoinHandle<Result<Vec<u8>>>) -> Result<Vec<u8>> {
    match handle.join() {
        Ok(result) => result,
        Err(_) => Err(anyhow!("output reader thread panicked")),
    }
}
