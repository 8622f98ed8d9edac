//! Test-only fakes for driving the session engine without a real compiler.

use anyhow::Result;

use crate::core::session::Session;
use crate::io::input::LineReader;
use crate::io::toolchain::{RunOutput, Toolchain};

/// Reader that yields predetermined lines, then end of input.
pub struct ScriptedReader {
    lines: std::collections::VecDeque<String>,
}

impl ScriptedReader {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|line| (*line).to_string()).collect(),
        }
    }
}

impl LineReader for ScriptedReader {
    fn read_line(&mut self, _prompt: &str) -> Result<Option<String>> {
        Ok(self.lines.pop_front())
    }
}

/// Toolchain whose "compiled program" deterministically derives its output
/// from the assembled source, mimicking a full from-scratch re-execution.
///
/// Statements of the form `emit("...");` append to stdout and `warn("...");`
/// to stderr, in source order; only the `main` body "executes", so markers in
/// function definitions are inert. A source containing `@bad` fails to
/// compile.
#[derive(Debug, Default)]
pub struct ScriptedToolchain {
    /// Source most recently compiled successfully.
    pub last_source: Option<String>,
    pub compiles: usize,
    pub runs: usize,
}

impl ScriptedToolchain {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Toolchain for ScriptedToolchain {
    fn compile(&mut self, source: &str) -> Result<Option<String>> {
        self.compiles += 1;
        if source.contains("@bad") {
            return Ok(Some("fake.c:1: error: unexpected token '@bad'\n".to_string()));
        }
        self.last_source = Some(source.to_string());
        Ok(None)
    }

    fn run(&mut self) -> Result<RunOutput> {
        self.runs += 1;
        let source = main_body(self.last_source.as_deref().unwrap_or(""));
        Ok(RunOutput {
            stdout: collect_marked(source, "emit(\""),
            stderr: collect_marked(source, "warn(\""),
        })
    }
}

fn main_body(source: &str) -> &str {
    match source.find("int main(void) {") {
        Some(start) => &source[start..],
        None => source,
    }
}

fn collect_marked(source: &str, marker: &str) -> Vec<u8> {
    let mut collected = Vec::new();
    for line in source.lines() {
        let mut rest = line;
        while let Some(start) = rest.find(marker) {
            let after = &rest[start + marker.len()..];
            let Some(end) = after.find('"') else { break };
            collected.extend_from_slice(after[..end].as_bytes());
            rest = &after[end..];
        }
    }
    collected
}

/// Assert the correctness contract: shown totals equal the sum of the bytes
/// attributed to the live fragments.
pub fn assert_ledger_invariant(session: &Session) {
    let output: usize = session
        .history
        .live_fragments()
        .map(|fragment| fragment.output_bytes)
        .sum();
    let errors: usize = session
        .history
        .live_fragments()
        .map(|fragment| fragment.error_bytes)
        .sum();
    assert_eq!(
        output,
        session.ledger.output_shown(),
        "stdout ledger diverged from live fragment attribution"
    );
    assert_eq!(
        errors,
        session.ledger.error_shown(),
        "stderr ledger diverged from live fragment attribution"
    );
}
