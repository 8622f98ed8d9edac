//! Line input sources for the session engine.
//!
//! The [`LineReader`] trait decouples the engine from the terminal. The real
//! implementation wraps rustyline with a persisted, bounded history file;
//! tests feed scripted lines instead.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

/// One line of input per call; `None` signals end of input.
pub trait LineReader {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Interactive reader with line editing and persisted history.
pub struct RustylineReader {
    editor: DefaultEditor,
    history_path: PathBuf,
}

impl RustylineReader {
    /// Create the editor and load the history file, creating it empty when
    /// absent.
    pub fn new(config: &crate::io::config::ReplConfig) -> Result<Self> {
        let editor_config = rustyline::Config::builder()
            .max_history_size(config.history_size)
            .context("configure history size")?
            .auto_add_history(false)
            .build();
        let mut editor =
            DefaultEditor::with_config(editor_config).context("create line editor")?;

        let history_path = config.history_path();
        if history_path.exists() {
            editor
                .load_history(&history_path)
                .with_context(|| format!("load history {}", history_path.display()))?;
        } else {
            fs::File::create(&history_path)
                .with_context(|| format!("create history {}", history_path.display()))?;
        }
        debug!(path = %history_path.display(), "history loaded");

        Ok(Self {
            editor,
            history_path,
        })
    }

    /// Rewrite the history file, bounded by the configured maximum.
    pub fn save_history(&mut self) -> Result<()> {
        self.editor
            .save_history(&self.history_path)
            .with_context(|| format!("save history {}", self.history_path.display()))
    }
}

impl LineReader for RustylineReader {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        loop {
            match read_action(self.editor.readline(prompt))? {
                ReadAction::Line(line) => {
                    let _ = self.editor.add_history_entry(&line);
                    return Ok(Some(line));
                }
                // Ctrl-C discards the current line, not the session.
                ReadAction::Cancelled => continue,
                ReadAction::End => return Ok(None),
            }
        }
    }
}

/// What one readline attempt means for the session.
#[derive(Debug, PartialEq, Eq)]
enum ReadAction {
    Line(String),
    /// The user abandoned the line (Ctrl-C); prompt again.
    Cancelled,
    /// End of input (Ctrl-D).
    End,
}

fn read_action(result: rustyline::Result<String>) -> Result<ReadAction> {
    match result {
        Ok(line) => Ok(ReadAction::Line(line)),
        Err(ReadlineError::Interrupted) => Ok(ReadAction::Cancelled),
        Err(ReadlineError::Eof) => Ok(ReadAction::End),
        Err(e) => Err(e).context("read line"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interrupt_cancels_the_line_but_not_the_session() {
        let action = read_action(Err(ReadlineError::Interrupted)).expect("action");
        assert_eq!(action, ReadAction::Cancelled);
    }

    #[test]
    fn end_of_file_ends_the_input_source() {
        let action = read_action(Err(ReadlineError::Eof)).expect("action");
        assert_eq!(action, ReadAction::End);
    }

    #[test]
    fn ordinary_lines_pass_through() {
        let action = read_action(Ok("int x = 5;".to_string())).expect("action");
        assert_eq!(action, ReadAction::Line("int x = 5;".to_string()));
    }

    #[test]
    fn other_errors_propagate() {
        let err = read_action(Err(ReadlineError::Io(std::io::Error::other("tty gone"))))
            .unwrap_err();
        assert!(err.to_string().contains("read line"));
    }
}
