//! Session configuration, loaded once at startup from a TOML file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Substitution point in `compile_command` replaced by the executable path.
pub const OUTFILE_TOKEN: &str = "$outfile";
/// Substitution point expanded into repeated include-directory flags.
pub const INCLUDE_DIRS_TOKEN: &str = "$include_dirs";
/// Substitution point expanded into repeated library-directory flags.
pub const LIB_DIRS_TOKEN: &str = "$lib_dirs";
/// Substitution point expanded into repeated library flags.
pub const LIBS_TOKEN: &str = "$libs";
/// Per-item substitution point inside the repeated-flag templates.
pub const ITEM_TOKEN: &str = "$cmd";

/// Session configuration (TOML).
///
/// Intended to be edited by humans. Missing fields default to a plain gcc
/// setup reading C source from stdin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReplConfig {
    /// Compile command template; the compiler reads the program from stdin.
    /// May contain [`OUTFILE_TOKEN`] and the repeated-flag tokens.
    pub compile_command: Vec<String>,

    /// Command whose first output line is reported as the compiler version.
    pub version_command: Vec<String>,

    /// Template expanded once per `-I` directory ([`ITEM_TOKEN`] per item).
    pub include_dir_flag: Vec<String>,

    /// Template expanded once per `-L` directory.
    pub lib_dir_flag: Vec<String>,

    /// Template expanded once per `-l` library.
    pub lib_flag: Vec<String>,

    /// Prompt printed before each interactive line.
    pub prompt: String,

    /// Line-edit history file; defaults to `~/.crepl_history` when unset.
    pub history_file: Option<PathBuf>,

    /// Maximum entries kept in the history file.
    pub history_size: usize,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            compile_command: vec![
                "gcc".to_string(),
                "-x".to_string(),
                "c".to_string(),
                "--std=gnu11".to_string(),
                "-o".to_string(),
                OUTFILE_TOKEN.to_string(),
                "-".to_string(),
                INCLUDE_DIRS_TOKEN.to_string(),
                LIB_DIRS_TOKEN.to_string(),
                LIBS_TOKEN.to_string(),
            ],
            version_command: vec!["gcc".to_string(), "--version".to_string()],
            include_dir_flag: vec![format!("-I{ITEM_TOKEN}")],
            lib_dir_flag: vec![format!("-L{ITEM_TOKEN}")],
            lib_flag: vec![format!("-l{ITEM_TOKEN}")],
            prompt: "> ".to_string(),
            history_file: None,
            history_size: 1000,
        }
    }
}

impl ReplConfig {
    pub fn validate(&self) -> Result<()> {
        if self.compile_command.is_empty() || self.compile_command[0].trim().is_empty() {
            return Err(anyhow!("compile_command must be a non-empty array"));
        }
        if !self
            .compile_command
            .iter()
            .any(|part| part.contains(OUTFILE_TOKEN))
        {
            return Err(anyhow!("compile_command must mention {OUTFILE_TOKEN}"));
        }
        if self.version_command.is_empty() || self.version_command[0].trim().is_empty() {
            return Err(anyhow!("version_command must be a non-empty array"));
        }
        if self.history_size == 0 {
            return Err(anyhow!("history_size must be > 0"));
        }
        Ok(())
    }

    /// Resolved history file path (`~/.crepl_history` unless overridden).
    pub fn history_path(&self) -> PathBuf {
        if let Some(path) = &self.history_file {
            return path.clone();
        }
        home_dir().join(".crepl_history")
    }
}

/// Default location consulted when `--config` is not given.
pub fn default_config_path() -> PathBuf {
    home_dir().join(".crepl.toml")
}

fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `ReplConfig::default()`.
pub fn load_config(path: &Path) -> Result<ReplConfig> {
    if !path.exists() {
        let cfg = ReplConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ReplConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, ReplConfig::default());
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "prompt = \"c> \"\nhistory_size = 5\n").expect("write");

        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.prompt, "c> ");
        assert_eq!(cfg.history_size, 5);
        assert_eq!(cfg.compile_command, ReplConfig::default().compile_command);
    }

    #[test]
    fn compile_command_without_outfile_token_is_rejected() {
        let cfg = ReplConfig {
            compile_command: vec!["gcc".to_string(), "-".to_string()],
            ..ReplConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("$outfile"));
    }

    #[test]
    fn zero_history_size_is_rejected() {
        let cfg = ReplConfig {
            history_size: 0,
            ..ReplConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn history_path_prefers_explicit_override() {
        let cfg = ReplConfig {
            history_file: Some(PathBuf::from("/tmp/hist")),
            ..ReplConfig::default()
        };
        assert_eq!(cfg.history_path(), PathBuf::from("/tmp/hist"));
    }
}
