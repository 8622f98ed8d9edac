//! crepl - an interactive read-eval-print loop for C.
//!
//! Accepted lines accumulate into an in-memory program that is recompiled
//! and re-executed on every input; only output not yet shown is printed.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use crepl::core::session::Session;
use crepl::engine::run_session;
use crepl::exit_codes;
use crepl::io::config::{default_config_path, load_config};
use crepl::io::input::RustylineReader;
use crepl::io::toolchain::{GccToolchain, LinkOptions, compiler_version};
use crepl::logging;

#[derive(Parser)]
#[command(
    name = "crepl",
    version,
    about = "An interactive read-eval-print loop for C"
)]
struct Cli {
    /// Add DIR to the directories searched for header files.
    #[arg(short = 'I', value_name = "DIR")]
    include_dirs: Vec<String>,

    /// Add DIR to the directories searched for libraries when linking.
    #[arg(short = 'L', value_name = "DIR")]
    lib_dirs: Vec<String>,

    /// Link against library LIB.
    #[arg(short = 'l', value_name = "LIB")]
    libs: Vec<String>,

    /// Path to a TOML configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() {
    logging::init();
    match run() {
        Ok(()) => std::process::exit(exit_codes::OK),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::ERROR);
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let config = load_config(&config_path)?;

    // Reserve a unique name, then let the compiler create the file itself so
    // the executable bits are set fresh. The TempPath removes whatever is at
    // the path when it drops, on every exit arm of this function.
    let exe_path = tempfile::Builder::new()
        .prefix("crepl-exe")
        .tempfile()
        .context("create temporary executable path")?
        .into_temp_path();
    let _ = fs::remove_file(&exe_path);

    let link = LinkOptions {
        include_dirs: cli.include_dirs,
        lib_dirs: cli.lib_dirs,
        libs: cli.libs,
    };
    let mut toolchain = GccToolchain::new(&config, &link, &exe_path);

    let version = compiler_version(&config)?;
    println!("crepl {} ({version})", env!("CARGO_PKG_VERSION"));
    println!("Type '.h' for help, '.q' to quit.");

    let mut reader = RustylineReader::new(&config)?;
    let mut session = Session::new();
    let end = run_session(
        &mut session,
        &mut reader,
        &mut toolchain,
        &config.prompt,
        &mut std::io::stdout(),
    )?;
    debug!(?end, "session finished");

    reader.save_history()?;
    Ok(())
}
