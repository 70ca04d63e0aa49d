// SPDX-License-Identifier: MIT
//
// cedit — a minimal raw-mode terminal text viewer.
//
// This is the binary that wires the crates together:
//
//   cedit-term   → raw mode, screen size, key decoding, ANSI output
//   cedit-editor → viewport, document, compositor, editor loop
//
// Usage: `cedit [FILE]`. With a file, its first line is shown; without one,
// the welcome banner. Arrow keys, Home/End and PageUp/PageDown move the
// cursor; Ctrl-Q quits.
//
// Exit status is 0 after Ctrl-Q and 1 after any fatal error. On the error
// path the raw-mode guard has already restored the terminal by the time we
// get here; we clear the screen so no half-drawn frame is left behind, then
// print the message to stderr.
//
// Logging goes to the file named by CEDIT_LOG (filter from CEDIT_LOG_LEVEL,
// default `debug`). The terminal is the UI, so there is no console logging.

use std::env;
use std::fmt::Display;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;

use cedit_editor::editor::run_session;
use cedit_editor::options::Options;
use cedit_term::ansi;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Log file path.
const LOG_VAR: &str = "CEDIT_LOG";
/// Log filter directives.
const LOG_LEVEL_VAR: &str = "CEDIT_LOG_LEVEL";

/// Install a file-backed subscriber when `CEDIT_LOG` is set.
fn init_logging() -> io::Result<()> {
    let Some(path) = env::var_os(LOG_VAR) else {
        return Ok(());
    };
    let file = File::create(path)?;

    let filter = env::var(LOG_LEVEL_VAR)
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

fn main() -> ExitCode {
    if let Err(e) = init_logging() {
        eprintln!("cedit: cannot open log file: {e}");
    }

    // Only the first positional argument is used.
    let path = env::args_os().nth(1).map(PathBuf::from);
    let options = Options::from_env();
    tracing::info!(path = ?path, "cedit starting");

    match run_session(path.as_deref(), options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "fatal");
            report_fatal(&mut io::stdout().lock(), &mut io::stderr().lock(), &e)
        }
    }
}

/// Wipe the screen on `screen`, print `err` to `log`, and pick the failure
/// status. Write errors are ignored: the session is already lost.
fn report_fatal(screen: &mut impl Write, log: &mut impl Write, err: &dyn Display) -> ExitCode {
    let _ = ansi::clear_and_home(screen).and_then(|()| screen.flush());
    let _ = writeln!(log, "cedit: {err}");
    ExitCode::FAILURE
}
