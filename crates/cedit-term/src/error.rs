// SPDX-License-Identifier: MIT
//
// Error types for terminal control.
//
// Every variant here is fatal to an editing session: there is no degraded
// mode without a configurable terminal and known screen bounds. Ambiguous
// escape sequences are deliberately absent; the key decoder absorbs them
// as `Key::Escape`.

use std::io;

use thiserror::Error;

/// Terminal engine error.
#[derive(Error, Debug)]
pub enum Error {
    /// `tcgetattr` or `tcsetattr` failed.
    #[error("{call}: {source}")]
    TerminalConfig {
        /// Name of the failing libc call.
        call: &'static str,
        #[source]
        source: io::Error,
    },

    /// Raw mode was requested while a snapshot is already held.
    #[error("raw mode is already enabled for this process")]
    AlreadyRaw,

    /// Neither the size ioctl nor the cursor probe produced usable bounds.
    #[error("unable to determine window size: {0}")]
    Geometry(String),

    /// Read or write on the terminal failed.
    #[error("terminal I/O: {0}")]
    Io(#[from] io::Error),
}

/// Result alias for terminal operations.
pub type Result<T> = std::result::Result<T, Error>;
