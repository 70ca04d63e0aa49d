//! Editor error type.
//!
//! Wraps terminal failures and adds the one error the editor itself can
//! produce: the file collaborator failing to open its source.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Editor error.
#[derive(Error, Debug)]
pub enum Error {
    /// Raw mode, geometry or terminal I/O failed.
    #[error(transparent)]
    Term(#[from] cedit_term::Error),

    /// The file named on the command line could not be read.
    #[error("{}: {source}", .path.display())]
    SourceOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing a frame or reading a key failed.
    #[error("terminal I/O: {0}")]
    Io(#[from] io::Error),
}

/// Result alias for editor operations.
pub type Result<T> = std::result::Result<T, Error>;
