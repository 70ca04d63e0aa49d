// SPDX-License-Identifier: MIT
//
// cedit-term — terminal engine for cedit.
//
// Everything that touches the terminal device lives here: the raw-mode
// guard, the screen-size inquiry and its cursor-probe fallback, the
// timed single-byte reader, the key decoder, the ANSI sequences we emit,
// and the output buffer that turns a whole frame into one write.
//
// Like its sibling crates this talks to the terminal directly through
// termios and escape sequences rather than through a TUI framework.

pub mod ansi;
pub mod error;
pub mod geometry;
pub mod input;
pub mod output;
pub mod reader;
pub mod terminal;

pub use error::{Error, Result};
