//! Editor options.
//!
//! A handful of tunables with sensible defaults, optionally overridden from
//! the environment at startup:
//!
//! | Variable             | Field          | Default | Range    |
//! |----------------------|----------------|---------|----------|
//! | `CEDIT_READ_TIMEOUT` | `read_timeout` | 1       | 1..=255  |
//!
//! `read_timeout` is in tenths of a second (the termios VTIME unit).
//! Invalid values are ignored with a warning rather than aborting startup.

use cedit_term::input::ctrl;
use cedit_term::terminal::DEFAULT_READ_TIMEOUT;
use tracing::warn;

/// Environment variable overriding [`Options::read_timeout`].
pub const READ_TIMEOUT_VAR: &str = "CEDIT_READ_TIMEOUT";

/// Editor tunables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Per-read wait in tenths of a second.
    pub read_timeout: u8,
    /// Glyph drawn on screen rows past the end of the document.
    pub filler: u8,
    /// Byte that ends the session.
    pub quit_key: u8,
}

impl Options {
    /// Defaults, with overrides from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        let mut options = Self::default();
        options.apply(|name| std::env::var(name).ok());
        options
    }

    /// Apply overrides from a variable lookup.
    pub fn apply(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(raw) = lookup(READ_TIMEOUT_VAR) {
            match parse_read_timeout(&raw) {
                Some(t) => self.read_timeout = t,
                None => warn!(value = %raw, "ignoring invalid {}", READ_TIMEOUT_VAR),
            }
        }
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            read_timeout: DEFAULT_READ_TIMEOUT,
            filler: b'~',
            quit_key: ctrl(b'q'),
        }
    }
}

/// Parse a read timeout. Zero is rejected: VMIN=0 with VTIME=0 would spin.
fn parse_read_timeout(raw: &str) -> Option<u8> {
    raw.trim().parse::<u8>().ok().filter(|&t| t > 0)
}
