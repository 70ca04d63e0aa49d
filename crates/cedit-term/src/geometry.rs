// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Window geometry — how big is the screen?
//
// The direct answer is `ioctl(TIOCGWINSZ)`. Some terminals (and some
// serial or multiplexed setups) do not answer it, or answer with zero
// columns. The fallback is a probe: shove the cursor 999 columns right and
// 999 rows down (the terminal clamps both at its edge), ask where the
// cursor ended up with `ESC [ 6 n`, and parse the `ESC [ rows ; cols R`
// reply from stdin. The bottom-right cell's 1-indexed position is the
// screen size.
//
// Geometry is resolved once at startup. Without it there is no session.

use std::io::Write;

use tracing::{debug, warn};

use crate::ansi;
use crate::error::{Error, Result};
use crate::reader::ByteSource;

/// Longest cursor report we accept, terminator included.
pub const MAX_REPLY_LEN: usize = 31;

/// Relative move large enough to reach any real terminal edge.
const PROBE_DISTANCE: u16 = 999;

// ─── ScreenGeometry ─────────────────────────────────────────────────────────

/// Screen dimensions in character cells. Both are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenGeometry {
    /// Number of rows (height).
    pub rows: u16,
    /// Number of columns (width).
    pub cols: u16,
}

impl ScreenGeometry {
    /// Build a geometry, rejecting a zero dimension.
    #[must_use]
    pub const fn new(rows: u16, cols: u16) -> Option<Self> {
        if rows == 0 || cols == 0 {
            None
        } else {
            Some(Self { rows, cols })
        }
    }
}

// ─── Direct inquiry ─────────────────────────────────────────────────────────

/// Query the terminal size via `ioctl(TIOCGWINSZ)` on stdout.
///
/// Returns `None` if stdout is not a terminal, the query fails, or it
/// reports zero columns.
#[cfg(unix)]
#[must_use]
pub fn query_size() -> Option<ScreenGeometry> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) };

    if result == 0 {
        from_winsize(&ws)
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn query_size() -> Option<ScreenGeometry> {
    None
}

/// Interpret a `TIOCGWINSZ` answer. Zero rows or columns means "no answer".
#[cfg(unix)]
#[must_use]
pub const fn from_winsize(ws: &libc::winsize) -> Option<ScreenGeometry> {
    ScreenGeometry::new(ws.ws_row, ws.ws_col)
}

// ─── Probe ──────────────────────────────────────────────────────────────────

/// Resolve the screen size: ioctl first, cursor probe second.
///
/// # Errors
///
/// Returns [`Error::Geometry`] if the probe reply is missing or malformed,
/// and [`Error::Io`] if writing the probe or reading the reply fails.
pub fn resolve(source: &mut impl ByteSource, out: &mut impl Write) -> Result<ScreenGeometry> {
    resolve_with(query_size(), source, out)
}

/// Use `direct` when the terminal answered the size query, otherwise probe.
///
/// # Errors
///
/// See [`resolve`].
pub fn resolve_with(
    direct: Option<ScreenGeometry>,
    source: &mut impl ByteSource,
    out: &mut impl Write,
) -> Result<ScreenGeometry> {
    if let Some(geometry) = direct {
        debug!(rows = geometry.rows, cols = geometry.cols, "window size from ioctl");
        return Ok(geometry);
    }

    warn!("TIOCGWINSZ unavailable, probing cursor position");
    probe(source, out)
}

/// Find the screen size by parking the cursor in the bottom-right corner
/// and asking the terminal where it is.
///
/// # Errors
///
/// See [`resolve`].
pub fn probe(source: &mut impl ByteSource, out: &mut impl Write) -> Result<ScreenGeometry> {
    ansi::cursor_forward(out, PROBE_DISTANCE)?;
    ansi::cursor_down(out, PROBE_DISTANCE)?;
    out.flush()?;

    let (rows, cols) = cursor_position(source, out)?;
    let geometry = ScreenGeometry::new(rows, cols)
        .ok_or_else(|| Error::Geometry(format!("terminal reported {rows}x{cols}")))?;

    debug!(rows, cols, "window size from cursor probe");
    Ok(geometry)
}

/// Ask the terminal for the cursor position and read the reply.
///
/// Returns the 1-indexed `(row, col)` the terminal reported.
///
/// # Errors
///
/// Returns [`Error::Geometry`] if the reply is malformed or never arrives.
pub fn cursor_position(source: &mut impl ByteSource, out: &mut impl Write) -> Result<(u16, u16)> {
    ansi::query_cursor_position(out)?;
    out.flush()?;

    let reply = read_reply(source)?;
    parse_position_reply(&reply).ok_or_else(|| {
        Error::Geometry(format!(
            "unexpected cursor report {:?}",
            String::from_utf8_lossy(&reply)
        ))
    })
}

/// Read a cursor report up to (not including) the `R` terminator.
///
/// Stops at `R`, at [`MAX_REPLY_LEN`] bytes, or at the first read timeout.
fn read_reply(source: &mut impl ByteSource) -> Result<Vec<u8>> {
    let mut reply = Vec::with_capacity(MAX_REPLY_LEN);
    while reply.len() < MAX_REPLY_LEN {
        match source.read_byte()? {
            Some(b'R') | None => break,
            Some(b) => reply.push(b),
        }
    }
    Ok(reply)
}

/// Parse `ESC [ row ; col` (the terminator already stripped).
///
/// Both numbers must be present and fit in a `u16`.
#[must_use]
pub fn parse_position_reply(reply: &[u8]) -> Option<(u16, u16)> {
    let body = reply.strip_prefix(b"\x1b[")?;
    let sep = body.iter().position(|&b| b == b';')?;
    let row = parse_decimal(&body[..sep])?;
    let col = parse_decimal(&body[sep + 1..])?;
    Some((row, col))
}

/// Parse a non-empty run of ASCII digits.
fn parse_decimal(digits: &[u8]) -> Option<u16> {
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    digits.iter().try_fold(0u16, |acc, &d| {
        acc.checked_mul(10)?.checked_add(u16::from(d - b'0'))
    })
}

// ─── Tests ───────────────────────────────────────────────────────────────────
