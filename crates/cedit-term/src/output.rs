// SPDX-License-Identifier: MIT
//
// Output buffering.
//
// OutputBuffer accumulates every byte of a frame in memory so the whole
// frame reaches the terminal in a single write() call. Many small writes
// let the terminal paint half a frame between them; one write does not.
//
// A buffer is built for one render pass and dropped after it is flushed.
// Nothing carries over between frames.

use std::io::{self, Write};

use crate::ansi;

/// Initial capacity: a full 80×24 frame plus escapes fits without growing.
const DEFAULT_CAPACITY: usize = 4096;

/// A byte buffer that accumulates ANSI output for a single `write()` call.
#[derive(Debug)]
pub struct OutputBuffer {
    buf: Vec<u8>,
}

impl OutputBuffer {
    /// Create an empty buffer with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    /// Number of bytes accumulated.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The accumulated bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Append raw bytes.
    #[inline]
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Append `bytes`, truncated to at most `max` bytes.
    pub fn push_truncated(&mut self, bytes: &[u8], max: usize) {
        let end = bytes.len().min(max);
        self.buf.extend_from_slice(&bytes[..end]);
    }

    /// Append `n` copies of `byte`.
    pub fn push_repeat(&mut self, byte: u8, n: usize) {
        self.buf.resize(self.buf.len() + n, byte);
    }

    // Escape helpers write into a Vec, which never fails, so the io::Result
    // from the ansi layer is dropped here instead of threaded through every
    // compositor call.

    /// Append `ESC[?25l`.
    pub fn hide_cursor(&mut self) {
        let _ = ansi::cursor_hide(&mut self.buf);
    }

    /// Append `ESC[?25h`.
    pub fn show_cursor(&mut self) {
        let _ = ansi::cursor_show(&mut self.buf);
    }

    /// Append `ESC[H`.
    pub fn cursor_home(&mut self) {
        let _ = ansi::cursor_home(&mut self.buf);
    }

    /// Append the 1-indexed CUP sequence for the 0-indexed `(row, col)`.
    pub fn cursor_to(&mut self, row: u16, col: u16) {
        let _ = ansi::cursor_to(&mut self.buf, row, col);
    }

    /// Append `ESC[K`.
    pub fn erase_line(&mut self) {
        let _ = ansi::erase_line(&mut self.buf);
    }

    /// Write accumulated output to `w` in one `write_all`, then flush `w`.
    ///
    /// Consumes the buffer: a frame is never reused after it is written.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to or flushing `w` fails.
    pub fn flush_to(self, w: &mut impl Write) -> io::Result<()> {
        if !self.buf.is_empty() {
            w.write_all(&self.buf)?;
            w.flush()?;
        }
        Ok(())
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Real flushing happens in flush_to().
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
