// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Byte source — the one suspension point of the whole program.
//
// In raw mode we set VMIN=0 and VTIME=n, so read() on the terminal returns
// after at most n tenths of a second, with zero bytes if nothing arrived.
// That turns a plain blocking read into a poll with a timeout, which is all
// the key decoder and the geometry probe need: no background thread, no
// channel, no async runtime.
//
// `ByteSource` abstracts that primitive so the decoder and the probe can be
// driven by scripted bytes in tests.

use std::collections::VecDeque;
use std::io;

/// A source of single bytes with a bounded wait per read.
pub trait ByteSource {
    /// Read one byte.
    ///
    /// Returns `Ok(None)` when the read timed out with no data.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying read fails for a reason other
    /// than a timeout or an interrupted call.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;
}

/// Scripted input: each byte is delivered once, then every read times out.
impl ByteSource for VecDeque<u8> {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        Ok(self.pop_front())
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        (**self).read_byte()
    }
}

/// Reads the controlling terminal through stdin's file descriptor.
///
/// Relies on the VMIN/VTIME settings applied by
/// [`RawMode`](crate::terminal::RawMode) for its timeout.
#[derive(Debug, Clone, Copy)]
pub struct TtyReader {
    #[cfg(unix)]
    fd: libc::c_int,
}

impl TtyReader {
    /// Reader over stdin.
    #[must_use]
    pub const fn stdin() -> Self {
        Self {
            #[cfg(unix)]
            fd: libc::STDIN_FILENO,
        }
    }

    /// Reader over an arbitrary descriptor.
    #[cfg(unix)]
    #[must_use]
    pub const fn from_fd(fd: libc::c_int) -> Self {
        Self { fd }
    }
}

impl Default for TtyReader {
    fn default() -> Self {
        Self::stdin()
    }
}

impl ByteSource for TtyReader {
    #[cfg(unix)]
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = 0u8;
        let n = unsafe { libc::read(self.fd, (&raw mut byte).cast(), 1) };

        match n {
            1 => Ok(Some(byte)),
            0 => Ok(None),
            _ => {
                let err = io::Error::last_os_error();
                match err.kind() {
                    io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted => Ok(None),
                    _ => Err(err),
                }
            }
        }
    }

    #[cfg(not(unix))]
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        use std::io::Read;

        let mut byte = [0u8; 1];
        match io::stdin().lock().read(&mut byte)? {
            0 => Ok(None),
            _ => Ok(Some(byte[0])),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
