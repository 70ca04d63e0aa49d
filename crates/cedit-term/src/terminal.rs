// SPDX-License-Identifier: MIT
//
// Terminal control — raw mode and RAII cleanup.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr) and a raw fd write in the panic hook. These are the standard
// POSIX interfaces for terminal control. Each unsafe block is minimal.
#![allow(unsafe_code)]
//
// `RawMode` is a guard: `enable` snapshots the terminal's settings and
// switches to raw mode, and dropping the guard restores the snapshot. That
// covers the normal return, the quit key and every `?` on the way out of a
// fatal error. The panic hook covers the rest: it clears the screen with a
// single raw write to fd 1 (bypassing the stdout lock, which the panicking
// frame may hold) and restores termios from a process-wide backup before
// the original hook prints its message.
//
// The backup doubles as the "one snapshot per process" rule: enabling raw
// mode while a snapshot is held is refused.

use std::io;
use std::sync::{Mutex, Once};

use tracing::debug;

use crate::error::{Error, Result};

/// Default read timeout in tenths of a second (VTIME): 100 ms.
pub const DEFAULT_READ_TIMEOUT: u8 = 1;

// ─── Panic-Safe Terminal Restore ────────────────────────────────────────────

/// Snapshot held while raw mode is active, with the descriptor it belongs to.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<(libc::c_int, libc::termios)>> = Mutex::new(None);

/// Restore termios from the global backup. Best-effort, ignores errors.
///
/// Uses `try_lock`: the panic may have happened while this thread held it.
#[cfg(unix)]
fn restore_termios_from_backup() {
    if let Ok(guard) = TERMIOS_BACKUP.try_lock() {
        if let Some((fd, ref original)) = *guard {
            unsafe {
                let _ = libc::tcsetattr(fd, libc::TCSAFLUSH, original);
            }
        }
    }
}

/// Emergency sequence: clear screen, home cursor, show cursor.
const EMERGENCY_RESTORE: &[u8] = b"\x1b[2J\x1b[H\x1b[?25h";

static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Install a panic hook that cleans the screen and restores termios first.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            wipe_screen_unlocked();

            #[cfg(unix)]
            restore_termios_from_backup();

            original(info);
        }));
    });
}

/// Clear the screen and show the cursor from inside the panic hook.
///
/// The panicking thread may be halfway through writing a frame with the
/// `Stdout` lock held, and `Stdout` is line-buffered over a `ReentrantLock`
/// we cannot steal. `write(2)` on fd 1 goes around both, so the wipe lands
/// even then. A short or failed write is ignored: nothing is left to report
/// it to.
fn wipe_screen_unlocked() {
    #[cfg(unix)]
    {
        let len = EMERGENCY_RESTORE.len();
        let ptr = EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>();
        let _ = unsafe { libc::write(libc::STDOUT_FILENO, ptr, len) };
    }

    #[cfg(not(unix))]
    {
        use std::io::Write;
        let mut stdout = io::stdout();
        let _ = stdout.write_all(EMERGENCY_RESTORE).and_then(|()| stdout.flush());
    }
}

// ─── Raw flags ──────────────────────────────────────────────────────────────

/// Apply raw-mode flags to a termios value.
///
/// Input: no break-to-SIGINT, no CR→NL, no parity check, no 8th-bit strip,
/// no XON/XOFF. Output: no post-processing (we emit `\r\n` ourselves).
/// Local: no echo, no canonical line buffering, no signal keys, no
/// `Ctrl-V` literal-next. Control: 8-bit characters. Reads return after
/// at most `read_timeout` tenths of a second, with or without data.
#[cfg(unix)]
pub fn make_raw(termios: &mut libc::termios, read_timeout: u8) {
    termios.c_iflag &= !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
    termios.c_oflag &= !libc::OPOST;
    termios.c_cflag |= libc::CS8;
    termios.c_lflag &= !(libc::ECHO | libc::ICANON | libc::ISIG | libc::IEXTEN);
    termios.c_cc[libc::VMIN] = 0;
    termios.c_cc[libc::VTIME] = read_timeout;
}

// ─── RawMode ────────────────────────────────────────────────────────────────

/// Raw-mode guard. The original settings come back when it is dropped.
///
/// # Example
///
/// ```no_run
/// use cedit_term::terminal::{RawMode, DEFAULT_READ_TIMEOUT};
///
/// let raw = RawMode::enable_stdin(DEFAULT_READ_TIMEOUT)?;
/// // ... read keys, render frames ...
/// drop(raw); // cooked mode again
/// # Ok::<(), cedit_term::Error>(())
/// ```
#[derive(Debug)]
pub struct RawMode {
    #[cfg(unix)]
    fd: libc::c_int,
    active: bool,
}

impl RawMode {
    /// Enter raw mode on stdin.
    ///
    /// # Errors
    ///
    /// See [`enable`](Self::enable).
    pub fn enable_stdin(read_timeout: u8) -> Result<Self> {
        #[cfg(unix)]
        {
            Self::enable(libc::STDIN_FILENO, read_timeout)
        }
        #[cfg(not(unix))]
        {
            Self::enable(0, read_timeout)
        }
    }

    /// Snapshot the settings of `fd` and switch it to raw mode.
    ///
    /// `read_timeout` is the per-read wait in tenths of a second.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TerminalConfig`] if `tcgetattr` or `tcsetattr`
    /// fails (for example when `fd` is not a terminal), and
    /// [`Error::AlreadyRaw`] if a snapshot is already held.
    #[cfg(unix)]
    pub fn enable(fd: libc::c_int, read_timeout: u8) -> Result<Self> {
        let mut backup = TERMIOS_BACKUP.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if backup.is_some() {
            return Err(Error::AlreadyRaw);
        }

        let mut termios: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(fd, &raw mut termios) } != 0 {
            return Err(Error::TerminalConfig {
                call: "tcgetattr",
                source: io::Error::last_os_error(),
            });
        }

        *backup = Some((fd, termios));
        drop(backup);
        install_panic_hook();

        make_raw(&mut termios, read_timeout);
        if unsafe { libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const termios) } != 0 {
            let source = io::Error::last_os_error();
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = None;
            }
            return Err(Error::TerminalConfig {
                call: "tcsetattr",
                source,
            });
        }

        debug!(fd, read_timeout, "entered raw mode");
        Ok(Self { fd, active: true })
    }

    #[cfg(not(unix))]
    pub fn enable(_fd: i32, _read_timeout: u8) -> Result<Self> {
        Err(Error::TerminalConfig {
            call: "tcgetattr",
            source: io::Error::new(io::ErrorKind::Unsupported, "termios requires unix"),
        })
    }

    /// Restore the captured settings. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TerminalConfig`] if `tcsetattr` fails. The snapshot
    /// is kept in that case so the panic hook can still try.
    #[cfg(unix)]
    pub fn disable(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }

        let mut backup = TERMIOS_BACKUP.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some((fd, ref original)) = *backup {
            if unsafe { libc::tcsetattr(fd, libc::TCSAFLUSH, original) } != 0 {
                return Err(Error::TerminalConfig {
                    call: "tcsetattr",
                    source: io::Error::last_os_error(),
                });
            }
        }
        *backup = None;
        self.active = false;

        debug!(fd = self.fd, "restored terminal mode");
        Ok(())
    }

    #[cfg(not(unix))]
    pub fn disable(&mut self) -> Result<()> {
        self.active = false;
        Ok(())
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = self.disable();
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn all_flags() -> libc::termios {
        let mut t: libc::termios = unsafe { std::mem::zeroed() };
        t.c_iflag = !0;
        t.c_oflag = !0;
        t.c_lflag = !0;
        t.c_cflag = 0;
        t.c_cc[libc::VMIN] = 1;
        t.c_cc[libc::VTIME] = 0;
        t
    }

    // ── make_raw ──────────────────────────────────────────────────────

    #[test]
    fn make_raw_clears_local_flags() {
        let mut t = all_flags();
        make_raw(&mut t, DEFAULT_READ_TIMEOUT);
        for flag in [libc::ECHO, libc::ICANON, libc::ISIG, libc::IEXTEN] {
            assert_eq!(t.c_lflag & flag, 0);
        }
    }

    #[test]
    fn make_raw_clears_input_flags() {
        let mut t = all_flags();
        make_raw(&mut t, DEFAULT_READ_TIMEOUT);
        for flag in [libc::BRKINT, libc::ICRNL, libc::INPCK, libc::ISTRIP, libc::IXON] {
            assert_eq!(t.c_iflag & flag, 0);
        }
    }

    #[test]
    fn make_raw_disables_output_processing() {
        let mut t = all_flags();
        make_raw(&mut t, DEFAULT_READ_TIMEOUT);
        assert_eq!(t.c_oflag & libc::OPOST, 0);
    }

    #[test]
    fn make_raw_requests_eight_bit_chars() {
        let mut t = all_flags();
        make_raw(&mut t, DEFAULT_READ_TIMEOUT);
        assert_eq!(t.c_cflag & libc::CS8, libc::CS8);
    }

    #[test]
    fn make_raw_sets_polling_read() {
        let mut t = all_flags();
        make_raw(&mut t, 3);
        assert_eq!(t.c_cc[libc::VMIN], 0);
        assert_eq!(t.c_cc[libc::VTIME], 3);
    }

    #[test]
    fn make_raw_leaves_unrelated_flags() {
        let mut t = all_flags();
        make_raw(&mut t, DEFAULT_READ_TIMEOUT);
        assert_ne!(t.c_lflag & libc::ECHOE, 0);
        assert_ne!(t.c_iflag & libc::IGNPAR, 0);
    }

    // ── enable on a non-terminal ───────────────────────────────────────

    #[test]
    fn enable_on_non_tty_is_terminal_config_error() {
        use std::os::unix::io::AsRawFd;

        let null = std::fs::File::open("/dev/null").unwrap();
        let err = RawMode::enable(null.as_raw_fd(), DEFAULT_READ_TIMEOUT).unwrap_err();
        match err {
            Error::TerminalConfig { call, .. } => assert_eq!(call, "tcgetattr"),
            // Another test may hold a snapshot if run on a real terminal.
            Error::AlreadyRaw => {}
            other => panic!("unexpected error: {other}"),
        }
    }

    // ── Emergency restore sequence ────────────────────────────────────

    #[test]
    fn emergency_restore_clears_and_shows_cursor() {
        let s = std::str::from_utf8(EMERGENCY_RESTORE).unwrap();
        assert!(s.starts_with("\x1b[2J\x1b[H"));
        assert!(s.ends_with("\x1b[?25h"));
    }
}
