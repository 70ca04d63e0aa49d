//! Editor loop — render, read one key, apply it, repeat.
//!
//! [`Editor`] is the context object for a session: viewport, document and
//! options, passed by reference to every operation instead of living in a
//! global. The loop itself is a two-state machine:
//!
//! ```text
//!   Running ──(quit key)──▶ Terminated
//!      ▲  │
//!      └──┘ any other key
//! ```
//!
//! Errors from below (terminal I/O, decoding reads) leave the loop through
//! `?` and never touch the state.
//!
//! [`run_session`] wires the loop to the real terminal: raw mode as an RAII
//! guard around the whole session, geometry resolution, and the optional
//! file preload.

use std::io::{self, Write};
use std::path::Path;

use cedit_term::ansi;
use cedit_term::geometry::{self, ScreenGeometry};
use cedit_term::input::{Key, KeyDecoder};
use cedit_term::reader::{ByteSource, TtyReader};
use cedit_term::terminal::RawMode;
use tracing::{debug, info};

use crate::error::Result;
use crate::options::Options;
use crate::render;
use crate::rows::Document;
use crate::viewport::{Direction, Viewport};

/// Loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    Terminated,
}

/// Session context.
#[derive(Debug)]
pub struct Editor {
    viewport: Viewport,
    document: Document,
    options: Options,
    state: State,
}

impl Editor {
    /// A running editor with the cursor at the origin.
    #[must_use]
    pub const fn new(geometry: ScreenGeometry, document: Document, options: Options) -> Self {
        Self {
            viewport: Viewport::new(geometry),
            document,
            options,
            state: State::Running,
        }
    }

    #[inline]
    #[must_use]
    pub const fn state(&self) -> State {
        self.state
    }

    #[inline]
    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[inline]
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// Compose the current frame and write it with a single `write_all`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn refresh_screen(&self, out: &mut impl Write) -> io::Result<()> {
        render::render(
            self.viewport.geometry(),
            self.viewport.cursor(),
            &self.document,
            &self.options,
        )
        .flush_to(out)
    }

    /// Apply one key.
    ///
    /// The quit key clears the screen and terminates the loop. Navigation
    /// keys move the cursor. Everything else is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if writing the clear sequence fails.
    pub fn process_key(&mut self, key: Key, out: &mut impl Write) -> io::Result<State> {
        if self.state == State::Terminated {
            return Ok(self.state);
        }

        match key {
            Key::Byte(b) if b == self.options.quit_key => {
                ansi::clear_and_home(out)?;
                out.flush()?;
                self.state = State::Terminated;
                info!("quit requested");
            }
            Key::ArrowUp => self.viewport.move_cursor(Direction::Up),
            Key::ArrowDown => self.viewport.move_cursor(Direction::Down),
            Key::ArrowLeft => self.viewport.move_cursor(Direction::Left),
            Key::ArrowRight => self.viewport.move_cursor(Direction::Right),
            Key::PageUp => self.viewport.page_move(Direction::Up),
            Key::PageDown => self.viewport.page_move(Direction::Down),
            Key::Home => self.viewport.to_line_start(),
            Key::End => self.viewport.to_line_end(),
            Key::Delete | Key::Escape | Key::Byte(_) => {}
        }

        Ok(self.state)
    }

    /// Run until the quit key.
    ///
    /// # Errors
    ///
    /// Returns an error if reading a key or writing a frame fails.
    pub fn run<S: ByteSource>(
        &mut self,
        keys: &mut KeyDecoder<S>,
        out: &mut impl Write,
    ) -> Result<()> {
        while self.state == State::Running {
            self.refresh_screen(out)?;
            let key = keys.next_key()?;
            self.process_key(key, out)?;
        }
        Ok(())
    }
}

/// Run a full session on the controlling terminal.
///
/// Raw mode is held for exactly the lifetime of this call: the guard is
/// dropped on return, whether the session ended with the quit key or with
/// an error.
///
/// # Errors
///
/// Returns an error if raw mode cannot be entered, the screen size cannot
/// be determined, `path` cannot be read, or terminal I/O fails.
pub fn run_session(path: Option<&Path>, options: Options) -> Result<()> {
    let _raw = RawMode::enable_stdin(options.read_timeout)?;

    let mut reader = TtyReader::stdin();
    let mut stdout = io::stdout().lock();
    let geometry = geometry::resolve(&mut reader, &mut stdout)?;

    let document = match path {
        Some(p) => Document::open(p)?,
        None => Document::new(),
    };

    debug!(rows = geometry.rows, cols = geometry.cols, "starting editor loop");
    let mut editor = Editor::new(geometry, document, options);
    let mut keys = KeyDecoder::new(reader);
    editor.run(&mut keys, &mut stdout)
}
