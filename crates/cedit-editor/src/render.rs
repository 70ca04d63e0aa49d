//! Compositor — one full frame as one byte sequence.
//!
//! Every frame is rebuilt from scratch; there is no diff against the
//! previous one. Flicker is avoided differently: the cursor is hidden while
//! drawing, the frame starts with cursor-home rather than a full-screen
//! erase, and each row clears only its own tail (`ESC[K`). The finished
//! [`OutputBuffer`] goes to the terminal in a single write.
//!
//! Frame layout:
//!
//! ```text
//! ESC[?25l ESC[H
//! row 0   ESC[K \r\n
//! row 1   ESC[K \r\n
//! ...
//! row n-1 ESC[K
//! ESC[{row+1};{col+1}H ESC[?25h
//! ```
//!
//! A row shows the document line with the same index (cut at the screen
//! width), or the filler glyph past the end of the document. With no
//! document loaded, the row one third of the way down carries the
//! centered welcome banner instead.

use cedit_term::geometry::ScreenGeometry;
use cedit_term::output::OutputBuffer;

use crate::options::Options;
use crate::rows::Document;
use crate::viewport::CursorPosition;

/// Text of the welcome banner.
#[must_use]
pub fn welcome_message() -> String {
    format!("cedit -- version {}", env!("CARGO_PKG_VERSION"))
}

/// Screen row that carries the welcome banner.
#[inline]
#[must_use]
pub const fn banner_row(geometry: ScreenGeometry) -> u16 {
    geometry.rows / 3
}

/// Compose a complete frame.
#[must_use]
pub fn render(
    geometry: ScreenGeometry,
    cursor: CursorPosition,
    document: &Document,
    options: &Options,
) -> OutputBuffer {
    let mut frame = OutputBuffer::new();
    frame.hide_cursor();
    frame.cursor_home();

    draw_rows(&mut frame, geometry, document, options);

    frame.cursor_to(cursor.row, cursor.col);
    frame.show_cursor();
    frame
}

fn draw_rows(
    frame: &mut OutputBuffer,
    geometry: ScreenGeometry,
    document: &Document,
    options: &Options,
) {
    let width = usize::from(geometry.cols);

    for y in 0..geometry.rows {
        if let Some(row) = document.row(usize::from(y)) {
            frame.push_bytes(row.visible(width));
        } else if document.is_empty() && y == banner_row(geometry) {
            draw_banner(frame, width);
        } else {
            frame.push_bytes(&[options.filler]);
        }

        frame.erase_line();
        if y + 1 < geometry.rows {
            frame.push_bytes(b"\r\n");
        }
    }
}

/// Center the welcome banner, cut to `width` bytes.
fn draw_banner(frame: &mut OutputBuffer, width: usize) {
    let message = welcome_message();
    let len = message.len().min(width);
    frame.push_repeat(b' ', (width - len) / 2);
    frame.push_truncated(message.as_bytes(), len);
}
