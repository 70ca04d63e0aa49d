// SPDX-License-Identifier: MIT
//
// Key decoder.
//
// Turns the raw byte stream from the terminal into logical keys. Plain
// bytes pass through untouched; navigation keys arrive multiplexed on the
// escape byte and are resolved with a bounded lookahead of one to three
// bytes:
//
//   ESC [ <digit> ~      Home / Delete / End / PageUp / PageDown
//   ESC [ <letter>       arrows, Home, End
//   ESC O <letter>       Home, End (application cursor mode)
//
// Each lookahead byte is a separate bounded read, so a lone Escape keypress
// resolves after one read timeout instead of hanging. Anything that does
// not match the table decodes to `Key::Escape`, which the editor ignores.
// The decoder never reads past the end of the sequence it is matching.

use std::io;

use tracing::trace;

use crate::ansi::ESC;
use crate::reader::ByteSource;

// ─── Key ────────────────────────────────────────────────────────────────────

/// A decoded key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A literal byte: printable characters and control keys alike.
    Byte(u8),
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    PageUp,
    PageDown,
    Home,
    End,
    Delete,
    /// A bare Escape, or an escape sequence we do not recognize.
    Escape,
}

/// The control byte produced by holding Ctrl with `key` (`Ctrl-Q` → `0x11`).
#[inline]
#[must_use]
pub const fn ctrl(key: u8) -> u8 {
    key & 0x1f
}

// ─── Decoder ────────────────────────────────────────────────────────────────

/// Pulls bytes from a [`ByteSource`] and produces one [`Key`] per call.
#[derive(Debug)]
pub struct KeyDecoder<S> {
    source: S,
}

impl<S: ByteSource> KeyDecoder<S> {
    /// Wrap a byte source.
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    /// Recover the underlying source.
    pub fn into_inner(self) -> S {
        self.source
    }

    /// Wait for the next key.
    ///
    /// Loops over timed-out reads until the first byte arrives, then
    /// resolves any escape sequence with bounded lookahead.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying read fails.
    pub fn next_key(&mut self) -> io::Result<Key> {
        let first = loop {
            if let Some(b) = self.source.read_byte()? {
                break b;
            }
        };

        let key = if first == ESC {
            self.decode_escape()?
        } else {
            Key::Byte(first)
        };

        trace!(?key, "decoded key");
        Ok(key)
    }

    /// Resolve the bytes after an ESC. Any timeout means a lone Escape.
    fn decode_escape(&mut self) -> io::Result<Key> {
        let Some(intro) = self.source.read_byte()? else {
            return Ok(Key::Escape);
        };
        let Some(code) = self.source.read_byte()? else {
            return Ok(Key::Escape);
        };

        let key = match (intro, code) {
            (b'[', digit @ b'0'..=b'9') => match self.source.read_byte()? {
                Some(b'~') => tilde_key(digit),
                _ => Key::Escape,
            },
            (b'[', letter) => csi_letter_key(letter),
            (b'O', letter) => ss3_key(letter),
            _ => Key::Escape,
        };

        Ok(key)
    }
}

// ─── Mapping tables ─────────────────────────────────────────────────────────

/// `ESC [ <digit> ~`
const fn tilde_key(digit: u8) -> Key {
    match digit {
        b'1' | b'7' => Key::Home,
        b'3' => Key::Delete,
        b'4' | b'8' => Key::End,
        b'5' => Key::PageUp,
        b'6' => Key::PageDown,
        _ => Key::Escape,
    }
}

/// `ESC [ <letter>`
const fn csi_letter_key(letter: u8) -> Key {
    match letter {
        b'A' => Key::ArrowUp,
        b'B' => Key::ArrowDown,
        b'C' => Key::ArrowRight,
        b'D' => Key::ArrowLeft,
        b'H' => Key::Home,
        b'F' => Key::End,
        _ => Key::Escape,
    }
}

/// `ESC O <letter>`
const fn ss3_key(letter: u8) -> Key {
    match letter {
        b'H' => Key::Home,
        b'F' => Key::End,
        _ => Key::Escape,
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::VecDeque;

    fn decoder(bytes: &[u8]) -> KeyDecoder<VecDeque<u8>> {
        KeyDecoder::new(bytes.iter().copied().collect())
    }

    /// Decode exactly one key and return it with whatever input is left.
    fn decode(bytes: &[u8]) -> (Key, Vec<u8>) {
        let mut d = decoder(bytes);
        let key = d.next_key().unwrap();
        (key, d.into_inner().into_iter().collect())
    }

    fn decode_one(bytes: &[u8]) -> Key {
        let (key, rest) = decode(bytes);
        assert!(rest.is_empty(), "unconsumed bytes: {rest:?}");
        key
    }

    /// Source that yields a fixed script of reads, then times out forever.
    struct Script(VecDeque<Option<u8>>);

    impl ByteSource for Script {
        fn read_byte(&mut self) -> io::Result<Option<u8>> {
            Ok(self.0.pop_front().flatten())
        }
    }

    // ── Literal bytes ───────────────────────────────────────────────────

    #[test]
    fn printable_byte() {
        assert_eq!(decode_one(b"a"), Key::Byte(b'a'));
    }

    #[test]
    fn control_byte() {
        assert_eq!(decode_one(&[ctrl(b'q')]), Key::Byte(0x11));
    }

    #[test]
    fn high_byte_passes_through() {
        assert_eq!(decode_one(&[0xc3]), Key::Byte(0xc3));
    }

    #[test]
    fn consecutive_bytes() {
        let mut d = decoder(b"xy");
        assert_eq!(d.next_key().unwrap(), Key::Byte(b'x'));
        assert_eq!(d.next_key().unwrap(), Key::Byte(b'y'));
    }

    #[test]
    fn ctrl_masks_letters() {
        assert_eq!(ctrl(b'q'), 0x11);
        assert_eq!(ctrl(b'a'), 0x01);
        assert_eq!(ctrl(b'Q'), 0x11);
    }

    // ── CSI letters ─────────────────────────────────────────────────────

    // `ESC [ A` is ArrowUp, as in the CSI letter table and every xterm.
    #[test]
    fn arrows() {
        assert_eq!(decode_one(b"\x1b[A"), Key::ArrowUp);
        assert_eq!(decode_one(b"\x1b[B"), Key::ArrowDown);
        assert_eq!(decode_one(b"\x1b[C"), Key::ArrowRight);
        assert_eq!(decode_one(b"\x1b[D"), Key::ArrowLeft);
    }

    #[test]
    fn csi_home_end() {
        assert_eq!(decode_one(b"\x1b[H"), Key::Home);
        assert_eq!(decode_one(b"\x1b[F"), Key::End);
    }

    #[test]
    fn csi_unknown_letter() {
        assert_eq!(decode_one(b"\x1b[Z"), Key::Escape);
    }

    // ── CSI tilde ───────────────────────────────────────────────────────

    #[test]
    fn tilde_table() {
        let table = [
            (b'1', Key::Home),
            (b'3', Key::Delete),
            (b'4', Key::End),
            (b'5', Key::PageUp),
            (b'6', Key::PageDown),
            (b'7', Key::Home),
            (b'8', Key::End),
        ];
        for (digit, expected) in table {
            assert_eq!(decode_one(&[ESC, b'[', digit, b'~']), expected, "digit {}", digit as char);
        }
    }

    #[test]
    fn tilde_unmapped_digits() {
        for digit in [b'0', b'2', b'9'] {
            assert_eq!(decode_one(&[ESC, b'[', digit, b'~']), Key::Escape);
        }
    }

    #[test]
    fn page_up() {
        assert_eq!(decode_one(b"\x1b[5~"), Key::PageUp);
    }

    #[test]
    fn digit_without_tilde() {
        // The byte after the digit is consumed as part of the sequence.
        assert_eq!(decode(b"\x1b[5xq"), (Key::Escape, b"q".to_vec()));
    }

    #[test]
    fn digit_then_timeout() {
        assert_eq!(decode_one(b"\x1b[5"), Key::Escape);
    }

    // ── SS3 ─────────────────────────────────────────────────────────────

    #[test]
    fn ss3_home_end() {
        assert_eq!(decode_one(b"\x1bOH"), Key::Home);
        assert_eq!(decode_one(b"\x1bOF"), Key::End);
    }

    #[test]
    fn ss3_other() {
        assert_eq!(decode_one(b"\x1bOP"), Key::Escape);
    }

    // ── Ambiguity ───────────────────────────────────────────────────────

    #[test]
    fn lone_escape() {
        assert_eq!(decode_one(b"\x1b"), Key::Escape);
    }

    #[test]
    fn escape_then_one_byte() {
        assert_eq!(decode_one(b"\x1b["), Key::Escape);
    }

    #[test]
    fn unknown_intro_consumes_two_bytes() {
        assert_eq!(decode(b"\x1bxyz"), (Key::Escape, b"z".to_vec()));
    }

    #[test]
    fn never_reads_into_next_key() {
        let mut d = decoder(b"\x1b[Aj\x1b[6~k");
        assert_eq!(d.next_key().unwrap(), Key::ArrowUp);
        assert_eq!(d.next_key().unwrap(), Key::Byte(b'j'));
        assert_eq!(d.next_key().unwrap(), Key::PageDown);
        assert_eq!(d.next_key().unwrap(), Key::Byte(b'k'));
    }

    #[test]
    fn waits_through_timeouts_for_first_byte() {
        let script = Script(VecDeque::from(vec![None, None, None, Some(b'z')]));
        let mut d = KeyDecoder::new(script);
        assert_eq!(d.next_key().unwrap(), Key::Byte(b'z'));
    }

    #[test]
    fn timeout_inside_sequence_splits_keys() {
        // ESC, timeout, then '[' 'A' typed later: Escape then two literals.
        let script = Script(VecDeque::from(vec![
            Some(ESC),
            None,
            Some(b'['),
            Some(b'A'),
        ]));
        let mut d = KeyDecoder::new(script);
        assert_eq!(d.next_key().unwrap(), Key::Escape);
        assert_eq!(d.next_key().unwrap(), Key::Byte(b'['));
        assert_eq!(d.next_key().unwrap(), Key::Byte(b'A'));
    }

    #[test]
    fn read_error_propagates() {
        struct Broken;
        impl ByteSource for Broken {
            fn read_byte(&mut self) -> io::Result<Option<u8>> {
                Err(io::Error::other("boom"))
            }
        }
        assert!(KeyDecoder::new(Broken).next_key().is_err());
    }
}
