//! Text rows and the document that owns them.
//!
//! The render path only ever reads rows; nothing here edits content after
//! it is loaded. `Document::open` is the file collaborator: it reads the
//! first line of a file (trailing `\n` / `\r` stripped) and nothing more.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// TextRow
// ---------------------------------------------------------------------------

/// One line of text, stored as raw bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextRow {
    content: Vec<u8>,
}

impl TextRow {
    /// Build a row from raw bytes.
    #[must_use]
    pub fn new(content: impl Into<Vec<u8>>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// The row's bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.content
    }

    /// Length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.content.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// At most the first `width` bytes.
    #[must_use]
    pub fn visible(&self, width: usize) -> &[u8] {
        &self.content[..self.content.len().min(width)]
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// The rows shown on screen, indexed by screen row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    rows: Vec<TextRow>,
}

impl Document {
    /// An empty document: the screen shows the welcome banner.
    #[must_use]
    pub const fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// A document holding the given rows.
    #[must_use]
    pub const fn from_rows(rows: Vec<TextRow>) -> Self {
        Self { rows }
    }

    /// Load the first line of `path`.
    ///
    /// An empty file yields an empty document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceOpen`] if the file cannot be opened or read.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source_err = |source| Error::SourceOpen {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(source_err)?;
        let mut line = Vec::new();
        let n = BufReader::new(file)
            .read_until(b'\n', &mut line)
            .map_err(source_err)?;

        let doc = if n == 0 {
            Self::new()
        } else {
            Self::from_rows(vec![TextRow::new(strip_line_ending(line))])
        };

        debug!(path = %path.display(), rows = doc.len(), "loaded document");
        Ok(doc)
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when no content is loaded.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row `index`, if it exists.
    #[inline]
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&TextRow> {
        self.rows.get(index)
    }
}

/// Drop any trailing `\n` and `\r` bytes.
fn strip_line_ending(mut line: Vec<u8>) -> Vec<u8> {
    while matches!(line.last(), Some(b'\n' | b'\r')) {
        line.pop();
    }
    line
}
