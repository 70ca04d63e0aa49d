//! Viewport — cursor position clamped to the screen.
//!
//! Coordinates are **0-indexed** screen cells; the compositor converts to
//! the terminal's 1-indexed CUP form. The cursor can reach every cell of
//! the viewport regardless of document content, and motion past an edge is
//! a silent no-op.
//!
//! Page motion is deliberately simple: `page_move` repeats the single-line
//! step once per screen row. There is no scroll offset, so on a screen that
//! shows the whole document this lands on the first or last row.

use cedit_term::geometry::ScreenGeometry;

// ---------------------------------------------------------------------------
// CursorPosition
// ---------------------------------------------------------------------------

/// A screen cell: `row` in `0..rows`, `col` in `0..cols`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CursorPosition {
    pub row: u16,
    pub col: u16,
}

impl CursorPosition {
    /// The top-left cell.
    pub const ORIGIN: Self = Self { row: 0, col: 0 };

    #[inline]
    #[must_use]
    pub const fn new(row: u16, col: u16) -> Self {
        Self { row, col }
    }
}

/// Direction of a cursor step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

// ---------------------------------------------------------------------------
// Viewport
// ---------------------------------------------------------------------------

/// Screen bounds plus the cursor inside them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    geometry: ScreenGeometry,
    cursor: CursorPosition,
}

impl Viewport {
    /// A viewport with the cursor at the origin.
    #[must_use]
    pub const fn new(geometry: ScreenGeometry) -> Self {
        Self {
            geometry,
            cursor: CursorPosition::ORIGIN,
        }
    }

    #[inline]
    #[must_use]
    pub const fn geometry(&self) -> ScreenGeometry {
        self.geometry
    }

    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> CursorPosition {
        self.cursor
    }

    /// Last valid row index.
    #[inline]
    const fn last_row(&self) -> u16 {
        self.geometry.rows.saturating_sub(1)
    }

    /// Last valid column index.
    #[inline]
    const fn last_col(&self) -> u16 {
        self.geometry.cols.saturating_sub(1)
    }

    /// Move one cell. At an edge this does nothing.
    pub const fn move_cursor(&mut self, direction: Direction) {
        let c = &mut self.cursor;
        match direction {
            Direction::Up => c.row = c.row.saturating_sub(1),
            Direction::Left => c.col = c.col.saturating_sub(1),
            Direction::Down => {
                if c.row < self.geometry.rows.saturating_sub(1) {
                    c.row += 1;
                }
            }
            Direction::Right => {
                if c.col < self.geometry.cols.saturating_sub(1) {
                    c.col += 1;
                }
            }
        }
    }

    /// Repeat the single step once per screen row.
    pub fn page_move(&mut self, direction: Direction) {
        for _ in 0..self.geometry.rows {
            self.move_cursor(direction);
        }
    }

    /// Column 0.
    pub const fn to_line_start(&mut self) {
        self.cursor.col = 0;
    }

    /// Last column of the screen.
    pub const fn to_line_end(&mut self) {
        self.cursor.col = self.last_col();
    }

    /// Place the cursor, clamped into the viewport.
    pub fn set_cursor(&mut self, pos: CursorPosition) {
        self.cursor = CursorPosition {
            row: pos.row.min(self.last_row()),
            col: pos.col.min(self.last_col()),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn viewport(rows: u16, cols: u16) -> Viewport {
        Viewport::new(ScreenGeometry { rows, cols })
    }

    // -- Single steps ---------------------------------------------------------

    #[test]
    fn starts_at_origin() {
        assert_eq!(viewport(24, 80).cursor(), CursorPosition::ORIGIN);
    }

    #[test]
    fn steps_in_each_direction() {
        let mut v = viewport(24, 80);
        v.move_cursor(Direction::Down);
        v.move_cursor(Direction::Right);
        v.move_cursor(Direction::Right);
        assert_eq!(v.cursor(), CursorPosition::new(1, 2));
        v.move_cursor(Direction::Up);
        v.move_cursor(Direction::Left);
        assert_eq!(v.cursor(), CursorPosition::new(0, 1));
    }

    #[test]
    fn left_at_column_zero_is_noop() {
        let mut v = viewport(24, 80);
        for _ in 0..5 {
            v.move_cursor(Direction::Left);
        }
        assert_eq!(v.cursor().col, 0);
    }

    #[test]
    fn up_at_row_zero_is_noop() {
        let mut v = viewport(24, 80);
        v.move_cursor(Direction::Up);
        assert_eq!(v.cursor().row, 0);
    }

    #[test]
    fn right_stops_at_last_column() {
        let mut v = viewport(24, 80);
        for _ in 0..200 {
            v.move_cursor(Direction::Right);
        }
        assert_eq!(v.cursor().col, 79);
    }

    #[test]
    fn down_stops_at_last_row() {
        let mut v = viewport(24, 80);
        for _ in 0..200 {
            v.move_cursor(Direction::Down);
        }
        assert_eq!(v.cursor().row, 23);
    }

    #[test]
    fn one_by_one_screen_never_moves() {
        let mut v = viewport(1, 1);
        for d in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            v.move_cursor(d);
            assert_eq!(v.cursor(), CursorPosition::ORIGIN);
        }
    }

    // -- Page and line motion -----------------------------------------------

    #[test]
    fn page_down_reaches_last_row() {
        let mut v = viewport(24, 80);
        v.page_move(Direction::Down);
        assert_eq!(v.cursor().row, 23);
    }

    #[test]
    fn page_up_reaches_first_row() {
        let mut v = viewport(24, 80);
        v.set_cursor(CursorPosition::new(10, 5));
        v.page_move(Direction::Up);
        assert_eq!(v.cursor(), CursorPosition::new(0, 5));
    }

    #[test]
    fn line_start_and_end() {
        let mut v = viewport(24, 80);
        v.set_cursor(CursorPosition::new(3, 40));
        v.to_line_end();
        assert_eq!(v.cursor(), CursorPosition::new(3, 79));
        v.to_line_start();
        assert_eq!(v.cursor(), CursorPosition::new(3, 0));
    }

    #[test]
    fn set_cursor_clamps() {
        let mut v = viewport(24, 80);
        v.set_cursor(CursorPosition::new(100, 100));
        assert_eq!(v.cursor(), CursorPosition::new(23, 79));
    }

    // -- Invariants -----------------------------------------------------------

    fn direction() -> impl Strategy<Value = Direction> {
        prop_oneof![
            Just(Direction::Up),
            Just(Direction::Down),
            Just(Direction::Left),
            Just(Direction::Right),
        ]
    }

    proptest! {
        #[test]
        fn cursor_stays_in_bounds(
            rows in 1u16..60,
            cols in 1u16..200,
            moves in prop::collection::vec((direction(), any::<bool>()), 0..100),
        ) {
            let mut v = viewport(rows, cols);
            for (d, page) in moves {
                if page {
                    v.page_move(d);
                } else {
                    v.move_cursor(d);
                }
                prop_assert!(v.cursor().row < rows);
                prop_assert!(v.cursor().col < cols);
            }
        }
    }
}
