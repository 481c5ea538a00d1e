/// A location in a text buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Position {
    /// Line (0-indexed).
    pub row: usize,
    /// Byte offset within the line.
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Cursor position within a buffer.
#[derive(Debug, Clone, Default)]
pub struct CursorState {
    pub row: usize,
    pub col: usize,
    /// Desired column for vertical movement ("sticky" column).
    pub desired_col: usize,
}

impl CursorState {
    pub fn position(&self) -> Position {
        Position::new(self.row, self.col)
    }

    pub fn move_to(&mut self, pos: Position) {
        self.row = pos.row;
        self.col = pos.col;
        self.desired_col = pos.col;
    }
}
