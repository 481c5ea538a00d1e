use ropey::Rope;
use std::path::PathBuf;
use std::time::Instant;

use super::cursor::{CursorState, Position};
use crate::host::TextSource;

/// Viewport state for scroll tracking.
#[derive(Debug, Clone)]
pub struct Viewport {
    pub top_line: usize,
    pub height: u16,
    pub scroll_off: u16,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            top_line: 0,
            height: 24,
            scroll_off: 5,
        }
    }
}

/// A single text buffer backed by a Rope.
pub struct Buffer {
    pub rope: Rope,
    pub path: Option<PathBuf>,
    pub dirty: bool,
    pub cursor: CursorState,
    pub viewport: Viewport,
    pub save_debounce: Option<Instant>,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Buffer {
    pub fn new() -> Self {
        Self::from_text("")
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            path: None,
            dirty: false,
            cursor: CursorState::default(),
            viewport: Viewport::default(),
            save_debounce: None,
        }
    }

    pub fn from_file(path: PathBuf) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(&path)?;
        let mut buffer = Self::from_text(&text);
        buffer.path = Some(path);
        Ok(buffer)
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Get the text of a specific line (without trailing newline).
    pub fn line_text(&self, idx: usize) -> Option<String> {
        if idx >= self.rope.len_lines() {
            return None;
        }
        let mut s: String = self.rope.line(idx).chunks().collect();
        if s.ends_with('\n') {
            s.pop();
        }
        if s.ends_with('\r') {
            s.pop();
        }
        Some(s)
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn insert_char(&mut self, ch: char) {
        let idx = self.char_index(self.cursor.position());
        self.rope.insert_char(idx, ch);
        self.cursor.col += ch.len_utf8();
        self.cursor.desired_col = self.cursor.col;
        self.dirty = true;
    }

    pub fn insert_newline(&mut self) {
        let idx = self.char_index(self.cursor.position());
        self.rope.insert_char(idx, '\n');
        self.cursor.row += 1;
        self.cursor.col = 0;
        self.cursor.desired_col = 0;
        self.dirty = true;
    }

    /// Delete the character before the cursor (backspace).
    pub fn delete_char_before(&mut self) {
        if self.cursor.col == 0 && self.cursor.row == 0 {
            return;
        }

        let idx = self.char_index(self.cursor.position());
        if self.cursor.col == 0 {
            // Join with previous line
            let prev_line_len = self
                .line_text(self.cursor.row - 1)
                .map(|l| l.len())
                .unwrap_or(0);
            let newline_len = self.line_ending_chars(self.cursor.row - 1);
            self.rope.remove(idx - newline_len..idx);
            self.cursor.row -= 1;
            self.cursor.col = prev_line_len;
        } else {
            let prev_char_len = self
                .rope
                .get_char(idx - 1)
                .map(char::len_utf8)
                .unwrap_or(1);
            self.rope.remove(idx - 1..idx);
            self.cursor.col -= prev_char_len;
        }

        self.cursor.desired_col = self.cursor.col;
        self.dirty = true;
    }

    pub fn move_left(&mut self) {
        if self.cursor.col == 0 {
            return;
        }
        let line = self.line_text(self.cursor.row).unwrap_or_default();
        let step = line[..self.cursor.col.min(line.len())]
            .chars()
            .next_back()
            .map(char::len_utf8)
            .unwrap_or(1);
        self.cursor.col -= step;
        self.cursor.desired_col = self.cursor.col;
    }

    pub fn move_right(&mut self) {
        let line = self.line_text(self.cursor.row).unwrap_or_default();
        if let Some(ch) = line[self.cursor.col.min(line.len())..].chars().next() {
            self.cursor.col += ch.len_utf8();
            self.cursor.desired_col = self.cursor.col;
        }
    }

    pub fn move_vertical(&mut self, delta: isize) {
        let max_row = self.line_count().saturating_sub(1) as isize;
        let row = (self.cursor.row as isize + delta).clamp(0, max_row) as usize;
        self.cursor.row = row;
        self.cursor.col = self.cursor.desired_col;
        self.clamp_cursor();
    }

    /// Ensure the cursor stays within valid bounds and on a char boundary.
    pub fn clamp_cursor(&mut self) {
        let max_row = self.rope.len_lines().saturating_sub(1);
        self.cursor.row = self.cursor.row.min(max_row);

        let line = self.line_text(self.cursor.row).unwrap_or_default();
        let mut col = self.cursor.col.min(line.len());
        while !line.is_char_boundary(col) {
            col -= 1;
        }
        self.cursor.col = col;
    }

    /// Ensure the viewport keeps the cursor visible.
    pub fn scroll_to_cursor(&mut self) {
        let off = self.viewport.scroll_off as usize;
        let height = (self.viewport.height as usize).max(off * 2 + 1);

        if self.cursor.row < self.viewport.top_line + off {
            self.viewport.top_line = self.cursor.row.saturating_sub(off);
        }
        if self.cursor.row >= self.viewport.top_line + height - off {
            self.viewport.top_line = self.cursor.row + off + 1 - height;
        }
    }

    /// Char index into the rope for a (row, byte column) position, clamped.
    fn char_index(&self, pos: Position) -> usize {
        let row = pos.row.min(self.rope.len_lines().saturating_sub(1));
        let line = self.line_text(row).unwrap_or_default();
        let mut col = pos.col.min(line.len());
        while !line.is_char_boundary(col) {
            col -= 1;
        }
        self.rope.line_to_char(row) + line[..col].chars().count()
    }

    fn line_ending_chars(&self, row: usize) -> usize {
        let line = self.rope.line(row);
        let len = line.len_chars();
        match (len >= 2).then(|| line.char(len - 2)) {
            Some('\r') if line.char(len - 1) == '\n' => 2,
            _ => 1,
        }
    }
}

impl TextSource for Buffer {
    fn line(&self, row: usize) -> Option<String> {
        self.line_text(row)
    }

    fn range(&self, from: Position, to: Position) -> String {
        let start = self.char_index(from);
        let end = self.char_index(to);
        if start >= end {
            return String::new();
        }
        self.rope.slice(start..end).to_string()
    }

    fn replace_range(&mut self, text: &str, from: Position, to: Position) {
        let start = self.char_index(from);
        let end = self.char_index(to).max(start);
        self.rope.remove(start..end);
        self.rope.insert(start, text);

        let end_char = start + text.chars().count();
        let row = self.rope.char_to_line(end_char);
        let line_start = self.rope.line_to_char(row);
        let col = self
            .rope
            .slice(line_start..end_char)
            .chars()
            .map(char::len_utf8)
            .sum();
        self.cursor.move_to(Position::new(row, col));
        self.dirty = true;
    }

    fn cursor(&self) -> Position {
        self.cursor.position()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_at(text: &str, row: usize, col: usize) -> Buffer {
        let mut buffer = Buffer::from_text(text);
        buffer.cursor.move_to(Position::new(row, col));
        buffer
    }

    #[test]
    fn replace_range_moves_cursor_after_inserted_text() {
        let mut buffer = buffer_at("hello @wor there", 0, 10);
        buffer.replace_range("[[World]]", Position::new(0, 6), Position::new(0, 10));

        assert_eq!(buffer.text(), "hello [[World]] there");
        assert_eq!(buffer.cursor(), Position::new(0, 15));
        assert!(buffer.dirty);
    }

    #[test]
    fn byte_columns_survive_multibyte_text() {
        let mut buffer = buffer_at("José @an", 1, 0);
        buffer.cursor.move_to(Position::new(0, "José @an".len()));
        assert_eq!(
            buffer.range(Position::new(0, "José ".len()), buffer.cursor()),
            "@an"
        );

        buffer.insert_char('é');
        assert_eq!(buffer.line_text(0).as_deref(), Some("José @ané"));
        buffer.delete_char_before();
        assert_eq!(buffer.line_text(0).as_deref(), Some("José @an"));
        assert_eq!(buffer.cursor.col, "José @an".len());
    }

    #[test]
    fn backspace_at_line_start_joins_lines() {
        let mut buffer = buffer_at("one\r\ntwo", 1, 0);
        buffer.delete_char_before();
        assert_eq!(buffer.text(), "onetwo");
        assert_eq!(buffer.cursor(), Position::new(0, 3));
    }

    #[test]
    fn range_clamps_out_of_bounds_positions() {
        let buffer = Buffer::from_text("abc");
        assert_eq!(buffer.range(Position::new(0, 1), Position::new(4, 99)), "bc");
        assert_eq!(buffer.range(Position::new(0, 2), Position::new(0, 1)), "");
    }
}
