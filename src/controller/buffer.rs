// ABOUTME: Single-line text buffer with a character-indexed cursor.
// ABOUTME: All edits are UTF-8 safe; the cursor counts chars, never bytes.

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputBuffer {
    text: String,
    cursor: usize,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Take the text out, leaving the buffer empty with the cursor at 0.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }

    /// Replace the contents and put the cursor at the end.
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.char_len();
    }

    /// Text before the cursor, used to place the terminal cursor.
    pub fn before_cursor(&self) -> &str {
        &self.text[..self.cursor_byte_index()]
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.char_len());
    }

    fn cursor_byte_index(&self) -> usize {
        char_index_to_byte_index(&self.text, self.cursor)
    }

    pub fn insert(&mut self, c: char) {
        self.clamp_cursor();
        let byte_index = self.cursor_byte_index();
        self.text.insert(byte_index, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) {
        self.clamp_cursor();
        if self.cursor == 0 {
            return;
        }
        let end = self.cursor_byte_index();
        let start = char_index_to_byte_index(&self.text, self.cursor - 1);
        self.text.replace_range(start..end, "");
        self.cursor -= 1;
    }

    /// Delete the character under the cursor.
    pub fn delete(&mut self) {
        self.clamp_cursor();
        if self.cursor >= self.char_len() {
            return;
        }
        let start = self.cursor_byte_index();
        let end = char_index_to_byte_index(&self.text, self.cursor + 1);
        self.text.replace_range(start..end, "");
    }

    pub fn move_left(&mut self) {
        self.clamp_cursor();
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.clamp_cursor();
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_len();
    }
}

fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
    match s.char_indices().nth(char_index) {
        Some((idx, _)) => idx,
        None => s.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_clears_text_and_cursor() {
        let mut buffer = InputBuffer::new();
        buffer.set("let x = 1;");
        assert_eq!(buffer.cursor(), 10);
        assert_eq!(buffer.take(), "let x = 1;");
        assert_eq!(buffer.text(), "");
        assert_eq!(buffer.cursor(), 0);
    }

    #[test]
    fn blank_detection_ignores_whitespace() {
        let mut buffer = InputBuffer::new();
        assert!(buffer.is_blank());
        buffer.set("  \t ");
        assert!(buffer.is_blank());
        buffer.set(" 1 ");
        assert!(!buffer.is_blank());
    }

    #[test]
    fn utf8_editing_is_safe() {
        let mut buffer = InputBuffer::new();
        buffer.insert('a');
        buffer.insert('🙂');
        buffer.insert('é');
        assert_eq!(buffer.text(), "a🙂é");
        assert_eq!(buffer.cursor(), 3);

        buffer.move_left();
        buffer.backspace();
        assert_eq!(buffer.text(), "aé");
        assert_eq!(buffer.cursor(), 1);

        buffer.delete();
        assert_eq!(buffer.text(), "a");
        assert_eq!(buffer.before_cursor(), "a");
    }

    #[test]
    fn cursor_movement_stays_in_bounds() {
        let mut buffer = InputBuffer::new();
        buffer.set("ab");
        buffer.move_right();
        assert_eq!(buffer.cursor(), 2);
        buffer.move_home();
        buffer.move_left();
        assert_eq!(buffer.cursor(), 0);
        buffer.backspace();
        assert_eq!(buffer.text(), "ab");
        buffer.move_end();
        buffer.delete();
        assert_eq!(buffer.text(), "ab");
    }

    #[test]
    fn insert_in_the_middle() {
        let mut buffer = InputBuffer::new();
        buffer.set("ac");
        buffer.move_left();
        buffer.insert('b');
        assert_eq!(buffer.text(), "abc");
        assert_eq!(buffer.before_cursor(), "ab");
    }
}
