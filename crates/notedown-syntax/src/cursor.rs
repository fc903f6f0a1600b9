//! Random-access character cursor used by the tokenizer.
//!
//! The tokenizer reads one character at a time and then inspects the
//! surrounding input to decide what that character means. All look-ahead
//! and look-behind saturates at the input boundaries: peeking past either
//! end yields nothing instead of failing.

/// A peekable view over the input characters.
///
/// `pos` always points at the next unread character, so after a `bump()`
/// the character that was just read sits at offset `-1`.
#[derive(Debug, Clone)]
pub struct Cursor {
    chars: Vec<char>,
    pos: usize,
}

impl Cursor {
    /// Creates a cursor positioned before the first character of `input`.
    pub fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    /// Index of the next unread character.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Number of characters in the whole input.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Returns true once every character has been read.
    pub fn eof(&self) -> bool {
        self.pos >= self.chars.len()
    }

    /// Returns up to `n` characters without moving the cursor.
    ///
    /// A positive `n` reads forward from the next unread character. A
    /// negative `n` returns the `|n|` characters immediately before the
    /// cursor, in input order.
    pub fn peek(&self, n: isize) -> String {
        let (start, end) = if n >= 0 {
            (self.pos, self.pos.saturating_add(n.unsigned_abs()))
        } else {
            (self.pos.saturating_sub(n.unsigned_abs()), self.pos)
        };
        let end = end.min(self.chars.len());
        self.chars[start.min(end)..end].iter().collect()
    }

    /// Returns the character `offset` positions away from the cursor.
    ///
    /// Offset `0` is the next unread character, `-1` the one just read.
    pub fn peek_char(&self, offset: isize) -> Option<char> {
        let index = self.pos.checked_add_signed(offset)?;
        self.chars.get(index).copied()
    }

    /// Checks whether the unread input starts with `pat`.
    pub fn starts_with(&self, pat: &str) -> bool {
        let mut rest = self.chars[self.pos.min(self.chars.len())..].iter();
        pat.chars().all(|c| rest.next() == Some(&c))
    }

    /// Consumes one character.
    pub fn bump(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        Some(c)
    }

    /// Consumes and returns up to `n` characters.
    pub fn read(&mut self, n: usize) -> String {
        let end = self.pos.saturating_add(n).min(self.chars.len());
        let out = self.chars[self.pos.min(end)..end].iter().collect();
        self.pos = end.max(self.pos);
        out
    }

    /// Moves the cursor by `offset` without reading, clamped to the input.
    pub fn relative_seek(&mut self, offset: isize) {
        self.pos = self
            .pos
            .saturating_add_signed(offset)
            .min(self.chars.len());
    }

    /// True if the character just read is the first one on its line.
    pub fn is_line_start(&self) -> bool {
        self.pos <= 1 || self.peek_char(-2) == Some('\n')
    }

    /// True if the character just read is the first non-blank one on its
    /// line: only spaces and tabs sit between it and the preceding newline
    /// (or the start of input).
    pub fn is_first_significant(&self) -> bool {
        if self.is_line_start() {
            return true;
        }
        let mut index = self.pos - 1;
        while index > 0 {
            index -= 1;
            match self.chars[index] {
                ' ' | '\t' => continue,
                '\n' => return true,
                _ => return false,
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn cursor_basics() {
        let mut cur = Cursor::new("hello");
        assert_eq!(cur.pos(), 0);
        assert!(!cur.eof());
        assert_eq!(cur.peek_char(0), Some('h'));
        assert_eq!(cur.bump(), Some('h'));
        assert_eq!(cur.pos(), 1);
        assert_eq!(cur.peek_char(-1), Some('h'));
    }

    #[test]
    fn empty_string_input() {
        let mut cur = Cursor::new("");
        assert!(cur.eof());
        assert!(cur.is_empty());
        assert_eq!(cur.peek_char(0), None);
        assert_eq!(cur.peek(3), "");
        assert_eq!(cur.bump(), None);
    }

    #[test]
    fn peek_forward_does_not_advance() {
        let cur = Cursor::new("abcdef");
        assert_eq!(cur.peek(3), "abc");
        assert_eq!(cur.peek(3), "abc");
        assert_eq!(cur.pos(), 0);
    }

    #[test]
    fn peek_saturates_at_both_ends() {
        let mut cur = Cursor::new("abc");
        assert_eq!(cur.peek(10), "abc");
        assert_eq!(cur.peek(-2), "");
        cur.read(2);
        assert_eq!(cur.peek(-5), "ab");
        assert_eq!(cur.peek_char(-3), None);
        assert_eq!(cur.peek_char(1), None);
    }

    #[test]
    fn peek_backward_returns_input_order() {
        let mut cur = Cursor::new("hello world");
        cur.read(5);
        assert_eq!(cur.peek(-3), "llo");
        assert_eq!(cur.peek_char(-1), Some('o'));
        assert_eq!(cur.peek_char(0), Some(' '));
    }

    #[test]
    fn read_consumes_up_to_n() {
        let mut cur = Cursor::new("ab");
        assert_eq!(cur.read(5), "ab");
        assert!(cur.eof());
        assert_eq!(cur.read(1), "");
    }

    #[test]
    fn relative_seek_clamps() {
        let mut cur = Cursor::new("abc");
        cur.relative_seek(2);
        assert_eq!(cur.peek_char(0), Some('c'));
        cur.relative_seek(-10);
        assert_eq!(cur.pos(), 0);
        cur.relative_seek(10);
        assert!(cur.eof());
    }

    #[test]
    fn starts_with_pattern_longer_than_remaining() {
        let mut cur = Cursor::new("ab");
        assert!(!cur.starts_with("abcdef"));
        cur.bump();
        assert!(cur.starts_with("b"));
        assert!(!cur.starts_with("bc"));
        cur.bump();
        assert!(cur.starts_with(""));
    }

    #[test]
    fn multibyte_characters_count_as_one() {
        let mut cur = Cursor::new("é*");
        assert_eq!(cur.len(), 2);
        assert_eq!(cur.bump(), Some('é'));
        assert_eq!(cur.peek_char(0), Some('*'));
    }

    #[test]
    fn line_start_detection() {
        let mut cur = Cursor::new("a\nb c");
        cur.bump();
        assert!(cur.is_line_start());
        cur.read(2);
        assert!(cur.is_line_start());
        cur.read(2);
        assert!(!cur.is_line_start());
    }

    #[test]
    fn first_significant_skips_indentation() {
        let mut cur = Cursor::new("x\n \t -");
        cur.read(6);
        assert_eq!(cur.peek_char(-1), Some('-'));
        assert!(cur.is_first_significant());
        assert!(!cur.is_line_start());
    }

    #[test]
    fn first_significant_on_first_line() {
        let mut cur = Cursor::new("   #");
        cur.read(4);
        assert!(cur.is_first_significant());
    }

    #[test]
    fn not_first_significant_after_text() {
        let mut cur = Cursor::new("ab *");
        cur.read(4);
        assert!(!cur.is_first_significant());
    }
}
