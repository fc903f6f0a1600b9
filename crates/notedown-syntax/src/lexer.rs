//! # Lexer - Tokenizing Note Source
//!
//! The first pipeline stage: a character-level scanner that turns raw text
//! into a flat sequence of [`Token`]s.
//!
//! ```
//! use notedown_syntax::lexer::lex;
//! use notedown_syntax::token::{Delimiter, Token};
//!
//! let tokens = lex("*hi*");
//! assert_eq!(
//!     tokens,
//!     vec![
//!         Token::Emphasis(Delimiter::Star),
//!         Token::Text("hi".into()),
//!         Token::Emphasis(Delimiter::Star),
//!         Token::EndOfStream,
//!     ]
//! );
//! ```
//!
//! ## How it works
//!
//! The [`Tokenizer`] reads one character at a time. Ordinary characters
//! accumulate in a text buffer. A trigger character (`*`, `#`, `[`, a
//! newline, ...) first flushes the buffer as a [`Token::Text`] and then runs
//! its handler, which may look around with the [`Cursor`] and consume more
//! input.
//!
//! Unlike a context-free lexer, several handlers depend on where the
//! character sits on its line: `*` list markers, numbered list markers,
//! headings, block quotes and three-space indentation are only recognised
//! at the first non-blank position of a line. Hyphen markers (`---`, `- `)
//! and tabs are recognised anywhere.
//!
//! Every probe that looks ahead and fails leaves the cursor untouched; the
//! trigger character then simply becomes text.
//!
//! ## What the lexer does not decide
//!
//! The lexer never pairs anything up. A `*` is emitted as an emphasis marker
//! whether or not a matching `*` follows, and a newline is always just
//! [`Token::Newline`]. Pairing, paragraph breaks and suppression inside code
//! are the [resolver](crate::resolver)'s job.

use crate::cursor::Cursor;
use crate::token::{Bullet, Delimiter, Indent, Token};

/// Lex the input into a sequence of tokens ending in [`Token::EndOfStream`].
pub fn lex(input: &str) -> Vec<Token> {
    Tokenizer::new(input).tokenize()
}

/// Drives a [`Cursor`] through the input, emitting tokens.
pub struct Tokenizer {
    cursor: Cursor,
    text: String,
    tokens: Vec<Token>,
}

impl Tokenizer {
    pub fn new(input: &str) -> Self {
        Self {
            cursor: Cursor::new(input),
            text: String::new(),
            tokens: Vec::new(),
        }
    }

    /// Consume the whole input and return the token stream.
    pub fn tokenize(mut self) -> Vec<Token> {
        while let Some(c) = self.cursor.bump() {
            self.process(c);
        }
        self.end_text();
        self.tokens.push(Token::EndOfStream);
        log::trace!(
            "lexed {} chars into {} tokens",
            self.cursor.len(),
            self.tokens.len()
        );
        self.tokens
    }

    fn process(&mut self, c: char) {
        match c {
            '\\' => self.escape(),
            '*' => self.star(),
            '_' => self.emphasis(Delimiter::Underscore),
            '#' => self.hash(),
            '-' => self.hyphen(),
            '\n' => self.push(Token::Newline),
            // CRLF: the newline that follows does the work
            '\r' if self.cursor.peek_char(0) == Some('\n') => {}
            '\t' => self.push(Token::Tab(Indent::Tab)),
            ' ' => self.space(),
            '!' => self.bang(),
            '[' => self.open_bracket(),
            ']' => self.close_bracket(),
            ')' => self.push(Token::RParen),
            '|' => self.push(Token::Pipe),
            '>' => self.block_quote(),
            '`' => self.backtick(),
            ':' => self.colon(),
            c if c.is_ascii_digit() && self.cursor.is_first_significant() => {
                self.ordered_item(c)
            }
            c => self.text.push(c),
        }
    }

    /// Flush pending text, then emit `token`.
    fn push(&mut self, token: Token) {
        self.end_text();
        self.tokens.push(token);
    }

    fn end_text(&mut self) {
        if !self.text.is_empty() {
            self.tokens.push(Token::Text(std::mem::take(&mut self.text)));
        }
    }

    fn escape(&mut self) {
        match self.cursor.bump() {
            Some(c) => self.text.push(c),
            None => self.text.push('\\'),
        }
    }

    fn star(&mut self) {
        if self.cursor.is_first_significant() && self.cursor.peek_char(0) == Some(' ') {
            self.cursor.bump();
            self.push(Token::ListItem(Bullet::Star));
        } else {
            self.emphasis(Delimiter::Star);
        }
    }

    fn emphasis(&mut self, delimiter: Delimiter) {
        if self.cursor.peek_char(0) == Some(delimiter.as_char()) {
            self.cursor.bump();
            self.push(Token::Strong(delimiter));
        } else {
            self.push(Token::Emphasis(delimiter));
        }
    }

    fn hash(&mut self) {
        if self.cursor.is_first_significant()
            && let Some(level) = self.probe_heading()
        {
            // remaining hashes plus the space
            self.cursor.relative_seek(level as isize);
            self.push(Token::Heading(level));
            return;
        }
        if let Some(name) = self.probe_tag() {
            self.cursor.relative_seek(name.chars().count() as isize);
            self.push(Token::Tag(name));
            return;
        }
        self.text.push('#');
    }

    /// Level of the heading marker starting at the `#` just read, if the run
    /// is at most six long and followed by a space.
    fn probe_heading(&self) -> Option<u8> {
        let mut level: u8 = 1;
        while self.cursor.peek_char(level as isize - 1) == Some('#') {
            level += 1;
            if level > 6 {
                return None;
            }
        }
        (self.cursor.peek_char(level as isize - 1) == Some(' ')).then_some(level)
    }

    /// Tag name following the `#` just read. Must contain a letter.
    fn probe_tag(&self) -> Option<String> {
        let mut name = String::new();
        let mut offset = 0;
        while let Some(c) = self.cursor.peek_char(offset) {
            if !(c.is_alphanumeric() || matches!(c, '-' | '/' | '_')) {
                break;
            }
            name.push(c);
            offset += 1;
        }
        name.chars().any(char::is_alphabetic).then_some(name)
    }

    fn hyphen(&mut self) {
        if self.cursor.starts_with("--") {
            self.cursor.read(2);
            self.push(Token::Bar);
        } else if self.cursor.peek_char(0) == Some(' ') {
            self.cursor.bump();
            self.push(Token::ListItem(Bullet::Dash));
        } else {
            self.text.push('-');
        }
    }

    fn space(&mut self) {
        if self.cursor.is_first_significant() && self.cursor.starts_with("  ") {
            self.cursor.read(2);
            self.push(Token::Tab(Indent::Spaces));
        } else {
            self.text.push(' ');
        }
    }

    fn bang(&mut self) {
        if self.cursor.starts_with("[[") {
            self.cursor.read(2);
            self.push(Token::EmbedOpen);
        } else {
            self.text.push('!');
        }
    }

    fn open_bracket(&mut self) {
        if self.cursor.peek_char(0) == Some('[') {
            self.cursor.bump();
            self.push(Token::WikiOpen);
        } else {
            self.push(Token::LinkOpen);
        }
    }

    fn close_bracket(&mut self) {
        match self.cursor.peek_char(0) {
            Some(']') => {
                self.cursor.bump();
                self.push(Token::WikiClose);
            }
            Some('(') => {
                self.cursor.bump();
                self.push(Token::LinkTargetBreak);
            }
            _ => self.text.push(']'),
        }
    }

    fn block_quote(&mut self) {
        if !self.cursor.is_first_significant() {
            self.text.push('>');
            return;
        }
        let spaced = self.cursor.peek_char(0) == Some(' ');
        if spaced {
            self.cursor.bump();
        }
        self.push(Token::BlockQuote { spaced });
    }

    fn backtick(&mut self) {
        if self.cursor.starts_with("``") {
            self.cursor.read(2);
            self.push(Token::CodeBlock);
        } else {
            self.push(Token::CodeSpan);
        }
    }

    fn colon(&mut self) {
        if self.cursor.peek_char(0) == Some(':') {
            self.cursor.bump();
            self.push(Token::DoubleColon);
        } else {
            self.push(Token::Colon);
        }
    }

    /// `first` has already been read; the rest of the digit run must be
    /// followed by `. ` for this to be a list marker.
    fn ordered_item(&mut self, first: char) {
        let mut offset = 0;
        while self.cursor.peek_char(offset).is_some_and(|c| c.is_ascii_digit()) {
            offset += 1;
        }
        if self.cursor.peek_char(offset) == Some('.')
            && self.cursor.peek_char(offset + 1) == Some(' ')
        {
            let mut number = first.to_string();
            number.push_str(&self.cursor.read(offset as usize));
            self.cursor.read(2);
            self.push(Token::OrderedItem(number));
        } else {
            self.text.push(first);
        }
    }
}
