//! Token type shared by the tokenizer and the delimiter resolver.
//!
//! Tokens are either runs of literal text or control tokens from a closed
//! set. Every token remembers enough of its source to be written back out
//! verbatim with [`Token::literal`], which is how unmatched or suppressed
//! markup degrades to plain text further down the pipeline.

use std::borrow::Cow;

/// The two characters that can delimit emphasis and strong spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delimiter {
    /// `*` / `**`
    Star,
    /// `_` / `__`
    Underscore,
}

impl Delimiter {
    pub fn as_char(self) -> char {
        match self {
            Delimiter::Star => '*',
            Delimiter::Underscore => '_',
        }
    }

    /// The delimiter whose spans may not nest inside this one's.
    pub fn other(self) -> Self {
        match self {
            Delimiter::Star => Delimiter::Underscore,
            Delimiter::Underscore => Delimiter::Star,
        }
    }
}

/// Marker character of a bulleted list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bullet {
    /// `* `
    Star,
    /// `- `
    Dash,
}

/// Source form of an indentation token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indent {
    /// A literal tab character.
    Tab,
    /// A run of three spaces at the start of a line.
    Spaces,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    /// A run of ordinary characters. Never empty.
    Text(String),
    /// `#` to `######` followed by a space, level 1..=6.
    Heading(u8),
    /// `*` or `_`
    Emphasis(Delimiter),
    /// `**` or `__`
    Strong(Delimiter),
    /// `* ` at the start of a line, or `- ` anywhere.
    ListItem(Bullet),
    /// `<digits>. ` at the start of a line; carries the digits as written.
    OrderedItem(String),
    /// `>` at the start of a line, with or without a following space.
    BlockQuote { spaced: bool },
    /// `---`
    Bar,
    /// A tab, or three spaces of leading indentation.
    Tab(Indent),
    /// `#name`; carries the name without the hash.
    Tag(String),
    /// `[[`
    WikiOpen,
    /// `![[`
    EmbedOpen,
    /// `[`
    LinkOpen,
    /// `]]`
    WikiClose,
    /// `](`
    LinkTargetBreak,
    /// `)`
    RParen,
    /// `|`
    Pipe,
    /// A single backtick.
    CodeSpan,
    /// Three backticks.
    CodeBlock,
    /// `:`
    Colon,
    /// `::`
    DoubleColon,
    /// A line feed.
    Newline,
    /// Terminates every token stream.
    EndOfStream,
}

impl Token {
    /// The exact source text this token was produced from.
    pub fn literal(&self) -> Cow<'_, str> {
        match self {
            Token::Text(text) => Cow::Borrowed(text),
            Token::Heading(level) => Cow::Owned(format!("{} ", "#".repeat(*level as usize))),
            Token::Emphasis(d) => Cow::Owned(d.as_char().to_string()),
            Token::Strong(d) => Cow::Owned(d.as_char().to_string().repeat(2)),
            Token::ListItem(Bullet::Star) => Cow::Borrowed("* "),
            Token::ListItem(Bullet::Dash) => Cow::Borrowed("- "),
            Token::OrderedItem(number) => Cow::Owned(format!("{number}. ")),
            Token::BlockQuote { spaced: true } => Cow::Borrowed("> "),
            Token::BlockQuote { spaced: false } => Cow::Borrowed(">"),
            Token::Bar => Cow::Borrowed("---"),
            Token::Tab(Indent::Tab) => Cow::Borrowed("\t"),
            Token::Tab(Indent::Spaces) => Cow::Borrowed("   "),
            Token::Tag(name) => Cow::Owned(format!("#{name}")),
            Token::WikiOpen => Cow::Borrowed("[["),
            Token::EmbedOpen => Cow::Borrowed("![["),
            Token::LinkOpen => Cow::Borrowed("["),
            Token::WikiClose => Cow::Borrowed("]]"),
            Token::LinkTargetBreak => Cow::Borrowed("]("),
            Token::RParen => Cow::Borrowed(")"),
            Token::Pipe => Cow::Borrowed("|"),
            Token::CodeSpan => Cow::Borrowed("`"),
            Token::CodeBlock => Cow::Borrowed("```"),
            Token::Colon => Cow::Borrowed(":"),
            Token::DoubleColon => Cow::Borrowed("::"),
            Token::Newline => Cow::Borrowed("\n"),
            Token::EndOfStream => Cow::Borrowed(""),
        }
    }

    /// Code span and code block markers suppress all other delimiters.
    pub fn is_code(&self) -> bool {
        matches!(self, Token::CodeSpan | Token::CodeBlock)
    }

    /// Line-prefix markers that a newline terminates.
    pub fn is_block_prefix(&self) -> bool {
        matches!(
            self,
            Token::Heading(_)
                | Token::BlockQuote { .. }
                | Token::ListItem(_)
                | Token::OrderedItem(_)
        )
    }

    pub fn is_emphasis(&self) -> bool {
        matches!(self, Token::Emphasis(_) | Token::Strong(_))
    }
}
