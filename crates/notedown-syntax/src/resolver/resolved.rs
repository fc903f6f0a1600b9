//! # Resolved Tokens
//!
//! The resolver's output is the token stream again, one entry per input
//! token, with each token classified by a [`Mark`]. The tree builder only
//! looks at marks; the original [`Token`] rides along so anything classified
//! as [`Mark::Literal`] can be written back out exactly as it was typed.
//!
//! ```text
//! Open(Emphasis)  ← `*`
//! Literal         ← `a`
//! Close           ← `*`
//! Literal         ← ` *b`   (unmatched opener degrades)
//! EndOfStream
//! ```

use std::borrow::Cow;

use crate::token::Token;

/// What a matched opener starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opener {
    Emphasis,
    Strong,
    /// Heading level 1..=6.
    Heading(u8),
    BlockQuote,
    /// Unordered list item.
    Bullet,
    /// Ordered list item with its parsed number.
    Numbered(u64),
    InternalLink,
    EmbedLink,
    ExternalLink,
    Code,
    CodeBlock,
}

impl Opener {
    pub fn is_list_item(self) -> bool {
        matches!(self, Opener::Bullet | Opener::Numbered(_))
    }
}

/// Classification the resolver gives each token position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    /// Plain text, including any markup that failed to match.
    Literal,
    /// Matched opener.
    Open(Opener),
    /// Matched closer; closes whatever is innermost-open in the tree.
    Close,
    /// `](` inside an external link: the URL follows.
    LinkBreak,
    /// `|` inside a wikilink or embed.
    DisplaySeparator,
    /// A newline outside any code span or block.
    LineBreak,
    /// Indentation outside code.
    Tab,
    /// Horizontal bar outside code.
    Bar,
    /// `#name` outside code.
    Tag,
    EndOfStream,
}

/// A token together with its resolved classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub mark: Mark,
    pub token: Token,
}

impl Resolved {
    pub fn new(mark: Mark, token: Token) -> Self {
        Self { mark, token }
    }

    pub fn literal(token: Token) -> Self {
        Self::new(Mark::Literal, token)
    }

    /// Source text of the underlying token.
    pub fn text(&self) -> Cow<'_, str> {
        self.token.literal()
    }
}
