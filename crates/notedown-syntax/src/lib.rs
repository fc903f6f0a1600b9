//! # notedown-syntax
//!
//! Parsing core for a personal Markdown dialect: headings, emphasis, block
//! quotes, nested lists, wikilinks, embeds and images, tags, code, front
//! matter and horizontal rules. Text goes in, a document tree comes out;
//! rendering that tree is somebody else's job.
//!
//! ## Architecture Overview
//!
//! The pipeline has three stages, each consuming the complete output of the
//! previous one:
//!
//! ```text
//! Source Text → Lexer → Tokens → Resolver → Resolved → Builder → Tree
//!               (Cursor)         (opener stack)        (open/closed nodes)
//! ```
//!
//! ### 1. Lexer ([`lexer`] module)
//!
//! A character scanner driven by a [`cursor::Cursor`] with look-ahead and
//! look-behind. It emits literal text runs and control tokens but never
//! decides whether markup is well formed.
//!
//! ```text
//! "# Hi *there*" → [Heading(1), Text("Hi "), Emphasis, Text("there"), Emphasis, EndOfStream]
//! ```
//!
//! ### 2. Resolver ([`resolver`] module)
//!
//! One pass with a stack of unmatched openers. Matched pairs become
//! open/close marks; everything else stays literal. Code spans and blocks
//! suppress all other markup.
//!
//! ### 3. Builder ([`tree`] module)
//!
//! Grows a node tree where each node is open or closed. Tokens go to the
//! deepest open node. Loose inline content is wrapped in paragraphs and
//! list items are placed by their indentation.
//!
//! ## Quick Start
//!
//! ```
//! use notedown_syntax::{Element, parse};
//!
//! let tree = parse("# Hello\n\nSome *text*.\n").unwrap();
//! let kinds: Vec<_> = tree.root().children().map(|n| n.element()).collect();
//! assert_eq!(kinds, vec![Some(Element::Heading(1)), Some(Element::Paragraph)]);
//! ```
//!
//! ## Malformed input
//!
//! Parsing notes never fails because of what is written in them: an unclosed
//! `*`, a stray `]]` or a bad image size simply stays as literal text. The
//! only errors are undecodable bytes ([`parse_bytes`]) and structural faults
//! in a hand-built stream passed to [`build`].

pub mod cursor;
pub mod error;
pub mod lexer;
pub mod options;
pub mod resolver;
pub mod token;
pub mod tree;

pub use error::{ParseError, TreeError};
pub use lexer::lex;
pub use options::ParseOptions;
pub use resolver::{Mark, Opener, Resolved, resolve};
pub use token::Token;
pub use tree::{Element, NodeId, NodeKind, NodeRef, Tree, build};

/// Parse a note with default options.
pub fn parse(input: &str) -> Result<Tree, ParseError> {
    parse_with(input, &ParseOptions::default())
}

/// Parse a note.
pub fn parse_with(input: &str, options: &ParseOptions) -> Result<Tree, ParseError> {
    let tokens = lex(input);
    let resolved = resolve(tokens);
    let tree = build(resolved, options)?;
    log::debug!("parsed {} bytes", input.len());
    Ok(tree)
}

/// Parse raw bytes, which must be UTF-8.
pub fn parse_bytes(input: &[u8]) -> Result<Tree, ParseError> {
    let text = std::str::from_utf8(input)?;
    parse(text)
}
