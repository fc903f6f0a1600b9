//! # Delimiter Resolver
//!
//! The second pipeline stage. A single forward pass over the lexer's tokens
//! that decides which markers actually pair up.
//!
//! ## The stack
//!
//! The resolver keeps an explicit stack of indices of openers that have not
//! been matched yet. For each token, in order:
//!
//! 1. `](` with an external-link `[` on top becomes a [`Mark::LinkBreak`]
//!    and the link's target is now pending.
//! 2. If the token closes the opener on top of the stack, the opener is
//!    popped and both positions are rewritten ([`Mark::Open`] /
//!    [`Mark::Close`]). A `)` with no pending target just pops the `[`, which
//!    then stays literal.
//! 3. If the token can open something and the accept rule holds, it is
//!    pushed.
//! 4. A newline discards every non-code opener. With nothing left on the
//!    stack it becomes a [`Mark::LineBreak`]; inside a code block it stays
//!    literal.
//! 5. `|` directly inside a wikilink or embed becomes a
//!    [`Mark::DisplaySeparator`].
//! 6. Tabs, bars and tags outside code keep their meaning. A tag inside a
//!    link stays literal, so `[[Page#Section]]` keeps its whole target.
//!
//! Anything never rewritten stays [`Mark::Literal`]. That is the whole
//! error-recovery story: an unmatched `*` is simply an asterisk.
//!
//! ## Accept rule
//!
//! ```text
//! *a _b_ c*    `_` rejected: `*` of the same kind is open
//! [a [[b]]](u) `[[` rejected: only emphasis may open inside `[...]`
//! `*x*`        `*` rejected: nothing opens inside code
//! ```
//!
//! ## Block prefixes
//!
//! Headings, block quotes and list items are closed by the newline ending
//! their line, provided nothing unmatched sits above them: in `# a *b` the
//! stray `*` keeps the heading marker literal. If the input ends without a
//! newline, close markers are inserted before end of stream for the
//! prefixes on top of the stack.

pub mod resolved;

pub use resolved::{Mark, Opener, Resolved};

use crate::token::Token;

/// Resolve a token stream into classified tokens.
///
/// The output has one entry per input token, in order, plus one
/// [`Mark::Close`] before the final end of stream for each block prefix the
/// input left open.
pub fn resolve(tokens: Vec<Token>) -> Vec<Resolved> {
    let mut marks = vec![Mark::Literal; tokens.len()];
    let mut stack: Vec<usize> = Vec::new();
    let mut target_pending = false;
    let mut pairs = 0usize;

    for (index, token) in tokens.iter().enumerate() {
        if *token == Token::LinkTargetBreak
            && stack.last().is_some_and(|&top| tokens[top] == Token::LinkOpen)
        {
            marks[index] = Mark::LinkBreak;
            target_pending = true;
            continue;
        }

        if let Some(&top) = stack.last()
            && closes(token, &tokens[top])
        {
            stack.pop();
            if *token == Token::RParen {
                if !target_pending {
                    continue;
                }
                target_pending = false;
            }
            if let Some(opener) = opener_for(&tokens[top]) {
                marks[top] = Mark::Open(opener);
                marks[index] = Mark::Close;
                pairs += 1;
            }
            continue;
        }

        if opener_for(token).is_some() && accepts(token, &stack, &tokens) {
            stack.push(index);
            continue;
        }

        match token {
            Token::Newline => {
                stack.retain(|&i| tokens[i].is_code());
                target_pending = false;
                if stack.is_empty() {
                    marks[index] = Mark::LineBreak;
                }
            }
            Token::Pipe if inside_wikilink(&stack, &tokens) => {
                marks[index] = Mark::DisplaySeparator;
            }
            Token::Tag(_) if inside_link(&stack, &tokens) => {}
            Token::Tab(_) | Token::Bar | Token::Tag(_) if !inside_code(&stack, &tokens) => {
                marks[index] = match token {
                    Token::Tab(_) => Mark::Tab,
                    Token::Bar => Mark::Bar,
                    _ => Mark::Tag,
                };
            }
            Token::EndOfStream => marks[index] = Mark::EndOfStream,
            _ => {}
        }
    }

    let mut unterminated = 0;
    for &index in stack.iter().rev() {
        if !tokens[index].is_block_prefix() {
            break;
        }
        if let Some(opener) = opener_for(&tokens[index]) {
            marks[index] = Mark::Open(opener);
            unterminated += 1;
        }
    }

    log::trace!(
        "resolved {} tokens: {} pairs, {} prefixes closed at end of stream",
        tokens.len(),
        pairs,
        unterminated
    );

    let mut resolved: Vec<Resolved> = tokens
        .into_iter()
        .zip(marks)
        .map(|(token, mark)| Resolved::new(mark, token))
        .collect();
    let at = match resolved.last() {
        Some(last) if last.mark == Mark::EndOfStream => resolved.len() - 1,
        _ => resolved.len(),
    };
    resolved.splice(
        at..at,
        (0..unterminated).map(|_| Resolved::new(Mark::Close, Token::EndOfStream)),
    );
    resolved
}

/// The semantic opener a token stands for, if it can open anything at all.
fn opener_for(token: &Token) -> Option<Opener> {
    match token {
        Token::Emphasis(_) => Some(Opener::Emphasis),
        Token::Strong(_) => Some(Opener::Strong),
        Token::Heading(level) => Some(Opener::Heading(*level)),
        Token::BlockQuote { .. } => Some(Opener::BlockQuote),
        Token::ListItem(_) => Some(Opener::Bullet),
        Token::OrderedItem(number) => number.parse().ok().map(Opener::Numbered),
        Token::WikiOpen => Some(Opener::InternalLink),
        Token::EmbedOpen => Some(Opener::EmbedLink),
        Token::LinkOpen => Some(Opener::ExternalLink),
        Token::CodeSpan => Some(Opener::Code),
        Token::CodeBlock => Some(Opener::CodeBlock),
        _ => None,
    }
}

/// Whether `closer` matches `opener`.
fn closes(closer: &Token, opener: &Token) -> bool {
    match (opener, closer) {
        (Token::Emphasis(a), Token::Emphasis(b)) | (Token::Strong(a), Token::Strong(b)) => a == b,
        (Token::WikiOpen | Token::EmbedOpen, Token::WikiClose) => true,
        (Token::LinkOpen, Token::RParen) => true,
        (Token::CodeSpan, Token::CodeSpan) | (Token::CodeBlock, Token::CodeBlock) => true,
        (opener, Token::Newline) => opener.is_block_prefix(),
        _ => false,
    }
}

fn accepts(token: &Token, stack: &[usize], tokens: &[Token]) -> bool {
    let mut open = stack.iter().map(|&i| &tokens[i]);
    let conflicting = match token {
        Token::Emphasis(d) => Some(Token::Emphasis(d.other())),
        Token::Strong(d) => Some(Token::Strong(d.other())),
        _ => None,
    };
    if let Some(conflicting) = conflicting
        && open.clone().any(|t| *t == conflicting)
    {
        return false;
    }
    if !token.is_emphasis() && open.clone().any(|t| *t == Token::LinkOpen) {
        return false;
    }
    open.next_back().is_none_or(|top| !top.is_code())
}

fn inside_code(stack: &[usize], tokens: &[Token]) -> bool {
    stack.last().is_some_and(|&top| tokens[top].is_code())
}

/// Whether a wikilink or embed is the innermost open opener.
fn inside_wikilink(stack: &[usize], tokens: &[Token]) -> bool {
    stack
        .last()
        .is_some_and(|&top| matches!(tokens[top], Token::WikiOpen | Token::EmbedOpen))
}

/// Whether any link of either kind is still open.
fn inside_link(stack: &[usize], tokens: &[Token]) -> bool {
    stack
        .iter()
        .any(|&i| matches!(tokens[i], Token::WikiOpen | Token::EmbedOpen | Token::LinkOpen))
}
