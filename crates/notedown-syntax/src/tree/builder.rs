//! # Tree Builder
//!
//! Consumes the resolved token stream and grows a [`Tree`] one token at a
//! time.
//!
//! Every node is either open or closed, and only ever goes from open to
//! closed. A token is routed to the *deepest open node*: starting at the
//! root, keep moving to the last child while it is open. The walk is a loop
//! over the arena, not recursion, so deep documents cannot exhaust the call
//! stack.
//!
//! A few tokens are handled before that walk:
//!
//! - front matter: a bar at the very start of the document opens a
//!   `Frontmatter` node that swallows every token as raw text until the next
//!   bar.
//! - indentation: tabs before any content on a line only bump a counter.
//!   A tab after content is kept as text.
//! - list items: the counter picks the list nesting level (see
//!   [`TreeBuilder::push_list_item`]).
//! - headings, block quotes and bars close everything that is open and
//!   attach directly to the root.
//!
//! Text and inline elements that would land directly under the root are
//! wrapped in a fresh `Paragraph` first.

use super::{Element, NodeId, NodeKind, Tree};
use crate::error::TreeError;
use crate::options::ParseOptions;
use crate::resolver::{Mark, Opener, Resolved};
use crate::token::Token;

/// Build a tree from a complete resolved stream.
pub fn build(stream: Vec<Resolved>, options: &ParseOptions) -> Result<Tree, TreeError> {
    let mut builder = TreeBuilder::new(options);
    for (index, item) in stream.into_iter().enumerate() {
        builder.push(index, item)?;
    }
    Ok(builder.finish())
}

/// Incremental tree construction from resolved tokens.
pub struct TreeBuilder<'a> {
    tree: Tree,
    options: &'a ParseOptions,
    /// Leading indentation seen on the current line.
    tab_count: usize,
    /// Whether anything but indentation has been seen on the current line.
    line_has_content: bool,
}

/// Something to attach at the deepest open node.
enum Content {
    Text(String),
    Element(Element, Option<String>),
}

impl Content {
    fn is_inline(&self) -> bool {
        match self {
            Content::Text(_) => true,
            Content::Element(element, _) => element.is_inline(),
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, Content::Text(text) if text.trim().is_empty())
    }
}

impl<'a> TreeBuilder<'a> {
    pub fn new(options: &'a ParseOptions) -> Self {
        Self {
            tree: Tree::new(),
            options,
            tab_count: 0,
            line_has_content: false,
        }
    }

    /// Feed one resolved token; `index` is its position in the stream.
    pub fn push(&mut self, index: usize, item: Resolved) -> Result<(), TreeError> {
        if self.tree.node(NodeId::ROOT).closed {
            return Ok(());
        }
        let leading_tab = item.mark == Mark::Tab && !self.line_has_content;
        if item.token == Token::Newline {
            self.tab_count = 0;
            self.line_has_content = false;
        } else if !leading_tab {
            self.line_has_content = true;
        }
        if item.mark == Mark::EndOfStream {
            self.finish_document();
            return Ok(());
        }

        if let Some(frontmatter) = self.open_frontmatter() {
            if item.mark == Mark::Bar {
                self.tree.close(frontmatter);
            } else {
                self.append_text(frontmatter, &item.text());
            }
            return Ok(());
        }

        match item.mark {
            Mark::Bar if self.tree.node(NodeId::ROOT).children.is_empty() => {
                self.tree.append(NodeId::ROOT, NodeKind::Element(Element::Frontmatter));
            }
            Mark::Bar => {
                self.close_open_chain(NodeId::ROOT);
                self.tree.append(NodeId::ROOT, NodeKind::Element(Element::HorizontalBar));
            }
            Mark::Tab if leading_tab => self.tab_count += 1,
            Mark::Open(opener) if opener.is_list_item() => self.push_list_item(opener),
            Mark::Open(opener @ (Opener::Heading(_) | Opener::BlockQuote)) => {
                self.close_open_chain(NodeId::ROOT);
                self.tree.append(NodeId::ROOT, NodeKind::Element(opener.into()));
            }
            _ => return self.dispatch(index, item),
        }
        Ok(())
    }

    /// Close whatever is still open and hand over the tree.
    pub fn finish(mut self) -> Tree {
        if !self.tree.node(NodeId::ROOT).closed {
            self.finish_document();
        }
        self.tree
    }

    fn dispatch(&mut self, index: usize, item: Resolved) -> Result<(), TreeError> {
        let node = self.deepest_open();
        match item.mark {
            Mark::Close => {
                if node == NodeId::ROOT {
                    return Err(TreeError::UnbalancedClose { index });
                }
                self.tree.close(node);
                self.finish_link(node);
            }
            Mark::LineBreak => self.line_break(node),
            Mark::DisplaySeparator => {
                let data = self.tree.node(node);
                if matches!(data.element(), Some(Element::InternalLink | Element::EmbedLink))
                    && !data.has_separator
                {
                    let target = self.tree.text_of(node);
                    let data = self.tree.node_mut(node);
                    data.link_target = Some(target);
                    data.children.clear();
                    data.has_separator = true;
                } else {
                    self.add(Content::Text("|".to_string()));
                }
            }
            Mark::LinkBreak => {
                if self.tree.node(node).kind.is(Element::ExternalLink) {
                    let data = self.tree.node_mut(node);
                    data.target_break = Some(data.children.len());
                } else {
                    self.add(Content::Text(item.text().into_owned()));
                }
            }
            Mark::Tag => {
                let name = match item.token {
                    Token::Tag(name) => name,
                    other => other.literal().into_owned(),
                };
                self.add(Content::Element(Element::Tag, Some(name)));
            }
            Mark::Open(opener) => self.add(Content::Element(opener.into(), None)),
            Mark::Literal | Mark::Tab | Mark::Bar | Mark::EndOfStream => {
                let text = item.text();
                if !text.is_empty() {
                    self.add(Content::Text(text.into_owned()));
                }
            }
        }
        Ok(())
    }

    /// Attach `content` at the deepest open node, wrapping it in a paragraph
    /// or breaking out of a list where needed.
    fn add(&mut self, content: Content) {
        let mut node = self.deepest_open();
        if self.is_list(node) {
            if content.is_blank() {
                return;
            }
            self.close_open_chain(NodeId::ROOT);
            node = NodeId::ROOT;
        }
        if node == NodeId::ROOT {
            if content.is_blank() {
                return;
            }
            self.trim_line_breaks(NodeId::ROOT);
            if content.is_inline() {
                node = self.tree.append(NodeId::ROOT, NodeKind::Element(Element::Paragraph));
            }
        }
        match content {
            Content::Text(text) => self.append_text(node, &text),
            Content::Element(element, target) => {
                let id = self.tree.append(node, NodeKind::Element(element));
                self.tree.node_mut(id).link_target = target;
            }
        }
    }

    /// Append text, merging with a preceding text leaf unless an external
    /// link's target starts here.
    fn append_text(&mut self, node: NodeId, text: &str) {
        if text.is_empty() {
            return;
        }
        let data = self.tree.node(node);
        let merge_into = data
            .children
            .last()
            .copied()
            .filter(|_| data.target_break != Some(data.children.len()));
        if let Some(last) = merge_into
            && let NodeKind::Text(existing) = &mut self.tree.node_mut(last).kind
        {
            existing.push_str(text);
            return;
        }
        self.tree.append(node, NodeKind::Text(text.to_string()));
    }

    fn line_break(&mut self, node: NodeId) {
        if self.is_list(node) {
            self.close_open_chain(NodeId::ROOT);
            return;
        }
        let last = self.tree.last_child(node);
        if !last.is_some_and(|last| self.tree.node(last).kind.is(Element::LineBreak)) {
            self.tree.append(node, NodeKind::Element(Element::LineBreak));
            return;
        }

        // blank line: drop the pending break and end the paragraph
        self.tree.node_mut(node).children.pop();
        let mut current = Some(node);
        while let Some(id) = current {
            match self.tree.node(id).element() {
                Some(Element::Paragraph) => {
                    self.close_open_chain(id);
                    self.tree.close(id);
                    return;
                }
                Some(element) if element.is_list() => {
                    self.close_open_chain(NodeId::ROOT);
                    return;
                }
                _ => current = self.tree.node(id).parent,
            }
        }
    }

    /// Post-process a link, embed or external link that just closed.
    fn finish_link(&mut self, id: NodeId) {
        match self.tree.node(id).element() {
            Some(Element::ExternalLink) => {
                let Some(at) = self.tree.node(id).target_break else {
                    return;
                };
                let url: Vec<NodeId> = self.tree.node(id).children[at..].to_vec();
                let target: String = url
                    .into_iter()
                    .map(|child| self.tree.text_of(child))
                    .collect();
                let data = self.tree.node_mut(id);
                data.children.truncate(at);
                data.link_target = Some(target);
            }
            Some(element @ (Element::InternalLink | Element::EmbedLink)) => {
                let data = self.tree.node(id);
                if data.link_target.is_none() && !data.children.is_empty() {
                    let target = self.tree.text_of(id);
                    self.tree.node_mut(id).link_target = Some(target);
                }
                let is_image = element == Element::EmbedLink
                    && self
                        .tree
                        .node(id)
                        .link_target
                        .as_deref()
                        .is_some_and(|target| self.options.is_image(target));
                if is_image {
                    let hint = self.tree.text_of(id);
                    let data = self.tree.node_mut(id);
                    data.kind = NodeKind::Element(Element::Image);
                    if data.has_separator {
                        (data.image_width, data.image_height) = dimensions(&hint);
                    }
                    data.children.clear();
                }
            }
            _ => {}
        }
    }

    /// Find or create the list an item belongs in and append the item.
    ///
    /// The tab counter is the nesting level. Level 0 is a list directly
    /// under the root; each further level is a list inside the last item of
    /// the level above. Missing levels are created on the way down. Levels
    /// beyond [`ParseOptions::max_list_depth`] are clamped to it.
    fn push_list_item(&mut self, opener: Opener) {
        let (kind, start) = match opener {
            Opener::Numbered(number) => (Element::OrderedList, number),
            _ => (Element::UnorderedList, 1),
        };
        let mut depth = std::mem::take(&mut self.tab_count);
        if depth > self.options.max_list_depth {
            log::debug!(
                "list indentation {} exceeds max depth {}, clamping",
                depth,
                self.options.max_list_depth
            );
            depth = self.options.max_list_depth;
        }

        let mut list = match self.tree.last_child(NodeId::ROOT) {
            Some(last) if self.is_open_list(last, (depth == 0).then_some(kind)) => last,
            _ => {
                self.close_open_chain(NodeId::ROOT);
                self.new_list(NodeId::ROOT, kind, 0, start)
            }
        };

        for level in 1..=depth {
            let host = match self.tree.last_child(list) {
                Some(item) if self.tree.node(item).kind.is(Element::ListItem) => item,
                _ => list,
            };
            list = match self.tree.last_child(host) {
                Some(last)
                    if self.is_open_list(last, (level == depth).then_some(kind))
                        && self.tree.node(last).list_indent == level =>
                {
                    last
                }
                _ => {
                    self.close_open_chain(host);
                    self.new_list(host, kind, level, start)
                }
            };
        }

        self.close_open_chain(list);
        self.tree.append(list, NodeKind::Element(Element::ListItem));
    }

    fn new_list(&mut self, parent: NodeId, kind: Element, indent: usize, start: u64) -> NodeId {
        let id = self.tree.append(parent, NodeKind::Element(kind));
        let data = self.tree.node_mut(id);
        data.list_indent = indent;
        if kind == Element::OrderedList {
            data.start_number = start;
        }
        id
    }

    fn finish_document(&mut self) {
        self.close_open_chain(NodeId::ROOT);
        self.tree.close(NodeId::ROOT);
    }

    /// The open child `id` delegates to, if any.
    ///
    /// A list item closes at the end of its line, but a list nested inside
    /// it stays open for the items that follow; a list whose last item is
    /// closed therefore delegates to that item's open nested list.
    fn open_child(&self, id: NodeId) -> Option<NodeId> {
        let last = self.tree.last_child(id)?;
        let data = self.tree.node(last);
        if !data.closed {
            return Some(last);
        }
        if self.is_list(id) && data.kind.is(Element::ListItem) {
            return data
                .children
                .last()
                .copied()
                .filter(|&nested| self.is_open_list(nested, None));
        }
        None
    }

    fn deepest_open(&self) -> NodeId {
        let mut id = NodeId::ROOT;
        while let Some(child) = self.open_child(id) {
            id = child;
        }
        id
    }

    /// Close every open node below `from`, innermost first, dropping
    /// trailing line breaks on the way. `from` itself stays open.
    fn close_open_chain(&mut self, from: NodeId) {
        let mut chain = Vec::new();
        let mut id = from;
        while let Some(child) = self.open_child(id) {
            chain.push(child);
            id = child;
        }
        for id in chain.into_iter().rev() {
            self.trim_line_breaks(id);
            self.tree.close(id);
        }
        self.trim_line_breaks(from);
    }

    fn trim_line_breaks(&mut self, id: NodeId) {
        while let Some(last) = self.tree.last_child(id)
            && self.tree.node(last).kind.is(Element::LineBreak)
        {
            self.tree.node_mut(id).children.pop();
        }
    }

    fn open_frontmatter(&self) -> Option<NodeId> {
        match self.tree.node(NodeId::ROOT).children.as_slice() {
            [only] => {
                let data = self.tree.node(*only);
                (data.kind.is(Element::Frontmatter) && !data.closed).then_some(*only)
            }
            _ => None,
        }
    }

    fn is_list(&self, id: NodeId) -> bool {
        self.tree.node(id).element().is_some_and(Element::is_list)
    }

    /// An open list node, of the given kind if one is required.
    fn is_open_list(&self, id: NodeId, kind: Option<Element>) -> bool {
        let data = self.tree.node(id);
        !data.closed
            && match kind {
                Some(kind) => data.kind.is(kind),
                None => self.is_list(id),
            }
    }
}

/// Parse a `WIDTHxHEIGHT` hint. Either half may be empty; if either is not
/// all digits the whole hint is ignored.
fn dimensions(hint: &str) -> (Option<String>, Option<String>) {
    let (width, height) = hint.split_once('x').unwrap_or((hint, ""));
    let digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if !digits(width) || !digits(height) {
        return (None, None);
    }
    let present = |s: &str| (!s.is_empty()).then(|| s.to_string());
    (present(width), present(height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use crate::resolver::resolve;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn tree(input: &str) -> Tree {
        build(resolve(lex(input)), &ParseOptions::default()).unwrap()
    }

    #[rstest]
    #[case("200x100", Some("200"), Some("100"))]
    #[case("200x", Some("200"), None)]
    #[case("x100", None, Some("100"))]
    #[case("300", Some("300"), None)]
    #[case("200xabc", None, None)]
    #[case("wide", None, None)]
    #[case("", None, None)]
    fn dimension_hints(
        #[case] hint: &str,
        #[case] width: Option<&str>,
        #[case] height: Option<&str>,
    ) {
        let (w, h) = dimensions(hint);
        assert_eq!(w.as_deref(), width);
        assert_eq!(h.as_deref(), height);
    }

    #[test]
    fn close_at_root_is_an_error() {
        let stream = vec![
            Resolved::new(Mark::Close, Token::WikiClose),
            Resolved::new(Mark::EndOfStream, Token::EndOfStream),
        ];
        let err = build(stream, &ParseOptions::default()).unwrap_err();
        assert_eq!(err, TreeError::UnbalancedClose { index: 0 });
    }

    #[test]
    fn every_node_closed_after_build() {
        let tree = tree("# a\n- b\n\t- c\n> d\n[[e|f]] *g* `h`\n---\n");
        let mut stack = vec![tree.root()];
        while let Some(node) = stack.pop() {
            assert!(node.is_closed(), "{node:?} left open");
            stack.extend(node.children());
        }
    }

    #[test]
    fn stream_without_end_marker_still_finishes() {
        let stream = vec![Resolved::literal(Token::Text("loose".into()))];
        let tree = build(stream, &ParseOptions::default()).unwrap();
        assert!(tree.root().is_closed());
        assert_eq!(tree.root().text(), "loose");
    }

    #[test]
    fn tokens_after_end_of_stream_are_ignored() {
        let stream = vec![
            Resolved::new(Mark::EndOfStream, Token::EndOfStream),
            Resolved::literal(Token::Text("late".into())),
        ];
        let tree = build(stream, &ParseOptions::default()).unwrap();
        assert_eq!(tree.root().child_count(), 0);
    }

    #[test]
    fn external_link_splits_target() {
        let tree = tree("[site](https://example.org/a/b)");
        insta::assert_snapshot!(tree.dump(), @r#"
        Root
          Paragraph
            ExternalLink target="https://example.org/a/b"
              "site"
        "#);
    }

    #[test]
    fn external_link_keeps_fragment() {
        let tree = tree("[docs](https://x.org/a#frag)");
        insta::assert_snapshot!(tree.dump(), @r#"
        Root
          Paragraph
            ExternalLink target="https://x.org/a#frag"
              "docs"
        "#);
    }

    #[test]
    fn wikilink_keeps_section_anchor() {
        let tree = tree("[[Page#Section]]");
        insta::assert_snapshot!(tree.dump(), @r#"
        Root
          Paragraph
            InternalLink target="Page#Section"
              "Page#Section"
        "#);
    }

    // the `_` is still open when `)` arrives, so nothing pairs
    #[test]
    fn unmatched_emphasis_in_url_leaves_link_literal() {
        let tree = tree("[site](https://example.org/a_b)");
        insta::assert_snapshot!(tree.dump(), @r#"
        Root
          Paragraph
            "[site](https://example.org/a_b)"
        "#);
    }

    #[test]
    fn unmatched_emphasis_leaves_heading_marker_literal() {
        let tree = tree("# a *b\nc");
        insta::assert_snapshot!(tree.dump(), @r##"
        Root
          Paragraph
            "# a *b"
            LineBreak
            "c"
        "##);
    }

    #[test]
    fn bar_mid_line_splits_paragraph() {
        let tree = tree("a---b");
        insta::assert_snapshot!(tree.dump(), @r#"
        Root
          Paragraph
            "a"
          HorizontalBar
          Paragraph
            "b"
        "#);
    }

    #[test]
    fn list_marker_mid_line_starts_list() {
        let tree = tree("a - b\n");
        insta::assert_snapshot!(tree.dump(), @r#"
        Root
          Paragraph
            "a "
          UnorderedList indent=0
            ListItem
              "b"
        "#);
    }

    #[test]
    fn tab_after_content_is_text() {
        let tree = tree("a\tb\n\t- c\n");
        insta::assert_snapshot!(tree.dump(), @r#"
        Root
          Paragraph
            "a\tb"
          UnorderedList indent=0
            UnorderedList indent=1
              ListItem
                "c"
        "#);
    }

    #[test]
    fn embed_without_image_extension_stays_embed() {
        let tree = tree("![[notes.pdf]]");
        insta::assert_snapshot!(tree.dump(), @r#"
        Root
          Paragraph
            EmbedLink target="notes.pdf"
              "notes.pdf"
        "#);
    }

    #[test]
    fn image_extension_is_case_insensitive() {
        let tree = tree("![[Photo.JPG]]");
        insta::assert_snapshot!(tree.dump(), @r#"
        Root
          Paragraph
            Image target="Photo.JPG"
        "#);
    }

    #[test]
    fn wikilink_alias() {
        let tree = tree("[[Some Page|shown]]");
        insta::assert_snapshot!(tree.dump(), @r#"
        Root
          Paragraph
            InternalLink target="Some Page"
              "shown"
        "#);
    }

    #[test]
    fn second_separator_is_text() {
        let tree = tree("[[a|b|c]]");
        insta::assert_snapshot!(tree.dump(), @r#"
        Root
          Paragraph
            InternalLink target="a"
              "b|c"
        "#);
    }

    #[test]
    fn line_break_inside_paragraph() {
        let tree = tree("one\ntwo");
        insta::assert_snapshot!(tree.dump(), @r#"
        Root
          Paragraph
            "one"
            LineBreak
            "two"
        "#);
    }

    #[test]
    fn blank_line_separates_paragraphs() {
        let tree = tree("one\n\ntwo");
        insta::assert_snapshot!(tree.dump(), @r#"
        Root
          Paragraph
            "one"
          Paragraph
            "two"
        "#);
    }

    #[test]
    fn text_after_list_leaves_the_list() {
        let tree = tree("- a\nafter");
        insta::assert_snapshot!(tree.dump(), @r#"
        Root
          UnorderedList indent=0
            ListItem
              "a"
          Paragraph
            "after"
        "#);
    }

    #[test]
    fn list_kind_change_starts_new_list() {
        let tree = tree("- a\n1. b\n");
        insta::assert_snapshot!(tree.dump(), @r#"
        Root
          UnorderedList indent=0
            ListItem
              "a"
          OrderedList indent=0 start=1
            ListItem
              "b"
        "#);
    }

    #[test]
    fn ordered_list_keeps_first_number() {
        let tree = tree("3. a\n4. b\n");
        insta::assert_snapshot!(tree.dump(), @r#"
        Root
          OrderedList indent=0 start=3
            ListItem
              "a"
            ListItem
              "b"
        "#);
    }

    #[test]
    fn deep_indentation_is_clamped() {
        let options = ParseOptions {
            max_list_depth: 1,
            ..ParseOptions::default()
        };
        let tree = build(resolve(lex("- a\n\t\t\t- b\n\t- c\n")), &options).unwrap();
        insta::assert_snapshot!(tree.dump(), @r#"
        Root
          UnorderedList indent=0
            ListItem
              "a"
              UnorderedList indent=1
                ListItem
                  "b"
                ListItem
                  "c"
        "#);
    }

    #[test]
    fn indented_first_item_creates_missing_levels() {
        let tree = tree("\t\t- deep\n");
        insta::assert_snapshot!(tree.dump(), @r#"
        Root
          UnorderedList indent=0
            UnorderedList indent=1
              UnorderedList indent=2
                ListItem
                  "deep"
        "#);
    }

    #[test]
    fn heading_closes_open_paragraph() {
        let tree = tree("text\n## Next\n");
        insta::assert_snapshot!(tree.dump(), @r#"
        Root
          Paragraph
            "text"
          Heading(2)
            "Next"
        "#);
    }

    #[test]
    fn horizontal_bar_after_content() {
        let tree = tree("a\n---\nb");
        insta::assert_snapshot!(tree.dump(), @r#"
        Root
          Paragraph
            "a"
          HorizontalBar
          Paragraph
            "b"
        "#);
    }

    #[test]
    fn tag_node_carries_name() {
        let tree = tree("#idea");
        insta::assert_snapshot!(tree.dump(), @r#"
        Root
          Paragraph
            Tag target="idea"
        "#);
    }

    #[test]
    fn code_block_keeps_source() {
        let tree = tree("```\nlet *x* = 1;\n```");
        insta::assert_snapshot!(tree.dump(), @r#"
        Root
          CodeBlock
            "\nlet *x* = 1;\n"
        "#);
    }

    #[test]
    fn block_quote_holds_inline_content() {
        let tree = tree("> quoted *bit*\n");
        insta::assert_snapshot!(tree.dump(), @r#"
        Root
          BlockQuote
            "quoted "
            Emphasis
              "bit"
        "#);
    }
}
