//! Node kinds of the document tree.

use crate::resolver::Opener;

/// Structural kind of a non-text node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    Root,
    Strong,
    Emphasis,
    Paragraph,
    /// Level 1..=6.
    Heading(u8),
    Tag,
    LineBreak,
    InternalLink,
    EmbedLink,
    ExternalLink,
    Image,
    BlockQuote,
    ListItem,
    UnorderedList,
    OrderedList,
    Code,
    CodeBlock,
    HorizontalBar,
    Frontmatter,
}

impl Element {
    /// Point-in-time markers are created closed; they never hold children.
    pub fn is_initially_closed(self) -> bool {
        matches!(self, Element::Tag | Element::LineBreak | Element::HorizontalBar)
    }

    pub fn is_list(self) -> bool {
        matches!(self, Element::UnorderedList | Element::OrderedList)
    }

    /// Inline elements are wrapped in a paragraph when they would land
    /// directly under the root.
    pub fn is_inline(self) -> bool {
        matches!(
            self,
            Element::Strong
                | Element::Emphasis
                | Element::Tag
                | Element::InternalLink
                | Element::EmbedLink
                | Element::ExternalLink
                | Element::Image
                | Element::Code
        )
    }
}

impl From<Opener> for Element {
    fn from(opener: Opener) -> Self {
        match opener {
            Opener::Emphasis => Element::Emphasis,
            Opener::Strong => Element::Strong,
            Opener::Heading(level) => Element::Heading(level),
            Opener::BlockQuote => Element::BlockQuote,
            Opener::Bullet | Opener::Numbered(_) => Element::ListItem,
            Opener::InternalLink => Element::InternalLink,
            Opener::EmbedLink => Element::EmbedLink,
            Opener::ExternalLink => Element::ExternalLink,
            Opener::Code => Element::Code,
            Opener::CodeBlock => Element::CodeBlock,
        }
    }
}

/// A node is either a run of literal text or an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Text(String),
    Element(Element),
}

impl NodeKind {
    pub fn element(&self) -> Option<Element> {
        match self {
            NodeKind::Element(element) => Some(*element),
            NodeKind::Text(_) => None,
        }
    }

    pub fn is(&self, element: Element) -> bool {
        self.element() == Some(element)
    }
}
