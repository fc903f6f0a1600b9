//! # Document Tree
//!
//! The final pipeline stage's output. Nodes live in an arena owned by the
//! [`Tree`]; a node refers to its children and parent by [`NodeId`], so
//! there are no reference cycles and no recursive ownership.
//!
//! Renderers walk the tree through [`NodeRef`], a read-only handle:
//!
//! ```
//! use notedown_syntax::parse;
//! use notedown_syntax::tree::{Element, NodeKind};
//!
//! let tree = parse("# Title").unwrap();
//! let heading = tree.root().children().next().unwrap();
//! assert_eq!(heading.kind(), &NodeKind::Element(Element::Heading(1)));
//! assert_eq!(heading.text(), "Title");
//! ```
//!
//! Nodes discarded while building (captured link text, a doubled line
//! break) stay in the arena but are no longer reachable from the root.

mod builder;
mod element;

pub use builder::{TreeBuilder, build};
pub use element::{Element, NodeKind};

use std::fmt;
use std::fmt::Write as _;

/// Index of a node in its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) kind: NodeKind,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) closed: bool,
    pub(crate) link_target: Option<String>,
    pub(crate) list_indent: usize,
    pub(crate) start_number: u64,
    pub(crate) image_width: Option<String>,
    pub(crate) image_height: Option<String>,
    /// Child count when an external link saw `](`; later children are the URL.
    pub(crate) target_break: Option<usize>,
    /// A wikilink or embed has seen its `|`.
    pub(crate) has_separator: bool,
}

impl NodeData {
    fn new(kind: NodeKind, parent: Option<NodeId>) -> Self {
        let closed = match &kind {
            NodeKind::Text(_) => true,
            NodeKind::Element(element) => element.is_initially_closed(),
        };
        Self {
            kind,
            children: Vec::new(),
            parent,
            closed,
            link_target: None,
            list_indent: 0,
            start_number: 1,
            image_width: None,
            image_height: None,
            target_break: None,
            has_separator: false,
        }
    }

    pub(crate) fn element(&self) -> Option<Element> {
        self.kind.element()
    }
}

/// A parsed document.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<NodeData>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// An empty document: a single open root.
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData::new(NodeKind::Element(Element::Root), None)],
        }
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            tree: self,
            id: NodeId::ROOT,
        }
    }

    /// The node `id`, if it is still part of the document.
    ///
    /// Nodes detached during building (link text captured into a target,
    /// dropped line breaks, split-off front matter) are not returned.
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        let mut current = id;
        while current != NodeId::ROOT {
            let parent = self.nodes.get(current.0)?.parent?;
            if !self.nodes[parent.0].children.contains(&current) {
                return None;
            }
            current = parent;
        }
        Some(NodeRef { tree: self, id })
    }

    /// The front matter block, if the document starts with one.
    pub fn frontmatter(&self) -> Option<NodeRef<'_>> {
        self.root()
            .children()
            .next()
            .filter(|node| node.kind().is(Element::Frontmatter))
    }

    /// Detach the front matter block from the document and return its raw
    /// text, without the newline that follows the opening bar.
    pub fn split_frontmatter(&mut self) -> Option<String> {
        let id = self.frontmatter()?.id();
        self.nodes[NodeId::ROOT.0].children.remove(0);
        self.nodes[id.0].parent = None;
        let raw = self.text_of(id);
        Some(raw.strip_prefix('\n').unwrap_or(&raw).to_string())
    }

    /// Indented outline of the tree, one node per line.
    pub fn dump(&self) -> String {
        let mut lines = Vec::new();
        let mut stack = vec![(NodeId::ROOT, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            let node = &self.nodes[id.0];
            let mut line = "  ".repeat(depth);
            match &node.kind {
                NodeKind::Text(text) => {
                    let _ = write!(line, "{text:?}");
                }
                NodeKind::Element(element) => {
                    let _ = write!(line, "{element:?}");
                    if element.is_list() {
                        let _ = write!(line, " indent={}", node.list_indent);
                    }
                    if *element == Element::OrderedList {
                        let _ = write!(line, " start={}", node.start_number);
                    }
                    if let Some(target) = &node.link_target {
                        let _ = write!(line, " target={target:?}");
                    }
                    if node.image_width.is_some() || node.image_height.is_some() {
                        let _ = write!(
                            line,
                            " size={}x{}",
                            node.image_width.as_deref().unwrap_or(""),
                            node.image_height.as_deref().unwrap_or("")
                        );
                    }
                    if !node.closed {
                        line.push_str(" (open)");
                    }
                }
            }
            lines.push(line);
            stack.extend(node.children.iter().rev().map(|&child| (child, depth + 1)));
        }
        lines.join("\n")
    }

    pub(crate) fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.0]
    }

    pub(crate) fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData::new(kind, Some(parent)));
        self.nodes[parent.0].children.push(id);
        id
    }

    pub(crate) fn close(&mut self, id: NodeId) {
        self.nodes[id.0].closed = true;
    }

    pub(crate) fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].children.last().copied()
    }

    /// Concatenated text of every leaf under `id`, in document order.
    pub(crate) fn text_of(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.0];
            if let NodeKind::Text(text) = &node.kind {
                out.push_str(text);
            }
            stack.extend(node.children.iter().rev());
        }
        out
    }
}

/// Read-only handle to a node of a [`Tree`].
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a Tree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub fn id(self) -> NodeId {
        self.id
    }

    pub fn kind(self) -> &'a NodeKind {
        &self.data().kind
    }

    pub fn element(self) -> Option<Element> {
        self.data().element()
    }

    /// The literal text of a text leaf.
    pub fn as_text(self) -> Option<&'a str> {
        match &self.data().kind {
            NodeKind::Text(text) => Some(text),
            NodeKind::Element(_) => None,
        }
    }

    pub fn children(self) -> impl DoubleEndedIterator<Item = NodeRef<'a>> + 'a {
        let tree = self.tree;
        self.data()
            .children
            .iter()
            .map(move |&id| NodeRef { tree, id })
    }

    pub fn child_count(self) -> usize {
        self.data().children.len()
    }

    pub fn parent(self) -> Option<NodeRef<'a>> {
        self.data().parent.map(|id| NodeRef {
            tree: self.tree,
            id,
        })
    }

    pub fn is_closed(self) -> bool {
        self.data().closed
    }

    pub fn link_target(self) -> Option<&'a str> {
        self.data().link_target.as_deref()
    }

    /// Nesting depth of a list node, 0 for a top-level list.
    pub fn list_indent(self) -> usize {
        self.data().list_indent
    }

    /// First number of an ordered list.
    pub fn start_number(self) -> u64 {
        self.data().start_number
    }

    pub fn image_width(self) -> Option<&'a str> {
        self.data().image_width.as_deref()
    }

    pub fn image_height(self) -> Option<&'a str> {
        self.data().image_height.as_deref()
    }

    /// All text under this node, concatenated.
    pub fn text(self) -> String {
        self.tree.text_of(self.id)
    }

    fn data(self) -> &'a NodeData {
        self.tree.node(self.id)
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("kind", self.kind())
            .finish()
    }
}
