//! The parse-tree node arena.
//!
//! Nodes live in a flat `Vec` and reference each other through [`NodeId`]
//! indices: parent, previous/next sibling, first/last child. The arena never
//! frees nodes; detached nodes simply become unreachable. Attach operations
//! require the child to be detached and detach operations require it to be
//! attached; a violation is a programmer error and panics.

/// Index of a node in its [`Tree`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(u32);

/// The tagged content of a node, covering both block and inline variants.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Content {
    Document,
    BlockQuote,
    Paragraph { raw: Vec<u8> },
    AtxHeading { level: u8, raw: Vec<u8> },
    SetextHeading { level: u8, raw: Vec<u8> },
    IndentedCodeBlock { literal: Vec<u8> },
    ThematicBreak,
    Text { bytes: Vec<u8> },
    CodeSpan { bytes: Vec<u8> },
    Emph,
    Strong,
    HtmlSpan { raw: Vec<u8> },
    Link { destination: Vec<u8> },
    HardBreak,
    SoftBreak,
}

impl Content {
    /// Whether blocks of this kind may hold child blocks.
    pub fn is_container(&self) -> bool {
        matches!(self, Content::Document | Content::BlockQuote)
    }

    /// Whether blocks of this kind accept appended lines during block parsing.
    pub fn accepts_lines(&self) -> bool {
        matches!(
            self,
            Content::Paragraph { .. } | Content::IndentedCodeBlock { .. }
        )
    }

    /// Whether appended lines are literal, i.e. never scanned for new blocks.
    pub fn accepts_literal_lines(&self) -> bool {
        matches!(self, Content::IndentedCodeBlock { .. })
    }

    /// Containment predicate used when opening a new block: containers admit
    /// any block, leaves admit nothing.
    pub fn can_contain(&self, _child: &Content) -> bool {
        self.is_container()
    }
}

#[derive(Debug)]
struct Node {
    parent: Option<NodeId>,
    prev: Option<NodeId>,
    next: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    content: Content,
}

/// An arena of linked nodes.
#[derive(Debug)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Allocates a new detached node and returns its id.
    pub fn alloc(&mut self, content: Content) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).expect("node arena overflow"));
        self.nodes.push(Node {
            parent: None,
            prev: None,
            next: None,
            first_child: None,
            last_child: None,
            content,
        });
        id
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }

    pub fn content(&self, id: NodeId) -> &Content {
        &self.node(id).content
    }

    pub fn content_mut(&mut self, id: NodeId) -> &mut Content {
        &mut self.node_mut(id).content
    }

    pub fn set_content(&mut self, id: NodeId, content: Content) {
        self.node_mut(id).content = content;
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn prev(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).prev
    }

    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).next
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).first_child
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).last_child
    }

    /// Iterates over the children of `id` in order.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            cursor: self.first_child(id),
        }
    }

    /// Appends `child` as the last child of `parent`. `child` must be detached.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.assert_detached(child);
        let old_last = self.node(parent).last_child;
        {
            let node = self.node_mut(child);
            node.parent = Some(parent);
            node.prev = old_last;
            node.next = None;
        }
        if let Some(last) = old_last {
            self.node_mut(last).next = Some(child);
        } else {
            self.node_mut(parent).first_child = Some(child);
        }
        self.node_mut(parent).last_child = Some(child);
    }

    /// Prepends `child` as the first child of `parent`. `child` must be
    /// detached.
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) {
        self.assert_detached(child);
        let old_first = self.node(parent).first_child;
        {
            let node = self.node_mut(child);
            node.parent = Some(parent);
            node.prev = None;
            node.next = old_first;
        }
        if let Some(first) = old_first {
            self.node_mut(first).prev = Some(child);
        } else {
            self.node_mut(parent).last_child = Some(child);
        }
        self.node_mut(parent).first_child = Some(child);
    }

    /// Inserts `sibling` immediately before `node`. `node` must be attached
    /// and `sibling` detached.
    pub fn insert_before(&mut self, node: NodeId, sibling: NodeId) {
        let parent = self.assert_attached(node);
        self.assert_detached(sibling);
        let prev = self.node(node).prev;
        match prev {
            Some(prev) => self.node_mut(prev).next = Some(sibling),
            None => self.node_mut(parent).first_child = Some(sibling),
        }
        {
            let s = self.node_mut(sibling);
            s.parent = Some(parent);
            s.prev = prev;
            s.next = Some(node);
        }
        self.node_mut(node).prev = Some(sibling);
    }

    /// Inserts `sibling` immediately after `node`. `node` must be attached
    /// and `sibling` detached.
    pub fn insert_after(&mut self, node: NodeId, sibling: NodeId) {
        let parent = self.assert_attached(node);
        self.assert_detached(sibling);
        let next = self.node(node).next;
        match next {
            Some(next) => self.node_mut(next).prev = Some(sibling),
            None => self.node_mut(parent).last_child = Some(sibling),
        }
        {
            let s = self.node_mut(sibling);
            s.parent = Some(parent);
            s.prev = Some(node);
            s.next = next;
        }
        self.node_mut(node).next = Some(sibling);
    }

    /// Detaches `id` from its parent, clearing all sibling links. Children
    /// are kept. `id` must be attached.
    pub fn remove(&mut self, id: NodeId) {
        let parent = self.assert_attached(id);
        let (prev, next) = {
            let node = self.node(id);
            (node.prev, node.next)
        };
        match prev {
            Some(prev) => self.node_mut(prev).next = next,
            None => self.node_mut(parent).first_child = next,
        }
        match next {
            Some(next) => self.node_mut(next).prev = prev,
            None => self.node_mut(parent).last_child = prev,
        }
        let node = self.node_mut(id);
        node.parent = None;
        node.prev = None;
        node.next = None;
    }

    /// Substitutes `replacement` for `id` in the tree, detaching `id`.
    /// `id` must be attached and `replacement` detached. Children stay with
    /// their original nodes.
    pub fn replace(&mut self, id: NodeId, replacement: NodeId) {
        self.insert_after(id, replacement);
        self.remove(id);
    }

    fn assert_attached(&self, id: NodeId) -> NodeId {
        self.node(id)
            .parent
            .expect("tree operation requires an attached node")
    }

    fn assert_detached(&self, id: NodeId) {
        assert!(
            self.node(id).parent.is_none(),
            "tree operation requires a detached node"
        );
    }
}

pub struct Children<'a> {
    tree: &'a Tree,
    cursor: Option<NodeId>,
}

impl<'a> Iterator for Children<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.cursor?;
        self.cursor = self.tree.next(id);
        Some(id)
    }
}
