//! Parsed VDF tree.
//!
//! Nodes live in a single arena owned by [`Tree`]. Links between nodes are
//! plain indices: `parent` and `next_sibling` never own anything, so dropping
//! a tree is one flat deallocation no matter how wide or deep it is.
//!
//! Children form a singly linked list whose head is the most recently parsed
//! child. Iterating a section therefore yields its children in reverse
//! document order, and [`NodeRef::get`] finds the *last* occurrence of a
//! duplicated key.
//!
//! Keys and values are kept exactly as decoded from the input. Nothing
//! requires them to be UTF-8, so lookups compare bytes and the text
//! accessors come in strict and lossy flavours.

use std::borrow::Cow;
use std::fmt;

/// Handle to a node inside a [`Tree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena, in creation order.
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Node {
    key: Option<Box<[u8]>>,
    value: Option<Box<[u8]>>,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    next_sibling: Option<NodeId>,
}

/// A parsed document: a synthetic root plus every statement under it.
///
/// Two trees compare equal when they were built from the same sequence of
/// statements, regardless of whitespace and comments in the source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// The root node of every tree.
    pub const ROOT: NodeId = NodeId(0);

    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![Node {
                key: None,
                value: None,
                parent: None,
                first_child: None,
                next_sibling: None,
            }],
        }
    }

    /// Prepend a key/value pair to `scope`'s children.
    pub(crate) fn add_leaf(&mut self, scope: NodeId, key: Vec<u8>, value: Vec<u8>) -> NodeId {
        self.attach(scope, key, Some(value))
    }

    /// Prepend an empty section to `scope`'s children.
    pub(crate) fn add_section(&mut self, scope: NodeId, key: Vec<u8>) -> NodeId {
        self.attach(scope, key, None)
    }

    fn attach(&mut self, scope: NodeId, key: Vec<u8>, value: Option<Vec<u8>>) -> NodeId {
        let id = NodeId(self.nodes.len());
        let next_sibling = self.nodes[scope.0].first_child;
        self.nodes.push(Node {
            key: Some(key.into_boxed_slice()),
            value: value.map(Vec::into_boxed_slice),
            parent: Some(scope),
            first_child: None,
            next_sibling,
        });
        self.nodes[scope.0].first_child = Some(id);
        id
    }

    /// Parent of `id`, or `None` for the root.
    pub(crate) fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    /// The synthetic root: no key, no value, no parent.
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            tree: self,
            id: Self::ROOT,
        }
    }

    /// Resolve a handle, or `None` if it does not belong to this tree.
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        (id.0 < self.nodes.len()).then_some(NodeRef { tree: self, id })
    }

    /// First child of `node` (in storage order) whose key bytes equal `key`.
    pub fn child_of(&self, node: NodeId, key: impl AsRef<[u8]>) -> Option<NodeRef<'_>> {
        self.get(node)?.get(key)
    }

    /// Follow `path` one key at a time from `node`.
    ///
    /// An empty path resolves to `node` itself.
    pub fn lookup_path<I, S>(&self, node: NodeId, path: I) -> Option<NodeRef<'_>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        self.get(node)?.get_path(path)
    }

    /// Number of nodes, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the document contained no statements.
    pub fn is_empty(&self) -> bool {
        self.nodes[Self::ROOT.0].first_child.is_none()
    }

    /// Depth-first pre-order walk from the root, yielding `(depth, node)`.
    pub fn walk(&self) -> Walk<'_> {
        self.root().walk()
    }
}

/// Borrowed view of one node.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a Tree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    fn node(&self) -> &'a Node {
        &self.tree.nodes[self.id.0]
    }

    fn at(&self, id: NodeId) -> NodeRef<'a> {
        NodeRef {
            tree: self.tree,
            id,
        }
    }

    /// Handle of this node.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Raw key; `None` only for the root.
    pub fn key_bytes(&self) -> Option<&'a [u8]> {
        self.node().key.as_deref()
    }

    /// Raw value; `Some` only for leaves.
    pub fn value_bytes(&self) -> Option<&'a [u8]> {
        self.node().value.as_deref()
    }

    /// Key as text, or `None` for the root and for keys that are not UTF-8.
    pub fn key(&self) -> Option<&'a str> {
        self.key_bytes().and_then(|k| std::str::from_utf8(k).ok())
    }

    /// Value as text, or `None` for sections and for values that are not
    /// UTF-8.
    pub fn value(&self) -> Option<&'a str> {
        self.value_bytes().and_then(|v| std::str::from_utf8(v).ok())
    }

    /// Key as text with invalid sequences replaced by U+FFFD.
    pub fn key_lossy(&self) -> Option<Cow<'a, str>> {
        self.key_bytes().map(String::from_utf8_lossy)
    }

    /// Value as text with invalid sequences replaced by U+FFFD.
    pub fn value_lossy(&self) -> Option<Cow<'a, str>> {
        self.value_bytes().map(String::from_utf8_lossy)
    }

    pub fn is_root(&self) -> bool {
        self.node().parent.is_none()
    }

    /// A `"key" "value"` statement.
    pub fn is_leaf(&self) -> bool {
        self.node().value.is_some()
    }

    /// A `"name" { ... }` statement.
    pub fn is_section(&self) -> bool {
        !self.is_root() && !self.is_leaf()
    }

    /// Enclosing section, or `None` for the root.
    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.node().parent.map(|id| self.at(id))
    }

    /// Direct children, most recently parsed first.
    pub fn children(&self) -> Children<'a> {
        Children {
            tree: self.tree,
            next: self.node().first_child,
        }
    }

    /// First child whose key bytes equal `name`.
    pub fn get(&self, name: impl AsRef<[u8]>) -> Option<NodeRef<'a>> {
        let name = name.as_ref();
        self.children().find(|child| child.key_bytes() == Some(name))
    }

    /// Resolve a multi-level path; stops at the first missing segment.
    pub fn get_path<I, S>(&self, path: I) -> Option<NodeRef<'a>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        path.into_iter().try_fold(*self, |node, name| node.get(name))
    }

    /// Number of sections between this node and the root.
    pub fn depth(&self) -> usize {
        std::iter::successors(self.parent(), |p| p.parent()).count()
    }

    /// Depth-first pre-order walk of this node and everything beneath it.
    ///
    /// Depths are relative to this node, which is yielded first at depth 0.
    pub fn walk(&self) -> Walk<'a> {
        Walk {
            tree: self.tree,
            next: Some((self.id, 0)),
        }
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id.0)
            .field("key", &self.key_lossy())
            .field("value", &self.value_lossy())
            .finish()
    }
}

/// Iterator over a node's direct children in storage order.
pub struct Children<'a> {
    tree: &'a Tree,
    next: Option<NodeId>,
}

impl<'a> Iterator for Children<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.tree.nodes[id.0].next_sibling;
        Some(NodeRef {
            tree: self.tree,
            id,
        })
    }
}

/// Pre-order traversal that follows sibling and parent links instead of
/// keeping a stack.
pub struct Walk<'a> {
    tree: &'a Tree,
    next: Option<(NodeId, usize)>,
}

impl Walk<'_> {
    fn successor(&self, id: NodeId, depth: usize) -> Option<(NodeId, usize)> {
        let nodes = &self.tree.nodes;
        if let Some(child) = nodes[id.0].first_child {
            return Some((child, depth + 1));
        }
        let (mut cur, mut depth) = (id, depth);
        while depth > 0 {
            if let Some(sibling) = nodes[cur.0].next_sibling {
                return Some((sibling, depth));
            }
            cur = nodes[cur.0].parent?;
            depth -= 1;
        }
        None
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, NodeRef<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, depth) = self.next?;
        self.next = self.successor(id, depth);
        Some((
            depth,
            NodeRef {
                tree: self.tree,
                id,
            },
        ))
    }
}
