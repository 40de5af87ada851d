//! DOM Tree (arena-based allocation)
//!
//! Nodes are never freed; detaching only unlinks from the sibling chain.
//! The working set is one page's markup, so the arena stays small.

use crate::{DomRect, Node, NodeId};

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree holding only the document root
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
        }
    }

    /// Document root id
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if !id.is_valid() {
            return None;
        }
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if !id.is_valid() {
            return None;
        }
        self.nodes.get_mut(id.index())
    }

    /// Element data for a node, if it is an element
    pub fn element(&self, id: NodeId) -> Option<&crate::ElementData> {
        self.get(id).and_then(|n| n.as_element())
    }

    /// Mutable element data for a node
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut crate::ElementData> {
        self.get_mut(id).and_then(|n| n.as_element_mut())
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element node
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Node::element(tag))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content.to_string()))
    }

    /// Append a child as the last child of a parent
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert_ne!(parent, child);

        let prev_last = match self.get(parent) {
            Some(p) => p.last_child,
            None => return,
        };

        if let Some(c) = self.get_mut(child) {
            c.parent = parent;
            c.prev_sibling = prev_last;
            c.next_sibling = NodeId::NONE;
        }

        if prev_last.is_valid() {
            if let Some(prev) = self.get_mut(prev_last) {
                prev.next_sibling = child;
            }
        }

        if let Some(p) = self.get_mut(parent) {
            if !p.first_child.is_valid() {
                p.first_child = child;
            }
            p.last_child = child;
        }
    }

    /// Unlink a node from its parent. The node stays in the arena.
    pub fn detach(&mut self, id: NodeId) {
        let (parent, prev, next) = match self.get(id) {
            Some(n) => (n.parent, n.prev_sibling, n.next_sibling),
            None => return,
        };

        if prev.is_valid() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = next;
            }
        }
        if next.is_valid() {
            if let Some(n) = self.get_mut(next) {
                n.prev_sibling = prev;
            }
        }
        if parent.is_valid() {
            if let Some(p) = self.get_mut(parent) {
                if p.first_child == id {
                    p.first_child = next;
                }
                if p.last_child == id {
                    p.last_child = prev;
                }
            }
        }

        if let Some(n) = self.get_mut(id) {
            n.parent = NodeId::NONE;
            n.prev_sibling = NodeId::NONE;
            n.next_sibling = NodeId::NONE;
        }
    }

    /// Detach every child of a node
    pub fn clear_children(&mut self, id: NodeId) {
        while let Some(child) = self.get(id).map(|n| n.first_child) {
            if !child.is_valid() {
                break;
            }
            self.detach(child);
        }
    }

    /// Iterate direct children in order
    pub fn children(&self, id: NodeId) -> ChildIter<'_> {
        let first = self.get(id).map(|n| n.first_child).unwrap_or(NodeId::NONE);
        ChildIter { tree: self, next: first }
    }

    /// Collect descendant node ids in document (pre-order) order
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_descendants(id, &mut out);
        out
    }

    fn collect_descendants(&self, id: NodeId, out: &mut Vec<NodeId>) {
        for (child, _) in self.children(id) {
            out.push(child);
            self.collect_descendants(child, out);
        }
    }

    /// Descendant elements with a given tag, in document order
    pub fn elements_by_tag(&self, root: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|&id| self.element(id).is_some_and(|e| e.tag == tag))
            .collect()
    }

    /// Descendant elements carrying a class token, in document order
    pub fn elements_by_class(&self, root: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|&id| self.element(id).is_some_and(|e| e.has_class(class)))
            .collect()
    }

    /// First descendant element with a class token
    pub fn first_by_class(&self, root: NodeId, class: &str) -> Option<NodeId> {
        self.elements_by_class(root, class).into_iter().next()
    }

    /// Nearest ancestor (including self) carrying a class token
    pub fn closest_with_class(&self, id: NodeId, class: &str) -> Option<NodeId> {
        let mut current = id;
        while current.is_valid() {
            if self.element(current).is_some_and(|e| e.has_class(class)) {
                return Some(current);
            }
            current = self.get(current)?.parent;
        }
        None
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(text) = self.get(id).and_then(|n| n.as_text()) {
            out.push_str(text);
        }
        for child in self.descendants(id) {
            if let Some(text) = self.get(child).and_then(|n| n.as_text()) {
                out.push_str(text);
            }
        }
        out
    }

    /// Bounds of an element (zero rect for non-elements)
    pub fn bounds(&self, id: NodeId) -> DomRect {
        self.element(id).map(|e| e.bounds).unwrap_or_default()
    }

    /// Set element bounds in page coordinates
    pub fn set_bounds(&mut self, id: NodeId, bounds: DomRect) {
        if let Some(e) = self.element_mut(id) {
            e.bounds = bounds;
        }
    }

    /// Class-token convenience: check
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|e| e.has_class(class))
    }

    /// Class-token convenience: add
    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if let Some(e) = self.element_mut(id) {
            e.add_class(class);
        }
    }

    /// Class-token convenience: remove
    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        if let Some(e) = self.element_mut(id) {
            e.remove_class(class);
        }
    }

    /// Attribute convenience: get (owned to avoid borrow coupling)
    pub fn get_attr(&self, id: NodeId, name: &str) -> Option<String> {
        self.element(id)
            .and_then(|e| e.get_attr(name))
            .map(|v| v.to_string())
    }

    /// Attribute convenience: set
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(e) = self.element_mut(id) {
            e.set_attr(name, value);
        }
    }

    /// Attribute convenience: remove
    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let Some(e) = self.element_mut(id) {
            e.remove_attr(name);
        }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over a node's direct children
pub struct ChildIter<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for ChildIter<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.next.is_valid() {
            return None;
        }
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}
