//! Document - High-level document API

use crate::{DomTree, NodeId};

/// Storefront page document
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
}

impl Document {
    /// Create a new document with html/head/body structure
    pub fn new() -> Self {
        let mut tree = DomTree::new();

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        let root = tree.root();
        tree.append_child(root, html);
        tree.append_child(html, head);
        tree.append_child(html, body);

        Self {
            tree,
            html_element: html,
            head_element: head,
            body_element: body,
        }
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Get element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .into_iter()
            .find(|&n| {
                self.tree
                    .element(n)
                    .is_some_and(|e| e.id.as_deref() == Some(id))
            })
    }

    /// All elements with a tag, in document order
    pub fn elements_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.tree.elements_by_tag(self.tree.root(), tag)
    }

    /// All elements with a class token, in document order
    pub fn elements_by_class(&self, class: &str) -> Vec<NodeId> {
        self.tree.elements_by_class(self.tree.root(), class)
    }

    /// First element with a class token
    pub fn first_by_class(&self, class: &str) -> Option<NodeId> {
        self.tree.first_by_class(self.tree.root(), class)
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structure() {
        let doc = Document::new();
        assert!(doc.body().is_valid());
        assert_eq!(doc.tree().get(doc.head()).unwrap().parent, doc.document_element());
    }

    #[test]
    fn test_get_element_by_id() {
        let mut doc = Document::new();
        let div = doc.tree_mut().create_element("div");
        doc.tree_mut().set_attr(div, "id", "hero");
        let body = doc.body();
        doc.tree_mut().append_child(body, div);

        assert_eq!(doc.get_element_by_id("hero"), Some(div));
        assert!(doc.get_element_by_id("missing").is_none());
    }
}
