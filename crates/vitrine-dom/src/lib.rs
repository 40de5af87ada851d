//! vitrine DOM - Document Object Model
//!
//! Arena-based DOM tree for the storefront page. The tree holds the page
//! structure the behavior pipelines read and mutate: class tokens, data
//! attributes, inline style entries, and element bounds.

mod document;
mod geometry;
mod node;
mod tree;

pub use document::Document;
pub use geometry::DomRect;
pub use node::{Attribute, ElementData, Node, NodeData, TextData};
pub use tree::DomTree;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check that this id refers to a node
    #[inline]
    pub fn is_valid(&self) -> bool {
        *self != Self::NONE
    }

    /// Raw index value
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}
