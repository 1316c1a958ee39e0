use crate::error::Result;
use crate::uidl::{UidlElement, UidlNode};

/// Mutable walk over a component's UI tree, used to find and rewrite islands.
///
/// The walk is depth-first and pre-order, in document order. An override that
/// wants to keep descending calls the matching `walk_*` function; returning
/// without it prunes that subtree. The first error ends the walk.
pub trait UidlVisitor {
    fn visit_node(&mut self, node: &mut UidlNode) -> Result<()> {
        walk_node(self, node)
    }

    fn visit_element(&mut self, element: &mut UidlElement) -> Result<()> {
        walk_element(self, element)
    }

    fn visit_children(&mut self, children: &mut Vec<UidlNode>) -> Result<()> {
        walk_children(self, children)
    }
}

pub fn walk_children<V: UidlVisitor + ?Sized>(
    visitor: &mut V,
    children: &mut Vec<UidlNode>,
) -> Result<()> {
    for node in children {
        visitor.visit_node(node)?;
    }
    Ok(())
}

pub fn walk_node<V: UidlVisitor + ?Sized>(visitor: &mut V, node: &mut UidlNode) -> Result<()> {
    match node {
        UidlNode::Element(el) => visitor.visit_element(el),
        UidlNode::Conditional(c) => visitor.visit_node(&mut c.node),
        UidlNode::Repeat(r) => visitor.visit_node(&mut r.node),
        UidlNode::Slot(s) => match s.fallback.as_deref_mut() {
            Some(fallback) => visitor.visit_node(fallback),
            None => Ok(()),
        },
        // Leaves; kinds owned by other stages are not entered
        UidlNode::Inject(_)
        | UidlNode::Static(_)
        | UidlNode::Dynamic(_)
        | UidlNode::Raw(_)
        | UidlNode::Other(_) => Ok(()),
    }
}

pub fn walk_element<V: UidlVisitor + ?Sized>(
    visitor: &mut V,
    element: &mut UidlElement,
) -> Result<()> {
    match element.children.as_mut() {
        Some(children) => visitor.visit_children(children),
        None => Ok(()),
    }
}
