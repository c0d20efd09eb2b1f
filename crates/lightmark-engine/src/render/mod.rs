//! Serialization of a node tree to nested-tag markup text.
//!
//! Both functions are pure reads of the tree's current state: calling them
//! twice without mutating the tree yields byte-identical strings. Text
//! payloads are emitted verbatim; callers needing safe embedding must
//! escape before constructing text nodes.

use crate::tree::{Node, NodeId, Tree, TreeError};

enum Frame<'t> {
    Visit(NodeId),
    Close(&'t str),
}

/// Renders a node including its own tag, depth-first over the subtree.
///
/// Self-closing elements render as `<tag />` and suppress their children.
/// Walks an explicit work stack, so arbitrarily deep trees cannot exhaust
/// the call stack.
pub fn outer_markup(tree: &Tree, id: NodeId) -> Result<String, TreeError> {
    let mut out = String::new();
    let mut stack = vec![Frame::Visit(id)];

    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Close(name) => {
                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
            Frame::Visit(id) => match tree.get(id)? {
                Node::Text(text) => out.push_str(text.text()),
                Node::Element(element) => {
                    let tag = element.tag();
                    out.push('<');
                    out.push_str(tag.name());

                    if !element.classes().is_empty() {
                        out.push_str(" class=\"");
                        out.push_str(&element.classes().join(" "));
                        out.push('"');
                    }

                    if tag.is_self_closing() {
                        out.push_str(" />");
                        continue;
                    }

                    out.push('>');
                    stack.push(Frame::Close(tag.name()));
                    for &child in element.children().iter().rev() {
                        stack.push(Frame::Visit(child));
                    }
                }
            },
        }
    }

    Ok(out)
}

/// Renders only a node's children, concatenated in order.
///
/// For a text node this is the text itself; for a childless element it is
/// the empty string.
pub fn inner_markup(tree: &Tree, id: NodeId) -> Result<String, TreeError> {
    match tree.get(id)? {
        Node::Text(text) => Ok(text.text().to_owned()),
        Node::Element(element) => {
            let mut out = String::new();
            for &child in element.children() {
                out.push_str(&outer_markup(tree, child)?);
            }
            Ok(out)
        }
    }
}
