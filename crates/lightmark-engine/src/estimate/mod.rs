//! Illustrative structural size metric over a node tree.
//!
//! The constants are part of the behavioral contract and are not a real
//! memory-layout calculation.

use crate::tree::{Node, NodeId, Tree, TreeError};

const ELEMENT_BASE: u64 = 100;
const TEXT_BASE: u64 = 20;
const BYTE_WEIGHT: u64 = 2;

/// Estimated structural cost of a node and its whole subtree.
///
/// Text: `20 + 2 * len(text)`. Element: `100 + 2 * sum(class lengths)` plus
/// the estimates of all children. Pure; iterates with an explicit stack.
pub fn estimated_size(tree: &Tree, id: NodeId) -> Result<u64, TreeError> {
    let mut total = 0u64;
    let mut stack = vec![id];

    while let Some(next) = stack.pop() {
        match tree.get(next)? {
            Node::Text(text) => {
                total += TEXT_BASE + BYTE_WEIGHT * text.text().len() as u64;
            }
            Node::Element(element) => {
                total += ELEMENT_BASE;
                for class in element.classes() {
                    total += BYTE_WEIGHT * class.len() as u64;
                }
                stack.extend(element.children());
            }
        }
    }

    Ok(total)
}
