use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::tags::TagDescriptor;

/// Handle to a node inside a [`Tree`].
///
/// Ids are only meaningful for the tree that issued them and become stale
/// once the node is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("node {0} does not exist in this tree")]
    UnknownNode(NodeId),
    #[error("node {0} is a text node and cannot hold children")]
    NotAnElement(NodeId),
    #[error("node {0} already has a parent; detach it first")]
    AlreadyAttached(NodeId),
    #[error("attaching {child} under {parent} would make it its own ancestor")]
    WouldCycle { parent: NodeId, child: NodeId },
}

/// A text leaf. Owns its payload, never has children.
#[derive(Debug)]
pub struct TextNode {
    text: String,
    parent: Option<NodeId>,
}

impl TextNode {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// A tagged element: shared tag metadata, ordered CSS classes, ordered children.
///
/// The class list keeps insertion order and permits duplicates. The child
/// list is the owning side of the tree; `parent` is navigation only.
#[derive(Debug)]
pub struct ElementNode {
    tag: Arc<TagDescriptor>,
    classes: Vec<String>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl ElementNode {
    pub fn tag(&self) -> &Arc<TagDescriptor> {
        &self.tag
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// A document node: either a text leaf or a tagged element.
#[derive(Debug)]
pub enum Node {
    Text(TextNode),
    Element(ElementNode),
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        match self {
            Node::Text(text) => text.parent,
            Node::Element(element) => element.parent,
        }
    }

    pub fn as_text(&self) -> Option<&TextNode> {
        match self {
            Node::Text(text) => Some(text),
            Node::Element(_) => None,
        }
    }

    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    fn set_parent(&mut self, parent: Option<NodeId>) {
        match self {
            Node::Text(text) => text.parent = parent,
            Node::Element(element) => element.parent = parent,
        }
    }
}

/// Arena that owns every node of one document tree.
///
/// Nodes are created detached and wired up with [`Tree::attach`]. Ownership
/// of children is exclusive and tree-shaped: a node has at most one parent,
/// and removing a node takes its whole subtree with it.
#[derive(Debug, Default)]
pub struct Tree {
    slots: Vec<Option<Node>>,
    live: usize,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes in the arena.
    pub fn node_count(&self) -> usize {
        self.live
    }

    /// Creates a detached text leaf and returns its handle.
    pub fn add_text(&mut self, text: impl Into<String>) -> NodeId {
        self.insert(Node::Text(TextNode {
            text: text.into(),
            parent: None,
        }))
    }

    /// Creates a detached element with an empty class list and no children.
    pub fn add_element(&mut self, tag: Arc<TagDescriptor>) -> NodeId {
        self.insert(Node::Element(ElementNode {
            tag,
            classes: Vec::new(),
            children: Vec::new(),
            parent: None,
        }))
    }

    pub fn get(&self, id: NodeId) -> Result<&Node, TreeError> {
        self.slots
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or(TreeError::UnknownNode(id))
    }

    /// Appends a CSS class to an element. Duplicates are kept, order matters.
    pub fn push_class(&mut self, id: NodeId, class: impl Into<String>) -> Result<(), TreeError> {
        match self.get_mut(id)? {
            Node::Element(element) => {
                element.classes.push(class.into());
                Ok(())
            }
            Node::Text(_) => Err(TreeError::NotAnElement(id)),
        }
    }

    /// Makes `child` the last child of `parent`.
    ///
    /// The child must be currently detached; re-parenting requires an
    /// explicit [`Tree::detach`] first. Attaches that would make a node its
    /// own ancestor are rejected, which keeps every traversal finite.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        if self.get(child)?.parent().is_some() {
            return Err(TreeError::AlreadyAttached(child));
        }

        let mut cursor = Some(parent);
        while let Some(ancestor) = cursor {
            if ancestor == child {
                return Err(TreeError::WouldCycle { parent, child });
            }
            cursor = self.get(ancestor)?.parent();
        }

        match self.get_mut(parent)? {
            Node::Element(element) => element.children.push(child),
            Node::Text(_) => return Err(TreeError::NotAnElement(parent)),
        }
        self.get_mut(child)?.set_parent(Some(parent));
        Ok(())
    }

    /// Unlinks `child` from its parent, clearing the back-reference.
    ///
    /// Detaching an already-detached node is a no-op.
    pub fn detach(&mut self, child: NodeId) -> Result<(), TreeError> {
        let Some(parent) = self.get(child)?.parent() else {
            return Ok(());
        };

        if let Node::Element(element) = self.get_mut(parent)? {
            element.children.retain(|&c| c != child);
        }
        self.get_mut(child)?.set_parent(None);
        Ok(())
    }

    /// Removes a node and its entire subtree from the arena.
    pub fn remove(&mut self, id: NodeId) -> Result<(), TreeError> {
        self.detach(id)?;

        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.slots[next.0].take() {
                self.live -= 1;
                if let Node::Element(element) = node {
                    stack.extend(element.children);
                }
            }
        }
        Ok(())
    }

    /// Direct child count of an element, O(1).
    pub fn child_count(&self, id: NodeId) -> Result<usize, TreeError> {
        match self.get(id)? {
            Node::Element(element) => Ok(element.children.len()),
            Node::Text(_) => Err(TreeError::NotAnElement(id)),
        }
    }

    fn insert(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.slots.len());
        self.slots.push(Some(node));
        self.live += 1;
        id
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut Node, TreeError> {
        self.slots
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(TreeError::UnknownNode(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::{ClosureKind, DisplayKind, TagRegistry};

    fn div(tags: &TagRegistry) -> Arc<TagDescriptor> {
        tags.get("div", DisplayKind::Block, ClosureKind::Normal)
            .unwrap()
    }

    #[test]
    fn attach_sets_parent_and_appends_once() {
        let tags = TagRegistry::new();
        let mut tree = Tree::new();
        let parent = tree.add_element(div(&tags));
        let child = tree.add_text("hello");

        let before = tree.child_count(parent).unwrap();
        tree.attach(parent, child).unwrap();

        assert_eq!(tree.get(child).unwrap().parent(), Some(parent));
        assert_eq!(tree.child_count(parent).unwrap(), before + 1);
        let element = tree.get(parent).unwrap().as_element().unwrap();
        assert_eq!(element.children(), &[child]);
    }

    #[test]
    fn attach_keeps_sibling_order() {
        let tags = TagRegistry::new();
        let mut tree = Tree::new();
        let parent = tree.add_element(div(&tags));
        let first = tree.add_text("a");
        let second = tree.add_text("b");

        tree.attach(parent, first).unwrap();
        tree.attach(parent, second).unwrap();

        let element = tree.get(parent).unwrap().as_element().unwrap();
        assert_eq!(element.children(), &[first, second]);
    }

    #[test]
    fn reattach_without_detach_is_rejected() {
        let tags = TagRegistry::new();
        let mut tree = Tree::new();
        let old_parent = tree.add_element(div(&tags));
        let new_parent = tree.add_element(div(&tags));
        let child = tree.add_text("wanderer");

        tree.attach(old_parent, child).unwrap();
        let result = tree.attach(new_parent, child);

        assert_eq!(result.unwrap_err(), TreeError::AlreadyAttached(child));
        // Still exactly where it was.
        assert_eq!(tree.get(child).unwrap().parent(), Some(old_parent));
        assert_eq!(tree.child_count(new_parent).unwrap(), 0);
    }

    #[test]
    fn detach_then_attach_moves_the_node() {
        let tags = TagRegistry::new();
        let mut tree = Tree::new();
        let old_parent = tree.add_element(div(&tags));
        let new_parent = tree.add_element(div(&tags));
        let child = tree.add_text("wanderer");

        tree.attach(old_parent, child).unwrap();
        tree.detach(child).unwrap();
        tree.attach(new_parent, child).unwrap();

        assert_eq!(tree.child_count(old_parent).unwrap(), 0);
        assert_eq!(tree.get(child).unwrap().parent(), Some(new_parent));
    }

    #[test]
    fn attach_to_text_node_is_rejected() {
        let tags = TagRegistry::new();
        let mut tree = Tree::new();
        let leaf = tree.add_text("leaf");
        let child = tree.add_text("child");

        assert_eq!(
            tree.attach(leaf, child).unwrap_err(),
            TreeError::NotAnElement(leaf)
        );
    }

    #[test]
    fn attach_to_self_or_descendant_is_rejected() {
        let tags = TagRegistry::new();
        let mut tree = Tree::new();
        let outer = tree.add_element(div(&tags));
        let inner = tree.add_element(div(&tags));
        tree.attach(outer, inner).unwrap();

        assert_eq!(
            tree.attach(outer, outer).unwrap_err(),
            TreeError::WouldCycle {
                parent: outer,
                child: outer
            }
        );
        assert_eq!(
            tree.attach(inner, outer).unwrap_err(),
            TreeError::WouldCycle {
                parent: inner,
                child: outer
            }
        );
    }

    #[test]
    fn remove_vacates_the_subtree() {
        let tags = TagRegistry::new();
        let mut tree = Tree::new();
        let root = tree.add_element(div(&tags));
        let middle = tree.add_element(div(&tags));
        let leaf = tree.add_text("gone");
        tree.attach(root, middle).unwrap();
        tree.attach(middle, leaf).unwrap();

        tree.remove(middle).unwrap();

        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.child_count(root).unwrap(), 0);
        assert_eq!(tree.get(middle).unwrap_err(), TreeError::UnknownNode(middle));
        assert_eq!(tree.get(leaf).unwrap_err(), TreeError::UnknownNode(leaf));
    }

    #[test]
    fn stale_ids_are_reported_not_ignored() {
        let tags = TagRegistry::new();
        let mut tree = Tree::new();
        let root = tree.add_element(div(&tags));
        let ghost = tree.add_text("ghost");
        tree.remove(ghost).unwrap();

        assert_eq!(
            tree.attach(root, ghost).unwrap_err(),
            TreeError::UnknownNode(ghost)
        );
        assert_eq!(
            tree.push_class(ghost, "x").unwrap_err(),
            TreeError::UnknownNode(ghost)
        );
    }

    #[test]
    fn classes_keep_order_and_duplicates() {
        let tags = TagRegistry::new();
        let mut tree = Tree::new();
        let element = tree.add_element(div(&tags));

        tree.push_class(element, "a").unwrap();
        tree.push_class(element, "b").unwrap();
        tree.push_class(element, "a").unwrap();

        let classes = tree.get(element).unwrap().as_element().unwrap().classes();
        assert_eq!(classes, &["a", "b", "a"]);
    }

    #[test]
    fn child_count_on_text_node_is_an_error() {
        let mut tree = Tree::new();
        let leaf = tree.add_text("leaf");

        assert_eq!(
            tree.child_count(leaf).unwrap_err(),
            TreeError::NotAnElement(leaf)
        );
    }
}
