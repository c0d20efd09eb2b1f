use thiserror::Error;

use crate::tags::{ClosureKind, DisplayKind, TagError, registry};
use crate::tree::{NodeId, Tree, TreeError};

/// Trimmed lines shorter than this read as subheadings rather than prose.
pub const SHORT_LINE_LIMIT: usize = 20;

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error(transparent)]
    Tag(#[from] TagError),
    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// What a single raw line reads as, judged purely on local facts.
///
/// Rules are evaluated in this order, first match wins: the document's
/// first line is always the title; a line starting with a space is a
/// quotation; a short line is a subheading; everything else is prose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Title,
    Quote,
    Subheading,
    Paragraph,
}

impl LineKind {
    /// Classifies one raw (untrimmed) line. `is_first` is whether no line
    /// has been placed in the document yet.
    pub fn of(raw: &str, is_first: bool) -> Self {
        if is_first {
            LineKind::Title
        } else if raw.starts_with(' ') {
            LineKind::Quote
        } else if raw.trim().chars().count() < SHORT_LINE_LIMIT {
            LineKind::Subheading
        } else {
            LineKind::Paragraph
        }
    }

    pub fn tag_name(self) -> &'static str {
        match self {
            LineKind::Title => "h1",
            LineKind::Quote => "blockquote",
            LineKind::Subheading => "h2",
            LineKind::Paragraph => "p",
        }
    }
}

/// A classified document: the arena and the `div.book` root element.
#[derive(Debug)]
pub struct ClassifiedDoc {
    pub tree: Tree,
    pub root: NodeId,
}

/// Builds a tagged tree from raw text lines in a single forward pass.
///
/// Every input line becomes exactly one element child of the root, holding
/// the trimmed line text as its sole text child. Lines are never dropped,
/// split, or merged.
pub fn classify_lines<I, S>(lines: I) -> Result<ClassifiedDoc, ClassifyError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let tags = registry();
    let mut tree = Tree::new();

    let root = tree.add_element(tags.get("div", DisplayKind::Block, ClosureKind::Normal)?);
    tree.push_class(root, "book")?;

    for line in lines {
        let raw = line.as_ref();
        let kind = LineKind::of(raw, tree.child_count(root)? == 0);

        let element =
            tree.add_element(tags.get(kind.tag_name(), DisplayKind::Block, ClosureKind::Normal)?);
        let text = tree.add_text(raw.trim());
        tree.attach(element, text)?;
        tree.attach(root, element)?;
    }

    Ok(ClassifiedDoc { tree, root })
}
