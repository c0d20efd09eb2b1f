pub mod classify;
pub mod estimate;
pub mod io;
pub mod render;
pub mod tags;
pub mod tree;

// Re-export key types for easier usage
pub use classify::{ClassifiedDoc, ClassifyError, LineKind, classify_lines};
pub use estimate::estimated_size;
pub use render::{inner_markup, outer_markup};
pub use tags::{ClosureKind, DisplayKind, TagDescriptor, TagError, TagRegistry, registry};
pub use tree::{Node, NodeId, Tree, TreeError};
