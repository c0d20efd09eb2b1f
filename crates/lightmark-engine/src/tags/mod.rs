use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TagError {
    #[error("tag name must not be empty")]
    EmptyName,
}

/// How an element participates in layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayKind {
    Block,
    Inline,
}

/// Whether a tag closes itself (`<img />`) or wraps content (`<div>...</div>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClosureKind {
    SelfClosing,
    Normal,
}

/// Shared, immutable tag metadata.
///
/// Descriptors are handed out as `Arc`s by [`TagRegistry`] and identity
/// (`Arc::ptr_eq`) is the sameness test: one instance exists per
/// `(name, display, closure)` triple for the life of the process.
#[derive(Debug)]
pub struct TagDescriptor {
    name: String,
    display: DisplayKind,
    closure: ClosureKind,
}

impl TagDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display(&self) -> DisplayKind {
        self.display
    }

    pub fn closure(&self) -> ClosureKind {
        self.closure
    }

    pub fn is_block(&self) -> bool {
        self.display == DisplayKind::Block
    }

    pub fn is_self_closing(&self) -> bool {
        self.closure == ClosureKind::SelfClosing
    }
}

type TagKey = (String, DisplayKind, ClosureKind);

/// Interning cache for [`TagDescriptor`]s.
///
/// Lookup-or-insert is atomic under the internal mutex, so concurrent
/// callers still observe at most one descriptor per key. There is no
/// eviction: a program uses a bounded set of tag identities.
#[derive(Debug, Default)]
pub struct TagRegistry {
    cache: Mutex<HashMap<TagKey, Arc<TagDescriptor>>>,
}

impl TagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the shared descriptor for the triple, creating it on first use.
    ///
    /// Empty names are rejected rather than cached.
    pub fn get(
        &self,
        name: &str,
        display: DisplayKind,
        closure: ClosureKind,
    ) -> Result<Arc<TagDescriptor>, TagError> {
        if name.is_empty() {
            return Err(TagError::EmptyName);
        }

        let mut cache = self.lock_cache();
        let key = (name.to_owned(), display, closure);
        if let Some(tag) = cache.get(&key) {
            return Ok(Arc::clone(tag));
        }

        let tag = Arc::new(TagDescriptor {
            name: name.to_owned(),
            display,
            closure,
        });
        cache.insert(key, Arc::clone(&tag));
        Ok(tag)
    }

    /// Number of distinct descriptors interned so far.
    pub fn len(&self) -> usize {
        self.lock_cache().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock_cache(&self) -> MutexGuard<'_, HashMap<TagKey, Arc<TagDescriptor>>> {
        // A poisoned lock only means another caller panicked mid-insert;
        // the map itself is still a valid cache.
        match self.cache.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// The process-wide registry used by the classifier and available to callers.
pub fn registry() -> &'static TagRegistry {
    static REGISTRY: OnceLock<TagRegistry> = OnceLock::new();
    REGISTRY.get_or_init(TagRegistry::new)
}
