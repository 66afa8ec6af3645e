//! Immutable resolved type nodes.
//!
//! # Invariants
//! - A node never changes after construction.
//! - `parent` is the cached node of the parent type, shared with every child.
//! - An extension appears at most once across a node and its parent chain.

use crate::model::component::{ObjectType, ObjectTypeExtension};
use std::collections::HashSet;
use std::sync::Arc;

/// One step of a resolved composition.
#[derive(Debug, Clone, Copy)]
pub enum Layer<'a> {
    Type(&'a dyn ObjectType),
    Extension(&'a dyn ObjectTypeExtension),
}

impl Layer<'_> {
    pub fn name(&self) -> &str {
        match self {
            Self::Type(handler) => handler.name(),
            Self::Extension(extension) => extension.name(),
        }
    }
}

/// Handler plus ordered extensions for one class.
#[derive(Debug)]
pub struct ResolvedType {
    class: String,
    parent: Option<Arc<ResolvedType>>,
    handler: Arc<dyn ObjectType>,
    extensions: Vec<Arc<dyn ObjectTypeExtension>>,
    extension_sequences: Vec<usize>,
}

impl ResolvedType {
    pub(crate) fn new(
        class: String,
        parent: Option<Arc<ResolvedType>>,
        handler: Arc<dyn ObjectType>,
        extensions: Vec<(usize, Arc<dyn ObjectTypeExtension>)>,
    ) -> Self {
        let (extension_sequences, extensions) = extensions.into_iter().unzip();
        Self {
            class,
            parent,
            handler,
            extensions,
            extension_sequences,
        }
    }

    /// Concrete class this node was built for.
    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn parent(&self) -> Option<&Arc<ResolvedType>> {
        self.parent.as_ref()
    }

    pub fn handler(&self) -> &Arc<dyn ObjectType> {
        &self.handler
    }

    /// Name of the wrapped handler.
    pub fn inner_type_name(&self) -> &str {
        self.handler.name()
    }

    /// Extensions of this level only, priority first.
    pub fn extensions(&self) -> &[Arc<dyn ObjectTypeExtension>] {
        &self.extensions
    }

    pub fn extension_names(&self) -> Vec<&str> {
        self.extensions
            .iter()
            .map(|extension| extension.name())
            .collect()
    }

    /// Iterates this node, then its parents up to the root.
    pub fn chain(&self) -> impl Iterator<Item = &ResolvedType> {
        std::iter::successors(Some(self), |node| node.parent.as_deref())
    }

    /// Returns the full composition, root level first.
    ///
    /// Each level contributes its handler followed by its extensions in
    /// priority order.
    pub fn layers(&self) -> Vec<Layer<'_>> {
        let levels: Vec<&ResolvedType> = self.chain().collect();
        let mut layers = Vec::new();
        for level in levels.into_iter().rev() {
            layers.push(Layer::Type(level.handler.as_ref()));
            layers.extend(
                level
                    .extensions
                    .iter()
                    .map(|extension| Layer::Extension(extension.as_ref())),
            );
        }
        layers
    }

    /// Registration indexes of every extension in this chain.
    pub(crate) fn applied_extensions(&self) -> HashSet<usize> {
        self.chain()
            .flat_map(|node| node.extension_sequences.iter().copied())
            .collect()
    }
}
