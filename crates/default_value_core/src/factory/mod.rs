//! Resolved type factory.
//!
//! # Responsibility
//! - Compose a class's base handler with every applicable extension.
//! - Cache one shared node per class for the lifetime of the factory.
//!
//! # Invariants
//! - Resolving the same identifier twice returns the same `Arc`.
//! - A class without its own registration resolves to the node of its
//!   nearest registered ancestor; no duplicate node is built.
//! - Cache insertion is the last step of a resolution and is
//!   first-write-wins, so concurrent resolvers converge on one node.
//! - A failed resolution never inserts an entry for the failing identifier.
//!
//! # See also
//! - `registry` for the declarations this factory reads.

pub mod resolved;

use crate::error::{RegistryError, RegistryResult};
use crate::model::declaration::DeclarationKind;
use crate::registry::{RegisteredType, TypeRegistry};
use log::{debug, error};
use parking_lot::RwLock;
use resolved::ResolvedType;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// Lazily builds and caches [`ResolvedType`] nodes.
#[derive(Debug)]
pub struct ResolvedTypeFactory {
    registry: Arc<TypeRegistry>,
    cache: RwLock<HashMap<String, Arc<ResolvedType>>>,
}

impl ResolvedTypeFactory {
    /// Creates a factory over a registry that is closed for registration.
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self {
            registry,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    /// Resolves the composed type of `class`.
    ///
    /// # Errors
    /// - `UnresolvableHierarchy` when `class` is not a known class.
    /// - `UnresolvedClassParameter` when a type taking part in the resolution
    ///   declares a parent that is not a known class.
    /// - `NoTypeFound` when neither `class` nor any ancestor has a type.
    /// - `CircularParent` when declared parents loop.
    pub fn resolve(&self, class: &str) -> RegistryResult<Arc<ResolvedType>> {
        if let Some(hit) = self.cache.read().get(class) {
            return Ok(hit.clone());
        }

        let started_at = Instant::now();
        let mut path = Vec::new();
        match self.resolve_uncached(class, &mut path) {
            Ok(node) => {
                debug!(
                    "event=type_resolve module=factory status=ok class={} resolved={} extensions={} duration_us={}",
                    class.trim(),
                    node.class(),
                    node.extensions().len(),
                    started_at.elapsed().as_micros()
                );
                Ok(node)
            }
            Err(err) => {
                error!(
                    "event=type_resolve module=factory status=error error_code={} class={} error={}",
                    err.code(),
                    class.trim(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Returns whether `class` already has a cache entry.
    pub fn is_cached(&self, class: &str) -> bool {
        self.cache.read().contains_key(class)
    }

    /// Number of cache keys (original and resolved identifiers).
    pub fn cached_count(&self) -> usize {
        self.cache.read().len()
    }

    fn resolve_uncached(
        &self,
        requested: &str,
        path: &mut Vec<String>,
    ) -> RegistryResult<Arc<ResolvedType>> {
        let class = self.registry.resolve_class(requested)?;
        if let Some(hit) = self.cached(requested, &class) {
            return Ok(hit);
        }

        let registration = self
            .registry
            .nearest_type(&class)?
            .ok_or_else(|| RegistryError::NoTypeFound(class.clone()))?;
        if registration.class != class {
            let inherited = self.resolve_uncached(&registration.class, path)?;
            return Ok(self.insert(requested, &class, inherited));
        }

        if path.contains(&class) {
            path.push(class);
            return Err(RegistryError::CircularParent(path.clone()));
        }
        path.push(class.clone());
        let parent = match self.parent_class(registration)? {
            Some(parent_class) => Some(self.resolve_uncached(&parent_class, path)?),
            None => None,
        };
        path.pop();

        let applied = parent
            .as_ref()
            .map(|node| node.applied_extensions())
            .unwrap_or_default();
        let extensions = self
            .registry
            .get_extensions(&class)?
            .into_iter()
            .filter(|entry| !applied.contains(&entry.sequence))
            .map(|entry| (entry.sequence, entry.extension.clone()))
            .collect();

        let node = Arc::new(ResolvedType::new(
            class.clone(),
            parent,
            registration.handler.clone(),
            extensions,
        ));
        Ok(self.insert(requested, &class, node))
    }

    /// Declared parent if any, otherwise the nearest registered ancestor.
    fn parent_class(&self, registration: &RegisteredType) -> RegistryResult<Option<String>> {
        if let Some(declared) = registration.parent.as_deref() {
            let parent = self.registry.resolve_class(declared)?;
            if !self.registry.hierarchy().contains(&parent) {
                return Err(RegistryError::UnresolvedClassParameter {
                    kind: DeclarationKind::Type,
                    class: declared.to_string(),
                    service_id: registration.service_id.clone(),
                });
            }
            return Ok(Some(parent));
        }
        Ok(self
            .registry
            .nearest_inherited_type(&registration.class)?
            .map(|inherited| inherited.class.clone()))
    }

    fn cached(&self, requested: &str, class: &str) -> Option<Arc<ResolvedType>> {
        let hit = {
            let cache = self.cache.read();
            cache.get(requested).or_else(|| cache.get(class)).cloned()
        }?;
        if !self.is_cached(requested) {
            self.cache
                .write()
                .entry(requested.to_string())
                .or_insert_with(|| hit.clone());
        }
        Some(hit)
    }

    fn insert(&self, requested: &str, class: &str, node: Arc<ResolvedType>) -> Arc<ResolvedType> {
        let mut cache = self.cache.write();
        let stored = cache.entry(class.to_string()).or_insert(node).clone();
        if requested != class {
            cache
                .entry(requested.to_string())
                .or_insert_with(|| stored.clone());
        }
        stored
    }
}
