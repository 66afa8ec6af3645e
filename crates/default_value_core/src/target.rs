//! Target resolution map.
//!
//! Maps abstract target identifiers (usually interfaces) to the concrete class
//! the host binds to them. Unmapped identifiers resolve to themselves.
//!
//! # Invariants
//! - Mappings are single-hop: a concrete class is never re-resolved.
//! - A target is bound at most once; rebinding to the same concrete class is a
//!   no-op, rebinding to a different one fails.
//! - The map alone accepts a concrete class as another target. The registry
//!   refuses that binding, so registered mappings never chain.

use crate::error::{RegistryError, RegistryResult};
use std::collections::BTreeMap;

/// Target → concrete class table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetMap {
    mappings: BTreeMap<String, String>,
}

impl TargetMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `target` to `concrete`.
    pub fn add_mapping(
        &mut self,
        target: impl Into<String>,
        concrete: impl Into<String>,
    ) -> RegistryResult<()> {
        let target = target.into();
        let concrete = concrete.into();
        match self.mappings.get(target.as_str()) {
            Some(existing) if *existing == concrete => Ok(()),
            Some(existing) => Err(RegistryError::ConflictingTarget {
                target,
                existing: existing.clone(),
                requested: concrete,
            }),
            None => {
                self.mappings.insert(target, concrete);
                Ok(())
            }
        }
    }

    /// Returns the concrete class bound to `target`, or `target` itself.
    pub fn resolve<'a>(&'a self, target: &'a str) -> &'a str {
        self.mappings
            .get(target)
            .map(String::as_str)
            .unwrap_or(target)
    }

    pub fn is_mapped(&self, target: &str) -> bool {
        self.mappings.contains_key(target)
    }

    /// Returns whether some other target is bound to `class`.
    pub fn is_concrete(&self, class: &str) -> bool {
        self.mappings
            .iter()
            .any(|(target, concrete)| concrete == class && target != class)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Iterates mappings in target order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.mappings
            .iter()
            .map(|(target, concrete)| (target.as_str(), concrete.as_str()))
    }
}
