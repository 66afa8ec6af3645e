//! Type registry: raw type and extension declarations.
//!
//! # Responsibility
//! - Own the host type universe and target bindings used to normalize
//!   declarations.
//! - Validate and store type and extension declarations.
//! - Answer type and extension lookups for the resolved type factory.
//!
//! # Invariants
//! - A failed registration leaves the registry unchanged.
//! - Types are keyed by their target-resolved class; at most one per class.
//! - Extensions keep registration order; lookups sort by priority
//!   descending and keep registration order for ties.
//! - An identifier already named by a declaration, or already reached by
//!   target resolution, cannot be bound to a different concrete class
//!   afterwards. Mappings therefore never chain.
//! - Every stored type and extension targets a declared class.
//! - Registration needs `&mut self`; once the registry is shared with a
//!   factory through `Arc` it is read-only.

use crate::config::{ConfigError, RegistryConfig};
use crate::error::{RegistryError, RegistryResult};
use crate::hierarchy::{Ancestors, ClassHierarchy};
use crate::model::class::ClassDescriptor;
use crate::model::component::{ObjectType, ObjectTypeExtension};
use crate::model::declaration::{DeclarationKind, ExtensionDeclaration, TypeDeclaration};
use crate::target::TargetMap;
use crate::validation::{
    normalize_class_identifier, require_class_parameter, require_object_type,
    require_type_extension,
};
use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Stored, validated type declaration.
#[derive(Debug, Clone)]
pub struct RegisteredType {
    /// Target-resolved class the type is registered for.
    pub class: String,
    /// Normalized explicit parent, still unresolved.
    pub parent: Option<String>,
    pub handler: Arc<dyn ObjectType>,
    pub service_id: Option<String>,
}

/// Stored, validated extension declaration.
#[derive(Debug, Clone)]
pub struct RegisteredExtension {
    /// Extended class as declared (normalized syntax).
    pub extended_class: String,
    /// Extended class after target resolution.
    pub target_class: String,
    pub extension: Arc<dyn ObjectTypeExtension>,
    pub priority: i32,
    /// Zero-based registration index; unique per registry.
    pub sequence: usize,
    pub service_id: Option<String>,
}

/// Registry of type and extension declarations.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    hierarchy: ClassHierarchy,
    targets: TargetMap,
    types: BTreeMap<String, RegisteredType>,
    extensions: Vec<RegisteredExtension>,
    used_identifiers: BTreeSet<String>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry with the configured universe and target bindings.
    pub fn from_config(config: &RegistryConfig) -> RegistryResult<Self> {
        config.validate()?;
        let mut registry = Self::new();
        for descriptor in &config.classes {
            registry.declare_class(descriptor.clone())?;
        }
        for (target, concrete) in &config.resolve_targets {
            registry.add_target_mapping(target, concrete)?;
        }
        debug!(
            "event=registry_configure module=registry status=ok classes={} targets={}",
            registry.hierarchy.len(),
            registry.targets.len()
        );
        Ok(registry)
    }

    /// Declares one class or interface of the host type universe.
    pub fn declare_class(&mut self, descriptor: ClassDescriptor) -> RegistryResult<()> {
        self.hierarchy.declare(descriptor)?;
        Ok(())
    }

    /// Binds a target identifier to a concrete class.
    pub fn add_target_mapping(&mut self, target: &str, concrete: &str) -> RegistryResult<()> {
        let target = normalize_class_identifier(target)
            .ok_or_else(|| ConfigError::InvalidTarget(target.to_string()))?;
        let concrete = normalize_class_identifier(concrete).ok_or_else(|| {
            ConfigError::InvalidConcrete {
                target: target.to_string(),
                concrete: concrete.to_string(),
            }
        })?;

        // Declarations that already named `target`, or resolved to it, and
        // mappings that already land on it all treat it as concrete.
        if target != concrete
            && !self.targets.is_mapped(target)
            && (self.used_identifiers.contains(target) || self.targets.is_concrete(target))
        {
            warn!(
                "event=target_map module=registry status=error error_code=conflicting_target target={} concrete={}",
                target, concrete
            );
            return Err(RegistryError::ConflictingTarget {
                target: target.to_string(),
                existing: target.to_string(),
                requested: concrete.to_string(),
            });
        }

        if let Err(err) = self.targets.add_mapping(target, concrete) {
            warn!(
                "event=target_map module=registry status=error error_code={} target={} concrete={}",
                err.code(),
                target,
                concrete
            );
            return Err(err);
        }
        debug!(
            "event=target_map module=registry status=ok target={} concrete={}",
            target, concrete
        );
        Ok(())
    }

    /// Validates and stores one type declaration.
    pub fn register_type(&mut self, declaration: TypeDeclaration) -> RegistryResult<()> {
        match self.insert_type(&declaration) {
            Ok(class) => {
                debug!(
                    "event=type_register module=registry status=ok class={} service_id={}",
                    class,
                    declaration.service_id.as_deref().unwrap_or("-")
                );
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event=type_register module=registry status=error error_code={} class={} service_id={}",
                    err.code(),
                    declaration.class.trim(),
                    declaration.service_id.as_deref().unwrap_or("-")
                );
                Err(err)
            }
        }
    }

    /// Validates and stores one extension declaration.
    pub fn register_extension(&mut self, declaration: ExtensionDeclaration) -> RegistryResult<()> {
        match self.insert_extension(&declaration) {
            Ok(target_class) => {
                debug!(
                    "event=extension_register module=registry status=ok target={} priority={} service_id={}",
                    target_class,
                    declaration.priority,
                    declaration.service_id.as_deref().unwrap_or("-")
                );
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event=extension_register module=registry status=error error_code={} extended_class={} service_id={}",
                    err.code(),
                    declaration.extended_class.trim(),
                    declaration.service_id.as_deref().unwrap_or("-")
                );
                Err(err)
            }
        }
    }

    fn insert_type(&mut self, declaration: &TypeDeclaration) -> RegistryResult<String> {
        let service_id = declaration.service_id.as_deref();
        let handler = require_object_type(declaration)?;
        let declared = require_class_parameter(&declaration.class, DeclarationKind::Type, service_id)?;
        let class = self.targets.resolve(&declared).to_string();
        if !self.hierarchy.contains(&class) {
            return Err(RegistryError::UnresolvedClassParameter {
                kind: DeclarationKind::Type,
                class: declared,
                service_id: declaration.service_id.clone(),
            });
        }
        let parent = declaration
            .parent
            .as_deref()
            .map(|raw| require_class_parameter(raw, DeclarationKind::Type, service_id))
            .transpose()?;

        if self.types.contains_key(&class) {
            return Err(RegistryError::DuplicateType {
                class,
                service_id: declaration.service_id.clone(),
            });
        }

        self.used_identifiers.insert(declared);
        self.used_identifiers.insert(class.clone());
        if let Some(parent) = &parent {
            self.used_identifiers.insert(self.targets.resolve(parent).to_string());
            self.used_identifiers.insert(parent.clone());
        }
        self.types.insert(
            class.clone(),
            RegisteredType {
                class: class.clone(),
                parent,
                handler,
                service_id: declaration.service_id.clone(),
            },
        );
        Ok(class)
    }

    fn insert_extension(&mut self, declaration: &ExtensionDeclaration) -> RegistryResult<String> {
        let extension = require_type_extension(declaration)?;
        let extended_class = require_class_parameter(
            &declaration.extended_class,
            DeclarationKind::TypeExtension,
            declaration.service_id.as_deref(),
        )?;
        let target_class = self.targets.resolve(&extended_class).to_string();
        if !self.hierarchy.contains(&target_class) {
            return Err(RegistryError::UnresolvedClassParameter {
                kind: DeclarationKind::TypeExtension,
                class: extended_class,
                service_id: declaration.service_id.clone(),
            });
        }

        self.used_identifiers.insert(extended_class.clone());
        self.used_identifiers.insert(target_class.clone());
        self.extensions.push(RegisteredExtension {
            extended_class,
            target_class: target_class.clone(),
            extension,
            priority: declaration.priority,
            sequence: self.extensions.len(),
            service_id: declaration.service_id.clone(),
        });
        Ok(target_class)
    }

    /// Normalizes `class` and applies target resolution.
    pub fn resolve_class(&self, class: &str) -> RegistryResult<String> {
        let normalized =
            normalize_class_identifier(class).ok_or_else(|| RegistryError::UnresolvableHierarchy {
                class: class.trim().to_string(),
                service_id: None,
            })?;
        Ok(self.targets.resolve(normalized).to_string())
    }

    /// Returns whether a type is registered for `class` (after resolution).
    pub fn has_type(&self, class: &str) -> bool {
        self.resolve_class(class)
            .map(|resolved| self.types.contains_key(&resolved))
            .unwrap_or(false)
    }

    /// Returns the type registered for `class` (after resolution).
    pub fn get_type(&self, class: &str) -> RegistryResult<&RegisteredType> {
        let resolved = self
            .resolve_class(class)
            .map_err(|_| RegistryError::UnknownType(class.trim().to_string()))?;
        self.types
            .get(&resolved)
            .ok_or(RegistryError::UnknownType(resolved))
    }

    /// Returns every extension applying to `class`, priority first.
    ///
    /// An extension applies when its target-resolved class is `class` or one
    /// of its ancestors.
    pub fn get_extensions(&self, class: &str) -> RegistryResult<Vec<&RegisteredExtension>> {
        let resolved = self.resolve_class(class)?;
        let ancestors: BTreeSet<&str> = self.hierarchy.ancestors(&resolved)?.collect();
        let mut matched: Vec<&RegisteredExtension> = self
            .extensions
            .iter()
            .filter(|entry| ancestors.contains(entry.target_class.as_str()))
            .collect();
        // Stable: ties keep registration order.
        matched.sort_by(|left, right| right.priority.cmp(&left.priority));
        Ok(matched)
    }

    /// Returns the ancestor chain of an already resolved class.
    pub fn ancestors(&self, class: &str) -> RegistryResult<Ancestors<'_>> {
        self.hierarchy.ancestors(class)
    }

    /// Finds the registered type nearest to `class`, including `class`.
    pub fn nearest_type(&self, class: &str) -> RegistryResult<Option<&RegisteredType>> {
        Ok(self
            .hierarchy
            .ancestors(class)?
            .find_map(|ancestor| self.types.get(ancestor)))
    }

    /// Finds the registered type nearest to `class`, excluding `class`.
    pub fn nearest_inherited_type(&self, class: &str) -> RegistryResult<Option<&RegisteredType>> {
        Ok(self
            .hierarchy
            .ancestors(class)?
            .skip(1)
            .find_map(|ancestor| self.types.get(ancestor)))
    }

    pub fn hierarchy(&self) -> &ClassHierarchy {
        &self.hierarchy
    }

    pub fn targets(&self) -> &TargetMap {
        &self.targets
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn extension_count(&self) -> usize {
        self.extensions.len()
    }

    /// Returns registered classes in sorted order.
    pub fn registered_classes(&self) -> Vec<&str> {
        self.types.keys().map(String::as_str).collect()
    }

    /// Returns all extensions in registration order.
    pub fn extensions(&self) -> &[RegisteredExtension] {
        &self.extensions
    }
}
