//! Declarative registry configuration.
//!
//! # Responsibility
//! - Describe the host type universe and target bindings as plain data.
//! - Validate that data before a registry is built from it.
//!
//! # Invariants
//! - `classes` is applied in order, so parents must precede children.
//! - Every `resolve_targets` concrete class must be declared in `classes`.
//! - Handlers are code, not configuration; they are registered separately.

use crate::model::class::ClassDescriptor;
use crate::validation::{is_valid_class_identifier, normalize_class_identifier};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Type universe and target bindings for one registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// Classes and interfaces, parents first.
    #[serde(default)]
    pub classes: Vec<ClassDescriptor>,
    /// Target identifier → concrete class.
    #[serde(default)]
    pub resolve_targets: BTreeMap<String, String>,
}

impl RegistryConfig {
    /// Validates identifier syntax and target bindings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut declared = BTreeSet::new();
        for descriptor in &self.classes {
            let Some(name) = normalize_class_identifier(&descriptor.name) else {
                return Err(ConfigError::InvalidClassName(descriptor.name.clone()));
            };
            declared.insert(name);
            for referenced in descriptor
                .superclass
                .iter()
                .chain(descriptor.interfaces.iter())
            {
                if !is_valid_class_identifier(referenced.trim()) {
                    return Err(ConfigError::InvalidClassName(referenced.clone()));
                }
            }
        }

        for (target, concrete) in &self.resolve_targets {
            if normalize_class_identifier(target).is_none() {
                return Err(ConfigError::InvalidTarget(target.clone()));
            }
            let Some(normalized) = normalize_class_identifier(concrete) else {
                return Err(ConfigError::InvalidConcrete {
                    target: target.clone(),
                    concrete: concrete.clone(),
                });
            };
            if !declared.contains(normalized) {
                return Err(ConfigError::UnknownConcrete {
                    target: target.clone(),
                    concrete: concrete.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Registry configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidClassName(String),
    InvalidTarget(String),
    InvalidConcrete { target: String, concrete: String },
    UnknownConcrete { target: String, concrete: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidClassName(value) => write!(f, "class name is invalid: `{value}`"),
            Self::InvalidTarget(value) => write!(f, "resolve target is invalid: `{value}`"),
            Self::InvalidConcrete { target, concrete } => write!(
                f,
                "resolve target `{target}` points to invalid class `{concrete}`"
            ),
            Self::UnknownConcrete { target, concrete } => write!(
                f,
                "resolve target `{target}` points to undeclared class `{concrete}`"
            ),
        }
    }
}

impl Error for ConfigError {}
