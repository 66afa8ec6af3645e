//! Class descriptors for the host type universe.
//!
//! # Invariants
//! - Interfaces never have a superclass; they extend other interfaces through
//!   `interfaces`.
//! - `interfaces` keeps declaration order, which drives ancestor order.

use serde::{Deserialize, Serialize};

/// Whether a descriptor names a concrete class or an interface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
}

/// One class or interface known to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassDescriptor {
    pub name: String,
    #[serde(default)]
    pub kind: ClassKind,
    /// Direct superclass (classes only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superclass: Option<String>,
    /// Implemented (or, for interfaces, extended) interfaces.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<String>,
}

impl ClassDescriptor {
    /// Creates a root class descriptor.
    pub fn class(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ClassKind::Class,
            superclass: None,
            interfaces: Vec::new(),
        }
    }

    /// Creates a root interface descriptor.
    pub fn interface(name: impl Into<String>) -> Self {
        Self {
            kind: ClassKind::Interface,
            ..Self::class(name)
        }
    }

    pub fn extends(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }
}

#[cfg(test)]
mod tests {
    use super::{ClassDescriptor, ClassKind};

    #[test]
    fn builders_keep_interface_order() {
        let descriptor = ClassDescriptor::class("Bar")
            .extends("Base")
            .implements("First")
            .implements("Second");
        assert_eq!(descriptor.kind, ClassKind::Class);
        assert_eq!(descriptor.superclass.as_deref(), Some("Base"));
        assert_eq!(descriptor.interfaces, vec!["First", "Second"]);
        assert!(!descriptor.is_interface());
    }

    #[test]
    fn interface_builder_sets_kind() {
        let descriptor = ClassDescriptor::interface("BarInterface");
        assert!(descriptor.is_interface());
        assert!(descriptor.superclass.is_none());
    }
}
