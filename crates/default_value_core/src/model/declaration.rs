//! Type and extension declarations.
//!
//! # Responsibility
//! - Carry one declaration from the wiring layer to the registry.
//! - Keep the declaring service id so diagnostics can name it.
//!
//! # Invariants
//! - Declarations are unvalidated; `TypeRegistry` checks them on registration.
//! - Extension priority defaults to `0`.

use crate::model::component::{
    Component, ObjectType, ObjectTypeAdapter, ObjectTypeExtension, TypeExtensionAdapter,
};
use std::sync::Arc;

/// Tag name used by type declarations.
pub const TYPE_TAG: &str = "default_value.type";
/// Tag name used by extension declarations.
pub const TYPE_EXTENSION_TAG: &str = "default_value.type_extension";

/// Declaration kind, used to word diagnostics per tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Type,
    TypeExtension,
}

impl DeclarationKind {
    /// Tag that produced declarations of this kind.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Type => TYPE_TAG,
            Self::TypeExtension => TYPE_EXTENSION_TAG,
        }
    }

    /// Capability a component must expose for this kind.
    pub fn capability(self) -> &'static str {
        match self {
            Self::Type => "ObjectType",
            Self::TypeExtension => "ObjectTypeExtension",
        }
    }
}

/// One object-type declaration.
#[derive(Debug, Clone)]
pub struct TypeDeclaration {
    /// Class the handler is declared for.
    pub class: String,
    /// Explicit parent class; `None` falls back to the class hierarchy.
    pub parent: Option<String>,
    /// Component expected to expose [`ObjectType`].
    pub handler: Arc<dyn Component>,
    /// Declaring service id, when the wiring layer knows it.
    pub service_id: Option<String>,
}

impl TypeDeclaration {
    /// Declares a typed handler for `class`.
    pub fn new(class: impl Into<String>, handler: Arc<dyn ObjectType>) -> Self {
        Self::from_component(class, Arc::new(ObjectTypeAdapter::new(handler)))
    }

    /// Declares a type-erased component for `class`.
    pub fn from_component(class: impl Into<String>, handler: Arc<dyn Component>) -> Self {
        Self {
            class: class.into(),
            parent: None,
            handler,
            service_id: None,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_service_id(mut self, service_id: impl Into<String>) -> Self {
        self.service_id = Some(service_id.into());
        self
    }
}

/// One type-extension declaration.
#[derive(Debug, Clone)]
pub struct ExtensionDeclaration {
    /// Extended class or target identifier.
    pub extended_class: String,
    /// Component expected to expose [`ObjectTypeExtension`].
    pub extension: Arc<dyn Component>,
    /// Higher priorities are ordered first.
    pub priority: i32,
    pub service_id: Option<String>,
}

impl ExtensionDeclaration {
    /// Declares a typed extension for `extended_class`.
    pub fn new(extended_class: impl Into<String>, extension: Arc<dyn ObjectTypeExtension>) -> Self {
        Self::from_component(
            extended_class,
            Arc::new(TypeExtensionAdapter::new(extension)),
        )
    }

    /// Declares a type-erased component for `extended_class`.
    pub fn from_component(
        extended_class: impl Into<String>,
        extension: Arc<dyn Component>,
    ) -> Self {
        Self {
            extended_class: extended_class.into(),
            extension,
            priority: 0,
            service_id: None,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_service_id(mut self, service_id: impl Into<String>) -> Self {
        self.service_id = Some(service_id.into());
        self
    }
}
