//! Capability contracts for declared components.
//!
//! The wiring layer deals in type-erased components. A component advertises
//! the capabilities it implements through the `as_*` queries on
//! [`Component`]; a query returning `None` means "does not implement the
//! required interface".

use std::fmt::Debug;
use std::sync::Arc;

/// Base handler for one object class.
///
/// What a handler computes is owned by value-generation callers; the core only
/// decides which handler applies.
pub trait ObjectType: Debug + Send + Sync {
    /// Stable handler name used in diagnostics, e.g. `DefaultType`.
    fn name(&self) -> &str;
}

/// Add-on behavior layered over an object type.
pub trait ObjectTypeExtension: Debug + Send + Sync {
    /// Stable extension name used in diagnostics.
    fn name(&self) -> &str;
}

/// Type-erased component handed over by the wiring layer.
pub trait Component: Debug + Send + Sync {
    /// Returns the object-type capability, if implemented.
    fn as_object_type(self: Arc<Self>) -> Option<Arc<dyn ObjectType>> {
        None
    }

    /// Returns the type-extension capability, if implemented.
    fn as_type_extension(self: Arc<Self>) -> Option<Arc<dyn ObjectTypeExtension>> {
        None
    }
}

/// Component wrapper for an already typed object-type handler.
#[derive(Debug, Clone)]
pub struct ObjectTypeAdapter {
    handler: Arc<dyn ObjectType>,
}

impl ObjectTypeAdapter {
    pub fn new(handler: Arc<dyn ObjectType>) -> Self {
        Self { handler }
    }
}

impl Component for ObjectTypeAdapter {
    fn as_object_type(self: Arc<Self>) -> Option<Arc<dyn ObjectType>> {
        Some(self.handler.clone())
    }
}

/// Component wrapper for an already typed extension.
#[derive(Debug, Clone)]
pub struct TypeExtensionAdapter {
    extension: Arc<dyn ObjectTypeExtension>,
}

impl TypeExtensionAdapter {
    pub fn new(extension: Arc<dyn ObjectTypeExtension>) -> Self {
        Self { extension }
    }
}

impl Component for TypeExtensionAdapter {
    fn as_type_extension(self: Arc<Self>) -> Option<Arc<dyn ObjectTypeExtension>> {
        Some(self.extension.clone())
    }
}
