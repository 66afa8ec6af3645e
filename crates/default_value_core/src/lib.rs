//! Default-value type resolution core.
//!
//! Stores object-type and type-extension declarations and composes them into
//! cached, immutable resolved types per class.

pub mod config;
pub mod error;
pub mod factory;
pub mod hierarchy;
pub mod logging;
pub mod model;
pub mod registry;
pub mod target;
pub mod validation;

pub use config::{ConfigError, RegistryConfig};
pub use error::{RegistryError, RegistryResult};
pub use factory::resolved::{Layer, ResolvedType};
pub use factory::ResolvedTypeFactory;
pub use hierarchy::{Ancestors, ClassHierarchy, HierarchyError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::class::{ClassDescriptor, ClassKind};
pub use model::component::{
    Component, ObjectType, ObjectTypeAdapter, ObjectTypeExtension, TypeExtensionAdapter,
};
pub use model::declaration::{
    DeclarationKind, ExtensionDeclaration, TypeDeclaration, TYPE_EXTENSION_TAG, TYPE_TAG,
};
pub use registry::{RegisteredExtension, RegisteredType, TypeRegistry};
pub use target::TargetMap;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
