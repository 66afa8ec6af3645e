//! Registry and resolution errors.
//!
//! # Invariants
//! - Every variant carries the offending identifier.
//! - Variants raised for one declaration also carry its service id when the
//!   wiring layer supplied one.
//! - Errors describe static configuration defects; callers abort instead of
//!   retrying.

use crate::config::ConfigError;
use crate::hierarchy::HierarchyError;
use crate::model::declaration::DeclarationKind;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Registration and resolution failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A type is already registered for the (resolved) class.
    DuplicateType {
        class: String,
        service_id: Option<String>,
    },
    /// A type declaration's component does not expose `ObjectType`.
    InvalidHandler {
        class: String,
        service_id: Option<String>,
    },
    /// An extension declaration's component does not expose `ObjectTypeExtension`.
    InvalidExtension {
        extended_class: String,
        service_id: Option<String>,
    },
    /// No type is registered for the class.
    UnknownType(String),
    /// The identifier is not a class or interface known to the host.
    UnresolvableHierarchy {
        class: String,
        service_id: Option<String>,
    },
    /// Neither the class nor any of its ancestors has a registered type.
    NoTypeFound(String),
    /// A target is already bound to a different concrete class.
    ConflictingTarget {
        target: String,
        existing: String,
        requested: String,
    },
    /// A declaration's `class` parameter is missing or does not resolve.
    UnresolvedClassParameter {
        kind: DeclarationKind,
        class: String,
        service_id: Option<String>,
    },
    /// Declared parents form a cycle; the path ends with the repeated class.
    CircularParent(Vec<String>),
    Hierarchy(HierarchyError),
    Config(ConfigError),
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateType { class, service_id } => match service_id {
                Some(id) => write!(
                    f,
                    "The service id \"{id}\" declares a type for class \"{class}\", which is already registered."
                ),
                None => write!(f, "type already registered for class: {class}"),
            },
            Self::InvalidHandler { class, service_id } => match service_id {
                Some(id) => write!(
                    f,
                    "The service id \"{id}\" must be an instance of \"{}\"",
                    DeclarationKind::Type.capability()
                ),
                None => write!(
                    f,
                    "type handler for class \"{class}\" must be an instance of \"{}\"",
                    DeclarationKind::Type.capability()
                ),
            },
            Self::InvalidExtension {
                extended_class,
                service_id,
            } => match service_id {
                Some(id) => write!(
                    f,
                    "The service id \"{id}\" must be an instance of \"{}\"",
                    DeclarationKind::TypeExtension.capability()
                ),
                None => write!(
                    f,
                    "type extension for class \"{extended_class}\" must be an instance of \"{}\"",
                    DeclarationKind::TypeExtension.capability()
                ),
            },
            Self::UnknownType(class) => write!(f, "no type registered for class: {class}"),
            Self::UnresolvableHierarchy { class, service_id } => match service_id {
                Some(id) => write!(
                    f,
                    "The service id \"{id}\" refers to class \"{class}\", which is not a known class or interface"
                ),
                None => write!(f, "class or interface is unknown: {class}"),
            },
            Self::NoTypeFound(class) => {
                write!(f, "no type found for class \"{class}\" or any of its ancestors")
            }
            Self::ConflictingTarget {
                target,
                existing,
                requested,
            } => write!(
                f,
                "target \"{target}\" is already bound to \"{existing}\"; refusing to remap to \"{requested}\""
            ),
            Self::UnresolvedClassParameter {
                kind,
                class,
                service_id,
            } => match (service_id, class.is_empty()) {
                (Some(id), true) => write!(
                    f,
                    "The service id \"{id}\" must have the \"class\" parameter in the \"{}\" tag.",
                    kind.tag()
                ),
                (Some(id), false) => write!(
                    f,
                    "The service id \"{id}\" has the \"class\" parameter \"{class}\" in the \"{}\" tag, which does not resolve to a known class.",
                    kind.tag()
                ),
                (None, true) => write!(f, "\"{}\" declaration must have a \"class\" parameter", kind.tag()),
                (None, false) => write!(
                    f,
                    "\"{}\" declaration class \"{class}\" does not resolve to a known class",
                    kind.tag()
                ),
            },
            Self::CircularParent(path) => {
                write!(f, "circular type parent chain: {}", path.join(" -> "))
            }
            Self::Hierarchy(err) => write!(f, "invalid class hierarchy: {err}"),
            Self::Config(err) => write!(f, "invalid registry config: {err}"),
        }
    }
}

impl Error for RegistryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Hierarchy(err) => Some(err),
            Self::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<HierarchyError> for RegistryError {
    fn from(value: HierarchyError) -> Self {
        Self::Hierarchy(value)
    }
}

impl From<ConfigError> for RegistryError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl RegistryError {
    /// Stable machine-readable code for structured log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateType { .. } => "duplicate_type",
            Self::InvalidHandler { .. } => "invalid_handler",
            Self::InvalidExtension { .. } => "invalid_extension",
            Self::UnknownType(_) => "unknown_type",
            Self::UnresolvableHierarchy { .. } => "unresolvable_hierarchy",
            Self::NoTypeFound(_) => "no_type_found",
            Self::ConflictingTarget { .. } => "conflicting_target",
            Self::UnresolvedClassParameter { .. } => "unresolved_class_parameter",
            Self::CircularParent(_) => "circular_parent",
            Self::Hierarchy(_) => "invalid_hierarchy",
            Self::Config(_) => "invalid_config",
        }
    }
}
