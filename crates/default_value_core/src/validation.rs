//! Declaration validation shared by registration and resolution.
//!
//! # Responsibility
//! - Check class identifier syntax before anything is stored.
//! - Check that declared components expose the capability their tag requires.
//!
//! # Invariants
//! - Validation never mutates registry state.
//! - Class-parameter failures always carry the declaration kind, so the
//!   message names the correct tag.

use crate::error::{RegistryError, RegistryResult};
use crate::model::component::{ObjectType, ObjectTypeExtension};
use crate::model::declaration::{DeclarationKind, ExtensionDeclaration, TypeDeclaration};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

// Namespaced identifiers: `Foo\Bar`, `\Foo\Bar` or `foo::Bar`.
static CLASS_IDENTIFIER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\\?[A-Za-z_][A-Za-z0-9_]*(?:(?:\\|::)[A-Za-z_][A-Za-z0-9_]*)*$")
        .expect("valid class identifier regex")
});

/// Returns whether `value` is a syntactically valid class identifier.
pub fn is_valid_class_identifier(value: &str) -> bool {
    CLASS_IDENTIFIER_RE.is_match(value)
}

/// Trims surrounding whitespace and one leading `\`.
///
/// Returns `None` for blank or malformed identifiers.
pub fn normalize_class_identifier(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if !is_valid_class_identifier(trimmed) {
        return None;
    }
    Some(trimmed.strip_prefix('\\').unwrap_or(trimmed))
}

/// Extracts the object-type capability from a type declaration.
pub(crate) fn require_object_type(
    declaration: &TypeDeclaration,
) -> RegistryResult<Arc<dyn ObjectType>> {
    declaration
        .handler
        .clone()
        .as_object_type()
        .ok_or_else(|| RegistryError::InvalidHandler {
            class: declaration.class.trim().to_string(),
            service_id: declaration.service_id.clone(),
        })
}

/// Extracts the type-extension capability from an extension declaration.
pub(crate) fn require_type_extension(
    declaration: &ExtensionDeclaration,
) -> RegistryResult<Arc<dyn ObjectTypeExtension>> {
    declaration
        .extension
        .clone()
        .as_type_extension()
        .ok_or_else(|| RegistryError::InvalidExtension {
            extended_class: declaration.extended_class.trim().to_string(),
            service_id: declaration.service_id.clone(),
        })
}

/// Normalizes the `class` parameter of one declaration.
pub(crate) fn require_class_parameter(
    raw: &str,
    kind: DeclarationKind,
    service_id: Option<&str>,
) -> RegistryResult<String> {
    normalize_class_identifier(raw)
        .map(str::to_string)
        .ok_or_else(|| RegistryError::UnresolvedClassParameter {
            kind,
            class: raw.trim().to_string(),
            service_id: service_id.map(str::to_string),
        })
}

#[cfg(test)]
mod tests {
    use super::{is_valid_class_identifier, normalize_class_identifier, require_class_parameter};
    use crate::error::RegistryError;
    use crate::model::declaration::DeclarationKind;

    #[test]
    fn accepts_namespaced_identifiers() {
        assert!(is_valid_class_identifier("Foo"));
        assert!(is_valid_class_identifier(r"Foo\Bar\BazInterface"));
        assert!(is_valid_class_identifier(r"\Foo\Bar"));
        assert!(is_valid_class_identifier("app::model::User"));
        assert!(is_valid_class_identifier("_Private1"));
    }

    #[test]
    fn rejects_malformed_identifiers() {
        assert!(!is_valid_class_identifier(""));
        assert!(!is_valid_class_identifier("1Foo"));
        assert!(!is_valid_class_identifier(r"Foo\\Bar"));
        assert!(!is_valid_class_identifier(r"Foo\"));
        assert!(!is_valid_class_identifier("Foo Bar"));
        assert!(!is_valid_class_identifier("Foo:Bar"));
    }

    #[test]
    fn normalize_strips_whitespace_and_leading_separator() {
        assert_eq!(normalize_class_identifier(r"  \Foo\Bar "), Some(r"Foo\Bar"));
        assert_eq!(normalize_class_identifier("   "), None);
    }

    #[test]
    fn class_parameter_error_keeps_declaration_kind() {
        let err = require_class_parameter(" ", DeclarationKind::TypeExtension, Some("svc.ext"))
            .expect_err("blank class must fail");
        assert_eq!(
            err,
            RegistryError::UnresolvedClassParameter {
                kind: DeclarationKind::TypeExtension,
                class: String::new(),
                service_id: Some("svc.ext".to_string()),
            }
        );
    }
}
