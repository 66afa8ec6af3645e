//! Host type universe and ancestor resolution.
//!
//! # Responsibility
//! - Hold the classes and interfaces the host application declares.
//! - Produce the ancestor chain used to find inherited type declarations.
//!
//! # Invariants
//! - Descriptors are declared parent-first, so every referenced superclass
//!   and interface is known and the graph is acyclic.
//! - Ancestor order is: self, superclass chain, then interfaces breadth-first
//!   in declaration order; every identifier is yielded once.

use crate::error::{RegistryError, RegistryResult};
use crate::model::class::ClassDescriptor;
use crate::validation::normalize_class_identifier;
use log::debug;
use std::collections::{BTreeMap, HashSet, VecDeque};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Class declaration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    InvalidName(String),
    DuplicateClass(String),
    UnknownSuperclass { class: String, superclass: String },
    SuperclassIsInterface { class: String, superclass: String },
    InterfaceWithSuperclass(String),
    UnknownInterface { class: String, interface: String },
    InterfaceExpected { class: String, name: String },
}

impl Display for HierarchyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName(value) => write!(f, "class name is invalid: `{value}`"),
            Self::DuplicateClass(value) => write!(f, "class already declared: {value}"),
            Self::UnknownSuperclass { class, superclass } => {
                write!(f, "class {class} extends undeclared class {superclass}")
            }
            Self::SuperclassIsInterface { class, superclass } => {
                write!(f, "class {class} cannot extend interface {superclass}")
            }
            Self::InterfaceWithSuperclass(value) => {
                write!(f, "interface {value} cannot have a superclass")
            }
            Self::UnknownInterface { class, interface } => {
                write!(f, "{class} implements undeclared interface {interface}")
            }
            Self::InterfaceExpected { class, name } => {
                write!(f, "{class} lists {name} as an interface, but it is a class")
            }
        }
    }
}

impl Error for HierarchyError {}

/// Declared classes and interfaces, keyed by normalized name.
#[derive(Debug, Clone, Default)]
pub struct ClassHierarchy {
    classes: BTreeMap<String, ClassDescriptor>,
}

impl ClassHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares one class or interface.
    ///
    /// Names are normalized; the stored descriptor uses normalized names.
    pub fn declare(&mut self, descriptor: ClassDescriptor) -> Result<(), HierarchyError> {
        let name = normalize_name(&descriptor.name)?;
        if self.classes.contains_key(name.as_str()) {
            return Err(HierarchyError::DuplicateClass(name));
        }

        let superclass = match descriptor.superclass.as_deref() {
            Some(raw) => {
                if descriptor.is_interface() {
                    return Err(HierarchyError::InterfaceWithSuperclass(name));
                }
                let superclass = normalize_name(raw)?;
                match self.classes.get(superclass.as_str()) {
                    None => {
                        return Err(HierarchyError::UnknownSuperclass {
                            class: name,
                            superclass,
                        })
                    }
                    Some(parent) if parent.is_interface() => {
                        return Err(HierarchyError::SuperclassIsInterface {
                            class: name,
                            superclass,
                        })
                    }
                    Some(_) => Some(superclass),
                }
            }
            None => None,
        };

        let mut interfaces = Vec::with_capacity(descriptor.interfaces.len());
        for raw in &descriptor.interfaces {
            let interface = normalize_name(raw)?;
            match self.classes.get(interface.as_str()) {
                None => {
                    return Err(HierarchyError::UnknownInterface {
                        class: name,
                        interface,
                    })
                }
                Some(found) if !found.is_interface() => {
                    return Err(HierarchyError::InterfaceExpected {
                        class: name,
                        name: interface,
                    })
                }
                Some(_) => {}
            }
            if !interfaces.contains(&interface) {
                interfaces.push(interface);
            }
        }

        debug!(
            "event=class_declare module=hierarchy status=ok class={} kind={:?}",
            name, descriptor.kind
        );
        self.classes.insert(
            name.clone(),
            ClassDescriptor {
                name,
                kind: descriptor.kind,
                superclass,
                interfaces,
            },
        );
        Ok(())
    }

    pub fn contains(&self, class: &str) -> bool {
        self.classes.contains_key(class)
    }

    pub fn get(&self, class: &str) -> Option<&ClassDescriptor> {
        self.classes.get(class)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Returns the lazy ancestor chain of `class`, starting with `class`.
    pub fn ancestors(&self, class: &str) -> RegistryResult<Ancestors<'_>> {
        let start = self
            .classes
            .get(class)
            .ok_or_else(|| RegistryError::UnresolvableHierarchy {
                class: class.to_string(),
                service_id: None,
            })?;
        Ok(Ancestors {
            hierarchy: self,
            cursor: Some(start),
            interfaces: VecDeque::new(),
            seen: HashSet::new(),
        })
    }

    /// Returns whether `ancestor` appears in the ancestor chain of `class`.
    pub fn is_subtype_of(&self, class: &str, ancestor: &str) -> bool {
        self.ancestors(class)
            .map(|mut chain| chain.any(|name| name == ancestor))
            .unwrap_or(false)
    }
}

/// Iterator over one class's ancestors, most specific first.
#[derive(Debug)]
pub struct Ancestors<'h> {
    hierarchy: &'h ClassHierarchy,
    cursor: Option<&'h ClassDescriptor>,
    interfaces: VecDeque<&'h str>,
    seen: HashSet<&'h str>,
}

impl<'h> Iterator for Ancestors<'h> {
    type Item = &'h str;

    fn next(&mut self) -> Option<&'h str> {
        let hierarchy = self.hierarchy;
        if let Some(current) = self.cursor.take() {
            self.interfaces
                .extend(current.interfaces.iter().map(String::as_str));
            self.cursor = current
                .superclass
                .as_deref()
                .and_then(|superclass| hierarchy.get(superclass));
            self.seen.insert(current.name.as_str());
            return Some(current.name.as_str());
        }

        while let Some(interface) = self.interfaces.pop_front() {
            if !self.seen.insert(interface) {
                continue;
            }
            if let Some(descriptor) = hierarchy.get(interface) {
                self.interfaces
                    .extend(descriptor.interfaces.iter().map(String::as_str));
            }
            return Some(interface);
        }
        None
    }
}

fn normalize_name(raw: &str) -> Result<String, HierarchyError> {
    normalize_class_identifier(raw)
        .map(str::to_string)
        .ok_or_else(|| HierarchyError::InvalidName(raw.to_string()))
}
