//! Declaration-side domain model.
//!
//! # Responsibility
//! - Describe the host type universe (classes and interfaces).
//! - Describe type and extension declarations handed over by the wiring layer.
//! - Define the capabilities declared components must expose.
//!
//! # Invariants
//! - Declarations are plain data until the registry validates them.
//! - Components are shared (`Arc`) and never mutated after declaration.

pub mod class;
pub mod component;
pub mod declaration;
