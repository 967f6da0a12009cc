//! Foundation value model for the weft template engine.
//!
//! Template expressions are dynamically typed: the same operand slot can hold
//! a number, a string, a collection, or a handle to a host object supplied by
//! a route handler. This crate defines that tagged union ([`Value`]) together
//! with its stringification rules, conversions from `serde_json::Value`, and
//! the capability-based [`AccessorRegistry`] that makes host-object fields
//! reachable from template paths without runtime introspection.

mod opaque;
mod value;

pub use opaque::{AccessorRegistry, FieldAccessor, OpaqueObject};
pub use value::Value;
