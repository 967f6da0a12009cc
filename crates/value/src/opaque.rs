//! Capability-based field access for host objects.
//!
//! Route handlers can hand arbitrary application objects to the template
//! engine. Instead of open-ended runtime introspection, each concrete type
//! registers a single accessor function; a path segment like `user.name`
//! reaches the object only through that registered capability.

use crate::Value;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Signature of a registered field accessor: given the erased object and a
/// field name, produce the field value, or `None` if no such field exists.
pub type FieldAccessor = fn(&dyn Any, &str) -> Option<Value>;

/// A shared, type-erased handle to a host object.
#[derive(Clone)]
pub struct OpaqueObject {
    type_name: &'static str,
    inner: Arc<dyn Any + Send + Sync>,
}

impl OpaqueObject {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            inner: Arc::new(value),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn type_id(&self) -> TypeId {
        (*self.inner).type_id()
    }

    pub fn as_any(&self) -> &dyn Any {
        &*self.inner
    }

    /// Identity comparison; opaque handles have no structural equality.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for OpaqueObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpaqueObject")
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// Registry mapping host-object types to their field accessors.
///
/// One accessor per concrete type; lookups are by `TypeId`, so a value whose
/// type was never registered exposes no fields at all.
#[derive(Default)]
pub struct AccessorRegistry {
    accessors: HashMap<TypeId, FieldAccessor>,
}

impl AccessorRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self {
            accessors: HashMap::new(),
        }
    }

    /// Registers the field accessor for `T`, replacing any previous one.
    pub fn register<T: Any>(&mut self, accessor: FieldAccessor) {
        self.accessors.insert(TypeId::of::<T>(), accessor);
    }

    /// Resolves `field` on `object`. `None` when the object's type has no
    /// registered accessor or the accessor does not know the field.
    pub fn field(&self, object: &OpaqueObject, field: &str) -> Option<Value> {
        let accessor = self.accessors.get(&object.type_id())?;
        accessor(object.as_any(), field)
    }
}

impl fmt::Debug for AccessorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessorRegistry")
            .field("types", &self.accessors.len())
            .finish()
    }
}
