//! The two-level variable environment.

use std::collections::HashMap;
use weft_value::Value;

/// Variable bindings visible to an expression: engine-owned internal
/// bindings (assignments, loop variables) layered over the caller's
/// read-only external map. Lookup checks the internal map first.
#[derive(Debug, Default)]
pub struct Environment<'a> {
    internal: HashMap<String, Value>,
    external: Option<&'a HashMap<String, Value>>,
}

impl<'a> Environment<'a> {
    /// An environment with no external bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// An environment layered over the caller's read-only map.
    pub fn with_external(external: &'a HashMap<String, Value>) -> Self {
        Self {
            internal: HashMap::new(),
            external: Some(external),
        }
    }

    /// Binds `name` in the internal map. External bindings are never
    /// written; an internal binding shadows an external one of the same
    /// name from this point on.
    pub fn assign(&mut self, name: &str, value: Value) {
        self.internal.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.internal
            .get(name)
            .or_else(|| self.external.and_then(|external| external.get(name)))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}
