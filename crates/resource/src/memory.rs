//! In-memory template source.

use crate::{SourceError, TemplateSource};
use std::collections::HashMap;

/// A template source backed by a string map.
///
/// Covers templates embedded in the binary or registered at startup, and
/// keeps tests free of filesystem setup.
#[derive(Debug, Default)]
pub struct MemorySource {
    templates: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `text` under `name`, replacing any previous entry.
    pub fn add(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.templates.insert(name.into(), text.into());
    }

    /// Builder-style variant of [`MemorySource::add`].
    pub fn with(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.add(name, text);
        self
    }
}

impl TemplateSource for MemorySource {
    fn load(&self, name: &str) -> Result<String, SourceError> {
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(name.to_string()))
    }

    fn exists(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    fn name(&self) -> &'static str {
        "MemorySource"
    }
}
