//! weft: a small runtime template engine for server-rendered text.
//!
//! Route handlers of the hosting HTTP server hand the engine a template
//! string (or a template name resolved through a [`TemplateSource`]) plus a
//! variable map, and get back the rendered body. Templates mix literal text
//! with `{{ expr }}` output tags and `{% ... %}` control tags (`FOR`/
//! `BREAKIF`/`ENDFOR`, `IF`/`ELSE`/`ENDIF`, `INCLUDE`), with `-` markers
//! next to tag delimiters trimming neighboring whitespace.
//!
//! The render boundary never panics and never returns `Err` from the
//! `render_*` methods: any failure anywhere in the pipeline replaces the
//! whole output with a single `<-- ERROR: ... -->` string. Hosts that want
//! the typed error use [`Engine::try_render_str`].
//!
//! ```
//! use weft::{Engine, Value};
//! use std::collections::HashMap;
//!
//! let engine = Engine::new();
//! let mut vars = HashMap::new();
//! vars.insert("name".to_string(), Value::from("Ann"));
//!
//! let html = engine.render_str("<p>Hello {{ name }}!</p>", &vars);
//! assert_eq!(html, "<p>Hello Ann!</p>");
//! ```

mod error;

pub use error::{RenderError, sentinel};
pub use weft_expr::{Environment, ExprError};
pub use weft_resource::{FilesystemSource, MemorySource, SourceError, TemplateSource};
pub use weft_template::TemplateError;
pub use weft_value::{AccessorRegistry, FieldAccessor, OpaqueObject, Value};

use std::collections::HashMap;
use std::sync::Arc;

/// The external variable mapping a route handler supplies per render.
pub type Vars = HashMap<String, Value>;

/// The template engine facade.
///
/// Holds only shared immutable configuration (the include source and the
/// host-object accessor registry); every render call builds a fresh element
/// list, environment and output buffer, so one engine can be shared behind
/// `Arc` across worker threads.
#[derive(Debug)]
pub struct Engine {
    source: Arc<dyn TemplateSource>,
    accessors: AccessorRegistry,
}

/// Builder-style configuration for [`Engine`].
#[derive(Debug, Default)]
pub struct EngineBuilder {
    source: Option<Arc<dyn TemplateSource>>,
    accessors: AccessorRegistry,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source used for `INCLUDE` directives and `render_file`.
    pub fn with_source(mut self, source: impl TemplateSource + 'static) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    /// Sets the accessor registry for opaque host objects.
    pub fn with_accessors(mut self, accessors: AccessorRegistry) -> Self {
        self.accessors = accessors;
        self
    }

    pub fn build(self) -> Engine {
        Engine {
            source: self
                .source
                .unwrap_or_else(|| Arc::new(MemorySource::new())),
            accessors: self.accessors,
        }
    }
}

impl Engine {
    /// An engine with an empty in-memory source and no registered
    /// accessors.
    pub fn new() -> Self {
        EngineBuilder::new().build()
    }

    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Renders a template string. On any error the returned text is wholly
    /// the sentinel message; there is no partial output.
    pub fn render_str(&self, template: &str, vars: &Vars) -> String {
        match self.try_render_str(template, vars) {
            Ok(rendered) => rendered,
            Err(err) => {
                log::debug!("render failed: {err}");
                sentinel(&err)
            }
        }
    }

    /// Renders a template string, keeping the typed error.
    pub fn try_render_str(&self, template: &str, vars: &Vars) -> Result<String, RenderError> {
        let expanded = weft_template::expand(template, self.source.as_ref());
        let program = weft_template::parse(&expanded)?;
        let mut env = Environment::with_external(vars);
        let rendered = weft_template::execute(&program, &mut env, &self.accessors)?;
        Ok(rendered)
    }

    /// Renders a template resolved by name through the configured source
    /// (a file under the source's base directory, or an embedded entry).
    pub fn render_file(&self, name: &str, vars: &Vars) -> String {
        if !self.source.exists(name) {
            return sentinel(&RenderError::FileNotFound(name.to_string()));
        }
        match self.source.load(name) {
            Ok(template) => self.render_str(&template, vars),
            Err(_) => sentinel(&RenderError::FileUnreadable(name.to_string())),
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
