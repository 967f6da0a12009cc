//! Template sources for the weft engine.
//!
//! Includes and file renders resolve template names through the
//! [`TemplateSource`] trait, so the engine never touches the filesystem
//! directly. Two implementations are provided:
//!
//! - [`FilesystemSource`]: loads template files relative to a base directory
//! - [`MemorySource`]: serves templates embedded in the binary or built up
//!   at startup

mod filesystem;
mod memory;

pub use filesystem::FilesystemSource;
pub use memory::MemorySource;

use std::fmt::Debug;
use thiserror::Error;

/// Error type for template source lookups.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    #[error("TEMPLATE '{0}' IS NOT FOUND")]
    NotFound(String),

    #[error("CANNOT READ TEXT FROM FILE '{path}': {message}")]
    LoadFailed { path: String, message: String },
}

/// A named source of template text.
///
/// The engine resolves `{% INCLUDE 'name' %}` directives and
/// `render_file` calls through this trait; what a name means (relative
/// file path, embedded resource key) is up to the implementation.
pub trait TemplateSource: Send + Sync + Debug {
    /// Load the template text registered under `name`.
    fn load(&self, name: &str) -> Result<String, SourceError>;

    /// Check whether `name` resolves without loading it.
    fn exists(&self, name: &str) -> bool;

    /// Provider name for diagnostics.
    fn name(&self) -> &'static str;
}
