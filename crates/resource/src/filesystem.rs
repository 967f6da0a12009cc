//! Filesystem-backed template source.
//!
//! Loads template files relative to a base directory with guards against
//! path traversal: template names come out of `INCLUDE` directives inside
//! documents, so a name like `../../etc/passwd` must never leave the base
//! directory.

use crate::{SourceError, TemplateSource};
use std::path::{Path, PathBuf};

/// A template source that loads files from a base directory.
///
/// Names are resolved relative to the base path, which is typically the
/// server's template directory. Absolute names and names that escape the
/// base directory resolve to `NotFound`.
#[derive(Debug)]
pub struct FilesystemSource {
    base_path: PathBuf,
    /// Canonicalized base path for containment checks
    canonical_base: Option<PathBuf>,
}

impl FilesystemSource {
    /// Creates a filesystem source rooted at `base_path`. The base is
    /// canonicalized up front; this may fail if the directory does not
    /// exist yet, in which case only the component check below applies.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        let base = base_path.as_ref().to_path_buf();
        let canonical = base.canonicalize().ok();
        Self {
            base_path: base,
            canonical_base: canonical,
        }
    }

    /// Returns the base path for this source.
    pub fn base(&self) -> &Path {
        &self.base_path
    }

    /// Resolves and validates a name relative to the base path.
    ///
    /// Returns `None` if the path would escape the base directory.
    fn resolve_path_safe(&self, name: &str) -> Option<PathBuf> {
        if Path::new(name).is_absolute() {
            return None;
        }

        let full_path = self.base_path.join(name);

        if let Ok(canonical) = full_path.canonicalize()
            && let Some(ref base) = self.canonical_base
        {
            if canonical.starts_with(base) {
                return Some(canonical);
            }
            // Escapes the base directory
            return None;
        }

        // Canonicalization fails for files that do not exist; fall back to
        // rejecting any `..` component.
        for component in Path::new(name).components() {
            if let std::path::Component::ParentDir = component {
                return None;
            }
        }

        Some(full_path)
    }
}

impl TemplateSource for FilesystemSource {
    fn load(&self, name: &str) -> Result<String, SourceError> {
        let full_path = self
            .resolve_path_safe(name)
            .ok_or_else(|| SourceError::NotFound(name.to_string()))?;

        std::fs::read_to_string(&full_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SourceError::NotFound(name.to_string())
            } else {
                SourceError::LoadFailed {
                    path: name.to_string(),
                    message: e.to_string(),
                }
            }
        })
    }

    fn exists(&self, name: &str) -> bool {
        self.resolve_path_safe(name)
            .map(|p| p.is_file())
            .unwrap_or(false)
    }

    fn name(&self) -> &'static str {
        "FilesystemSource"
    }
}
