//! The typed error surface of a render, and its sentinel formatting.

use thiserror::Error;
use weft_expr::ExprError;
use weft_resource::SourceError;
use weft_template::TemplateError;

/// Everything that can go wrong during a render.
///
/// Internally errors stay typed so tests can match on kinds; only the
/// `render_*` entry points flatten them into the inline sentinel string.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("FILE IS NOT EXISTS '{0}'")]
    FileNotFound(String),

    #[error("CANNOT READ TEXT FROM FILE '{0}'")]
    FileUnreadable(String),
}

impl From<ExprError> for RenderError {
    fn from(err: ExprError) -> Self {
        RenderError::Template(TemplateError::from(err))
    }
}

/// Formats an error as the fixed inline sentinel that replaces the whole
/// render output at the boundary.
pub fn sentinel(err: &RenderError) -> String {
    format!("<-- ERROR: {err} -->")
}
