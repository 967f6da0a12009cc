use thiserror::Error;
use weft_expr::ExprError;

/// Errors raised while parsing or executing a template.
///
/// Structural errors surface at parse time and abort the whole render;
/// evaluation errors surface while the cursor walks the element list. As in
/// [`ExprError`](weft_expr::ExprError), message bodies are the user-visible
/// text inside the render boundary's sentinel.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TemplateError {
    #[error("UNTERMINATED TAG '{0}'")]
    UnterminatedTag(String),

    #[error("UNKNOWN COMMAND '{0}'")]
    UnknownCommand(String),

    #[error("NUMBER OF 'FOR' AND 'ENDFOR' STATEMENTS DO NOT MATCH")]
    UnbalancedFor,

    #[error("NUMBER OF 'IF' AND 'ENDIF' STATEMENTS DO NOT MATCH")]
    UnbalancedIf,

    #[error("'BREAKIF' WITHOUT 'FOR'")]
    BreakOutsideFor,

    #[error("'ELSE' STATEMENT WITHOUT 'IF'")]
    ElseWithoutIf,

    #[error("MULTIPLE 'ELSE' STATEMENTS IN 'IF' BLOCK")]
    DuplicateElse,

    #[error("UNKNOWN VALUE IN FOR '{0}'")]
    NotIterable(String),

    #[error("INVALID RANGE EXPRESSION '{0}'")]
    InvalidRange(String),

    #[error("'RANGE' BOUNDS IN '{0}' MUST BE NUMERIC")]
    RangeBound(String),

    #[error("'IF' CONDITION '{0}' IS NOT BOOLEAN")]
    NonBooleanCondition(String),

    #[error("'BREAKIF' CONDITION '{0}' IS NOT BOOLEAN")]
    NonBooleanGuard(String),

    #[error("TEMPLATE BLOCK LINKS ARE NOT CONSISTENT")]
    CorruptLinks,

    #[error(transparent)]
    Expr(#[from] ExprError),
}
