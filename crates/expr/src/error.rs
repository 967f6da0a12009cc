use thiserror::Error;

/// Errors produced while compiling or evaluating an expression.
///
/// The message bodies double as the user-visible text inside the render
/// boundary's `<-- ERROR: ... -->` sentinel, so they keep the wording the
/// hosting server's templates have always shown.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExprError {
    #[error("VALUE '{0}' IS NOT DEFINED")]
    UndefinedVariable(String),

    #[error("ELEMENT '{field}' OF VALUE '{path}' IS UNKNOWN")]
    UnknownMember { field: String, path: String },

    #[error("ARRAY '{0}' - INDEX OUT OF RANGE")]
    IndexOutOfRange(String),

    #[error("UNKNOWN INDEXER '{0}' FOR ARRAY")]
    UnknownIndexer(String),

    #[error("DIVISION BY ZERO '{left}' / '{right}'")]
    DivisionByZero { left: String, right: String },

    #[error("INCOMPATIBLE OPERANDS '{left}' AND '{right}' FOR OPERATOR '{op}'")]
    IncompatibleOperands {
        op: &'static str,
        left: String,
        right: String,
    },

    #[error("OPERATOR '{op}' IS INCOMPATIBLE WITH OPERAND '{operand}'")]
    IncompatibleUnary { op: &'static str, operand: String },

    #[error("UNKNOWN OPERATOR '{0}'")]
    UnknownOperator(String),

    #[error("UNBALANCED PARENTHESES IN EXPRESSION '{0}'")]
    UnbalancedParens(String),

    #[error("MALFORMED EXPRESSION '{0}'")]
    Malformed(String),

    #[error("THE VALUE '{0}' MUST BE NUMERIC")]
    NotNumeric(String),

    #[error("EXPRESSION YIELDS NO VALUE")]
    EmptyStack,
}
