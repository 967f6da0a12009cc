//! Infix expression compilation and evaluation for weft templates.
//!
//! Expressions reach this crate as the raw text between `{{ }}` delimiters
//! or inside control tags. The pipeline is: lex (operator splitting, literal
//! classification), rewrite unary minus, convert to postfix with the
//! shunting-yard algorithm, then run the postfix stream on an operand stack.
//! Variable path tokens are resolved on demand against the two-level
//! [`Environment`], navigating nested maps, sequences, and registered host
//! objects.

pub mod ast;
pub mod compiler;
pub mod engine;
pub mod env;
pub mod error;
pub mod lexer;
pub mod path;

pub use ast::{Op, Token};
pub use engine::evaluate;
pub use env::Environment;
pub use error::ExprError;
pub use path::resolve;
