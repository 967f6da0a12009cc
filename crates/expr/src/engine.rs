//! Postfix evaluation over an operand stack, plus top-level assignment.

use crate::ast::{Op, Token};
use crate::compiler;
use crate::env::Environment;
use crate::error::ExprError;
use crate::path;
use weft_value::{AccessorRegistry, Value};

/// Evaluates `expr` against the environment.
///
/// An un-parenthesized top-level `name = <expr>` form is assignment: the
/// right side is evaluated, stored into the internal environment, and the
/// whole expression yields the empty string.
pub fn evaluate(
    expr: &str,
    env: &mut Environment,
    accessors: &AccessorRegistry,
) -> Result<Value, ExprError> {
    if let Some((name, rhs)) = assignment(expr) {
        let value = eval_expr(rhs, env, accessors)?;
        env.assign(name, value);
        return Ok(Value::String(String::new()));
    }
    eval_expr(expr, env, accessors)
}

/// Compiles and evaluates without assignment handling. Bracket-index
/// sub-expressions re-enter here from the path resolver.
pub(crate) fn eval_expr(
    expr: &str,
    env: &Environment,
    accessors: &AccessorRegistry,
) -> Result<Value, ExprError> {
    let postfix = compiler::compile(expr)?;
    let mut stack: Vec<Value> = Vec::new();
    for token in postfix {
        match token {
            Token::Literal(value) => stack.push(value),
            Token::Path(p) => stack.push(path::resolve(&p, env, accessors)?),
            Token::Op(op) => apply(op, &mut stack)?,
            Token::OpenParen | Token::CloseParen => {
                return Err(ExprError::Malformed(expr.to_string()));
            }
        }
    }
    stack.pop().ok_or(ExprError::EmptyStack)
}

/// Matches `name = <expr>` where `name` is a plain identifier and the `=`
/// is not part of `==`.
fn assignment(expr: &str) -> Option<(&str, &str)> {
    let s = expr.trim();
    let mut chars = s.char_indices();
    let (_, first) = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    let mut name_end = first.len_utf8();
    for (i, c) in chars {
        if c.is_ascii_alphanumeric() || c == '_' {
            name_end = i + c.len_utf8();
        } else {
            break;
        }
    }
    let rhs = s[name_end..].trim_start().strip_prefix('=')?;
    if rhs.starts_with('=') || rhs.trim().is_empty() {
        return None;
    }
    Some((&s[..name_end], rhs.trim()))
}

fn apply(op: Op, stack: &mut Vec<Value>) -> Result<(), ExprError> {
    let result = if op == Op::Not {
        let operand = stack.pop().ok_or(ExprError::EmptyStack)?;
        match operand {
            Value::Boolean(b) => Value::Boolean(!b),
            other => {
                return Err(ExprError::IncompatibleUnary {
                    op: "!",
                    operand: other.to_string(),
                });
            }
        }
    } else {
        let x2 = stack.pop().ok_or(ExprError::EmptyStack)?;
        let x1 = stack.pop().ok_or(ExprError::EmptyStack)?;
        binary(op, x1, x2)?
    };
    stack.push(result);
    Ok(())
}

fn binary(op: Op, x1: Value, x2: Value) -> Result<Value, ExprError> {
    // Inherited default: a null left operand of an arithmetic or
    // concatenation operator becomes "" against a string, 0 otherwise.
    let arithmetic = matches!(
        op,
        Op::Add | Op::Sub | Op::Mul | Op::Div | Op::Mod | Op::Pow
    );
    let x1 = if arithmetic && x1.is_null() {
        if x2.is_string() {
            Value::String(String::new())
        } else {
            Value::Integer(0)
        }
    } else {
        x1
    };

    match op {
        Op::Add if x1.is_string() || x2.is_string() => Ok(Value::String(format!("{x1}{x2}"))),
        Op::Add | Op::Sub | Op::Mul | Op::Div | Op::Mod | Op::Pow => numeric(op, &x1, &x2),
        Op::Eq => Ok(Value::Boolean(values_equal(op, &x1, &x2)?)),
        Op::Ne => Ok(Value::Boolean(!values_equal(op, &x1, &x2)?)),
        Op::Lt | Op::Gt | Op::Le | Op::Ge => compare(op, &x1, &x2),
        Op::And | Op::Or => logical(op, &x1, &x2),
        Op::Not => Err(ExprError::UnknownOperator(op.symbol().to_string())),
    }
}

/// Integer arithmetic stays in integers (`/` truncates) and falls back to
/// floats on overflow; any float operand promotes; `^` always yields a
/// float.
fn numeric(op: Op, x1: &Value, x2: &Value) -> Result<Value, ExprError> {
    if matches!(op, Op::Div | Op::Mod) && matches!(x2.as_f64(), Some(d) if d == 0.0) {
        return Err(ExprError::DivisionByZero {
            left: x1.to_string(),
            right: x2.to_string(),
        });
    }

    if let (Value::Integer(a), Value::Integer(b)) = (x1, x2) {
        if op != Op::Pow {
            let (a, b) = (*a, *b);
            let checked = match op {
                Op::Add => a.checked_add(b),
                Op::Sub => a.checked_sub(b),
                Op::Mul => a.checked_mul(b),
                Op::Div => a.checked_div(b),
                Op::Mod => a.checked_rem(b),
                _ => None,
            };
            return Ok(match checked {
                Some(i) => Value::Integer(i),
                None => Value::Float(float_op(op, a as f64, b as f64)),
            });
        }
    }

    let (Some(a), Some(b)) = (x1.as_f64(), x2.as_f64()) else {
        return Err(ExprError::IncompatibleOperands {
            op: op.symbol(),
            left: x1.to_string(),
            right: x2.to_string(),
        });
    };
    Ok(Value::Float(float_op(op, a, b)))
}

fn float_op(op: Op, a: f64, b: f64) -> f64 {
    match op {
        Op::Add => a + b,
        Op::Sub => a - b,
        Op::Mul => a * b,
        Op::Div => a / b,
        Op::Mod => a % b,
        Op::Pow => a.powf(b),
        _ => f64::NAN,
    }
}

/// Same-tag values compare structurally; an integer and a float compare
/// numerically; every other cross-tag pairing is incomparable.
fn values_equal(op: Op, x1: &Value, x2: &Value) -> Result<bool, ExprError> {
    match (x1, x2) {
        (Value::Integer(a), Value::Float(b)) | (Value::Float(b), Value::Integer(a)) => {
            Ok(*a as f64 == *b)
        }
        _ if x1.type_name() == x2.type_name() => Ok(x1 == x2),
        _ => Err(ExprError::IncompatibleOperands {
            op: op.symbol(),
            left: x1.to_string(),
            right: x2.to_string(),
        }),
    }
}

fn compare(op: Op, x1: &Value, x2: &Value) -> Result<Value, ExprError> {
    let (Some(a), Some(b)) = (x1.as_f64(), x2.as_f64()) else {
        return Err(ExprError::IncompatibleOperands {
            op: op.symbol(),
            left: x1.to_string(),
            right: x2.to_string(),
        });
    };
    Ok(Value::Boolean(match op {
        Op::Lt => a < b,
        Op::Gt => a > b,
        Op::Le => a <= b,
        Op::Ge => a >= b,
        _ => false,
    }))
}

fn logical(op: Op, x1: &Value, x2: &Value) -> Result<Value, ExprError> {
    let (Some(a), Some(b)) = (x1.as_bool(), x2.as_bool()) else {
        return Err(ExprError::IncompatibleOperands {
            op: op.symbol(),
            left: x1.to_string(),
            right: x2.to_string(),
        });
    };
    Ok(Value::Boolean(if op == Op::And { a && b } else { a || b }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn eval(expr: &str) -> Result<Value, ExprError> {
        let mut env = Environment::new();
        evaluate(expr, &mut env, &AccessorRegistry::new())
    }

    #[test]
    fn test_arithmetic_precedence() {
        assert_eq!(eval("2+3*4").unwrap(), Value::Integer(14));
    }

    #[test]
    fn test_unary_minus() {
        assert_eq!(eval("-5+2").unwrap(), Value::Integer(-3));
    }

    #[test]
    fn test_string_concatenation() {
        assert_eq!(eval("'a' + 'b'").unwrap(), Value::from("ab"));
        assert_eq!(eval("'n=' + 3").unwrap(), Value::from("n=3"));
    }

    #[test]
    fn test_division_by_zero() {
        assert!(matches!(eval("10/0"), Err(ExprError::DivisionByZero { .. })));
        assert!(matches!(eval("7%0"), Err(ExprError::DivisionByZero { .. })));
    }

    #[test]
    fn test_integer_division_truncates() {
        assert_eq!(eval("7/2").unwrap(), Value::Integer(3));
        assert_eq!(eval("7.0/2").unwrap(), Value::Float(3.5));
    }

    #[test]
    fn test_power_yields_float() {
        assert_eq!(eval("2^10").unwrap(), Value::Float(1024.0));
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(eval("2 < 3").unwrap(), Value::Boolean(true));
        assert_eq!(eval("2 >= 3").unwrap(), Value::Boolean(false));
        assert_eq!(eval("1 <= 1.5").unwrap(), Value::Boolean(true));
    }

    #[test]
    fn test_equality_and_cross_type() {
        assert_eq!(eval("1 == 1").unwrap(), Value::Boolean(true));
        assert_eq!(eval("1 == 1.0").unwrap(), Value::Boolean(true));
        assert_eq!(eval("'a' != 'b'").unwrap(), Value::Boolean(true));
        assert!(matches!(
            eval("'a' == 1"),
            Err(ExprError::IncompatibleOperands { .. })
        ));
    }

    #[test]
    fn test_boolean_logic() {
        assert_eq!(eval("true && false").unwrap(), Value::Boolean(false));
        assert_eq!(eval("true || false").unwrap(), Value::Boolean(true));
        assert_eq!(eval("!true").unwrap(), Value::Boolean(false));
        assert_eq!(eval("!(1 == 2)").unwrap(), Value::Boolean(true));
    }

    #[test]
    fn test_not_requires_boolean() {
        assert!(matches!(
            eval("!3"),
            Err(ExprError::IncompatibleUnary { .. })
        ));
    }

    #[test]
    fn test_logic_requires_booleans() {
        assert!(matches!(
            eval("true && 1"),
            Err(ExprError::IncompatibleOperands { .. })
        ));
    }

    #[test]
    fn test_null_left_operand_coercion() {
        let mut vars = HashMap::new();
        vars.insert("n".to_string(), Value::Null);
        let mut env = Environment::with_external(&vars);
        let accessors = AccessorRegistry::new();

        // Null + string coerces to "", null + number coerces to 0.
        assert_eq!(
            evaluate("n + 'x'", &mut env, &accessors).unwrap(),
            Value::from("x")
        );
        assert_eq!(
            evaluate("n + 5", &mut env, &accessors).unwrap(),
            Value::Integer(5)
        );
    }

    #[test]
    fn test_assignment_yields_empty_and_binds() {
        let mut env = Environment::new();
        let accessors = AccessorRegistry::new();
        let result = evaluate("x = 2 + 3", &mut env, &accessors).unwrap();
        assert_eq!(result, Value::from(""));
        assert_eq!(env.get("x"), Some(&Value::Integer(5)));
    }

    #[test]
    fn test_equality_is_not_assignment() {
        let mut env = Environment::new();
        let accessors = AccessorRegistry::new();
        let result = evaluate("3 == 3", &mut env, &accessors).unwrap();
        assert_eq!(result, Value::Boolean(true));
        // `x == y` must not bind x.
        env.assign("x", Value::Integer(1));
        evaluate("x == 1", &mut env, &accessors).unwrap();
        assert_eq!(env.get("x"), Some(&Value::Integer(1)));
    }

    #[test]
    fn test_assignment_right_side_may_contain_equality() {
        let mut env = Environment::new();
        let accessors = AccessorRegistry::new();
        evaluate("ok = 1 == 1", &mut env, &accessors).unwrap();
        assert_eq!(env.get("ok"), Some(&Value::Boolean(true)));
    }

    #[test]
    fn test_variable_resolution_during_evaluation() {
        let mut vars = HashMap::new();
        vars.insert("price".to_string(), Value::Integer(40));
        let mut env = Environment::with_external(&vars);
        let accessors = AccessorRegistry::new();
        assert_eq!(
            evaluate("price * 2 + 1", &mut env, &accessors).unwrap(),
            Value::Integer(81)
        );
    }

    #[test]
    fn test_undefined_variable_reported() {
        assert_eq!(
            eval("ghost + 1"),
            Err(ExprError::UndefinedVariable("ghost".to_string()))
        );
    }
}
