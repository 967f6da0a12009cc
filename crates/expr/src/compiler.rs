//! Infix to postfix conversion via the shunting-yard algorithm.

use crate::ast::Token;
use crate::error::ExprError;
use crate::lexer;

/// Compiles infix expression text into an ordered postfix token sequence.
pub fn compile(expr: &str) -> Result<Vec<Token>, ExprError> {
    let tokens = lexer::tokenize(expr)?;
    to_postfix(tokens, expr)
}

fn to_postfix(tokens: Vec<Token>, source: &str) -> Result<Vec<Token>, ExprError> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Token> = Vec::new();

    for token in tokens {
        match token {
            Token::Literal(_) | Token::Path(_) => output.push(token),
            Token::OpenParen => stack.push(token),
            Token::CloseParen => loop {
                match stack.pop() {
                    Some(Token::OpenParen) => break,
                    Some(op) => output.push(op),
                    None => return Err(ExprError::UnbalancedParens(source.to_string())),
                }
            },
            Token::Op(op) => {
                // Left associative: pop while the stacked operator binds at
                // least as tightly. An open parenthesis stops the scan.
                while matches!(stack.last(), Some(Token::Op(top)) if top.precedence() >= op.precedence())
                {
                    if let Some(popped) = stack.pop() {
                        output.push(popped);
                    }
                }
                stack.push(Token::Op(op));
            }
        }
    }

    while let Some(token) = stack.pop() {
        match token {
            Token::Op(_) => output.push(token),
            _ => return Err(ExprError::UnbalancedParens(source.to_string())),
        }
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Op;
    use weft_value::Value;

    fn int(i: i64) -> Token {
        Token::Literal(Value::Integer(i))
    }

    #[test]
    fn test_precedence_orders_output() {
        // 2+3*4 compiles to 2 3 4 * +
        let postfix = compile("2+3*4").unwrap();
        assert_eq!(
            postfix,
            vec![
                int(2),
                int(3),
                int(4),
                Token::Op(Op::Mul),
                Token::Op(Op::Add),
            ]
        );
    }

    #[test]
    fn test_parentheses_override_precedence() {
        // (2+3)*4 compiles to 2 3 + 4 *
        let postfix = compile("(2+3)*4").unwrap();
        assert_eq!(
            postfix,
            vec![
                int(2),
                int(3),
                Token::Op(Op::Add),
                int(4),
                Token::Op(Op::Mul),
            ]
        );
    }

    #[test]
    fn test_equal_precedence_is_left_associative() {
        // 8-3-2 compiles to 8 3 - 2 -
        let postfix = compile("8-3-2").unwrap();
        assert_eq!(
            postfix,
            vec![
                int(8),
                int(3),
                Token::Op(Op::Sub),
                int(2),
                Token::Op(Op::Sub),
            ]
        );
    }

    #[test]
    fn test_comparison_binds_looser_than_arithmetic() {
        let postfix = compile("a+1 < b*2").unwrap();
        assert_eq!(
            postfix,
            vec![
                Token::Path("a".to_string()),
                int(1),
                Token::Op(Op::Add),
                Token::Path("b".to_string()),
                int(2),
                Token::Op(Op::Mul),
                Token::Op(Op::Lt),
            ]
        );
    }

    #[test]
    fn test_unbalanced_close_paren() {
        assert!(matches!(
            compile("2+3)"),
            Err(ExprError::UnbalancedParens(_))
        ));
    }

    #[test]
    fn test_unbalanced_open_paren() {
        assert!(matches!(
            compile("(2+3"),
            Err(ExprError::UnbalancedParens(_))
        ));
    }
}
