//! A `nom`-based lexer for infix expression text.
//!
//! Splitting happens on operator symbols, longest match first, with quoted
//! string contents and bracketed path indices left intact. A rewrite pass
//! then disambiguates unary minus from subtraction by expanding `- x` into
//! `( 0 - x )` wherever the minus starts the expression or follows another
//! operator or an open parenthesis.

use crate::ast::{Op, Token};
use crate::error::ExprError;
use weft_value::Value;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{char, digit0, digit1},
    combinator::{map, opt, recognize, value},
    sequence::{delimited, pair, preceded},
};

/// Lexes `expr` into an infix token sequence with unary minus expanded.
pub fn tokenize(expr: &str) -> Result<Vec<Token>, ExprError> {
    let mut tokens = Vec::new();
    let mut rest = expr.trim_start();
    while !rest.is_empty() {
        let Ok((remaining, token)) = token(rest) else {
            return Err(ExprError::Malformed(expr.to_string()));
        };
        tokens.push(token);
        rest = remaining.trim_start();
    }
    rewrite_unary_minus(tokens, expr)
}

fn token(input: &str) -> IResult<&str, Token> {
    alt((number, string_literal, operator, paren, word)).parse(input)
}

// --- Literal Parsers ---

fn number(input: &str) -> IResult<&str, Token> {
    map(
        recognize(pair(digit1, opt(preceded(char('.'), digit0)))),
        |text: &str| {
            let literal = if text.contains('.') {
                Value::Float(text.parse().unwrap_or(f64::NAN))
            } else {
                match text.parse::<i64>() {
                    Ok(i) => Value::Integer(i),
                    Err(_) => Value::Float(text.parse().unwrap_or(f64::NAN)),
                }
            };
            Token::Literal(literal)
        },
    )
    .parse(input)
}

fn string_literal(input: &str) -> IResult<&str, Token> {
    map(
        delimited(char('\''), take_while(|c| c != '\''), char('\'')),
        |s: &str| Token::Literal(Value::String(s.to_string())),
    )
    .parse(input)
}

// --- Operators & Structure ---

fn operator(input: &str) -> IResult<&str, Token> {
    // Two-character symbols are tried before their one-character prefixes.
    map(
        alt((
            value(Op::Le, tag("<=")),
            value(Op::Ge, tag(">=")),
            value(Op::Eq, tag("==")),
            value(Op::Ne, tag("!=")),
            value(Op::Or, tag("||")),
            value(Op::And, tag("&&")),
            value(Op::Pow, tag("^")),
            value(Op::Mul, tag("*")),
            value(Op::Div, tag("/")),
            value(Op::Mod, tag("%")),
            value(Op::Add, tag("+")),
            value(Op::Sub, tag("-")),
            value(Op::Not, tag("!")),
            value(Op::Lt, tag("<")),
            value(Op::Gt, tag(">")),
        )),
        Token::Op,
    )
    .parse(input)
}

fn paren(input: &str) -> IResult<&str, Token> {
    alt((
        value(Token::OpenParen, char('(')),
        value(Token::CloseParen, char(')')),
    ))
    .parse(input)
}

// --- Variable Paths ---

/// A word is a variable path: identifier characters and dots, with any
/// number of `[...]` index groups. Bracket contents are captured verbatim
/// (nesting and quotes respected) so index sub-expressions survive lexing.
fn word(input: &str) -> IResult<&str, Token> {
    let mut depth = 0usize;
    let mut in_quote = false;
    let mut end = 0;
    for (i, c) in input.char_indices() {
        if in_quote {
            if c == '\'' {
                in_quote = false;
            }
        } else if depth > 0 {
            match c {
                '[' => depth += 1,
                ']' => depth -= 1,
                '\'' => in_quote = true,
                _ => {}
            }
        } else if i == 0 {
            if !(c.is_alphabetic() || c == '_') {
                return fail(input);
            }
        } else {
            match c {
                '[' => depth += 1,
                c if c.is_alphanumeric() || c == '_' || c == '.' => {}
                _ => break,
            }
        }
        end = i + c.len_utf8();
    }
    if end == 0 || depth > 0 || in_quote {
        return fail(input);
    }
    let text = &input[..end];
    let token = match text {
        "true" => Token::Literal(Value::Boolean(true)),
        "false" => Token::Literal(Value::Boolean(false)),
        "null" => Token::Literal(Value::Null),
        path => Token::Path(path.to_string()),
    };
    Ok((&input[end..], token))
}

fn fail(input: &str) -> IResult<&str, Token> {
    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Alpha,
    )))
}

// --- Unary Minus Rewrite ---

fn rewrite_unary_minus(tokens: Vec<Token>, source: &str) -> Result<Vec<Token>, ExprError> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        let unary = matches!(tokens[i], Token::Op(Op::Sub))
            && matches!(
                out.last(),
                None | Some(Token::Op(_)) | Some(Token::OpenParen)
            );
        if !unary {
            out.push(tokens[i].clone());
            i += 1;
            continue;
        }
        out.push(Token::OpenParen);
        out.push(Token::Literal(Value::Integer(0)));
        out.push(Token::Op(Op::Sub));
        i += 1;
        match tokens.get(i) {
            Some(Token::Literal(_)) | Some(Token::Path(_)) => {
                out.push(tokens[i].clone());
                i += 1;
            }
            Some(Token::OpenParen) => {
                // The operand is a whole parenthesized group.
                let mut depth = 0usize;
                loop {
                    match tokens.get(i) {
                        Some(token) => {
                            match token {
                                Token::OpenParen => depth += 1,
                                Token::CloseParen => depth -= 1,
                                _ => {}
                            }
                            out.push(token.clone());
                            i += 1;
                            if depth == 0 {
                                break;
                            }
                        }
                        None => return Err(ExprError::UnbalancedParens(source.to_string())),
                    }
                }
            }
            _ => return Err(ExprError::Malformed(source.to_string())),
        }
        out.push(Token::CloseParen);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longest_operator_match_first() {
        let tokens = tokenize("a<=b").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Path("a".to_string()),
                Token::Op(Op::Le),
                Token::Path("b".to_string()),
            ]
        );
    }

    #[test]
    fn test_quoted_string_contents_kept_intact() {
        let tokens = tokenize("'a + b' + c").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Literal(Value::String("a + b".to_string())),
                Token::Op(Op::Add),
                Token::Path("c".to_string()),
            ]
        );
    }

    #[test]
    fn test_integer_and_float_literals() {
        assert_eq!(
            tokenize("2").unwrap(),
            vec![Token::Literal(Value::Integer(2))]
        );
        assert_eq!(
            tokenize("2.5").unwrap(),
            vec![Token::Literal(Value::Float(2.5))]
        );
    }

    #[test]
    fn test_path_keeps_bracket_group() {
        let tokens = tokenize("user.roles[i+1] + 1").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Path("user.roles[i+1]".to_string()),
                Token::Op(Op::Add),
                Token::Literal(Value::Integer(1)),
            ]
        );
    }

    #[test]
    fn test_leading_minus_is_rewritten() {
        let tokens = tokenize("-5+2").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::OpenParen,
                Token::Literal(Value::Integer(0)),
                Token::Op(Op::Sub),
                Token::Literal(Value::Integer(5)),
                Token::CloseParen,
                Token::Op(Op::Add),
                Token::Literal(Value::Integer(2)),
            ]
        );
    }

    #[test]
    fn test_minus_after_operand_is_subtraction() {
        let tokens = tokenize("5-2").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Literal(Value::Integer(5)),
                Token::Op(Op::Sub),
                Token::Literal(Value::Integer(2)),
            ]
        );
    }

    #[test]
    fn test_minus_before_group_wraps_group() {
        let tokens = tokenize("-(2+3)").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::OpenParen,
                Token::Literal(Value::Integer(0)),
                Token::Op(Op::Sub),
                Token::OpenParen,
                Token::Literal(Value::Integer(2)),
                Token::Op(Op::Add),
                Token::Literal(Value::Integer(3)),
                Token::CloseParen,
                Token::CloseParen,
            ]
        );
    }

    #[test]
    fn test_bool_and_null_words_are_literals() {
        assert_eq!(
            tokenize("true").unwrap(),
            vec![Token::Literal(Value::Boolean(true))]
        );
        assert_eq!(tokenize("null").unwrap(), vec![Token::Literal(Value::Null)]);
    }

    #[test]
    fn test_stray_character_is_malformed() {
        assert!(matches!(tokenize("a @ b"), Err(ExprError::Malformed(_))));
    }

    #[test]
    fn test_unterminated_bracket_is_malformed() {
        assert!(matches!(tokenize("arr[1"), Err(ExprError::Malformed(_))));
    }
}
