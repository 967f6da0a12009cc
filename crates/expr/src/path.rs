//! Dotted/bracketed variable path resolution.
//!
//! A path token like `user.roles[i+1].name` is split into segments on
//! top-level dots. The first segment must resolve in the environment;
//! each later segment navigates one level into the current value: map key,
//! registered host-object field, or bracket index. Bracket contents on a
//! sequence are full sub-expressions, evaluated recursively.

use crate::engine;
use crate::env::Environment;
use crate::error::ExprError;
use weft_value::{AccessorRegistry, Value};

struct Segment<'s> {
    name: &'s str,
    indices: Vec<&'s str>,
}

/// Resolves a path token to a value. Literal forms (`true`, `null`,
/// numbers, quoted strings) resolve as constants without touching the
/// environment.
pub fn resolve(
    path: &str,
    env: &Environment,
    accessors: &AccessorRegistry,
) -> Result<Value, ExprError> {
    let token = path.trim();
    if let Some(constant) = parse_constant(token) {
        return Ok(constant);
    }

    let segments = split_segments(token)?;
    let Some((first, rest)) = segments.split_first() else {
        return Err(ExprError::Malformed(path.to_string()));
    };

    let mut current = env
        .get(first.name)
        .cloned()
        .ok_or_else(|| ExprError::UndefinedVariable(first.name.to_string()))?;
    current = apply_indices(current, &first.indices, env, accessors)?;

    for segment in rest {
        current = member(current, segment.name, token, accessors)?;
        current = apply_indices(current, &segment.indices, env, accessors)?;
    }
    Ok(current)
}

fn parse_constant(token: &str) -> Option<Value> {
    match token {
        "true" => return Some(Value::Boolean(true)),
        "false" => return Some(Value::Boolean(false)),
        "null" => return Some(Value::Null),
        _ => {}
    }
    if token.len() >= 2 && token.starts_with('\'') && token.ends_with('\'') {
        return Some(Value::String(token[1..token.len() - 1].to_string()));
    }
    if token.chars().next()?.is_ascii_digit() {
        if let Ok(i) = token.parse::<i64>() {
            return Some(Value::Integer(i));
        }
        if let Ok(f) = token.parse::<f64>() {
            return Some(Value::Float(f));
        }
    }
    None
}

/// Splits on dots outside brackets; captures each `[...]` group verbatim.
/// Structure characters are ASCII, so byte scanning is safe here.
fn split_segments(token: &str) -> Result<Vec<Segment<'_>>, ExprError> {
    let bytes = token.as_bytes();
    let mut segments = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let start = pos;
        while pos < bytes.len() && bytes[pos] != b'.' && bytes[pos] != b'[' {
            pos += 1;
        }
        let name = &token[start..pos];

        let mut indices = Vec::new();
        while pos < bytes.len() && bytes[pos] == b'[' {
            let open = pos;
            let mut depth = 0usize;
            let mut in_quote = false;
            while pos < bytes.len() {
                let c = bytes[pos];
                if in_quote {
                    if c == b'\'' {
                        in_quote = false;
                    }
                } else {
                    match c {
                        b'\'' => in_quote = true,
                        b'[' => depth += 1,
                        b']' => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                        }
                        _ => {}
                    }
                }
                pos += 1;
            }
            if pos >= bytes.len() {
                return Err(ExprError::Malformed(token.to_string()));
            }
            indices.push(token[open + 1..pos].trim());
            pos += 1;
        }

        if pos < bytes.len() {
            if bytes[pos] == b'.' {
                pos += 1;
            } else {
                return Err(ExprError::Malformed(token.to_string()));
            }
        }
        if name.is_empty() && indices.is_empty() {
            return Err(ExprError::Malformed(token.to_string()));
        }
        segments.push(Segment { name, indices });
    }

    Ok(segments)
}

/// One dotted step into `current`: map key lookup (missing key resolves to
/// null), or a registered field on an opaque host object.
fn member(
    current: Value,
    field: &str,
    path: &str,
    accessors: &AccessorRegistry,
) -> Result<Value, ExprError> {
    match current {
        Value::Map(entries) => Ok(entries.get(field).cloned().unwrap_or(Value::Null)),
        Value::Opaque(ref object) => {
            accessors
                .field(object, field)
                .ok_or_else(|| ExprError::UnknownMember {
                    field: field.to_string(),
                    path: path.to_string(),
                })
        }
        _ => Err(ExprError::UnknownMember {
            field: field.to_string(),
            path: path.to_string(),
        }),
    }
}

fn apply_indices(
    mut current: Value,
    indices: &[&str],
    env: &Environment,
    accessors: &AccessorRegistry,
) -> Result<Value, ExprError> {
    for index in indices {
        current = match current {
            // Map brackets take a literal string key; quotes are stripped.
            Value::Map(entries) => {
                let key = index.trim_matches(|c| c == '\'' || c == '"');
                entries.get(key).cloned().unwrap_or(Value::Null)
            }
            // Sequence brackets hold a sub-expression evaluated recursively.
            Value::Sequence(mut items) => {
                let evaluated = engine::eval_expr(index, env, accessors)?;
                let position = match evaluated {
                    Value::Integer(i) => i,
                    Value::Float(f) if f.fract() == 0.0 => f as i64,
                    _ => return Err(ExprError::UnknownIndexer(index.to_string())),
                };
                if position < 0 || position as usize >= items.len() {
                    return Err(ExprError::IndexOutOfRange(index.to_string()));
                }
                items.swap_remove(position as usize)
            }
            _ => return Err(ExprError::UnknownIndexer(index.to_string())),
        };
    }
    Ok(current)
}
