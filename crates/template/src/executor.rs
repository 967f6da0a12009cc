//! Cursor-driven instruction executor.
//!
//! A cursor walks the linked element list under a single `active` flag plus
//! a stack of saved flags for nested conditionals. Loops keep their live
//! iterator in a side table indexed by the FOR header's element index; the
//! program itself is never mutated, so jump targets stay exactly as the
//! parser validated them. There is no iteration cap: a generator that never
//! exhausts (for example a zero step) does not terminate, and bounding it
//! is the caller's responsibility.

use crate::element::{ElementKind, Program};
use crate::error::TemplateError;
use log::{debug, trace};
use std::collections::BTreeMap;
use weft_expr::{Environment, evaluate};
use weft_value::{AccessorRegistry, Value};

/// Runs the program, appending rendered output to a fresh buffer.
pub fn execute(
    program: &Program,
    env: &mut Environment,
    accessors: &AccessorRegistry,
) -> Result<String, TemplateError> {
    let mut out = String::new();
    let mut cursor = 0usize;
    let mut active = true;
    let mut saved: Vec<bool> = Vec::new();
    let mut trim_pending = false;
    let mut loops: Vec<Option<LoopState>> = Vec::new();
    loops.resize_with(program.len(), || None);

    while let Some(element) = program.elements().get(cursor) {
        match element {
            ElementKind::Text(text) => {
                if active {
                    if trim_pending {
                        out.push_str(text.trim_start());
                        trim_pending = false;
                    } else {
                        out.push_str(text);
                    }
                }
                cursor += 1;
            }

            ElementKind::Value(expr) => {
                if active {
                    let value = evaluate(expr, env, accessors)?;
                    trace!("{{{{ {expr} }}}} -> \"{value}\"");
                    out.push_str(&value.to_string());
                }
                cursor += 1;
            }

            ElementKind::SpaceControl => {
                if active {
                    trim_pending = true;
                }
                cursor += 1;
            }

            ElementKind::ForHeader { var, source, end } => {
                if active {
                    if loops[cursor].is_none() {
                        let iter = materialize(source, env, accessors)?;
                        debug!("FOR {var} IN {source}: loop started");
                        loops[cursor] = Some(LoopState { iter, taken: 0 });
                    }
                    let Some(state) = loops[cursor].as_mut() else {
                        return Err(TemplateError::CorruptLinks);
                    };
                    match state.iter.next() {
                        Some(item) => {
                            state.taken += 1;
                            trace!("FOR {var}: iteration {}", state.taken);
                            env.assign(var, item);
                        }
                        None => {
                            debug!("FOR {var}: exhausted after {} iterations", state.taken);
                            loops[cursor] = None;
                            if *end == usize::MAX {
                                return Err(TemplateError::CorruptLinks);
                            }
                            cursor = *end;
                        }
                    }
                }
                cursor += 1;
            }

            ElementKind::BreakIf { guard, parent } => {
                if active {
                    let value = evaluate(guard, env, accessors)?;
                    let Some(is_break) = value.as_bool() else {
                        return Err(TemplateError::NonBooleanGuard(guard.clone()));
                    };
                    if is_break {
                        debug!("BREAKIF {guard}: breaking loop");
                        loops[*parent] = None;
                        cursor = for_end(program, *parent)?;
                    }
                }
                cursor += 1;
            }

            ElementKind::EndFor { parent } => {
                if active {
                    cursor = *parent;
                } else {
                    cursor += 1;
                }
            }

            ElementKind::IfHeader { condition, .. } => {
                if active {
                    saved.push(active);
                    let value = evaluate(condition, env, accessors)?;
                    let Some(result) = value.as_bool() else {
                        return Err(TemplateError::NonBooleanCondition(condition.clone()));
                    };
                    debug!("IF {condition} -> {result}");
                    active = result;
                }
                cursor += 1;
            }

            ElementKind::Else => {
                active = !active;
                cursor += 1;
            }

            ElementKind::EndIf => {
                let Some(restored) = saved.pop() else {
                    return Err(TemplateError::UnbalancedIf);
                };
                active = restored;
                cursor += 1;
            }
        }
    }

    Ok(out)
}

struct LoopState {
    iter: Box<dyn Iterator<Item = Value>>,
    taken: usize,
}

fn for_end(program: &Program, parent: usize) -> Result<usize, TemplateError> {
    match program.elements().get(parent) {
        Some(ElementKind::ForHeader { end, .. }) if *end != usize::MAX => Ok(*end),
        _ => Err(TemplateError::CorruptLinks),
    }
}

/// Materializes the FOR source: a `range(start, stop[, step])` generator,
/// or an iterator over a sequence or map value. Map iteration yields
/// `{key, value}` entries.
fn materialize(
    source_expr: &str,
    env: &mut Environment,
    accessors: &AccessorRegistry,
) -> Result<Box<dyn Iterator<Item = Value>>, TemplateError> {
    if let Some(inner) = range_call(source_expr) {
        let args = split_args(inner);
        if args.len() != 2 && args.len() != 3 {
            return Err(TemplateError::InvalidRange(source_expr.to_string()));
        }
        let start = evaluate(args[0], env, accessors)?;
        let stop = evaluate(args[1], env, accessors)?;
        let step = match args.get(2) {
            Some(arg) => evaluate(arg, env, accessors)?,
            None => Value::Integer(1),
        };
        return Ok(Box::new(range_iter(&start, &stop, &step, source_expr)?));
    }

    let value = evaluate(source_expr, env, accessors)?;
    match value {
        Value::Sequence(items) => Ok(Box::new(items.into_iter())),
        Value::Map(entries) => Ok(Box::new(entries.into_iter().map(|(key, value)| {
            Value::Map(BTreeMap::from([
                ("key".to_string(), Value::String(key)),
                ("value".to_string(), value),
            ]))
        }))),
        _ => Err(TemplateError::NotIterable(source_expr.to_string())),
    }
}

/// `range(...)` call covering the whole source expression, any case.
fn range_call(expr: &str) -> Option<&str> {
    let trimmed = expr.trim();
    if !trimmed.get(..5)?.eq_ignore_ascii_case("range") {
        return None;
    }
    let after = trimmed[5..].trim_start();
    let inner = after.strip_prefix('(')?;
    inner.strip_suffix(')')
}

/// Splits an argument list on top-level commas; quotes and nesting are
/// respected so each argument stays a complete sub-expression.
fn split_args(inner: &str) -> Vec<&str> {
    let bytes = inner.as_bytes();
    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut in_quote = false;
    let mut start = 0usize;
    for (i, &c) in bytes.iter().enumerate() {
        if in_quote {
            if c == b'\'' {
                in_quote = false;
            }
            continue;
        }
        match c {
            b'\'' => in_quote = true,
            b'(' | b'[' => depth += 1,
            b')' | b']' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                args.push(inner[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    args.push(inner[start..].trim());
    args
}

/// The range generator. Steps before testing, and yields only while
/// `current < stop`, so an empty or descending range produces nothing.
enum RangeIter {
    Int { current: i64, stop: i64, step: i64 },
    Float { current: f64, stop: f64, step: f64 },
}

fn range_iter(
    start: &Value,
    stop: &Value,
    step: &Value,
    source: &str,
) -> Result<RangeIter, TemplateError> {
    if let (Value::Integer(a), Value::Integer(b), Value::Integer(s)) = (start, stop, step) {
        if let Some(current) = a.checked_sub(*s) {
            return Ok(RangeIter::Int {
                current,
                stop: *b,
                step: *s,
            });
        }
    }
    let (Some(a), Some(b), Some(s)) = (start.as_f64(), stop.as_f64(), step.as_f64()) else {
        return Err(TemplateError::RangeBound(source.to_string()));
    };
    Ok(RangeIter::Float {
        current: a - s,
        stop: b,
        step: s,
    })
}

impl Iterator for RangeIter {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        match self {
            RangeIter::Int {
                current,
                stop,
                step,
            } => {
                *current = current.checked_add(*step)?;
                (*current < *stop).then_some(Value::Integer(*current))
            }
            RangeIter::Float {
                current,
                stop,
                step,
            } => {
                *current += *step;
                (*current < *stop).then_some(Value::Float(*current))
            }
        }
    }
}
