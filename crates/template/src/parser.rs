//! Tokenizer and block linker.
//!
//! A single scanning pass splits raw template text into the element list:
//! text runs, `{{ expr }}` output tags, and `{% command %}` control tags,
//! each tag optionally carrying `-` whitespace-trim markers. Two explicit
//! stacks link every block opener to its closer while scanning; any
//! imbalance is a fatal structural error, so a `Program` that parses is
//! guaranteed mutually consistent open/close links.

use crate::element::{ElementKind, Program};
use crate::error::TemplateError;

/// Parses template text into a linked element list.
pub fn parse(template: &str) -> Result<Program, TemplateError> {
    let mut elements: Vec<ElementKind> = Vec::new();
    let mut for_stack: Vec<usize> = Vec::new();
    let mut if_stack: Vec<usize> = Vec::new();
    let mut pos = 0;

    while pos < template.len() {
        let rest = &template[pos..];
        let Some(offset) = next_tag(rest) else {
            elements.push(ElementKind::Text(rest.to_string()));
            break;
        };
        if offset > 0 {
            elements.push(ElementKind::Text(rest[..offset].to_string()));
        }

        let tag = &rest[offset..];
        let is_value = tag.starts_with("{{");
        let close_pat = if is_value { "}}" } else { "%}" };

        let trim_left = tag[2..].starts_with('-');
        let body_start = if trim_left { 3 } else { 2 };
        let close = tag[body_start..]
            .find(close_pat)
            .map(|i| i + body_start)
            .ok_or_else(|| TemplateError::UnterminatedTag(snippet(tag)))?;
        let trim_right = close > body_start && tag[..close].ends_with('-');
        let body_end = if trim_right { close - 1 } else { close };
        let body = tag[body_start..body_end].trim();

        if trim_left {
            trim_preceding_text(&mut elements);
        }
        if is_value {
            elements.push(ElementKind::Value(body.to_string()));
        } else {
            push_command(&mut elements, body, &mut for_stack, &mut if_stack)?;
        }
        if trim_right {
            elements.push(ElementKind::SpaceControl);
        }

        pos += offset + close + 2;
    }

    if !for_stack.is_empty() {
        return Err(TemplateError::UnbalancedFor);
    }
    if !if_stack.is_empty() {
        return Err(TemplateError::UnbalancedIf);
    }
    Ok(Program::from_elements(elements))
}

fn next_tag(rest: &str) -> Option<usize> {
    match (rest.find("{{"), rest.find("{%")) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}

fn snippet(tag: &str) -> String {
    tag.chars().take(20).collect()
}

/// A leading trim marker removes trailing whitespace from the text run
/// already emitted; the element stays even when trimmed to empty.
fn trim_preceding_text(elements: &mut [ElementKind]) {
    if let Some(ElementKind::Text(text)) = elements.last_mut() {
        let trimmed = text.trim_end().to_string();
        *text = trimmed;
    }
}

fn push_command(
    elements: &mut Vec<ElementKind>,
    body: &str,
    for_stack: &mut Vec<usize>,
    if_stack: &mut Vec<usize>,
) -> Result<(), TemplateError> {
    let index = elements.len();

    if let Some(rest) = strip_keyword(body, "FOR") {
        let Some((var, source)) = split_for(rest) else {
            return Err(TemplateError::UnknownCommand(body.to_string()));
        };
        elements.push(ElementKind::ForHeader {
            var,
            source,
            end: usize::MAX,
        });
        for_stack.push(index);
    } else if let Some(guard) = strip_keyword(body, "BREAKIF") {
        let Some(&parent) = for_stack.last() else {
            return Err(TemplateError::BreakOutsideFor);
        };
        elements.push(ElementKind::BreakIf {
            guard: guard.trim().to_string(),
            parent,
        });
    } else if body.eq_ignore_ascii_case("ENDFOR") {
        let Some(parent) = for_stack.pop() else {
            return Err(TemplateError::UnbalancedFor);
        };
        if let Some(ElementKind::ForHeader { end, .. }) = elements.get_mut(parent) {
            *end = index;
        }
        elements.push(ElementKind::EndFor { parent });
    } else if let Some(condition) = strip_keyword(body, "IF") {
        elements.push(ElementKind::IfHeader {
            condition: condition.trim().to_string(),
            else_index: None,
            end: usize::MAX,
        });
        if_stack.push(index);
    } else if body.eq_ignore_ascii_case("ELSE") {
        let Some(&opener) = if_stack.last() else {
            return Err(TemplateError::ElseWithoutIf);
        };
        if let Some(ElementKind::IfHeader { else_index, .. }) = elements.get_mut(opener) {
            if else_index.is_some() {
                return Err(TemplateError::DuplicateElse);
            }
            *else_index = Some(index);
        }
        elements.push(ElementKind::Else);
    } else if body.eq_ignore_ascii_case("ENDIF") {
        let Some(opener) = if_stack.pop() else {
            return Err(TemplateError::UnbalancedIf);
        };
        if let Some(ElementKind::IfHeader { end, .. }) = elements.get_mut(opener) {
            *end = index;
        }
        elements.push(ElementKind::EndIf);
    } else {
        return Err(TemplateError::UnknownCommand(body.to_string()));
    }
    Ok(())
}

/// Case-insensitive keyword prefix followed by whitespace.
pub(crate) fn strip_keyword<'s>(body: &'s str, keyword: &str) -> Option<&'s str> {
    let prefix = body.get(..keyword.len())?;
    if prefix.eq_ignore_ascii_case(keyword) && body[keyword.len()..].starts_with(char::is_whitespace)
    {
        Some(body[keyword.len()..].trim_start())
    } else {
        None
    }
}

/// `<var> IN <expr>` with a case-insensitive separator keyword.
fn split_for(rest: &str) -> Option<(String, String)> {
    let rest = rest.trim();
    let var_end = rest.find(char::is_whitespace)?;
    let var = &rest[..var_end];
    if !is_identifier(var) {
        return None;
    }
    let after = rest[var_end..].trim_start();
    let in_end = after.find(char::is_whitespace)?;
    if !after[..in_end].eq_ignore_ascii_case("IN") {
        return None;
    }
    let source = after[in_end..].trim();
    if source.is_empty() {
        return None;
    }
    Some((var.to_string(), source.to_string()))
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_and_value_split() {
        let program = parse("Hello {{ name }}!").unwrap();
        assert_eq!(
            program.elements(),
            &[
                ElementKind::Text("Hello ".to_string()),
                ElementKind::Value("name".to_string()),
                ElementKind::Text("!".to_string()),
            ]
        );
    }

    #[test]
    fn test_for_links_are_consistent() {
        let program = parse("{% FOR i IN items %}x{% ENDFOR %}").unwrap();
        assert_eq!(
            program.elements(),
            &[
                ElementKind::ForHeader {
                    var: "i".to_string(),
                    source: "items".to_string(),
                    end: 2,
                },
                ElementKind::Text("x".to_string()),
                ElementKind::EndFor { parent: 0 },
            ]
        );
    }

    #[test]
    fn test_if_else_links_are_consistent() {
        let program = parse("{% IF ok %}A{% ELSE %}B{% ENDIF %}").unwrap();
        assert_eq!(
            program.elements(),
            &[
                ElementKind::IfHeader {
                    condition: "ok".to_string(),
                    else_index: Some(2),
                    end: 4,
                },
                ElementKind::Text("A".to_string()),
                ElementKind::Else,
                ElementKind::Text("B".to_string()),
                ElementKind::EndIf,
            ]
        );
    }

    #[test]
    fn test_nested_blocks_link_lifo() {
        let program =
            parse("{% FOR a IN xs %}{% IF ok %}{{ a }}{% ENDIF %}{% ENDFOR %}").unwrap();
        let elements = program.elements();
        assert_eq!(
            elements[0],
            ElementKind::ForHeader {
                var: "a".to_string(),
                source: "xs".to_string(),
                end: 4,
            }
        );
        assert_eq!(
            elements[1],
            ElementKind::IfHeader {
                condition: "ok".to_string(),
                else_index: None,
                end: 3,
            }
        );
        assert_eq!(elements[4], ElementKind::EndFor { parent: 0 });
    }

    #[test]
    fn test_commands_are_case_insensitive() {
        assert!(parse("{% for i in items %}{% endfor %}").is_ok());
        assert!(parse("{% If true %}{% EndIf %}").is_ok());
    }

    #[test]
    fn test_unmatched_endfor() {
        assert_eq!(parse("{% ENDFOR %}"), Err(TemplateError::UnbalancedFor));
    }

    #[test]
    fn test_leftover_open_for() {
        assert_eq!(
            parse("{% FOR i IN items %}x"),
            Err(TemplateError::UnbalancedFor)
        );
    }

    #[test]
    fn test_unmatched_endif_and_stray_else() {
        assert_eq!(parse("{% ENDIF %}"), Err(TemplateError::UnbalancedIf));
        assert_eq!(parse("x{% ELSE %}y"), Err(TemplateError::ElseWithoutIf));
    }

    #[test]
    fn test_breakif_outside_for() {
        assert_eq!(
            parse("{% BREAKIF true %}"),
            Err(TemplateError::BreakOutsideFor)
        );
    }

    #[test]
    fn test_double_else_rejected() {
        assert_eq!(
            parse("{% IF a %}{% ELSE %}{% ELSE %}{% ENDIF %}"),
            Err(TemplateError::DuplicateElse)
        );
    }

    #[test]
    fn test_unterminated_tag() {
        assert!(matches!(
            parse("text {{ name"),
            Err(TemplateError::UnterminatedTag(_))
        ));
        assert!(matches!(
            parse("{% IF x %}a{% ENDIF"),
            Err(TemplateError::UnterminatedTag(_))
        ));
    }

    #[test]
    fn test_unknown_command() {
        assert!(matches!(
            parse("{% WHILE x %}"),
            Err(TemplateError::UnknownCommand(_))
        ));
    }

    #[test]
    fn test_trim_markers() {
        let program = parse("a  {{- x -}}  b").unwrap();
        assert_eq!(
            program.elements(),
            &[
                ElementKind::Text("a".to_string()),
                ElementKind::Value("x".to_string()),
                ElementKind::SpaceControl,
                ElementKind::Text("  b".to_string()),
            ]
        );
    }
}
