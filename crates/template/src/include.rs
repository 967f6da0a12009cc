//! Recursive include expansion.
//!
//! `{% INCLUDE 'name' %}` directives are resolved textually before
//! tokenization, so included content takes part in block linking like any
//! other template text. Expansion is bounded: past [`MAX_INCLUDE_DEPTH`]
//! a branch truncates to empty rather than recursing further, and a
//! missing source becomes an inline error marker at the call site while
//! the rest of the document continues to expand.

use crate::parser::strip_keyword;
use weft_resource::TemplateSource;

/// Nesting limit for include expansion.
pub const MAX_INCLUDE_DEPTH: usize = 10;

/// Expands every include directive in `template`, recursively.
pub fn expand(template: &str, source: &dyn TemplateSource) -> String {
    expand_at(template, source, 0)
}

fn expand_at(template: &str, source: &dyn TemplateSource, depth: usize) -> String {
    let mut out = String::with_capacity(template.len());
    let mut pos = 0;

    while let Some(offset) = template[pos..].find("{%") {
        let tag_start = pos + offset;
        let Some(close) = template[tag_start + 2..].find("%}") else {
            // Unterminated control tag; left for the parser to report.
            break;
        };
        let tag_end = tag_start + 2 + close + 2;
        let body = tag_body(&template[tag_start + 2..tag_end - 2]);

        let Some(name) = include_name(body) else {
            out.push_str(&template[pos..tag_end]);
            pos = tag_end;
            continue;
        };

        out.push_str(&template[pos..tag_start]);
        pos = tag_end;

        if depth >= MAX_INCLUDE_DEPTH {
            log::warn!("include depth limit reached at '{name}', truncating branch");
            continue;
        }
        match source.load(name) {
            Ok(text) => out.push_str(&expand_at(&text, source, depth + 1)),
            Err(err) => {
                log::warn!("include '{name}' via {} failed: {err}", source.name());
                out.push_str(&format!("<-- ERROR: {err} -->"));
            }
        }
    }

    out.push_str(&template[pos..]);
    out
}

fn tag_body(raw: &str) -> &str {
    let body = raw.strip_prefix('-').unwrap_or(raw);
    let body = body.strip_suffix('-').unwrap_or(body);
    body.trim()
}

/// `INCLUDE '<name>'`, case-insensitive keyword, nothing after the name.
fn include_name(body: &str) -> Option<&str> {
    let rest = strip_keyword(body, "INCLUDE")?.trim();
    let rest = rest.strip_prefix('\'')?;
    let end = rest.find('\'')?;
    if !rest[end + 1..].trim().is_empty() {
        return None;
    }
    Some(&rest[..end])
}
