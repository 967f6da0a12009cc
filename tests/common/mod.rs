use std::collections::HashMap;
use weft::{Engine, Value, Vars};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Build a variable map from `(name, json)` pairs.
pub fn vars_from_json(entries: &[(&str, serde_json::Value)]) -> Vars {
    let mut vars = HashMap::new();
    for (name, json) in entries {
        vars.insert(name.to_string(), Value::from(json.clone()));
    }
    vars
}

/// Render a template string with a default engine.
pub fn render(template: &str, vars: &Vars) -> String {
    Engine::new().render_str(template, vars)
}

/// Render with no external variables.
pub fn render_plain(template: &str) -> String {
    render(template, &Vars::new())
}
