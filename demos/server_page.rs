//! Renders the kind of page a route handler would produce: a layout with
//! an included header, a loop over request data, and a conditional block.
//!
//! Run with `RUST_LOG=debug` to watch the executor's loop and branch
//! decisions.

use serde_json::json;
use weft::{Engine, MemorySource, Value, Vars};

const LAYOUT: &str = "\
{% INCLUDE 'header' %}
<body>
  <ul>
    {%- FOR user IN users %}
    <li>{{ user.name }}{% IF user.admin %} (admin){% ENDIF %}</li>
    {%- ENDFOR %}
  </ul>
  {{ shown = 0 }}
  {%- FOR i IN range(0, total) %}{% BREAKIF i >= 3 %}{{ shown = shown + 1 }}{% ENDFOR %}
  <p>showing {{ shown }} of {{ total }}</p>
</body>
";

fn main() {
    env_logger::init();

    let engine = Engine::builder()
        .with_source(
            MemorySource::new()
                .with("page", LAYOUT)
                .with("header", "<head><title>{{ title }}</title></head>"),
        )
        .build();

    let mut vars = Vars::new();
    vars.insert("title".to_string(), Value::from("Users"));
    vars.insert("total".to_string(), Value::Integer(12));
    vars.insert(
        "users".to_string(),
        Value::from(json!([
            { "name": "Ann", "admin": true },
            { "name": "Ben", "admin": false },
        ])),
    );

    println!("{}", engine.render_file("page", &vars));
}
