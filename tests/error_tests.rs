mod common;

use common::{TestResult, render_plain, vars_from_json};
use serde_json::json;
use weft::{Engine, TemplateError, Vars};

#[test]
fn test_unbalanced_blocks_are_structural_errors() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    assert_eq!(
        render_plain("{% FOR i IN range(0,3) %}x"),
        "<-- ERROR: NUMBER OF 'FOR' AND 'ENDFOR' STATEMENTS DO NOT MATCH -->"
    );
    assert_eq!(
        render_plain("x{% ENDIF %}"),
        "<-- ERROR: NUMBER OF 'IF' AND 'ENDIF' STATEMENTS DO NOT MATCH -->"
    );
    assert_eq!(
        render_plain("{% ELSE %}"),
        "<-- ERROR: 'ELSE' STATEMENT WITHOUT 'IF' -->"
    );
    assert_eq!(
        render_plain("{% BREAKIF true %}"),
        "<-- ERROR: 'BREAKIF' WITHOUT 'FOR' -->"
    );
    Ok(())
}

#[test]
fn test_evaluation_errors_replace_whole_output() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    assert_eq!(
        render_plain("header {{ 10/0 }} footer"),
        "<-- ERROR: DIVISION BY ZERO '10' / '0' -->"
    );
    assert_eq!(
        render_plain("{{ ghost }}"),
        "<-- ERROR: VALUE 'ghost' IS NOT DEFINED -->"
    );
    Ok(())
}

#[test]
fn test_type_errors_from_operators() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    assert_eq!(
        render_plain("{{ 'a' * 2 }}"),
        "<-- ERROR: INCOMPATIBLE OPERANDS 'a' AND '2' FOR OPERATOR '*' -->"
    );
    assert_eq!(
        render_plain("{{ !5 }}"),
        "<-- ERROR: OPERATOR '!' IS INCOMPATIBLE WITH OPERAND '5' -->"
    );
    Ok(())
}

#[test]
fn test_malformed_tag_is_fatal() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let out = render_plain("before {{ name");
    assert!(out.starts_with("<-- ERROR: UNTERMINATED TAG"));
    Ok(())
}

#[test]
fn test_unknown_member_on_host_object() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let vars = vars_from_json(&[("user", json!({ "name": "Ann" }))]);
    // Dot access into a scalar has no member to resolve.
    let engine = Engine::new();
    let out = engine.render_str("{{ user.name.first }}", &vars);
    assert_eq!(
        out,
        "<-- ERROR: ELEMENT 'first' OF VALUE 'user.name.first' IS UNKNOWN -->"
    );
    Ok(())
}

#[test]
fn test_typed_error_survives_until_boundary() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let engine = Engine::new();
    let result = engine.try_render_str("{% IF 'x' %}a{% ENDIF %}", &Vars::new());
    assert!(matches!(
        result,
        Err(weft::RenderError::Template(
            TemplateError::NonBooleanCondition(_)
        ))
    ));
    Ok(())
}
