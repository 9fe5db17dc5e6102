use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_split_on_semicolons_and_newlines() {
    assert_eq!(
        split_expressions("a = 1; b = 2\n  c = a + b ;\n\n"),
        vec!["a = 1", "b = 2", "c = a + b"]
    );
}

#[test]
fn test_split_respects_quotes() {
    assert_eq!(
        split_expressions(r#"s = "x;y"; t = 'a\'; b'"#),
        vec![r#"s = "x;y""#, r"t = 'a\'; b'"]
    );
}

#[test]
fn test_split_empty_body() {
    assert!(split_expressions("  ;\n ").is_empty());
}

#[test]
fn test_parse_once() {
    let expr = CompiledExpr::new("x + 1");
    assert!(!expr.is_parsed());
    let first = Arc::clone(expr.parsed());
    let second = Arc::clone(expr.parsed());
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.external_symbols, vec!["x".to_owned()]);
}
