#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use pretty_assertions::assert_eq;

fn eval(text: &str, options: &EvalOptions) -> Result<String, String> {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(eval_text(text, options))
}

#[test]
fn test_parse_assignment() {
    assert_eq!(
        parse_assignment("count = 3"),
        Ok(("count".to_owned(), "3".to_owned()))
    );
    assert_eq!(
        parse_assignment("s=a=b"),
        Ok(("s".to_owned(), "a=b".to_owned()))
    );
    assert!(parse_assignment("=3").is_err());
    assert!(parse_assignment("nothing").is_err());
}

#[test]
fn test_apply_flag() {
    let mut options = EvalOptions::default();
    assert_eq!(options.apply_flag("--set=x=1"), Ok(true));
    assert_eq!(options.apply_flag("--symbols"), Ok(true));
    assert_eq!(options.apply_flag("x + 1"), Ok(false));
    assert!(options.apply_flag("--set=oops").is_err());
    assert_eq!(options.assignments, vec![("x".to_owned(), "1".to_owned())]);
    assert!(options.dump_symbols);
}

#[test]
fn test_lex_lists_tokens() {
    let out = lex_text("a + 1");
    assert!(out.starts_with("Tokens (4):"));
}

#[test]
fn test_parse_reports_constant_and_symbols() {
    let out = parse_text("x * (2 + 3)");
    assert!(out.contains("Printf: false"));
    assert!(out.contains("Symbols: [x]"));

    let out = parse_text("2 + 3");
    assert!(out.contains("Constant: Number(5.0)"));
}

#[test]
fn test_eval_with_assignments() {
    let mut options = EvalOptions::default();
    options.apply_flag("--set=x=0x10").unwrap();
    assert_eq!(eval("x + 1", &options), Ok("17".to_owned()));
    assert_eq!(eval("Value: %x[x]", &options), Ok("Value: 10".to_owned()));
}

#[test]
fn test_eval_dumps_symbols() {
    let options = EvalOptions {
        assignments: vec![("a".to_owned(), "1".to_owned())],
        dump_symbols: true,
    };
    assert_eq!(eval("b = a + 1", &options), Ok("2\n  a = 1\n  b = 2".to_owned()));
}

#[test]
fn test_eval_failures() {
    let options = EvalOptions::default();
    assert!(eval("1 / 0", &options).is_err());
    let rendered = eval("(1 + ", &options).unwrap_err();
    assert!(rendered.starts_with("error[E1002]"), "{rendered}");
    assert!(eval("__CalcMemUsed(0, 0, 0, 0)", &options)
        .unwrap_err()
        .contains("__CalcMemUsed"));
}
