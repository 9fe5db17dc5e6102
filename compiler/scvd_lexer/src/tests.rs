#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn kinds_and_texts(source: &str) -> Vec<(TokenKind, String)> {
    lex(source)
        .tokens
        .into_iter()
        .map(|t| (t.kind, t.text))
        .collect()
}

fn punct(text: &str) -> (TokenKind, String) {
    (TokenKind::Punctuation, text.to_owned())
}

#[test]
fn test_simple_expression() {
    assert_eq!(
        kinds_and_texts("x + 1"),
        vec![
            (TokenKind::Identifier, "x".to_owned()),
            punct("+"),
            (TokenKind::Number, "1".to_owned()),
            (TokenKind::End, String::new()),
        ]
    );
}

#[test]
fn test_longest_match_operators() {
    let texts: Vec<String> = lex("a >>>= b >>> c >>= d >> e >= f > g")
        .tokens
        .into_iter()
        .filter(|t| t.kind == TokenKind::Punctuation)
        .map(|t| t.text)
        .collect();
    assert_eq!(texts, [">>>=", ">>>", ">>=", ">>", ">=", ">"]);
}

#[test]
fn test_update_vs_binary() {
    let texts: Vec<String> = lex("a+++b").tokens.into_iter().map(|t| t.text).collect();
    assert_eq!(texts, ["a", "++", "+", "b", ""]);
}

#[test]
fn test_number_forms_are_single_tokens() {
    for text in ["0x1F", "0b1010", "0o17", "1_000", "3.5", ".5", "1e10", "10UL"] {
        let tokens = lex(text).tokens;
        assert_eq!(tokens.len(), 2, "{text}");
        assert_eq!(tokens[0].kind, TokenKind::Number, "{text}");
        assert_eq!(tokens[0].text, text);
    }
}

#[test]
fn test_member_access_after_index() {
    assert_eq!(
        kinds_and_texts("a[0].b"),
        vec![
            (TokenKind::Identifier, "a".to_owned()),
            punct("["),
            (TokenKind::Number, "0".to_owned()),
            punct("]"),
            punct("."),
            (TokenKind::Identifier, "b".to_owned()),
            (TokenKind::End, String::new()),
        ]
    );
}

#[test]
fn test_strings_keep_raw_text() {
    let tokens = lex(r#""a\"b" 'c'"#).tokens;
    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].text, r#""a\"b""#);
    assert_eq!(tokens[1].text, "'c'");
}

#[test]
fn test_unterminated_string_reports_error() {
    let output = lex("\"abc");
    assert_eq!(output.tokens[0].kind, TokenKind::String);
    assert_eq!(output.tokens[0].text, "\"abc");
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].code, ErrorCode::E0001);
}

#[test]
fn test_unknown_character() {
    let tokens = lex("a @ b").tokens;
    assert_eq!(tokens[1].kind, TokenKind::Unknown);
    assert_eq!(tokens[1].text, "@");
}

#[test]
fn test_spans_and_base_offset() {
    let tokens = lex_at("ab + 1", 10).tokens;
    assert_eq!(tokens[0].span, Span::new(10, 12));
    assert_eq!(tokens[1].span, Span::new(13, 14));
    assert_eq!(tokens.last().unwrap().span, Span::point(16));
}

#[test]
fn test_empty_input_is_just_end() {
    let tokens = lex("   ").tokens;
    assert_eq!(tokens.len(), 1);
    assert!(tokens[0].is_end());
}

proptest! {
    #[test]
    fn lexing_never_panics_and_ends_with_end(source in "\\PC{0,40}") {
        let output = lex(&source);
        prop_assert!(output.tokens.last().is_some_and(Token::is_end));
    }

    #[test]
    fn identifiers_lex_whole(name in "[A-Za-z_][A-Za-z0-9_]{0,16}") {
        let tokens = lex(&name).tokens;
        prop_assert_eq!(tokens.len(), 2);
        prop_assert_eq!(tokens[0].kind, TokenKind::Identifier);
        prop_assert_eq!(&tokens[0].text, &name);
    }
}
