use expect_test::expect;

use super::*;

fn check<T: Into<String>>(
    sources: Vec<T>,
    expected: expect_test::Expect,
) {
    let mut lexer = Lexer::new(sources.into_iter().map(|s| -> &'static str { Box::leak(s.into().into_boxed_str()) }));
    let mut toks = vec![];
    loop {
        let next_tok = lexer.advance();
        if next_tok.item() == &Token::Eof {
            break;
        }

        toks.push(next_tok);
    }

    expected.assert_eq(&format!("{toks:#?}"));
}

#[test]
fn test_lexer_advance() {
    check(
        vec!["x = 1 + 2\n"],
        expect![[r#"
            [
                SpannedItem NewFile(SourceId(0)) [Span { source: SourceId(0), span: SourceSpan { offset: SourceOffset(0), length: 0 } }],
                SpannedItem Identifier [Span { source: SourceId(0), span: SourceSpan { offset: SourceOffset(0), length: 1 } }],
                SpannedItem Equals [Span { source: SourceId(0), span: SourceSpan { offset: SourceOffset(2), length: 1 } }],
                SpannedItem Integer [Span { source: SourceId(0), span: SourceSpan { offset: SourceOffset(4), length: 1 } }],
                SpannedItem Plus [Span { source: SourceId(0), span: SourceSpan { offset: SourceOffset(6), length: 1 } }],
                SpannedItem Integer [Span { source: SourceId(0), span: SourceSpan { offset: SourceOffset(8), length: 1 } }],
                SpannedItem Newline [Span { source: SourceId(0), span: SourceSpan { offset: SourceOffset(9), length: 1 } }],
            ]"#]],
    )
}

#[test]
fn test_lexer_advance_multiple_sources() {
    check(
        vec!["x = 1", "y = x"],
        expect![[r#"
            [
                SpannedItem NewFile(SourceId(0)) [Span { source: SourceId(0), span: SourceSpan { offset: SourceOffset(0), length: 0 } }],
                SpannedItem Identifier [Span { source: SourceId(0), span: SourceSpan { offset: SourceOffset(0), length: 1 } }],
                SpannedItem Equals [Span { source: SourceId(0), span: SourceSpan { offset: SourceOffset(2), length: 1 } }],
                SpannedItem Integer [Span { source: SourceId(0), span: SourceSpan { offset: SourceOffset(4), length: 1 } }],
                SpannedItem NewFile(SourceId(1)) [Span { source: SourceId(1), span: SourceSpan { offset: SourceOffset(0), length: 0 } }],
                SpannedItem Identifier [Span { source: SourceId(1), span: SourceSpan { offset: SourceOffset(0), length: 1 } }],
                SpannedItem Equals [Span { source: SourceId(1), span: SourceSpan { offset: SourceOffset(2), length: 1 } }],
                SpannedItem Identifier [Span { source: SourceId(1), span: SourceSpan { offset: SourceOffset(4), length: 1 } }],
            ]"#]],
    )
}

#[test]
fn test_keywords_and_comments() {
    check(
        vec!["fn f() # comment\nend"],
        expect![[r#"
            [
                SpannedItem NewFile(SourceId(0)) [Span { source: SourceId(0), span: SourceSpan { offset: SourceOffset(0), length: 0 } }],
                SpannedItem FnKeyword [Span { source: SourceId(0), span: SourceSpan { offset: SourceOffset(0), length: 2 } }],
                SpannedItem Identifier [Span { source: SourceId(0), span: SourceSpan { offset: SourceOffset(3), length: 1 } }],
                SpannedItem OpenParen [Span { source: SourceId(0), span: SourceSpan { offset: SourceOffset(4), length: 1 } }],
                SpannedItem CloseParen [Span { source: SourceId(0), span: SourceSpan { offset: SourceOffset(5), length: 1 } }],
                SpannedItem Newline [Span { source: SourceId(0), span: SourceSpan { offset: SourceOffset(16), length: 1 } }],
                SpannedItem EndKeyword [Span { source: SourceId(0), span: SourceSpan { offset: SourceOffset(17), length: 3 } }],
            ]"#]],
    )
}

#[test]
fn test_comparison_operators() {
    check(
        vec!["a == b != c"],
        expect![[r#"
            [
                SpannedItem NewFile(SourceId(0)) [Span { source: SourceId(0), span: SourceSpan { offset: SourceOffset(0), length: 0 } }],
                SpannedItem Identifier [Span { source: SourceId(0), span: SourceSpan { offset: SourceOffset(0), length: 1 } }],
                SpannedItem EqualsEquals [Span { source: SourceId(0), span: SourceSpan { offset: SourceOffset(2), length: 2 } }],
                SpannedItem Identifier [Span { source: SourceId(0), span: SourceSpan { offset: SourceOffset(5), length: 1 } }],
                SpannedItem BangEquals [Span { source: SourceId(0), span: SourceSpan { offset: SourceOffset(7), length: 2 } }],
                SpannedItem Identifier [Span { source: SourceId(0), span: SourceSpan { offset: SourceOffset(10), length: 1 } }],
            ]"#]],
    )
}

#[test]
fn test_string_literal() {
    check(
        vec![r#"s = "hi scry""#],
        expect![[r#"
            [
                SpannedItem NewFile(SourceId(0)) [Span { source: SourceId(0), span: SourceSpan { offset: SourceOffset(0), length: 0 } }],
                SpannedItem Identifier [Span { source: SourceId(0), span: SourceSpan { offset: SourceOffset(0), length: 1 } }],
                SpannedItem Equals [Span { source: SourceId(0), span: SourceSpan { offset: SourceOffset(2), length: 1 } }],
                SpannedItem String [Span { source: SourceId(0), span: SourceSpan { offset: SourceOffset(4), length: 9 } }],
            ]"#]],
    )
}

#[test]
fn test_unrecognized_input_becomes_a_token() {
    check(
        vec!["x = $"],
        expect![[r#"
            [
                SpannedItem NewFile(SourceId(0)) [Span { source: SourceId(0), span: SourceSpan { offset: SourceOffset(0), length: 0 } }],
                SpannedItem Identifier [Span { source: SourceId(0), span: SourceSpan { offset: SourceOffset(0), length: 1 } }],
                SpannedItem Equals [Span { source: SourceId(0), span: SourceSpan { offset: SourceOffset(2), length: 1 } }],
                SpannedItem Unrecognized [Span { source: SourceId(0), span: SourceSpan { offset: SourceOffset(4), length: 1 } }],
            ]"#]],
    )
}
