use expect_test::expect;
use scry_utils::PrettyPrint;

use super::Parser;

fn check<T: Into<String>>(
    sources: Vec<T>,
    expected: expect_test::Expect,
) {
    let parser = Parser::new(sources.into_iter().map(|source| ("test", source)));
    let (cell, errs, interner, _source_map) = parser.into_result();

    let pretty_printed = cell.pretty_print(&interner, 0);

    expected.assert_eq(&format!("{pretty_printed}\n{errs:#?}"));
}

#[test]
fn assignment_and_call() {
    check(
        vec!["x = 1\nprint(x)"],
        expect![[r#"
            Cell
              assign x = 1
              expr call(var(print) [var(x)])

            []"#]],
    )
}

#[test]
fn function_definition() {
    check(
        vec!["fn add_tax(amount, rate)\nreturn amount + amount * rate\nend"],
        expect![[r#"
            Cell
              fn add_tax(amount, rate)
                return add(var(amount) mul(var(amount) var(rate)))

            []"#]],
    )
}

#[test]
fn nested_function_definitions() {
    check(
        vec!["fn outer()\nfn inner()\nreturn 1\nend\nreturn inner\nend"],
        expect![[r#"
            Cell
              fn outer()
                fn inner()
                  return 1
                return var(inner)

            []"#]],
    )
}

#[test]
fn return_without_value() {
    check(
        vec!["fn ping()\nreturn\nend"],
        expect![[r#"
            Cell
              fn ping()
                return

            []"#]],
    )
}

#[test]
fn lambda_expression() {
    check(
        vec!["double = |x| x * 2\nresult = double(21)"],
        expect![[r#"
            Cell
              assign double = lambda(|x| mul(var(x) 2))
              assign result = call(var(double) [21])

            []"#]],
    )
}

#[test]
fn use_with_alias() {
    check(
        vec!["use telemetry as tm\nuse math"],
        expect![[r#"
            Cell
              use telemetry as tm
              use math

            []"#]],
    )
}

#[test]
fn if_else() {
    check(
        vec!["if x == 1\ny = 2\nelse\ny = 3\nend"],
        expect![[r#"
            Cell
              if eq(var(x) 1)
                assign y = 2
              else
                assign y = 3

            []"#]],
    )
}

#[test]
fn list_and_comment() {
    check(
        vec!["# totals per region\nxs = [1, 2, 3]\nn = len(xs)"],
        expect![[r#"
            Cell
              assign xs = [1, 2, 3]
              assign n = call(var(len) [var(xs)])

            []"#]],
    )
}

#[test]
fn string_and_boolean_literals() {
    check(
        vec!["flag = true\nmsg = \"ready\""],
        expect![[r#"
            Cell
              assign flag = true
              assign msg = "ready"

            []"#]],
    )
}

#[test]
fn call_arguments_span_lines() {
    check(
        vec!["total = sum(\n  price,\n  tax\n)"],
        expect![[r#"
            Cell
              assign total = call(var(sum) [var(price), var(tax)])

            []"#]],
    )
}

#[test]
fn parenthesized_expression_spans_lines() {
    check(
        vec!["x = (1 +\n2) * 3"],
        expect![[r#"
            Cell
              assign x = mul(add(1 2) 3)

            []"#]],
    )
}

#[test]
fn expression_statements() {
    check(
        vec!["x\ny"],
        expect![[r#"
            Cell
              expr var(x)
              expr var(y)

            []"#]],
    )
}

#[test]
fn missing_end_is_reported() {
    check(
        vec!["fn f()\nreturn 1"],
        expect![[r#"
            Cell

            [
                SpannedItem ParseError { kind: ExpectedToken(EndKeyword, Eof), help: Some("while parsing function definition") } [Span { source: SourceId(0), span: SourceSpan { offset: SourceOffset(15), length: 0 } }],
            ]"#]],
    )
}

#[test]
fn invalid_assignment_target() {
    check(
        vec!["1 = 2"],
        expect![[r#"
            Cell

            [
                SpannedItem ParseError { kind: InvalidAssignmentTarget, help: None } [Span { source: SourceId(0), span: SourceSpan { offset: SourceOffset(1), length: 0 } }],
            ]"#]],
    )
}

#[test]
fn integer_literal_overflow() {
    check(
        vec!["x = 99999999999999999999"],
        expect![[r#"
            Cell

            [
                SpannedItem ParseError { kind: IntegerLiteralTooLarge("99999999999999999999"), help: None } [Span { source: SourceId(0), span: SourceSpan { offset: SourceOffset(4), length: 20 } }],
            ]"#]],
    )
}

#[test]
fn unrecognized_input_is_reported() {
    check(
        vec!["x = $"],
        expect![[r#"
            Cell

            [
                SpannedItem ParseError { kind: ExpectedOneOf([Integer, String, True, False, Identifier, OpenParen, OpenBracket, Pipe], Unrecognized), help: None } [Span { source: SourceId(0), span: SourceSpan { offset: SourceOffset(4), length: 1 } }],
            ]"#]],
    )
}
