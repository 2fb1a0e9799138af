use esrewrite::{print_node, search, search_with_mode, Error, SelectorSyntaxError};

fn texts(selector: &str, source: &str) -> Vec<String> {
    search(selector, source)
        .unwrap()
        .iter()
        .map(print_node)
        .collect()
}

#[test]
fn finds_calls_by_callee_name() {
    let source = r#"
const fs = require("fs");
const path = require("path");
load("other");
"#;
    assert_eq!(
        texts(r#"CallExpression[function.name="require"]"#, source),
        vec![r#"require("fs")"#, r#"require("path")"#]
    );
}

#[test]
fn string_values_compare_unquoted() {
    let source = r#"import a from "lodash"; import b from 'react';"#;
    assert_eq!(
        texts("ImportStatement > String[value=react]", source),
        vec!["'react'"]
    );
}

#[test]
fn nested_blocks_are_searched_in_document_order() {
    let source = "function outer() {\n  if (a) {\n    first();\n  }\n  second();\n}\nthird();\n";
    assert_eq!(
        texts("ExpressionStatement", source),
        vec!["first();", "second();", "third();"]
    );
}

#[test]
fn descendant_with_statement_class() {
    let source = "function f() { return 1; }\nlet x = 2;\n";
    assert_eq!(
        texts("FunctionDeclaration :statement", source),
        vec!["{ return 1; }", "return 1;"]
    );
}

#[test]
fn first_argument_of_each_call() {
    let source = "f(1, 2); g(3); h();";
    assert_eq!(
        texts("CallExpression > Arguments > :first-child", source),
        vec!["1", "3"]
    );
}

#[test]
fn matches_carry_spans() {
    let matches = search("Identifier[name=b]", "a;\n  b;\n").unwrap();
    let span = matches[0].span().unwrap();
    assert_eq!((span.line, span.column), (2, 3));
    assert_eq!((span.start, span.end), (5, 6));
}

#[test]
fn selector_errors_are_reported_with_position() {
    let err = search("CallExpression[", "f();").unwrap_err();
    let Error::SelectorSyntax(inner) = err else {
        panic!("expected selector error, got {err:?}");
    };
    assert!(matches!(inner, SelectorSyntaxError::Expected { .. }));
}

#[test]
fn unknown_pseudo_class_is_rejected() {
    let err = search("Identifier:hover", "a;").unwrap_err();
    assert!(matches!(
        err,
        Error::SelectorSyntax(SelectorSyntaxError::UnknownPseudo { .. })
    ));
}

#[test]
fn mode_aliases() {
    let source = "foo(bar);";
    let plain = search("Identifier", source).unwrap().len();
    assert_eq!(search_with_mode("css", "Identifier", source).unwrap().len(), plain);
    assert!(matches!(
        search_with_mode("ast-grep", "Identifier", source),
        Err(Error::ModeUnsupported(_))
    ));
}

#[test]
fn shorthand_finds_every_identifier_form() {
    let source = "obj.foo(); const o = { foo }; foo: for (;;) { break foo; } foo();";
    assert_eq!(texts("#/^foo$/", source).len(), 5);
    assert_eq!(texts("PropertyIdentifier[name=foo]", source), vec!["foo"]);
}

#[test]
fn single_statement_switch_cases_have_first_children() {
    let source = "switch (x) { case 1: a(); case 2: b(); c(); }";
    assert_eq!(texts("SwitchCase > :first-child", source), vec!["a();", "b();"]);
    assert_eq!(texts("SwitchCase > :last-child", source), vec!["a();", "c();"]);
    assert_eq!(
        texts("ExpressionStatement + ExpressionStatement", source),
        vec!["c();"]
    );
}

#[test]
fn indexed_attribute_paths() {
    assert_eq!(texts("Arguments[children.0]", "f(a); g();"), vec!["(a)"]);
    assert_eq!(
        texts("CallExpression[arguments.children.0.name=a]", "f(a); g(b, a);"),
        vec!["f(a)"]
    );
}
