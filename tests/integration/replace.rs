use esrewrite::{replace, replace_report, Error, ReplacementShapeError};

#[test]
fn wraps_expression_replacing_statement() {
    let output = replace("ExpressionStatement", "h()", "function f(){ g(); }").unwrap();
    assert_eq!(output, "function f(){ h(); }");
}

#[test]
fn leaves_expression_position_unwrapped() {
    let output = replace("Number[value=2]", "3", "const x = 1 + 2;").unwrap();
    assert_eq!(output, "const x = 1 + 3;");
}

#[test]
fn replacement_equal_to_selector_terminates() {
    let outcome = replace_report("Identifier[name=x]", "x", "var x = 1;").unwrap();
    assert_eq!(outcome.output, "var x = 1;");
    assert_eq!(outcome.replacements, 1);
    assert_eq!(outcome.output.matches('x').count(), 1);
}

#[test]
fn ancestor_replacement_hides_argument_match() {
    let output = replace(
        ":matches(CallExpression[function.name=log], Identifier[name=secret])",
        "redacted()",
        "log(secret);\nuse(secret);\n",
    )
    .unwrap();
    assert_eq!(output, "redacted();\nuse(redacted());\n");
}

#[test]
fn rejects_two_statement_replacement() {
    let err = replace("Identifier", "a; b;", "x;").unwrap_err();
    assert!(matches!(
        err,
        Error::ReplacementShape(ReplacementShapeError::MultipleStatements { count: 2 })
    ));
}

#[test]
fn surrounding_formatting_is_kept() {
    let source = "// config\nconst  answer =   40 + 2 ;\n\n\nexport default answer;\n";
    let output = replace("Number[value=40]", "41", source).unwrap();
    assert_eq!(
        output,
        "// config\nconst  answer =   41 + 2 ;\n\n\nexport default answer;\n"
    );
}

#[test]
fn statement_replacement_in_nested_blocks() {
    let source = "if (ok) {\n  debugger;\n} else {\n  run();\n  debugger;\n}\n";
    let output = replace("DebuggerStatement", "log(\"here\")", source).unwrap();
    assert_eq!(
        output,
        "if (ok) {\n  log(\"here\");\n} else {\n  run();\n  log(\"here\");\n}\n"
    );
}

#[test]
fn multi_line_replacement_fragment() {
    let output = replace(
        "CallExpression[function.name=f]",
        "g(\n  1,\n  2\n)",
        "x = f();",
    )
    .unwrap();
    assert_eq!(output, "x = g(\n  1,\n  2\n);");
}

#[test]
fn source_parse_errors_precede_matching() {
    let err = replace("Identifier", "a", "let = ;").unwrap_err();
    assert!(matches!(err, Error::SourceParse(_)));
}

#[test]
fn replacement_keeps_operator_grouping() {
    assert_eq!(
        replace("Identifier[name=x]", "a + b", "y = x * 2;").unwrap(),
        "y = (a + b) * 2;"
    );
    assert_eq!(
        replace("Identifier[name=x]", "a ? b : c", "!x;").unwrap(),
        "!(a ? b : c);"
    );
    assert_eq!(
        replace("Identifier[name=x]", "a || b", "x ?? c;").unwrap(),
        "(a || b) ?? c;"
    );
    assert_eq!(
        replace("Identifier[name=f]", "a || b", "f();").unwrap(),
        "(a || b)();"
    );
}

#[test]
fn sequence_replacement_stays_one_argument() {
    let output = replace("Identifier[name=x]", "a, b", "f(x);").unwrap();
    assert_eq!(output, "f((a, b));");
    assert_eq!(esrewrite::search("Arguments > *", &output).unwrap().len(), 1);
}

#[test]
fn tight_replacements_are_not_parenthesized() {
    assert_eq!(
        replace("Identifier[name=x]", "a * b", "y = x + 2;").unwrap(),
        "y = a * b + 2;"
    );
    assert_eq!(
        replace("Identifier[name=x]", "g(1)", "x.run();").unwrap(),
        "g(1).run();"
    );
}

#[test]
fn shorthand_rename_reaches_properties() {
    let output = replace("#/^foo$/", "bar", "obj.foo(); const o = { foo }; foo();").unwrap();
    assert_eq!(output, "obj.bar(); const o = { bar }; bar();");
}
