use esrewrite::selector::ShorthandPattern;
use esrewrite::{print_node, replace, search, NodeId};
use proptest::prelude::*;

#[test]
fn search_is_idempotent() {
    let source = "function f(a) { return a.b(c, d) + e; }";
    let first = search("Identifier", source).unwrap();
    let second = search("Identifier", source).unwrap();
    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.id(), b.id());
        assert_eq!(print_node(a), print_node(b));
    }
}

#[test]
fn empty_match_changes_nothing() {
    let source = "let a = 1;\nfoo(a, 'b');\n";
    assert!(search("WhileStatement", source).unwrap().is_empty());
    assert_eq!(replace("WhileStatement", "x", source).unwrap(), source);
}

#[test]
fn shorthand_desugars_to_identifier_selector() {
    let short = search("#/^foo$/", "var foo = 1;").unwrap();
    let long = search("Kind=Identifier[name=/^foo$/]", "var foo = 1;").unwrap();
    let ids = |nodes: &[esrewrite::SyntaxNode]| nodes.iter().map(|n| n.id()).collect::<Vec<NodeId>>();

    assert_eq!(short.len(), 1);
    assert_eq!(short[0].kind(), "Identifier");
    assert_eq!(short[0].source_text(), Some("foo"));
    assert_eq!(ids(&short), ids(&long));
}

#[test]
fn shorthand_escaped_slash_stays_in_body() {
    let pattern = ShorthandPattern::scan(r"#/a\/b/gi").unwrap().unwrap();
    assert_eq!(pattern.body, r"a\/b");
    assert_eq!(pattern.flags, "gi");
    assert_eq!(pattern.to_string(), r"Kind=Identifier[name=/a\/b/gi]");
}

proptest! {
    #[test]
    fn shorthand_scan_recovers_body_and_flags(
        body in r"([a-z^$.*+?()|]|\\[a-z/\\])*",
        flags in "[gimsuy]{0,3}",
    ) {
        let selector = format!("#/{body}/{flags}");
        let pattern = ShorthandPattern::scan(&selector).unwrap().unwrap();
        prop_assert_eq!(pattern.body, body);
        prop_assert_eq!(pattern.flags, flags);
    }

    #[test]
    fn non_shorthand_selectors_are_not_scanned(text in "[A-Za-z\\[\\]=: >]{0,20}") {
        prop_assert!(ShorthandPattern::scan(&text).is_none());
    }

    #[test]
    fn search_order_is_stable(names in prop::collection::vec("[a-z]{1,6}", 1..8)) {
        let source = names
            .iter()
            .map(|name| format!("call_{name}(arg_{name});"))
            .collect::<Vec<_>>()
            .join("\n");
        let first: Vec<String> = search("Identifier", &source).unwrap().iter().map(print_node).collect();
        let second: Vec<String> = search("Identifier", &source).unwrap().iter().map(print_node).collect();
        prop_assert_eq!(first.len(), names.len() * 2);
        prop_assert_eq!(first, second);
    }
}
