//! Property-based tests for parsing and querying.
//!
//! 1. **Parser never panics** on arbitrary input
//! 2. **Canonical text reparses** to the same selector
//! 3. **`*` finds every node** in document order
//! 4. **Alternatives are unions** of their members
//! 5. **Child matches are descendant matches**
//! 6. **A selector and its negation are disjoint**

use astquery::{Options, for_each_match, parse, query};
use proptest::prelude::*;
use serde_json::{Value, json};
use std::collections::HashSet;

fn proptest_config() -> ProptestConfig {
    let default = ProptestConfig::default();
    ProptestConfig {
        cases: default.cases.max(256),
        ..default
    }
}

// ============================================================================
// Selector generators
// ============================================================================

const ATOMS: &[&str] = &[
    "*",
    "Identifier",
    "Literal",
    "BlockStatement",
    r#"[name="a"]"#,
    "[value>1]",
    "[name=/^b/i]",
    "[value!=type(string)]",
    "Literal[value=type(number)]",
    ".body",
    ":first-child",
    ":nth-last-child(2)",
    ":not(Literal)",
    ":matches(Identifier, Literal)",
    ":has(Identifier)",
    ":statement",
    ":expression",
    "#*a",
];

const COMBINATORS: &[&str] = &[" ", " > ", " ~ ", " + "];

fn compound() -> impl Strategy<Value = String> {
    (any::<bool>(), prop::sample::select(ATOMS))
        .prop_map(|(subject, atom)| if subject { format!("!{atom}") } else { atom.to_string() })
}

fn complex() -> impl Strategy<Value = String> {
    (
        compound(),
        prop::collection::vec((prop::sample::select(COMBINATORS), compound()), 0..4),
    )
        .prop_map(|(first, rest)| {
            rest.into_iter()
                .fold(first, |text, (combinator, next)| format!("{text}{combinator}{next}"))
        })
}

fn selector_text() -> impl Strategy<Value = String> {
    prop::collection::vec(complex(), 1..3).prop_map(|alternatives| alternatives.join(", "))
}

// ============================================================================
// Tree generators
// ============================================================================

const NAMES: &[&str] = &["a", "b", "c"];

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        prop::sample::select(NAMES).prop_map(|name| json!({"type": "Identifier", "name": name})),
        (0..4i64).prop_map(|value| json!({"type": "Literal", "value": value})),
    ]
}

fn node() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(4, 48, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4)
                .prop_map(|body| json!({"type": "BlockStatement", "body": body})),
            prop::collection::vec(prop::option::of(inner.clone()), 0..4)
                .prop_map(|elements| json!({"type": "ArrayExpression", "elements": elements})),
            inner.prop_map(|expression| {
                json!({"type": "ExpressionStatement", "expression": expression})
            }),
        ]
    })
}

fn program() -> impl Strategy<Value = Value> {
    prop::collection::vec(node(), 0..4).prop_map(|body| json!({"type": "Program", "body": body}))
}

/// Every node under `value` in document order, found without the library.
fn walk<'a>(value: &'a Value, out: &mut Vec<&'a Value>) {
    match value {
        Value::Object(members) => {
            if members.get("type").is_some_and(Value::is_string) {
                out.push(value);
            }
            for (key, member) in members {
                if key != "type" {
                    walk(member, out);
                }
            }
        }
        Value::Array(elements) => {
            for element in elements {
                walk(element, out);
            }
        }
        _ => {}
    }
}

fn addresses(nodes: &[&Value]) -> Vec<*const Value> {
    nodes.iter().map(|&node| std::ptr::from_ref(node)).collect()
}

proptest! {
    #![proptest_config(proptest_config())]

    /// Property 1: Parsing arbitrary text returns a result instead of panicking.
    #[test]
    fn parser_never_panics(input in "\\PC{0,200}") {
        let _ = parse(&input);
    }

    /// Property 1b: Near-valid text is either parsed or rejected with a parse error.
    #[test]
    fn truncated_selectors_fail_cleanly(
        text in selector_text(),
        cut in any::<prop::sample::Index>(),
    ) {
        let cut = cut.index(text.len() + 1);
        if text.is_char_boundary(cut) {
            if let Err(err) = parse(&text[..cut]) {
                prop_assert!(err.is_parse(), "{err:?}");
            }
        }
    }

    /// Property 2: Printing a parsed selector gives text that parses back to it.
    #[test]
    fn canonical_text_reparses(text in selector_text()) {
        let selector = parse(&text).expect("generated selectors are valid");
        let canonical = selector.to_string();
        let reparsed = parse(&canonical).expect("canonical text is valid");
        prop_assert_eq!(&reparsed, &selector, "canonical text {:?}", canonical);
        prop_assert_eq!(reparsed.to_string(), canonical);
    }

    /// Property 3: `*` finds exactly the nodes an independent walk finds, in order.
    #[test]
    fn wildcard_finds_every_node(tree in program()) {
        let mut expected = Vec::new();
        walk(&tree, &mut expected);
        let found = query(&tree, "*").unwrap();
        prop_assert_eq!(addresses(&found), addresses(&expected));
    }

    /// Property 4: An alternative list matches the union of its members.
    #[test]
    fn alternatives_are_unions(tree in program(), a in complex(), b in complex()) {
        let mut expected: HashSet<_> = addresses(&query(&tree, &a).unwrap()).into_iter().collect();
        expected.extend(addresses(&query(&tree, &b).unwrap()));
        let found = addresses(&query(&tree, &format!("{a}, {b}")).unwrap());
        let unique: HashSet<_> = found.iter().copied().collect();
        prop_assert_eq!(unique.len(), found.len(), "duplicates for {}, {}", a, b);
        prop_assert_eq!(unique, expected, "for {}, {}", a, b);
    }

    /// Property 5: Every child match is also a descendant match.
    #[test]
    fn child_matches_are_descendant_matches(tree in program(), a in complex(), b in complex()) {
        let descendants: HashSet<_> = addresses(&query(&tree, &format!("{a} {b}")).unwrap())
            .into_iter()
            .collect();
        for node in addresses(&query(&tree, &format!("{a} > {b}")).unwrap()) {
            prop_assert!(descendants.contains(&node), "for {} > {}", a, b);
        }
    }

    /// Property 5b: The parent reported for a child match satisfies the left side.
    #[test]
    fn child_matches_report_their_parent(tree in program()) {
        let selector = parse("ArrayExpression > *").unwrap();
        let mut parents = Vec::new();
        for_each_match(&tree, &selector, &Options::default(), |_, parent, _| {
            parents.push(parent.map(|parent| parent["type"].clone()));
        })
        .unwrap();
        for parent in parents {
            prop_assert_eq!(parent, Some(json!("ArrayExpression")));
        }
    }

    /// Property 6: Nothing matches both a selector and its negation.
    #[test]
    fn negation_is_disjoint(tree in program(), a in complex()) {
        let selector = format!(":matches({a}):not({a})");
        prop_assert!(query(&tree, &selector).unwrap().is_empty(), "{}", selector);
    }
}
