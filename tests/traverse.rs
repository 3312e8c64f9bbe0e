use astquery::{Error, Fallback, Options, Result, VisitAction, Visitor, VisitorKeys, traverse};
use serde_json::{Value, json};

/// Records `enter:Type` and `leave:Type` events, returning `action` from
/// `enter` for nodes of type `target`.
#[derive(Default)]
struct Recorder {
    events: Vec<String>,
    target: Option<(&'static str, VisitAction)>,
    parents: Vec<Option<String>>,
}

fn kind(node: &Value) -> String {
    node["type"].as_str().unwrap_or_default().to_string()
}

impl<'a> Visitor<'a, Value> for Recorder {
    fn enter(&mut self, node: &'a Value, parent: Option<&'a Value>) -> Result<VisitAction> {
        self.events.push(format!("enter:{}", kind(node)));
        self.parents.push(parent.map(kind));
        Ok(match self.target {
            Some((target, action)) if node["type"] == target => action,
            _ => VisitAction::Continue,
        })
    }

    fn leave(&mut self, node: &'a Value, _parent: Option<&'a Value>) -> Result<VisitAction> {
        self.events.push(format!("leave:{}", kind(node)));
        Ok(VisitAction::Continue)
    }
}

/// [a, , b + c]
fn array_tree() -> Value {
    json!({
        "type": "ArrayExpression",
        "elements": [
            {"type": "Identifier", "name": "a"},
            null,
            {
                "type": "BinaryExpression",
                "operator": "+",
                "left": {"type": "Identifier", "name": "b"},
                "right": {"type": "Identifier", "name": "c"},
            },
        ],
    })
}

#[track_caller]
fn record(
    tree: &Value,
    options: &Options,
    target: Option<(&'static str, VisitAction)>,
) -> Recorder {
    let mut recorder = Recorder {
        target,
        ..Recorder::default()
    };
    traverse(tree, options, &mut recorder).unwrap();
    recorder
}

#[test]
fn test_enter_and_leave_order() {
    let recorder = record(&array_tree(), &Options::default(), None);
    assert_eq!(
        recorder.events,
        [
            "enter:ArrayExpression",
            "enter:Identifier",
            "leave:Identifier",
            "enter:BinaryExpression",
            "enter:Identifier",
            "leave:Identifier",
            "enter:Identifier",
            "leave:Identifier",
            "leave:BinaryExpression",
            "leave:ArrayExpression",
        ]
    );
    assert_eq!(
        recorder.parents,
        [
            None,
            Some("ArrayExpression".to_string()),
            Some("ArrayExpression".to_string()),
            Some("BinaryExpression".to_string()),
            Some("BinaryExpression".to_string()),
        ]
    );
}

#[test]
fn test_skip_still_leaves() {
    let recorder = record(
        &array_tree(),
        &Options::default(),
        Some(("BinaryExpression", VisitAction::Skip)),
    );
    assert_eq!(
        recorder.events,
        [
            "enter:ArrayExpression",
            "enter:Identifier",
            "leave:Identifier",
            "enter:BinaryExpression",
            "leave:BinaryExpression",
            "leave:ArrayExpression",
        ]
    );
}

#[test]
fn test_break_stops_the_walk() {
    let recorder = record(
        &array_tree(),
        &Options::default(),
        Some(("BinaryExpression", VisitAction::Break)),
    );
    assert_eq!(
        recorder.events,
        [
            "enter:ArrayExpression",
            "enter:Identifier",
            "leave:Identifier",
            "enter:BinaryExpression",
        ]
    );
}

#[test]
fn test_non_node_members_are_not_visited() {
    let tree = json!({
        "type": "Program",
        "body": [
            {"type": "ExpressionStatement", "expression": null},
            "directive",
            42,
            {"kind": "not a node"},
        ],
    });
    let recorder = record(&tree, &Options::default(), None);
    assert_eq!(
        recorder.events,
        [
            "enter:Program",
            "enter:ExpressionStatement",
            "leave:ExpressionStatement",
            "leave:Program",
        ]
    );
}

#[test]
fn test_unknown_types_iterate_members() {
    let tree = json!({
        "type": "Decorated",
        "target": {"type": "Identifier", "name": "x"},
        "loc": {"start": 0, "end": 1},
    });
    let recorder = record(&tree, &Options::default(), None);
    assert_eq!(
        recorder.events,
        [
            "enter:Decorated",
            "enter:Identifier",
            "leave:Identifier",
            "leave:Decorated",
        ]
    );

    let mut recorder = Recorder::default();
    let err = traverse(
        &tree,
        &Options::new().with_fallback(Fallback::Strict),
        &mut recorder,
    )
    .unwrap_err();
    assert_eq!(
        err,
        Error::Traversal {
            node_type: "Decorated".to_string(),
            reason: "no visitor keys for this node type".to_string(),
        }
    );
}

#[test]
fn test_empty_table() {
    let tree = array_tree();
    let options = Options::new().with_keys(VisitorKeys::empty());
    // Visiting order follows member order when nothing is in the table.
    let recorder = record(&tree, &options, None);
    assert_eq!(recorder.events.len(), 10);
}

#[test]
fn test_visitor_errors_propagate() {
    struct Failing;

    impl<'a> Visitor<'a, Value> for Failing {
        fn enter(&mut self, node: &'a Value, _parent: Option<&'a Value>) -> Result<VisitAction> {
            if node["type"] == "BinaryExpression" {
                return Err(Error::Traversal {
                    node_type: kind(node),
                    reason: "rejected".to_string(),
                });
            }
            Ok(VisitAction::Continue)
        }
    }

    let err = traverse(&array_tree(), &Options::default(), &mut Failing).unwrap_err();
    assert_eq!(err.to_string(), "cannot traverse node of type 'BinaryExpression': rejected");
}

#[test]
fn test_max_depth_boundary() {
    let tree = array_tree();
    // The deepest identifiers sit at depth 2.
    let recorder = record(&tree, &Options::new().with_max_depth(2), None);
    assert_eq!(recorder.events.len(), 10);

    let mut recorder = Recorder::default();
    let err = traverse(&tree, &Options::new().with_max_depth(1), &mut recorder).unwrap_err();
    assert!(matches!(err, Error::Traversal { .. }), "{err:?}");
    assert_eq!(
        err.to_string(),
        "cannot traverse node of type 'Identifier': tree is deeper than the limit of 1"
    );
}
